//! Stopwatch readout formatting.

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Readout split into the `HH:MM:SS` head and the `.cc` tail, so the page
/// can style the centiseconds on their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeParts {
    pub clock: String,
    pub centis: String,
}

/// Splits `ms` the way a UTC clock reading of that instant would: hours wrap
/// at 24 and centiseconds are truncated, never rounded.
pub fn time_parts(ms: u64) -> TimeParts {
    let in_day = ms % MS_PER_DAY;
    let hours = in_day / MS_PER_HOUR;
    let minutes = (in_day % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (in_day % MS_PER_MINUTE) / MS_PER_SECOND;
    let centis = (in_day % MS_PER_SECOND) / 10;
    TimeParts {
        clock: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
        centis: format!(".{:02}", centis),
    }
}

/// Format milliseconds as "HH:MM:SS.cc"
pub fn format_time(ms: u64) -> String {
    let parts = time_parts(ms);
    format!("{}{}", parts.clock, parts.centis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_time(0), "00:00:00.00");
    }

    #[test]
    fn wraps_every_field() {
        assert_eq!(format_time(3_661_234), "01:01:01.23");
        assert_eq!(format_time(59_999), "00:00:59.99");
        assert_eq!(format_time(60_000), "00:01:00.00");
    }

    #[test]
    fn truncates_centiseconds() {
        assert_eq!(format_time(1_239), "00:00:01.23");
        assert_eq!(format_time(9), "00:00:00.00");
    }

    #[test]
    fn hours_wrap_past_a_day() {
        assert_eq!(format_time(MS_PER_DAY + 1_500), "00:00:01.50");
    }

    #[test]
    fn split_parts() {
        let parts = time_parts(2_500);
        assert_eq!(parts.clock, "00:00:02");
        assert_eq!(parts.centis, ".50");
    }
}
