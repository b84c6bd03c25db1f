//! Stopwatch state machine.
//!
//! Timestamps are wall-clock milliseconds supplied by the caller, so every
//! transition is deterministic under test. While running, elapsed time is
//! derived from the anchor on every read and only written back on pause.

use crate::format::format_time;

/// Cooldown before a requested reset actually clears the stopwatch.
pub const REWIND_DURATION_SECS: f64 = 5.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Idle,
    Running,
    Paused,
    Rewinding,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapRecord {
    pub index: u32,
    pub display_time: String,
}

impl LapRecord {
    pub fn label(&self) -> String {
        format!("Lap {}", self.index)
    }
}

/// Button visibility and availability for a given mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Controls {
    pub start_visible: bool,
    pub start_enabled: bool,
    pub pause_visible: bool,
    pub pause_enabled: bool,
    pub lap_enabled: bool,
    pub reset_enabled: bool,
    /// Mirrors the `time-stopped` page class.
    pub time_stopped: bool,
}

impl Controls {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Idle => Self {
                start_visible: true,
                start_enabled: true,
                pause_visible: false,
                pause_enabled: false,
                lap_enabled: false,
                reset_enabled: true,
                time_stopped: true,
            },
            Mode::Running => Self {
                start_visible: false,
                start_enabled: true,
                pause_visible: true,
                pause_enabled: true,
                lap_enabled: true,
                reset_enabled: true,
                time_stopped: false,
            },
            // Lap stays clickable while paused; `lap` ignores it.
            Mode::Paused => Self {
                start_visible: true,
                start_enabled: true,
                pause_visible: false,
                pause_enabled: true,
                lap_enabled: true,
                reset_enabled: true,
                time_stopped: true,
            },
            Mode::Rewinding => Self {
                start_visible: true,
                start_enabled: false,
                pause_visible: false,
                pause_enabled: false,
                lap_enabled: false,
                reset_enabled: false,
                time_stopped: false,
            },
        }
    }
}

#[derive(Debug)]
pub struct TimerState {
    mode: Mode,
    elapsed_ms: u64,
    anchor_ms: u64,
    rewind_remaining: f64,
    rewind_duration: f64,
    lap_counter: u32,
    laps: Vec<LapRecord>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(REWIND_DURATION_SECS)
    }
}

impl TimerState {
    pub fn new(rewind_duration: f64) -> Self {
        Self {
            mode: Mode::Idle,
            elapsed_ms: 0,
            anchor_ms: 0,
            rewind_remaining: 0.0,
            rewind_duration: rewind_duration.max(0.0),
            lap_counter: 1,
            laps: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    pub fn is_rewinding(&self) -> bool {
        self.mode == Mode::Rewinding
    }

    pub fn rewind_remaining(&self) -> f64 {
        self.rewind_remaining
    }

    pub fn lap_counter(&self) -> u32 {
        self.lap_counter
    }

    /// Lap history, most recent first.
    pub fn laps(&self) -> impl Iterator<Item = &LapRecord> {
        self.laps.iter().rev()
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn controls(&self) -> Controls {
        Controls::for_mode(self.mode)
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.mode {
            Mode::Running => now_ms.saturating_sub(self.anchor_ms),
            Mode::Paused | Mode::Idle => self.elapsed_ms,
            Mode::Rewinding => 0,
        }
    }

    /// Readout for the current instant; zero from the moment a reset is requested.
    pub fn display(&self, now_ms: u64) -> String {
        format_time(self.elapsed_ms(now_ms))
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        if !matches!(self.mode, Mode::Idle | Mode::Paused) {
            return false;
        }
        self.anchor_ms = now_ms.saturating_sub(self.elapsed_ms);
        self.mode = Mode::Running;
        log::debug!("stopwatch started at {} ms", self.elapsed_ms);
        true
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.mode != Mode::Running {
            return false;
        }
        self.elapsed_ms = now_ms.saturating_sub(self.anchor_ms);
        self.mode = Mode::Paused;
        log::debug!("stopwatch paused at {} ms", self.elapsed_ms);
        true
    }

    /// Begins the rewind cooldown. The stopwatch is only cleared once the
    /// visualization calls [`TimerState::finalize_reset`].
    pub fn reset_request(&mut self) -> bool {
        if self.mode == Mode::Rewinding {
            return false;
        }
        self.mode = Mode::Rewinding;
        self.rewind_remaining = self.rewind_duration;
        log::debug!("reset requested, rewinding for {:.2}s", self.rewind_duration);
        true
    }

    pub fn lap(&mut self, now_ms: u64) -> Option<&LapRecord> {
        if self.mode != Mode::Running {
            return None;
        }
        let record = LapRecord {
            index: self.lap_counter,
            display_time: format_time(self.elapsed_ms(now_ms)),
        };
        self.lap_counter += 1;
        self.laps.push(record);
        self.laps.last()
    }

    /// Display refresh for the interval callback. Only produces a readout
    /// while running; `elapsed_ms` is never touched here.
    pub fn tick(&self, now_ms: u64) -> Option<String> {
        self.is_running().then(|| self.display(now_ms))
    }

    pub fn consume_rewind(&mut self, delta: f64) {
        if self.mode == Mode::Rewinding {
            self.rewind_remaining -= delta;
        }
    }

    pub fn finalize_reset(&mut self) {
        self.mode = Mode::Idle;
        self.elapsed_ms = 0;
        self.anchor_ms = 0;
        self.rewind_remaining = 0.0;
        self.lap_counter = 1;
        self.laps.clear();
        log::debug!("reset finalized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let t = TimerState::default();
        assert_eq!(t.mode(), Mode::Idle);
        assert_eq!(t.elapsed_ms(10_000), 0);
        assert_eq!(t.lap_counter(), 1);
        assert_eq!(t.display(0), "00:00:00.00");
    }

    #[test]
    fn accumulates_running_intervals() {
        let mut t = TimerState::default();
        assert!(t.start(1_000));
        assert_eq!(t.elapsed_ms(1_500), 500);
        assert!(t.pause(2_000));
        assert_eq!(t.elapsed_ms(9_000), 1_000);

        assert!(t.start(5_000));
        assert_eq!(t.elapsed_ms(5_250), 1_250);
        assert!(t.pause(6_000));
        assert_eq!(t.elapsed_ms(6_000), 2_000);
    }

    #[test]
    fn second_pause_is_noop() {
        let mut t = TimerState::default();
        t.start(0);
        t.pause(700);
        assert!(!t.pause(3_000));
        assert_eq!(t.elapsed_ms(3_000), 700);
        assert_eq!(t.mode(), Mode::Paused);
    }

    #[test]
    fn start_while_running_keeps_anchor() {
        let mut t = TimerState::default();
        t.start(100);
        assert!(!t.start(900));
        assert_eq!(t.elapsed_ms(1_100), 1_000);
    }

    #[test]
    fn lap_ignored_unless_running() {
        let mut t = TimerState::default();
        assert!(t.lap(100).is_none());
        t.start(0);
        t.pause(400);
        assert!(t.lap(500).is_none());
        assert_eq!(t.lap_count(), 0);
        assert_eq!(t.lap_counter(), 1);
    }

    #[test]
    fn laps_are_newest_first() {
        let mut t = TimerState::default();
        t.start(0);
        t.lap(1_000);
        t.lap(2_340);
        let laps: Vec<_> = t.laps().map(|l| (l.label(), l.display_time.clone())).collect();
        assert_eq!(
            laps,
            vec![
                ("Lap 2".to_string(), "00:00:02.34".to_string()),
                ("Lap 1".to_string(), "00:00:01.00".to_string()),
            ]
        );
        assert_eq!(t.lap_counter(), 3);
    }

    #[test]
    fn tick_only_reports_while_running() {
        let mut t = TimerState::default();
        assert_eq!(t.tick(50), None);
        t.start(0);
        assert_eq!(t.tick(1_230).as_deref(), Some("00:00:01.23"));
        t.pause(1_500);
        assert_eq!(t.tick(2_000), None);
        assert_eq!(t.elapsed_ms(2_000), 1_500);
    }

    #[test]
    fn reset_request_rewinds_then_blocks() {
        let mut t = TimerState::default();
        t.start(0);
        t.lap(300);
        assert!(t.reset_request());
        assert_eq!(t.mode(), Mode::Rewinding);
        assert_eq!(t.rewind_remaining(), REWIND_DURATION_SECS);
        assert_eq!(t.display(900), "00:00:00.00");

        t.consume_rewind(1.0);
        assert!(!t.reset_request());
        assert_eq!(t.rewind_remaining(), REWIND_DURATION_SECS - 1.0);
        assert!(!t.start(1_000));
        assert!(t.lap(1_000).is_none());
    }

    #[test]
    fn finalize_restores_initial_state() {
        let mut t = TimerState::default();
        t.start(0);
        t.lap(100);
        t.lap(200);
        t.pause(250);
        t.reset_request();
        t.finalize_reset();
        assert_eq!(t.mode(), Mode::Idle);
        assert_eq!(t.elapsed_ms(99_999), 0);
        assert_eq!(t.lap_count(), 0);
        assert_eq!(t.lap_counter(), 1);
        assert_eq!(t.controls(), Controls::for_mode(Mode::Idle));
    }

    #[test]
    fn controls_follow_mode() {
        let mut t = TimerState::default();
        assert!(t.controls().start_visible && !t.controls().lap_enabled);
        t.start(0);
        let c = t.controls();
        assert!(c.pause_visible && !c.start_visible && c.lap_enabled && !c.time_stopped);
        t.reset_request();
        let c = t.controls();
        assert!(!c.start_enabled && !c.pause_enabled && !c.lap_enabled && !c.reset_enabled);
    }
}
