use std::cell::RefCell;
use std::rc::Rc;

use blackhole_stopwatch::config::SceneConfig;
use blackhole_stopwatch::schedule::{FrameClock, TaskHandle, TickSource};
use blackhole_stopwatch::timer::{Mode, TimerState};
use blackhole_stopwatch::visual::VisualizationState;

struct Page {
    timer: TimerState,
    visual: VisualizationState,
    clock: FrameClock,
    readout: String,
    resets: u32,
}

/// Drives a page at 60 fps with a 10 ms display tick, the way the browser
/// callbacks would, but on a virtual clock.
struct Harness {
    page: Rc<RefCell<Page>>,
    frames: TickSource,
    interval: TickSource,
    display: TaskHandle,
    now_ms: u64,
}

impl Harness {
    fn new() -> Self {
        let config = SceneConfig::default();
        let page = Rc::new(RefCell::new(Page {
            timer: TimerState::new(config.rewind_duration),
            visual: VisualizationState::new(&config, fastrand::Rng::with_seed(42)),
            clock: FrameClock::new(),
            readout: String::from("00:00:00.00"),
            resets: 0,
        }));

        let mut frames = TickSource::new();
        {
            let page = page.clone();
            frames.register(true, move |now| {
                let mut guard = page.borrow_mut();
                let p = &mut *guard;
                let delta = p.clock.delta(now);
                if p.visual.advance(delta, &mut p.timer).reset_finalized {
                    p.resets += 1;
                    p.readout = p.timer.display(0);
                }
            });
        }

        let mut interval = TickSource::new();
        let display = {
            let page = page.clone();
            interval.register(false, move |now| {
                let mut p = page.borrow_mut();
                if let Some(text) = p.timer.tick(now as u64) {
                    p.readout = text;
                }
            })
        };

        Self {
            page,
            frames,
            interval,
            display,
            now_ms: 0,
        }
    }

    /// Advances virtual time, firing the interval every 10 ms and a frame
    /// roughly every 16 ms.
    fn run_for(&mut self, ms: u64) {
        let end = self.now_ms + ms;
        while self.now_ms < end {
            self.now_ms += 1;
            if self.now_ms % 10 == 0 {
                self.interval.fire(self.now_ms as f64);
            }
            if self.now_ms % 16 == 0 {
                self.frames.fire(self.now_ms as f64);
            }
        }
    }

    fn start(&mut self) {
        let started = self.page.borrow_mut().timer.start(self.now_ms);
        if started {
            self.display.set_active(true);
        }
    }

    fn pause(&mut self) {
        let mut p = self.page.borrow_mut();
        if p.timer.pause(self.now_ms) {
            self.display.set_active(false);
            p.readout = p.timer.display(self.now_ms);
        }
    }

    fn reset(&mut self) {
        let mut p = self.page.borrow_mut();
        if p.timer.reset_request() {
            self.display.set_active(false);
            p.readout = p.timer.display(self.now_ms);
        }
    }

    fn lap(&mut self) {
        let now = self.now_ms;
        self.page.borrow_mut().timer.lap(now);
    }

    fn readout(&self) -> String {
        self.page.borrow().readout.clone()
    }
}

#[test]
fn start_lap_pause_resume_scenario() {
    let mut h = Harness::new();
    h.start();

    h.run_for(1_500);
    h.lap();
    {
        let p = h.page.borrow();
        let laps: Vec<_> = p.timer.laps().collect();
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].label(), "Lap 1");
        assert_eq!(laps[0].display_time, "00:00:01.50");
    }

    h.run_for(1_000);
    h.pause();
    assert_eq!(h.readout(), "00:00:02.50");

    h.run_for(500);
    assert_eq!(h.readout(), "00:00:02.50");

    h.start();
    h.run_for(1_000);
    h.pause();
    assert_eq!(h.page.borrow().timer.elapsed_ms(h.now_ms), 3_500);
    assert_eq!(h.readout(), "00:00:03.50");
}

#[test]
fn readout_follows_display_tick() {
    let mut h = Harness::new();
    h.start();
    h.run_for(1_230);
    assert_eq!(h.readout(), "00:00:01.23");
}

#[test]
fn full_rewind_returns_to_initial_state() {
    let mut h = Harness::new();
    h.start();
    h.run_for(800);
    h.lap();
    h.run_for(400);
    h.reset();
    assert_eq!(h.readout(), "00:00:00.00");
    assert_eq!(h.page.borrow().timer.mode(), Mode::Rewinding);

    // A second reset mid-rewind must not restart the countdown.
    h.run_for(2_000);
    let remaining = h.page.borrow().timer.rewind_remaining();
    h.reset();
    assert_eq!(h.page.borrow().timer.rewind_remaining(), remaining);

    // Controls are locked while rewinding.
    h.start();
    h.lap();
    assert_eq!(h.page.borrow().timer.mode(), Mode::Rewinding);

    h.run_for(3_200);
    let p = h.page.borrow();
    assert_eq!(p.resets, 1);
    assert_eq!(p.timer.mode(), Mode::Idle);
    assert_eq!(p.timer.elapsed_ms(h.now_ms), 0);
    assert_eq!(p.timer.lap_count(), 0);
    assert_eq!(p.timer.lap_counter(), 1);
    assert_eq!(p.visual.distortion_time(), 0.0);
}

#[test]
fn invert_fades_in_when_stopped() {
    let mut h = Harness::new();
    h.start();
    h.run_for(2_000);
    assert!(h.page.borrow().visual.intensity() < 0.01);
    h.pause();
    h.run_for(2_000);
    let intensity = h.page.borrow().visual.intensity();
    assert!(intensity > 0.99 && intensity <= 1.0);
}
