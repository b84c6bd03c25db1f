//! Single-threaded tick sources.
//!
//! The browser drives two of these: one from `requestAnimationFrame`, one from
//! a fixed `setInterval`. Cancelling a task means clearing its `active` flag;
//! the source checks the flag before every invocation.

use std::cell::Cell;
use std::rc::Rc;

/// Shared switch for a registered task.
#[derive(Clone, Debug)]
pub struct TaskHandle(Rc<Cell<bool>>);

impl TaskHandle {
    pub fn set_active(&self, active: bool) {
        self.0.set(active);
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

struct Task {
    active: Rc<Cell<bool>>,
    update: Box<dyn FnMut(f64)>,
}

#[derive(Default)]
pub struct TickSource {
    tasks: Vec<Task>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, active: bool, update: impl FnMut(f64) + 'static) -> TaskHandle {
        let flag = Rc::new(Cell::new(active));
        self.tasks.push(Task {
            active: flag.clone(),
            update: Box::new(update),
        });
        TaskHandle(flag)
    }

    /// Runs every active task with `now` in registration order and returns
    /// how many ran.
    pub fn fire(&mut self, now: f64) -> usize {
        let mut ran = 0;
        for task in &mut self.tasks {
            if task.active.get() {
                (task.update)(now);
                ran += 1;
            }
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Turns monotonic millisecond timestamps into per-frame deltas in seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first call yields zero. Retrograde or non-finite timestamps yield
    /// zero and do not move the reference point backwards.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last) / 1_000.0).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(self.last_ms.map_or(now_ms, |last| last.max(now_ms)));
        delta
    }
}
