//! Per-frame animation state of the black hole background.
//!
//! Owns everything the renderer reads as uniforms: ring Euler angles, ring
//! shader clocks, the distortion clock and the invert intensity. Which of
//! them move on a frame depends on the stopwatch mode.

use std::f32::consts::PI;

use glam::Vec3;

use crate::config::SceneConfig;
use crate::timer::{Mode, TimerState};

const DEG: f32 = PI / 180.0;

pub const HORIZONTAL_RINGS: usize = 5;
pub const VERTICAL_RINGS: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RingGroup {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug)]
pub struct RingVisual {
    pub group: RingGroup,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub speed: f32,
    pub shader_time: f32,
    pub seed: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
}

/// What a single [`VisualizationState::advance`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub delta: f32,
    pub reset_finalized: bool,
    pub intensity: f32,
}

pub struct VisualizationState {
    rings: Vec<RingVisual>,
    distortion_time: f32,
    intensity: f32,
    rewind_speed: f32,
    fade_rate: f32,
    rng: fastrand::Rng,
}

fn uniform(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.f32()
}

/// Builds the horizontal disk (5 flat rings tilted towards the camera) and
/// the vertical disk (8 rings facing it), each group packed outwards from
/// its base radius.
pub fn build_rings(rng: &mut fastrand::Rng) -> Vec<RingVisual> {
    let mut rings = Vec::with_capacity(HORIZONTAL_RINGS + VERTICAL_RINGS);

    let mut base = 2.6;
    for i in 0..HORIZONTAL_RINGS {
        let inner = base + uniform(rng, 0.01, 0.05);
        let outer = inner + 0.35;
        rings.push(RingVisual {
            group: RingGroup::Horizontal,
            rotation: Vec3::new(-PI / 2.2 - 6.0 * DEG, 10.0 * DEG, uniform(rng, 0.0, 2.0 * PI)),
            speed: 0.28 - i as f32 * 0.02,
            shader_time: uniform(rng, 0.0, 100.0),
            seed: uniform(rng, 0.0, 10.0),
            inner_radius: inner,
            outer_radius: outer,
            segments: 64,
        });
        base = outer;
    }

    let mut base = 2.5;
    for i in 0..VERTICAL_RINGS {
        let inner = base + uniform(rng, 0.02, 0.07);
        let outer = inner + uniform(rng, 0.1, 0.4);
        rings.push(RingVisual {
            group: RingGroup::Vertical,
            rotation: Vec3::new(-10.0 * DEG, 10.0 * DEG, uniform(rng, 0.0, 2.0 * PI)),
            speed: 0.25 - i as f32 * 0.025,
            shader_time: uniform(rng, 0.0, 100.0),
            seed: uniform(rng, 0.0, 10.0),
            inner_radius: inner,
            outer_radius: outer,
            segments: 128,
        });
        base = outer;
    }

    rings
}

impl VisualizationState {
    pub fn new(config: &SceneConfig, mut rng: fastrand::Rng) -> Self {
        let rings = build_rings(&mut rng);
        Self {
            rings,
            distortion_time: 0.0,
            // Page loads with colors fully inverted.
            intensity: 1.0,
            rewind_speed: config.rewind_speed,
            fade_rate: config.fade_rate.clamp(0.0, 1.0),
            rng,
        }
    }

    pub fn rings(&self) -> &[RingVisual] {
        &self.rings
    }

    pub fn distortion_time(&self) -> f32 {
        self.distortion_time
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Advances one display refresh. `delta` is in seconds; negative or
    /// non-finite values are treated as zero.
    pub fn advance(&mut self, delta: f64, timer: &mut TimerState) -> FrameReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let step = delta as f32;
        let mut reset_finalized = false;

        match timer.mode() {
            Mode::Running => self.spin(step),
            Mode::Rewinding => {
                if timer.rewind_remaining() > 0.0 {
                    timer.consume_rewind(delta);
                    self.spin(-step * self.rewind_speed);
                } else {
                    timer.finalize_reset();
                    self.reseed();
                    reset_finalized = true;
                }
            }
            Mode::Idle | Mode::Paused => {}
        }

        let target = match timer.mode() {
            Mode::Idle | Mode::Paused => 1.0,
            Mode::Running | Mode::Rewinding => 0.0,
        };
        self.intensity += (target - self.intensity) * self.fade_rate;
        self.intensity = self.intensity.clamp(0.0, 1.0);

        FrameReport {
            delta: step,
            reset_finalized,
            intensity: self.intensity,
        }
    }

    /// Positive `dt` plays forward, negative plays backward.
    fn spin(&mut self, dt: f32) {
        for ring in &mut self.rings {
            ring.rotation.z -= dt * ring.speed;
            ring.shader_time += dt;
        }
        self.distortion_time += dt;
    }

    fn reseed(&mut self) {
        for ring in &mut self.rings {
            ring.shader_time = self.rng.f32() * 10.0;
        }
        self.distortion_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn setup() -> (VisualizationState, TimerState) {
        let config = SceneConfig::default();
        (
            VisualizationState::new(&config, fastrand::Rng::with_seed(7)),
            TimerState::new(config.rewind_duration),
        )
    }

    #[test]
    fn ring_layout() {
        let rings = build_rings(&mut fastrand::Rng::with_seed(1));
        assert_eq!(rings.len(), 13);
        let horizontal: Vec<_> = rings.iter().filter(|r| r.group == RingGroup::Horizontal).collect();
        assert_eq!(horizontal.len(), HORIZONTAL_RINGS);
        assert!((horizontal[0].speed - 0.28).abs() < 1e-6);
        assert!((horizontal[4].speed - 0.20).abs() < 1e-6);
        for pair in horizontal.windows(2) {
            assert!(pair[1].inner_radius > pair[0].outer_radius);
        }
        let vertical: Vec<_> = rings.iter().filter(|r| r.group == RingGroup::Vertical).collect();
        assert!((vertical[7].speed - 0.075).abs() < 1e-6);
        assert!(vertical.iter().all(|r| r.segments == 128));
        assert!(rings.iter().all(|r| (0.0..100.0).contains(&r.shader_time)));
    }

    #[test]
    fn frozen_while_idle_or_paused() {
        let (mut vis, mut timer) = setup();
        let before = vis.rings().to_vec();
        vis.advance(0.5, &mut timer);
        timer.start(0);
        timer.pause(10);
        vis.advance(0.5, &mut timer);
        for (a, b) in before.iter().zip(vis.rings()) {
            assert_eq!(a.rotation, b.rotation);
            assert_eq!(a.shader_time, b.shader_time);
        }
        assert_eq!(vis.distortion_time(), 0.0);
    }

    #[test]
    fn running_spins_forward() {
        let (mut vis, mut timer) = setup();
        let before = vis.rings().to_vec();
        timer.start(0);
        vis.advance(0.5, &mut timer);
        for (a, b) in before.iter().zip(vis.rings()) {
            assert!((b.rotation.z - (a.rotation.z - 0.5 * a.speed)).abs() < 1e-5);
            assert!((b.shader_time - (a.shader_time + 0.5)).abs() < 1e-4);
        }
        assert!((vis.distortion_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rewind_runs_backwards_faster() {
        let (mut vis, mut timer) = setup();
        timer.start(0);
        vis.advance(1.0, &mut timer);
        let before = vis.rings().to_vec();
        timer.reset_request();

        let report = vis.advance(0.2, &mut timer);
        assert!(!report.reset_finalized);
        assert!((timer.rewind_remaining() - 4.8).abs() < 1e-9);
        for (a, b) in before.iter().zip(vis.rings()) {
            assert!((b.rotation.z - (a.rotation.z + 0.5 * a.speed)).abs() < 1e-5);
            assert!((b.shader_time - (a.shader_time - 0.5)).abs() < 1e-4);
        }
        assert!((vis.distortion_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn rewind_completion_finalizes_and_reseeds() {
        let (mut vis, mut timer) = setup();
        timer.start(0);
        timer.lap(100);
        vis.advance(3.0, &mut timer);
        timer.reset_request();

        let mut frames = 0;
        while timer.is_rewinding() {
            let report = vis.advance(FRAME, &mut timer);
            frames += 1;
            if report.reset_finalized {
                break;
            }
            assert!(frames < 1_000);
        }
        assert!(frames > 300);
        assert_eq!(timer.mode(), Mode::Idle);
        assert_eq!(timer.lap_count(), 0);
        assert_eq!(vis.distortion_time(), 0.0);
        assert!(vis.rings().iter().all(|r| (0.0..10.0).contains(&r.shader_time)));
    }

    #[test]
    fn intensity_fades_towards_mode_target() {
        let (mut vis, mut timer) = setup();
        assert_eq!(vis.intensity(), 1.0);
        timer.start(0);
        let first = vis.advance(FRAME, &mut timer).intensity;
        assert!((first - 0.9).abs() < 1e-6);
        for _ in 0..200 {
            vis.advance(FRAME, &mut timer);
        }
        assert!(vis.intensity() < 0.001);
        timer.pause(5_000);
        let next = vis.advance(FRAME, &mut timer).intensity;
        assert!(next > 0.09);
    }

    #[test]
    fn intensity_stays_bounded() {
        let (mut vis, mut timer) = setup();
        for step in 0..5_000 {
            match step % 1_250 {
                0 => {
                    timer.start(step);
                }
                600 => {
                    timer.pause(step);
                }
                900 => {
                    timer.reset_request();
                }
                _ => {}
            }
            let r = vis.advance(FRAME, &mut timer);
            assert!((0.0..=1.0).contains(&r.intensity));
        }
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let (mut vis, mut timer) = setup();
        timer.start(0);
        let before = vis.rings().to_vec();
        assert_eq!(vis.advance(-0.3, &mut timer).delta, 0.0);
        assert_eq!(vis.advance(f64::NAN, &mut timer).delta, 0.0);
        assert_eq!(before[0].shader_time, vis.rings()[0].shader_time);
    }
}
