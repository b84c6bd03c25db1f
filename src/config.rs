//! Scene and stopwatch tunables.
//!
//! Every field has a default, so a partial JSON object (or none at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::timer::REWIND_DURATION_SECS;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seconds the visualization rewinds before a reset completes.
    pub rewind_duration: f64,
    /// Playback speed of the rewind relative to forward time.
    pub rewind_speed: f32,
    /// Readout refresh interval while running.
    pub tick_interval_ms: i32,
    /// Per-frame damping factor of the invert fade.
    pub fade_rate: f32,
    pub camera: CameraConfig,
    pub bloom: BloomConfig,
    pub distortion_strength: f32,
    pub star_count: usize,
    pub star_extent: f32,
    pub star_size: f32,
    pub max_pixel_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rewind_duration: REWIND_DURATION_SECS,
            rewind_speed: 2.5,
            tick_interval_ms: 10,
            fade_rate: 0.1,
            camera: CameraConfig::default(),
            bloom: BloomConfig::default(),
            distortion_strength: 0.000_000_1,
            star_count: 10_000,
            star_extent: 2_000.0,
            star_size: 0.7,
            max_pixel_ratio: 2.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1_000.0,
            distance: 5.0,
        }
    }
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            strength: 1.0,
            radius: 0.4,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
