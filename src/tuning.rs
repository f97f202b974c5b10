//! Physics tuning
//!
//! Every knob defaults to the matching constant in `consts`; a JSON file only
//! needs the fields it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{SimError, SimResult};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Stepping ===
    /// Frames per second of the external clock
    pub fps: f32,
    /// Physics substeps per frame
    pub substeps: u32,
    /// Each substep lasts `substep_scale` of a frame
    pub substep_scale: f32,
    pub solver_iterations: u32,

    // === World ===
    pub gravity: Vec2,
    /// Fraction of velocity kept after one second
    pub space_damping: f32,
    pub sea_level: f32,
    /// World units to displayed metres
    pub distance_scale: f32,

    // === Main body ===
    /// Multiplied into angular velocity once per tick
    pub angular_velocity_damping: f32,
    pub angular_velocity_limit: f32,

    // === Shapes ===
    pub shape_friction: f32,
    pub shape_elasticity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fps: consts::TARGET_FPS,
            substeps: consts::SUBSTEPS,
            substep_scale: consts::SUBSTEP_SCALE,
            solver_iterations: consts::SOLVER_ITERATIONS,

            gravity: consts::GRAVITY,
            space_damping: consts::SPACE_DAMPING,
            sea_level: consts::SEA_LEVEL,
            distance_scale: consts::DISTANCE_SCALE,

            angular_velocity_damping: consts::ANGULAR_VELOCITY_DAMPING,
            angular_velocity_limit: consts::ANGULAR_VELOCITY_LIMIT,

            shape_friction: consts::SHAPE_FRICTION,
            shape_elasticity: consts::SHAPE_ELASTICITY,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json).map_err(|e| SimError::data("tuning", e))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from `path`, falling back to defaults if it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| SimError::data("tuning", e))?;
        std::fs::write(path, json).map_err(|e| SimError::io(path.display().to_string(), e))?;
        log::info!("Tuning saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.fps > 0.0) {
            return Err(SimError::data("tuning", "fps must be positive"));
        }
        if self.substeps == 0 {
            return Err(SimError::data("tuning", "substeps must be at least 1"));
        }
        if !(self.substep_scale > 0.0) {
            return Err(SimError::data("tuning", "substep_scale must be positive"));
        }
        Ok(())
    }

    /// Length of one frame in seconds
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps
    }

    /// Length of one physics substep for a frame of `dt` seconds
    pub fn substep(&self, dt: f32) -> f32 {
        dt * self.substep_scale
    }
}
