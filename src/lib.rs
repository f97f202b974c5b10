//! Susie - simulation core for a modular flying-creature game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics space, slots, components, tethers, world)
//! - `geom`: Vector helpers and axis-aligned rectangles
//! - `tuning`: Data-driven physics tuning
//! - `records`: Best flight distances per level

pub mod error;
pub mod geom;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use geom::{Rect, VecExt};
pub use records::FlightRecords;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Target frame rate of the external frame clock
    pub const TARGET_FPS: f32 = 30.0;
    /// Physics substeps per frame
    pub const SUBSTEPS: u32 = 5;
    /// Each substep lasts `SUBSTEP_SCALE / TARGET_FPS` seconds
    pub const SUBSTEP_SCALE: f32 = 0.2;
    /// Solver iterations per physics step
    pub const SOLVER_ITERATIONS: u32 = 10;
    /// Pixels per physics length unit, scales contact and joint tolerances
    pub const PHYSICS_LENGTH_UNIT: f32 = 100.0;

    /// World gravity (pixels/s²)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -900.0);
    /// Fraction of velocity kept after one second
    pub const SPACE_DAMPING: f32 = 0.9;

    /// Below this height the craft has crashed into the sea
    pub const SEA_LEVEL: f32 = 0.0;
    /// World units to displayed metres
    pub const DISTANCE_SCALE: f32 = 0.1;

    /// Multiplied into Susie's angular velocity once per tick
    pub const ANGULAR_VELOCITY_DAMPING: f32 = 0.8;
    /// Susie can't spin faster than this (rad/s)
    pub const ANGULAR_VELOCITY_LIMIT: f32 = 1.5;

    /// Radius of each tether point-mass shape
    pub const TETHER_POINT_RADIUS: f32 = 2.0;
    /// Lightest a tether point may be
    pub const TETHER_MIN_POINT_MASS: f32 = 0.01;

    /// Default contact properties for component shapes
    pub const SHAPE_FRICTION: f32 = 0.7;
    pub const SHAPE_ELASTICITY: f32 = 0.01;

    /// Collision group shared by Susie, her components and their tethers
    pub const CRAFT_GROUP: u32 = 1;
    /// Collision group of barrage balloons and their ropes
    pub const OBSTACLE_GROUP: u32 = 2;

    /// Thickness of the sea floor segment
    pub const FLOOR_RADIUS: f32 = 20.0;
    /// Thickness of boundary walls
    pub const WALL_RADIUS: f32 = 50.0;
    /// Height of boundary walls
    pub const WALL_HEIGHT: f32 = 100_000.0;
    /// Thickness of island segments
    pub const ISLAND_RADIUS: f32 = 15.0;

    /// Where Susie spawns when a level does not say otherwise
    pub const DEFAULT_START: Vec2 = Vec2::new(250.0, 145.0);
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
