//! Deterministic simulation module
//!
//! All flight logic lives here. This module must be pure and deterministic:
//! - Caller-driven frame clock, fixed substeps
//! - Seeded RNG only
//! - Stable iteration order (bodies by handle, components by update order)
//! - No rendering, audio or platform dependencies

pub mod catalog;
pub mod component;
pub mod fuel;
pub mod level;
pub mod obstacle;
pub mod physics;
pub mod slots;
pub mod squid;
pub mod tether;
pub mod world;

pub use catalog::{Catalog, ComponentKind, ComponentSpec};
pub use component::{
    Activation, Component, ComponentId, ControlMode, FuelUse, SoundEmitter, ground_effect_factor,
};
pub use fuel::FuelReservoir;
pub use level::{FREEFLIGHT_TITLE, LevelDescription, ObstacleKind, ObstaclePlacement};
pub use obstacle::BarrageBalloon;
pub use physics::{Body, BodyHandle, CircleShape, Joint, JointKind, Segment, Space};
pub use slots::{Attachable, Slot, SlotFlags, SlotId, Slots};
pub use squid::Squid;
pub use tether::{Tether, TetherConfig};
pub use world::{FlightPhase, GameEvent, World};
