//! Component catalog: per-kind constants and shape-derived mass properties
//!
//! Mass, fuel capacity, price and slot mask are fixed per kind in code.
//! Shape data (a base circle plus extra points) comes from JSON and is turned
//! into circles recentred on the centre of gravity, a moment of inertia and the
//! sprite offset. The catalog is built once and shared read-only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::moment_for_circle;
use super::slots::SlotFlags;
use crate::error::{SimError, SimResult};

/// Built-in shape data
const BUILTIN_COMPONENTS: &str = include_str!("../../assets/components.json");

/// Every kind of part the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// The main body
    Susie,
    JetEngine,
    PulseJet,
    Rocket,
    Propeller,
    Rotor,
    Wing,
    Aerolon,
    Ekranoplan,
    Balloon,
    HotAirBalloon,
    SmallFuelTank,
    LargeFuelTank,
    Tentacle,
    /// Level obstacle, never attachable
    BarrageBalloon,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 15] = [
        ComponentKind::Susie,
        ComponentKind::JetEngine,
        ComponentKind::PulseJet,
        ComponentKind::Rocket,
        ComponentKind::Propeller,
        ComponentKind::Rotor,
        ComponentKind::Wing,
        ComponentKind::Aerolon,
        ComponentKind::Ekranoplan,
        ComponentKind::Balloon,
        ComponentKind::HotAirBalloon,
        ComponentKind::SmallFuelTank,
        ComponentKind::LargeFuelTank,
        ComponentKind::Tentacle,
        ComponentKind::BarrageBalloon,
    ];

    /// Kinds that can be bought and mounted on Susie
    pub const ATTACHABLE: [ComponentKind; 13] = [
        ComponentKind::JetEngine,
        ComponentKind::PulseJet,
        ComponentKind::Rocket,
        ComponentKind::Propeller,
        ComponentKind::Rotor,
        ComponentKind::Wing,
        ComponentKind::Aerolon,
        ComponentKind::Ekranoplan,
        ComponentKind::Balloon,
        ComponentKind::HotAirBalloon,
        ComponentKind::SmallFuelTank,
        ComponentKind::LargeFuelTank,
        ComponentKind::Tentacle,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Susie => "Susie",
            ComponentKind::JetEngine => "Jet Engine",
            ComponentKind::PulseJet => "Pulse Jet",
            ComponentKind::Rocket => "Rocket",
            ComponentKind::Propeller => "Propeller",
            ComponentKind::Rotor => "Rotor",
            ComponentKind::Wing => "Wing",
            ComponentKind::Aerolon => "Aerolon",
            ComponentKind::Ekranoplan => "Ekranoplan",
            ComponentKind::Balloon => "Balloon",
            ComponentKind::HotAirBalloon => "Hot Air Balloon",
            ComponentKind::SmallFuelTank => "Small Fuel Tank",
            ComponentKind::LargeFuelTank => "Large Fuel Tank",
            ComponentKind::Tentacle => "Tentacle",
            ComponentKind::BarrageBalloon => "Barrage Balloon",
        }
    }

    /// Mass in kg
    pub const fn mass(self) -> f32 {
        match self {
            ComponentKind::Susie => 25.0,
            ComponentKind::JetEngine => 40.0,
            ComponentKind::PulseJet => 30.0,
            ComponentKind::Rocket => 20.0,
            ComponentKind::Propeller => 25.0,
            ComponentKind::Rotor => 35.0,
            ComponentKind::Wing => 15.0,
            ComponentKind::Aerolon => 12.0,
            ComponentKind::Ekranoplan => 20.0,
            ComponentKind::Balloon => 3.0,
            ComponentKind::HotAirBalloon => 10.0,
            ComponentKind::SmallFuelTank => 30.0,
            ComponentKind::LargeFuelTank => 80.0,
            ComponentKind::Tentacle => 5.0,
            ComponentKind::BarrageBalloon => 50.0,
        }
    }

    /// Fuel the part adds to the reservoir
    pub const fn capacity(self) -> f32 {
        match self {
            ComponentKind::SmallFuelTank => 25.0,
            ComponentKind::LargeFuelTank => 75.0,
            _ => 0.0,
        }
    }

    /// Purchase price in the build phase
    pub const fn price(self) -> i64 {
        match self {
            ComponentKind::Susie | ComponentKind::BarrageBalloon => 0,
            ComponentKind::JetEngine => 750,
            ComponentKind::PulseJet => 500,
            ComponentKind::Rocket => 400,
            ComponentKind::Propeller => 300,
            ComponentKind::Rotor => 900,
            ComponentKind::Wing => 200,
            ComponentKind::Aerolon => 350,
            ComponentKind::Ekranoplan => 600,
            ComponentKind::Balloon => 150,
            ComponentKind::HotAirBalloon => 450,
            ComponentKind::SmallFuelTank => 100,
            ComponentKind::LargeFuelTank => 250,
            ComponentKind::Tentacle => 50,
        }
    }

    /// Slot categories the part may be mounted in
    pub const fn slot_mask(self) -> SlotFlags {
        match self {
            ComponentKind::Susie | ComponentKind::BarrageBalloon => SlotFlags::EMPTY,
            ComponentKind::JetEngine | ComponentKind::PulseJet => {
                SlotFlags::SIDE.union(SlotFlags::TAIL)
            }
            ComponentKind::Rocket => SlotFlags::SIDE.union(SlotFlags::BOTTOM).union(SlotFlags::TAIL),
            ComponentKind::Propeller => SlotFlags::NOSE
                .union(SlotFlags::TAIL)
                .union(SlotFlags::TOP)
                .union(SlotFlags::BOTTOM),
            ComponentKind::Rotor | ComponentKind::Balloon | ComponentKind::HotAirBalloon => {
                SlotFlags::TOP
            }
            ComponentKind::Wing => SlotFlags::SIDE,
            ComponentKind::Aerolon => SlotFlags::SIDE.union(SlotFlags::TAIL),
            ComponentKind::Ekranoplan => SlotFlags::BOTTOM.union(SlotFlags::SIDE),
            ComponentKind::SmallFuelTank | ComponentKind::LargeFuelTank => {
                SlotFlags::TOP.union(SlotFlags::BOTTOM)
            }
            ComponentKind::Tentacle => SlotFlags::TAIL.union(SlotFlags::BOTTOM),
        }
    }
}

/// Extra circle in raw shape data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapePoint {
    pub offset: Vec2,
    pub radius: f32,
}

/// Slot declaration in raw shape data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotData {
    pub offset: Vec2,
    pub flags: Vec<String>,
}

/// Raw shape data for one kind, as stored in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeData {
    pub kind: ComponentKind,
    pub sprite: String,
    /// Sprite origin relative to the base circle
    pub offset: Vec2,
    /// Radius of the base circle at the origin
    pub radius: f32,
    #[serde(default)]
    pub points: Vec<ShapePoint>,
    #[serde(default)]
    pub slots: Vec<SlotData>,
}

/// Derived, immutable description of a kind
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    pub sprite: String,
    /// (centre, radius) in body space, centred on the centre of gravity
    pub circles: Vec<(Vec2, f32)>,
    pub moment: f32,
    /// Where the part meets its mounting point, relative to its centre of gravity
    pub insertion_point: Vec2,
    /// Sprite origin relative to the centre of gravity
    pub sprite_offset: Vec2,
    /// Slots declared by the part (only Susie has any)
    pub slots: Vec<(Vec2, SlotFlags)>,
}

impl ComponentSpec {
    pub fn from_shape(shape: &ShapeData) -> SimResult<Self> {
        let mass = shape.kind.mass();

        let mut circles = vec![(Vec2::ZERO, shape.radius)];
        for point in &shape.points {
            let centre = point.offset + shape.offset;
            circles.push((Vec2::new(centre.x, -centre.y), point.radius));
        }

        let areas: Vec<f32> = circles
            .iter()
            .map(|&(_, r)| std::f32::consts::PI * r * r)
            .collect();
        let total_area: f32 = areas.iter().sum();

        let (cog, moment) = if total_area > 0.0 {
            let cog = circles
                .iter()
                .zip(&areas)
                .fold(Vec2::ZERO, |acc, (&(c, _), &area)| acc + c * (area / total_area));
            let density = mass / total_area;
            let moment = circles
                .iter()
                .zip(&areas)
                .map(|(&(c, r), &area)| moment_for_circle(density * area, 0.0, r, c - cog))
                .sum();
            (cog, moment)
        } else {
            log::warn!("{} has no shape area; using unit inertia", shape.kind.name());
            (Vec2::ZERO, mass)
        };

        let mut slots = Vec::with_capacity(shape.slots.len());
        for slot in &shape.slots {
            let mut flags = SlotFlags::EMPTY;
            for name in &slot.flags {
                let flag = SlotFlags::from_name(name).ok_or_else(|| {
                    SimError::data(
                        format!("{} slot", shape.kind.name()),
                        format!("unknown slot flag '{}'", name),
                    )
                })?;
                flags = flags | flag;
            }
            slots.push((slot.offset - cog, flags));
        }

        Ok(Self {
            kind: shape.kind,
            sprite: shape.sprite.clone(),
            circles: circles.into_iter().map(|(c, r)| (c - cog, r)).collect(),
            moment,
            insertion_point: -cog,
            sprite_offset: shape.offset - cog,
            slots,
        })
    }

    pub fn mass(&self) -> f32 {
        self.kind.mass()
    }
}

/// Immutable registry of every kind's spec
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<ComponentSpec>,
}

impl Catalog {
    /// Catalog from the shape data shipped with the game
    pub fn builtin() -> SimResult<Self> {
        Self::from_json(BUILTIN_COMPONENTS)
    }

    /// Parse a JSON array of shape data; every kind must be present exactly once
    pub fn from_json(json: &str) -> SimResult<Self> {
        let shapes: Vec<ShapeData> =
            serde_json::from_str(json).map_err(|e| SimError::data("component catalog", e))?;

        let mut specs: Vec<Option<ComponentSpec>> = vec![None; ComponentKind::ALL.len()];
        for shape in &shapes {
            let slot = &mut specs[shape.kind.index()];
            if slot.is_some() {
                return Err(SimError::data(
                    "component catalog",
                    format!("{} listed twice", shape.kind.name()),
                ));
            }
            *slot = Some(ComponentSpec::from_shape(shape)?);
        }

        let specs = specs
            .into_iter()
            .zip(ComponentKind::ALL)
            .map(|(spec, kind)| {
                spec.ok_or_else(|| {
                    SimError::data("component catalog", format!("{} missing", kind.name()))
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        log::debug!("Loaded {} component specs", specs.len());
        Ok(Self { specs })
    }

    pub fn spec(&self, kind: ComponentKind) -> &ComponentSpec {
        &self.specs[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.specs.iter()
    }
}
