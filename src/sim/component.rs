//! Attachable components and their force models
//!
//! A component is a mounted part plus optional capabilities (activation, fuel
//! use, a sound cue) and one behavior that decides what it does each tick:
//! push along its axis, generate lift from the relative wind, float on its own
//! tethered body, or just sit there as cargo.

use glam::Vec2;

use super::catalog::{ComponentKind, ComponentSpec};
use super::fuel::FuelReservoir;
use super::physics::{Body, BodyHandle, CircleShape, Space};
use super::slots::{Attachable, SlotFlags, SlotId};
use super::tether::{Tether, TetherConfig};
use crate::consts::CRAFT_GROUP;
use crate::{VecExt, direction, normalize_angle};

const JET_FORCE: f32 = 60_000.0;
const JET_FUEL_RATE: f32 = 1.0;

const PULSE_JET_FORCE: f32 = 90_000.0;
const PULSE_JET_FUEL_RATE: f32 = 0.6;
const PULSE_PERIOD: f32 = 0.5;
/// Fraction of each cycle that produces thrust
const PULSE_DUTY: f32 = 0.4;

const ROCKET_FORCE: f32 = 200_000.0;
const ROCKET_BURN_TIME: f32 = 2.0;
/// Burn time left below this counts as burnt out
const ROCKET_BURN_EPSILON: f32 = 1e-4;

const PROPELLER_FORCE: f32 = 30_000.0;
const PROPELLER_FUEL_RATE: f32 = 0.4;

const ROTOR_FORCE: f32 = 45_000.0;
const ROTOR_FUEL_RATE: f32 = 0.8;

const BALLOON_LIFT: f32 = 20_000.0;
const BALLOON_ALT_ATTENUATION: f32 = 0.0001;
/// How far above its slot a balloon floats when first attached
const BALLOON_HEIGHT: f32 = 100.0;
const BALLOON_TETHER_DENSITY: f32 = 0.1;
const BALLOON_TETHER_SEGMENTS: usize = 2;

const HOT_AIR_MIN_LIFT: f32 = 5_000.0;
const HOT_AIR_MAX_LIFT: f32 = 45_000.0;
const HOT_AIR_HEAT_RATE: f32 = 0.5;
const HOT_AIR_COOLING: f32 = 0.3;
const HOT_AIR_FUEL_RATE: f32 = 0.5;

const TENTACLE_LENGTH: f32 = 80.0;
const TENTACLE_SEGMENTS: usize = 4;

/// Lifting surface parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroParams {
    pub lift_rate: f32,
    pub max_lift: f32,
    /// Linear drag against absolute velocity
    pub drag: f32,
    /// Added to the angle of attack before the lift curve (degrees)
    pub offset: f32,
    /// Lift only inside ±window degrees of attack
    pub window: f32,
    /// Below this wind speed there is no lift
    pub min_wind: f32,
    /// Extra deflection while active (degrees)
    pub flap: f32,
}

const WING: AeroParams = AeroParams {
    lift_rate: 0.06,
    max_lift: 50_000.0,
    drag: 2.0,
    offset: 5.0,
    window: 45.0,
    min_wind: 1.0,
    flap: 0.0,
};

const AEROLON: AeroParams = AeroParams {
    lift_rate: 0.05,
    max_lift: 40_000.0,
    flap: 15.0,
    ..WING
};

const EKRANOPLAN: AeroParams = AeroParams {
    lift_rate: 0.08,
    max_lift: 70_000.0,
    ..WING
};

const GROUND_EFFECT_RADIUS: f32 = 200.0;
const GROUND_EFFECT_STABILISING: f32 = 40_000.0;

/// Unique id of a component instance, never reused within a squid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

/// How a player key drives a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Active while the key is held
    Press,
    /// Each press flips the state
    Toggle,
    /// A press fires it; releasing does nothing
    OneShot,
    None,
}

impl ComponentKind {
    pub fn control_mode(self) -> ControlMode {
        match self {
            ComponentKind::JetEngine | ComponentKind::Aerolon => ControlMode::Press,
            ComponentKind::PulseJet
            | ComponentKind::Propeller
            | ComponentKind::Rotor
            | ComponentKind::HotAirBalloon => ControlMode::Toggle,
            ComponentKind::Rocket => ControlMode::OneShot,
            _ => ControlMode::None,
        }
    }

    /// Editor range for the mounting angle, in degrees; `None` if fixed
    pub fn angle_range(self) -> Option<(f32, f32)> {
        match self {
            ComponentKind::JetEngine | ComponentKind::PulseJet => Some((0.0, 135.0)),
            ComponentKind::Wing | ComponentKind::Aerolon | ComponentKind::Ekranoplan => {
                Some((-20.0, 20.0))
            }
            _ => None,
        }
    }

    /// Mounting angle in degrees for a part placed in a slot with `flags`
    pub fn default_angle(self, flags: SlotFlags) -> f32 {
        match self {
            ComponentKind::JetEngine | ComponentKind::PulseJet | ComponentKind::Rotor => 90.0,
            ComponentKind::Rocket if flags.intersects(SlotFlags::BOTTOM) => 90.0,
            ComponentKind::Propeller if flags.intersects(SlotFlags::TOP) => 90.0,
            ComponentKind::Propeller if flags.intersects(SlotFlags::BOTTOM) => 270.0,
            ComponentKind::SmallFuelTank | ComponentKind::LargeFuelTank
                if flags.intersects(SlotFlags::TOP) =>
            {
                180.0
            }
            _ => 0.0,
        }
    }

    fn sound_cue(self) -> Option<&'static str> {
        match self {
            ComponentKind::JetEngine => Some("jet"),
            ComponentKind::PulseJet => Some("pulsejet"),
            ComponentKind::Rocket => Some("rocket"),
            ComponentKind::Propeller => Some("propeller"),
            ComponentKind::Rotor => Some("rotor"),
            ComponentKind::Aerolon => Some("flap"),
            ComponentKind::HotAirBalloon => Some("burner"),
            _ => None,
        }
    }

    fn fuel_rate(self) -> Option<f32> {
        match self {
            ComponentKind::JetEngine => Some(JET_FUEL_RATE),
            ComponentKind::PulseJet => Some(PULSE_JET_FUEL_RATE),
            ComponentKind::Propeller => Some(PROPELLER_FUEL_RATE),
            ComponentKind::Rotor => Some(ROTOR_FUEL_RATE),
            ComponentKind::HotAirBalloon => Some(HOT_AIR_FUEL_RATE),
            _ => None,
        }
    }
}

/// On/off state of an activatable component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub mode: ControlMode,
    active: bool,
}

/// Steady draw from the shared reservoir while producing effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelUse {
    /// Units per second
    pub rate: f32,
}

impl FuelUse {
    /// Draw this tick's fuel and return the fraction of demand that was met
    fn throttle(&self, fuel: &mut FuelReservoir, dt: f32) -> f32 {
        let wanted = self.rate * dt;
        if wanted <= 0.0 {
            return if fuel.is_empty() { 0.0 } else { 1.0 };
        }
        fuel.draw_up_to(wanted) / wanted
    }
}

/// Named sound cue that plays while the component produces effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEmitter {
    pub cue: &'static str,
    playing: bool,
}

impl SoundEmitter {
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Everything a component may touch during its update
pub struct UpdateContext<'a> {
    pub space: &'a mut Space,
    /// The main body the component is mounted on
    pub squid: BodyHandle,
    pub fuel: &'a mut FuelReservoir,
    pub sea_level: f32,
    pub dt: f32,
}

/// Where a component is mounted on the main body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mounting {
    pub slot: SlotId,
    pub flags: SlotFlags,
    /// Slot offset from the main body's centre of gravity
    pub point: Vec2,
}

#[derive(Debug, Clone)]
struct Thruster {
    force: f32,
    pulse_phase: Option<f32>,
    burn_left: Option<f32>,
}

impl Thruster {
    fn for_kind(kind: ComponentKind) -> Self {
        let force = match kind {
            ComponentKind::PulseJet => PULSE_JET_FORCE,
            ComponentKind::Rocket => ROCKET_FORCE,
            ComponentKind::Propeller => PROPELLER_FORCE,
            ComponentKind::Rotor => ROTOR_FORCE,
            _ => JET_FORCE,
        };
        Self {
            force,
            pulse_phase: (kind == ComponentKind::PulseJet).then_some(0.0),
            burn_left: (kind == ComponentKind::Rocket).then_some(ROCKET_BURN_TIME),
        }
    }

    fn is_spent(&self) -> bool {
        self.burn_left.is_some_and(|left| left <= ROCKET_BURN_EPSILON)
    }

    fn reset(&mut self) {
        if let Some(phase) = &mut self.pulse_phase {
            *phase = 0.0;
        }
        if let Some(left) = &mut self.burn_left {
            *left = ROCKET_BURN_TIME;
        }
    }

    /// Apply thrust scaled by `throttle`; returns whether any was produced
    fn update(&mut self, throttle: f32, point: Vec2, angle: f32, ctx: &mut UpdateContext<'_>) -> bool {
        if throttle <= 0.0 || self.is_spent() {
            if let Some(phase) = &mut self.pulse_phase {
                *phase = 0.0;
            }
            return false;
        }

        let mut scale = throttle;
        if let Some(phase) = &mut self.pulse_phase {
            if *phase >= PULSE_PERIOD * PULSE_DUTY {
                scale = 0.0;
            }
            *phase = (*phase + ctx.dt) % PULSE_PERIOD;
        }
        if let Some(left) = &mut self.burn_left {
            *left -= ctx.dt;
        }

        let body = ctx.space.body_mut(ctx.squid);
        let force = direction(body.angle + angle) * self.force * scale;
        body.apply_force_at_local(force, point);
        true
    }
}

#[derive(Debug, Clone)]
struct Aerofoil {
    params: AeroParams,
    ground_effect: bool,
}

impl Aerofoil {
    fn for_kind(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Aerolon => Self {
                params: AEROLON,
                ground_effect: false,
            },
            ComponentKind::Ekranoplan => Self {
                params: EKRANOPLAN,
                ground_effect: true,
            },
            _ => Self {
                params: WING,
                ground_effect: false,
            },
        }
    }

    /// Lift along the surface normal for wind `wind` in the surface's frame
    fn lift(&self, wind: Vec2) -> f32 {
        let p = &self.params;
        let speed = wind.length();
        if speed <= p.min_wind {
            return 0.0;
        }
        // Angular velocity does not feed into the local wind
        let aoa = wind.y.atan2(-wind.x);
        if aoa.abs() > p.window.to_radians() {
            return 0.0;
        }
        let lift = p.lift_rate * (2.0 * (aoa + p.offset.to_radians())).sin() * speed * speed;
        lift.clamp(-p.max_lift, p.max_lift)
    }

    fn update(&self, flapped: bool, point: Vec2, angle: f32, ctx: &mut UpdateContext<'_>) {
        let flap = if flapped { self.params.flap.to_radians() } else { 0.0 };
        let body = ctx.space.body_mut(ctx.squid);
        let surface = body.angle + angle + flap;
        let wind = (-body.velocity).rotated(-surface);

        let mut lift = self.lift(wind);
        let mut torque = 0.0;
        if self.ground_effect {
            let height = body.local_to_world(point).y - ctx.sea_level;
            let factor = ground_effect_factor(height);
            lift *= factor;
            torque = -normalize_angle(body.angle) * GROUND_EFFECT_STABILISING * factor;
        }

        let force = Vec2::new(0.0, lift).rotated(surface) - body.velocity * self.params.drag;
        body.apply_force_at_local(force, point);
        body.apply_torque(torque);
    }
}

/// Lift multiplier for a ground-effect surface `height` above the sea
pub fn ground_effect_factor(height: f32) -> f32 {
    if height >= GROUND_EFFECT_RADIUS {
        0.0
    } else {
        (1.0 - height / GROUND_EFFECT_RADIUS).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Lift {
    /// Constant gas lift fading with altitude
    Gas,
    /// Burner-heated envelope
    Thermal { heat: f32 },
}

#[derive(Debug, Clone)]
struct Buoyant {
    body: BodyHandle,
    tether: Tether,
    /// Knot position relative to the slot, in world space
    home_offset: Vec2,
    lift: Lift,
}

impl Buoyant {
    fn lift_force(&self, altitude: f32) -> f32 {
        match self.lift {
            Lift::Gas if altitude < 0.0 => BALLOON_LIFT,
            Lift::Gas => BALLOON_LIFT / (1.0 + altitude * BALLOON_ALT_ATTENUATION),
            Lift::Thermal { heat } => HOT_AIR_MIN_LIFT + (HOT_AIR_MAX_LIFT - HOT_AIR_MIN_LIFT) * heat,
        }
    }

    fn update(&mut self, throttle: f32, ctx: &mut UpdateContext<'_>) -> bool {
        let heating = throttle > 0.0;
        if let Lift::Thermal { heat } = &mut self.lift {
            if heating {
                *heat = (*heat + HOT_AIR_HEAT_RATE * throttle * ctx.dt).min(1.0);
            } else {
                *heat *= (-HOT_AIR_COOLING * ctx.dt).exp();
            }
        }

        let body = ctx.space.body_mut(self.body);
        body.reset_forces();
        let altitude = body.position.y - ctx.sea_level;
        let lift = self.lift_force(altitude);
        body.apply_force(Vec2::new(0.0, lift), Vec2::ZERO);
        heating
    }

    /// Move the envelope to `position` and straighten the rope from `slot` to `knot`
    fn place(&self, space: &mut Space, position: Vec2, slot: Vec2, knot: Vec2) {
        let body = space.body_mut(self.body);
        body.position = position;
        body.angle = 0.0;
        body.halt();
        body.reset_forces();
        self.tether.reorient(space, slot, knot);
    }
}

#[derive(Debug, Clone)]
struct Trailing {
    tether: Tether,
    /// Free end in the main body's frame
    tip: Vec2,
}

#[derive(Debug, Clone)]
enum Behavior {
    Thruster(Thruster),
    Aerofoil(Aerofoil),
    Buoyant(Buoyant),
    Trailing(Trailing),
    Cargo,
}

/// A part mounted on the main body
#[derive(Debug, Clone)]
pub struct Component {
    id: ComponentId,
    kind: ComponentKind,
    mounting: Mounting,
    /// Mounting angle in degrees, relative to the main body
    angle: f32,
    insertion_point: Vec2,
    activation: Option<Activation>,
    fuel_use: Option<FuelUse>,
    sound: Option<SoundEmitter>,
    behavior: Behavior,
}

impl Component {
    /// Build a component in its reset state; tethered kinds create their bodies in `space`
    pub fn new(
        id: ComponentId,
        spec: &ComponentSpec,
        mounting: Mounting,
        space: &mut Space,
        squid: BodyHandle,
    ) -> Self {
        let kind = spec.kind;
        let slot_world = space.body(squid).local_to_world(mounting.point);

        let behavior = match kind {
            ComponentKind::JetEngine
            | ComponentKind::PulseJet
            | ComponentKind::Rocket
            | ComponentKind::Propeller
            | ComponentKind::Rotor => Behavior::Thruster(Thruster::for_kind(kind)),
            ComponentKind::Wing | ComponentKind::Aerolon | ComponentKind::Ekranoplan => {
                Behavior::Aerofoil(Aerofoil::for_kind(kind))
            }
            ComponentKind::Balloon | ComponentKind::HotAirBalloon => {
                let home_offset = Vec2::new(0.0, BALLOON_HEIGHT);
                let knot = slot_world + home_offset;
                let mut body =
                    Body::new(spec.mass(), spec.moment).with_position(knot - spec.insertion_point);
                for &(offset, radius) in &spec.circles {
                    body.add_shape(CircleShape::new(offset, radius).with_group(CRAFT_GROUP));
                }
                let body = space.add_body(body);
                let tether = Tether::new(
                    space,
                    slot_world,
                    knot,
                    Some(squid),
                    Some(body),
                    TetherConfig::default()
                        .with_segments(BALLOON_TETHER_SEGMENTS)
                        .with_density(BALLOON_TETHER_DENSITY),
                );
                let lift = if kind == ComponentKind::HotAirBalloon {
                    Lift::Thermal { heat: 0.0 }
                } else {
                    Lift::Gas
                };
                Behavior::Buoyant(Buoyant {
                    body,
                    tether,
                    home_offset,
                    lift,
                })
            }
            ComponentKind::Tentacle => {
                let trail = if mounting.flags.intersects(SlotFlags::TAIL) {
                    Vec2::NEG_X
                } else {
                    Vec2::NEG_Y
                };
                let tip = mounting.point + trail * TENTACLE_LENGTH;
                let tip_world = space.body(squid).local_to_world(tip);
                let tether = Tether::new(
                    space,
                    slot_world,
                    tip_world,
                    Some(squid),
                    None,
                    TetherConfig::default()
                        .with_segments(TENTACLE_SEGMENTS)
                        .with_density(kind.mass() / (TENTACLE_SEGMENTS + 1) as f32),
                );
                Behavior::Trailing(Trailing { tether, tip })
            }
            _ => Behavior::Cargo,
        };

        let controls = kind.control_mode();
        Self {
            id,
            kind,
            mounting,
            angle: kind.default_angle(mounting.flags),
            insertion_point: spec.insertion_point,
            activation: (controls != ControlMode::None).then_some(Activation {
                mode: controls,
                active: false,
            }),
            fuel_use: kind.fuel_rate().map(|rate| FuelUse { rate }),
            sound: kind.sound_cue().map(|cue| SoundEmitter {
                cue,
                playing: false,
            }),
            behavior,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn slot(&self) -> SlotId {
        self.mounting.slot
    }

    pub fn mounting(&self) -> Mounting {
        self.mounting
    }

    pub fn control_mode(&self) -> ControlMode {
        self.activation.map_or(ControlMode::None, |a| a.mode)
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    pub fn fuel_use(&self) -> Option<&FuelUse> {
        self.fuel_use.as_ref()
    }

    pub fn sound(&self) -> Option<&SoundEmitter> {
        self.sound.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_some_and(|a| a.active)
    }

    /// No-op for parts without activation, or a rocket that has burnt out
    pub fn set_active(&mut self, active: bool) {
        if active && matches!(&self.behavior, Behavior::Thruster(t) if t.is_spent()) {
            return;
        }
        if let Some(activation) = &mut self.activation {
            activation.active = active;
        }
    }

    /// Whether activating would currently do anything
    pub fn is_enabled(&self, fuel: &FuelReservoir) -> bool {
        if self.activation.is_none() {
            return false;
        }
        if let Behavior::Thruster(thruster) = &self.behavior {
            if thruster.is_spent() {
                return false;
            }
        }
        self.fuel_use.is_none() || !fuel.is_empty()
    }

    /// Mounting angle in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the mounting angle, clamped to the editor range; false if the angle is fixed
    pub fn set_angle(&mut self, degrees: f32) -> bool {
        match self.kind.angle_range() {
            Some((lo, hi)) => {
                self.angle = degrees.clamp(lo, hi);
                true
            }
            None => false,
        }
    }

    /// Mass and shapes ride on the main body (no body of its own, no rope)
    pub fn is_rigid(&self) -> bool {
        matches!(
            self.behavior,
            Behavior::Thruster(_) | Behavior::Aerofoil(_) | Behavior::Cargo
        )
    }

    /// Free-floating parts the editor may drag around
    pub fn is_positionable(&self) -> bool {
        matches!(self.behavior, Behavior::Buoyant(_))
    }

    /// The part's centre of gravity in the main body's frame
    pub fn mount_centre(&self) -> Vec2 {
        self.mounting.point - self.insertion_point.rotated_deg(self.angle)
    }

    /// The part's own body, for floating parts
    pub fn own_body(&self) -> Option<BodyHandle> {
        match &self.behavior {
            Behavior::Buoyant(b) => Some(b.body),
            _ => None,
        }
    }

    pub fn tether(&self) -> Option<&Tether> {
        match &self.behavior {
            Behavior::Buoyant(b) => Some(&b.tether),
            Behavior::Trailing(t) => Some(&t.tether),
            _ => None,
        }
    }

    /// Heat of a hot-air envelope in [0, 1]
    pub fn heat(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::Buoyant(Buoyant {
                lift: Lift::Thermal { heat },
                ..
            }) => Some(*heat),
            _ => None,
        }
    }

    /// World position of the part's centre, for sprite placement
    pub fn world_position(&self, space: &Space, squid: BodyHandle) -> Vec2 {
        match self.own_body() {
            Some(body) => space.body(body).position,
            None => space.body(squid).local_to_world(self.mount_centre()),
        }
    }

    /// World orientation in radians
    pub fn world_rotation(&self, space: &Space, squid: BodyHandle) -> f32 {
        match self.own_body() {
            Some(body) => space.body(body).angle,
            None => space.body(squid).angle + self.angle.to_radians(),
        }
    }

    /// Move a floating part's body to `position`; false if the part can't be moved
    pub fn set_position(&mut self, space: &mut Space, squid: BodyHandle, position: Vec2) -> bool {
        let Behavior::Buoyant(buoyant) = &mut self.behavior else {
            return false;
        };
        let slot = space.body(squid).local_to_world(self.mounting.point);
        let knot = position + self.insertion_point;
        buoyant.home_offset = knot - slot;
        buoyant.place(space, position, slot, knot);
        true
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let active = self.is_active();
        let throttle = match (active, self.fuel_use) {
            (false, _) => 0.0,
            (true, None) => 1.0,
            (true, Some(fuel_use)) => fuel_use.throttle(ctx.fuel, ctx.dt),
        };
        let point = self.mounting.point;
        let angle = self.angle.to_radians();

        let producing = match &mut self.behavior {
            Behavior::Thruster(thruster) => {
                let producing = thruster.update(throttle, point, angle, ctx);
                if thruster.is_spent() {
                    if let Some(activation) = &mut self.activation {
                        activation.active = false;
                    }
                }
                producing
            }
            Behavior::Aerofoil(aerofoil) => {
                aerofoil.update(active, point, angle, ctx);
                active
            }
            Behavior::Buoyant(buoyant) => buoyant.update(throttle, ctx),
            Behavior::Trailing(_) | Behavior::Cargo => false,
        };

        if let Some(sound) = &mut self.sound {
            sound.playing = producing;
        }
    }

    /// Back to the inactive, freshly mounted state
    pub fn reset(&mut self, space: &mut Space, squid: BodyHandle) {
        if let Some(activation) = &mut self.activation {
            activation.active = false;
        }
        if let Some(sound) = &mut self.sound {
            sound.playing = false;
        }

        let slot = space.body(squid).local_to_world(self.mounting.point);
        match &mut self.behavior {
            Behavior::Thruster(thruster) => thruster.reset(),
            Behavior::Buoyant(buoyant) => {
                if let Lift::Thermal { heat } = &mut buoyant.lift {
                    *heat = 0.0;
                }
                let knot = slot + buoyant.home_offset;
                buoyant.place(space, knot - self.insertion_point, slot, knot);
            }
            Behavior::Trailing(trailing) => {
                let tip = space.body(squid).local_to_world(trailing.tip);
                trailing.tether.reorient(space, slot, tip);
            }
            Behavior::Aerofoil(_) | Behavior::Cargo => {}
        }
    }

    /// Free the part's own bodies and ropes
    pub fn destroy(self, space: &mut Space) {
        match self.behavior {
            Behavior::Buoyant(buoyant) => {
                buoyant.tether.destroy(space);
                space.destroy_body(buoyant.body);
            }
            Behavior::Trailing(trailing) => trailing.tether.destroy(space),
            _ => {}
        }
    }
}

impl Attachable for Component {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn instance(&self) -> Option<ComponentId> {
        Some(self.id)
    }
}
