//! Rigid-body space backed by rapier2d
//!
//! The rest of the simulation works with plain [`Body`] values addressed by
//! handle. The space keeps them in step with the rapier sets: motion changed
//! since the last exchange is pushed before each step together with the forces
//! accumulated on the body, then read back afterwards. A body's centre of
//! gravity is its origin and its mass comes from [`Body::set_mass`] and
//! [`Body::set_moment`] only, so every collider has zero density.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::{
    BroadPhaseMultiSap, CCDSolver, CoefficientCombineRule, ColliderBuilder, ColliderHandle,
    ColliderSet, GenericJoint, Group, ImpulseJointHandle, ImpulseJointSet, IntegrationParameters,
    InteractionGroups, IslandManager, Isometry, MassProperties, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, Point, Real, RevoluteJointBuilder, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, RigidBodyType, RopeJointBuilder, SharedShape, Vector, point, vector,
};

use rapier2d::na as nalgebra;

use crate::VecExt;

/// Moments and masses below this are clamped
const MIN_INERTIA: f32 = 1e-4;
/// Damping fractions are clamped to at least this before taking the log
const MIN_DAMPING: f32 = 1e-6;

/// Handle to a body in a [`Space`]
///
/// Handles are generational: a destroyed body's slot is reused, but never
/// under the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    /// Slot index in the engine's body arena
    pub fn index(self) -> u32 {
        self.0.into_raw_parts().0
    }
}

impl Ord for BodyHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.into_raw_parts().cmp(&other.0.into_raw_parts())
    }
}

impl PartialOrd for BodyHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Handle to a static segment in a [`Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHandle(ColliderHandle);

/// Handle to a joint in a [`Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(ImpulseJointHandle);

/// Moment of inertia of a (hollow) circle of mass `mass` centred at `offset`
pub fn moment_for_circle(mass: f32, inner_radius: f32, outer_radius: f32, offset: Vec2) -> f32 {
    mass * (inner_radius * inner_radius + outer_radius * outer_radius) * 0.5
        + mass * offset.length_squared()
}

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Groups 1 to 32 each own one membership bit and filter it out; group 0 hits everything
fn interaction_groups(group: u32) -> InteractionGroups {
    if group == 0 {
        return InteractionGroups::all();
    }
    let own = Group::from_bits_truncate(1 << ((group - 1) % 32));
    InteractionGroups::new(own, Group::ALL.difference(own))
}

fn mass_properties(mass: f32, moment: f32) -> MassProperties {
    MassProperties::new(point![0.0, 0.0], mass, moment)
}

/// A circle collision shape attached to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    /// Centre in body space
    pub offset: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    /// Shapes sharing a non-zero group never collide
    pub group: u32,
}

impl CircleShape {
    pub fn new(offset: Vec2, radius: f32) -> Self {
        Self {
            offset,
            radius,
            friction: crate::consts::SHAPE_FRICTION,
            elasticity: crate::consts::SHAPE_ELASTICITY,
            group: 0,
        }
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    pub fn with_material(mut self, friction: f32, elasticity: f32) -> Self {
        self.friction = friction;
        self.elasticity = elasticity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Dynamic,
    Static,
}

/// Motion of a body as last exchanged with the engine
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
}

impl Motion {
    fn of(body: &Body) -> Self {
        Self {
            position: body.position,
            angle: body.angle,
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
        }
    }
}

/// A rigid body
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    /// Orientation in radians
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub angular_velocity_limit: Option<f32>,
    mass: f32,
    moment: f32,
    force: Vec2,
    torque: f32,
    shapes: Vec<CircleShape>,
    kind: BodyKind,
    in_space: bool,
    synced: Option<Motion>,
    mass_changed: bool,
    shapes_changed: bool,
    colliders: Vec<ColliderHandle>,
}

impl Body {
    pub fn new(mass: f32, moment: f32) -> Self {
        let mut body = Self {
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            angular_velocity_limit: None,
            mass: 0.0,
            moment: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            shapes: Vec::new(),
            kind: BodyKind::Dynamic,
            in_space: true,
            synced: None,
            mass_changed: false,
            shapes_changed: false,
            colliders: Vec::new(),
        };
        body.set_mass(mass);
        body.set_moment(moment);
        body
    }

    /// An immovable body, used as an anchor for joints or as fixed geometry
    pub fn new_static(position: Vec2) -> Self {
        Self {
            position,
            mass: f32::INFINITY,
            moment: f32::INFINITY,
            kind: BodyKind::Static,
            ..Self::new(1.0, 1.0)
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(MIN_INERTIA);
        self.mass_changed = true;
    }

    pub fn set_moment(&mut self, moment: f32) {
        self.moment = moment.max(MIN_INERTIA);
        self.mass_changed = true;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn moment(&self) -> f32 {
        self.moment
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    /// Whether the body currently takes part in the simulation
    pub fn is_in_space(&self) -> bool {
        self.in_space
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// Accumulate force `f` applied at world-space offset `r` from the centre of gravity
    pub fn apply_force(&mut self, f: Vec2, r: Vec2) {
        self.force += f;
        self.torque += r.perp_dot(f);
    }

    /// Accumulate force `f` at a body-space point
    pub fn apply_force_at_local(&mut self, f: Vec2, local: Vec2) {
        let r = local.rotated(self.angle);
        self.apply_force(f, r);
    }

    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    pub fn reset_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + local.rotated(self.angle)
    }

    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        (world - self.position).rotated(-self.angle)
    }

    /// Velocity of the body material at a world-space point
    pub fn velocity_at_world_point(&self, point: Vec2) -> Vec2 {
        let r = point - self.position;
        self.velocity + r.perp() * self.angular_velocity
    }

    pub fn add_shape(&mut self, shape: CircleShape) {
        self.shapes.push(shape);
        self.shapes_changed = true;
    }

    pub fn shapes(&self) -> &[CircleShape] {
        &self.shapes
    }

    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.shapes_changed = true;
    }

    /// Zero linear and angular velocity
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    fn simulated(&self) -> bool {
        self.kind == BodyKind::Dynamic && self.in_space
    }

    fn body_type(&self) -> RigidBodyType {
        match self.kind {
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Static => RigidBodyType::Fixed,
        }
    }
}

/// An immovable thick line segment (a capsule)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self {
            a,
            b,
            radius,
            friction: crate::consts::SHAPE_FRICTION,
            elasticity: crate::consts::SHAPE_ELASTICITY,
        }
    }
}

/// Joint variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Both anchors coincide, free rotation
    Pivot,
    /// Anchors may come together but never separate beyond `max`
    Rope { max: f32 },
}

/// A constraint between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Anchor in `a`'s body space
    pub anchor_a: Vec2,
    /// Anchor in `b`'s body space
    pub anchor_b: Vec2,
    pub kind: JointKind,
}

impl Joint {
    pub fn pivot(a: BodyHandle, b: BodyHandle, anchor_a: Vec2, anchor_b: Vec2) -> Self {
        Self {
            a,
            b,
            anchor_a,
            anchor_b,
            kind: JointKind::Pivot,
        }
    }

    pub fn rope(a: BodyHandle, b: BodyHandle, anchor_a: Vec2, anchor_b: Vec2, max: f32) -> Self {
        Self {
            a,
            b,
            anchor_a,
            anchor_b,
            kind: JointKind::Rope { max },
        }
    }
}

/// Insert one zero-density ball collider per shape on `parent`
fn attach_colliders(
    colliders: &mut ColliderSet,
    rigid_bodies: &mut RigidBodySet,
    parent: RigidBodyHandle,
    shapes: &[CircleShape],
    enabled: bool,
) -> Vec<ColliderHandle> {
    shapes
        .iter()
        .map(|shape| {
            let mut collider = ColliderBuilder::ball(shape.radius)
                .translation(to_vector(shape.offset))
                .density(0.0)
                .friction(shape.friction)
                .restitution(shape.elasticity)
                .friction_combine_rule(CoefficientCombineRule::Multiply)
                .restitution_combine_rule(CoefficientCombineRule::Multiply)
                .collision_groups(interaction_groups(shape.group))
                .build();
            collider.set_enabled(enabled);
            colliders.insert_with_parent(collider, parent, rigid_bodies)
        })
        .collect()
}

/// The simulation space owning all bodies, segments and joints
pub struct Space {
    pub gravity: Vec2,
    /// Fraction of velocity kept after one second
    pub damping: f32,
    /// Solver iterations per step
    pub iterations: u32,
    /// Ordered by arena slot so the engine always sees bodies in the same order
    bodies: BTreeMap<BodyHandle, Body>,
    segments: Vec<(SegmentHandle, Segment)>,
    joints: Vec<(JointHandle, Joint)>,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("gravity", &self.gravity)
            .field("damping", &self.damping)
            .field("iterations", &self.iterations)
            .field("bodies", &self.bodies.len())
            .field("segments", &self.segments.len())
            .field("joints", &self.joints.len())
            .finish_non_exhaustive()
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.length_unit = crate::consts::PHYSICS_LENGTH_UNIT;
        Self {
            gravity: crate::consts::GRAVITY,
            damping: crate::consts::SPACE_DAMPING,
            iterations: crate::consts::SOLVER_ITERATIONS,
            bodies: BTreeMap::new(),
            segments: Vec::new(),
            joints: Vec::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
        }
    }

    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        let builder = match body.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic()
                .additional_mass_properties(mass_properties(body.mass, body.moment))
                .can_sleep(false),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let rigid_body = builder
            .translation(to_vector(body.position))
            .rotation(body.angle)
            .linvel(to_vector(body.velocity))
            .angvel(body.angular_velocity)
            .build();
        let handle = self.rigid_bodies.insert(rigid_body);

        body.colliders = attach_colliders(
            &mut self.colliders,
            &mut self.rigid_bodies,
            handle,
            &body.shapes,
            true,
        );
        body.in_space = true;
        body.synced = Some(Motion::of(&body));
        body.mass_changed = false;
        body.shapes_changed = false;

        let handle = BodyHandle(handle);
        self.bodies.insert(handle, body);
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[&handle]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        self.bodies
            .get_mut(&handle)
            .unwrap_or_else(|| panic!("no body for {handle:?}"))
    }

    /// Take a body out of the simulation; it keeps its last state
    ///
    /// Joints to it hold as if it were static and nothing collides with it.
    pub fn remove_body(&mut self, handle: BodyHandle) {
        match self.bodies.get_mut(&handle) {
            Some(body) if body.in_space => body.in_space = false,
            _ => return,
        }
        log::trace!("{:?} left the simulation", handle);
        self.set_simulated(handle, RigidBodyType::Fixed, false);
    }

    /// Put a removed body back into the simulation
    pub fn add_back(&mut self, handle: BodyHandle) {
        let body_type = match self.bodies.get_mut(&handle) {
            Some(body) if !body.in_space => {
                body.in_space = true;
                body.synced = None;
                body.body_type()
            }
            _ => return,
        };
        self.set_simulated(handle, body_type, true);
    }

    fn set_simulated(&mut self, handle: BodyHandle, body_type: RigidBodyType, enabled: bool) {
        let Some(rigid_body) = self.rigid_bodies.get_mut(handle.0) else {
            return;
        };
        if !enabled {
            rigid_body.set_linvel(vector![0.0, 0.0], false);
            rigid_body.set_angvel(0.0, false);
        }
        rigid_body.set_body_type(body_type, enabled);
        for &collider in rigid_body.colliders() {
            if let Some(collider) = self.colliders.get_mut(collider) {
                collider.set_enabled(enabled);
            }
        }
    }

    /// Permanently free a body, its colliders and every joint attached to it
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        if self.bodies.remove(&handle).is_none() {
            return;
        }
        self.rigid_bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.joints.retain(|(_, j)| j.a != handle && j.b != handle);
    }

    /// Number of bodies taking part in the simulation
    pub fn body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.in_space).count()
    }

    pub fn add_segment(&mut self, segment: Segment) -> SegmentHandle {
        let collider = ColliderBuilder::new(SharedShape::capsule(
            to_point(segment.a),
            to_point(segment.b),
            segment.radius,
        ))
        .friction(segment.friction)
        .restitution(segment.elasticity)
        .friction_combine_rule(CoefficientCombineRule::Multiply)
        .restitution_combine_rule(CoefficientCombineRule::Multiply)
        .build();
        let handle = SegmentHandle(self.colliders.insert(collider));
        self.segments.push((handle, segment));
        handle
    }

    pub fn remove_segment(&mut self, handle: SegmentHandle) {
        let before = self.segments.len();
        self.segments.retain(|&(h, _)| h != handle);
        if self.segments.len() != before {
            self.colliders
                .remove(handle.0, &mut self.islands, &mut self.rigid_bodies, true);
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().map(|(_, segment)| segment)
    }

    pub fn add_joint(&mut self, joint: Joint) -> JointHandle {
        let anchor_a = to_point(joint.anchor_a);
        let anchor_b = to_point(joint.anchor_b);
        let generic: GenericJoint = match joint.kind {
            JointKind::Pivot => RevoluteJointBuilder::new()
                .local_anchor1(anchor_a)
                .local_anchor2(anchor_b)
                .build()
                .into(),
            JointKind::Rope { max } => RopeJointBuilder::new(max)
                .local_anchor1(anchor_a)
                .local_anchor2(anchor_b)
                .build()
                .into(),
        };
        let handle = JointHandle(self.impulse_joints.insert(joint.a.0, joint.b.0, generic, true));
        self.joints.push((handle, joint));
        handle
    }

    pub fn joint(&self, handle: JointHandle) -> Option<&Joint> {
        self.joints
            .iter()
            .find(|&&(h, _)| h == handle)
            .map(|(_, joint)| joint)
    }

    pub fn remove_joint(&mut self, handle: JointHandle) {
        let before = self.joints.len();
        self.joints.retain(|&(h, _)| h != handle);
        if self.joints.len() != before {
            self.impulse_joints.remove(handle.0, true);
        }
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Advance the space by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.push_state();

        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(self.iterations as usize).unwrap_or(NonZeroUsize::MIN);
        self.pipeline.step(
            &to_vector(self.gravity),
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.pull_state();
    }

    /// Hand shapes, mass, moved bodies, damping and forces to the engine
    fn push_state(&mut self) {
        let damping = -self.damping.clamp(MIN_DAMPING, 1.0).ln();

        for (&handle, body) in self.bodies.iter_mut() {
            if body.shapes_changed {
                for collider in body.colliders.drain(..) {
                    self.colliders
                        .remove(collider, &mut self.islands, &mut self.rigid_bodies, false);
                }
                body.colliders = attach_colliders(
                    &mut self.colliders,
                    &mut self.rigid_bodies,
                    handle.0,
                    &body.shapes,
                    body.in_space,
                );
                body.shapes_changed = false;
            }

            if !body.simulated() {
                continue;
            }
            let Some(rigid_body) = self.rigid_bodies.get_mut(handle.0) else {
                continue;
            };

            if body.mass_changed {
                rigid_body.set_additional_mass_properties(mass_properties(body.mass, body.moment), true);
                body.mass_changed = false;
            }

            if body.synced != Some(Motion::of(body)) {
                rigid_body.set_position(Isometry::new(to_vector(body.position), body.angle), true);
                rigid_body.set_linvel(to_vector(body.velocity), true);
                rigid_body.set_angvel(body.angular_velocity, true);
            }

            rigid_body.set_linear_damping(damping);
            rigid_body.set_angular_damping(damping);
            rigid_body.reset_forces(false);
            rigid_body.reset_torques(false);
            rigid_body.add_force(to_vector(body.force), true);
            rigid_body.add_torque(body.torque, true);
        }
    }

    /// Read stepped motion back into the bodies, enforcing spin limits
    fn pull_state(&mut self) {
        for (&handle, body) in self.bodies.iter_mut() {
            if !body.simulated() {
                continue;
            }
            let Some(rigid_body) = self.rigid_bodies.get_mut(handle.0) else {
                continue;
            };

            body.position = from_vector(rigid_body.translation());
            body.angle = rigid_body.rotation().angle();
            body.velocity = from_vector(rigid_body.linvel());
            body.angular_velocity = rigid_body.angvel();

            if let Some(limit) = body.angular_velocity_limit {
                let clamped = body.angular_velocity.clamp(-limit, limit);
                if clamped != body.angular_velocity {
                    body.angular_velocity = clamped;
                    rigid_body.set_angvel(clamped, true);
                }
            }
            body.synced = Some(Motion::of(body));
        }
    }
}
