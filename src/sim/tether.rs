//! Tether (rope) simulation
//!
//! A chain of point masses from A to B. Consecutive points are held by rope
//! joints that only stop them separating beyond the rest length, so the rope
//! can go slack but not stretch. The end points are pivoted to the bodies at
//! either end, when given.

use glam::Vec2;

use super::physics::{Body, BodyHandle, CircleShape, Joint, JointHandle, Space, moment_for_circle};
use crate::consts::{CRAFT_GROUP, TETHER_MIN_POINT_MASS, TETHER_POINT_RADIUS};

/// How a tether is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetherConfig {
    /// Number of segments; there are `segments + 1` point masses
    pub segments: usize,
    /// Mass of each point
    pub density: f32,
    /// Collision group of the point shapes
    pub group: u32,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            segments: 2,
            density: 0.1,
            group: CRAFT_GROUP,
        }
    }
}

impl TetherConfig {
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }
}

/// A rope of point masses living in a [`Space`]
#[derive(Debug, Clone)]
pub struct Tether {
    bodies: Vec<BodyHandle>,
    joints: Vec<JointHandle>,
    rest_length: f32,
}

impl Tether {
    /// Build a rope from `a` to `b`, pinning its ends to `c1` and `c2` when given
    pub fn new(
        space: &mut Space,
        a: Vec2,
        b: Vec2,
        c1: Option<BodyHandle>,
        c2: Option<BodyHandle>,
        config: TetherConfig,
    ) -> Self {
        let segments = config.segments.max(1);
        let rest_length = a.distance(b) / segments as f32;
        if rest_length < f32::EPSILON {
            log::warn!("Zero-length tether at {a}; all points coincide");
        }

        let mass = config.density.max(TETHER_MIN_POINT_MASS);
        let moment = moment_for_circle(mass, 0.0, TETHER_POINT_RADIUS, Vec2::ZERO);

        let bodies: Vec<BodyHandle> = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let mut body = Body::new(mass, moment).with_position(a.lerp(b, t));
                body.add_shape(
                    CircleShape::new(Vec2::ZERO, TETHER_POINT_RADIUS).with_group(config.group),
                );
                space.add_body(body)
            })
            .collect();

        let mut joints = Vec::with_capacity(segments + 2);
        for pair in bodies.windows(2) {
            let joint = Joint::rope(pair[0], pair[1], Vec2::ZERO, Vec2::ZERO, rest_length);
            joints.push(space.add_joint(joint));
        }

        let ends = [(bodies[0], c1), (bodies[segments], c2)];
        for (end, anchor) in ends {
            if let Some(anchor) = anchor {
                let at = space.body(end).position;
                let local = space.body(anchor).world_to_local(at);
                joints.push(space.add_joint(Joint::pivot(end, anchor, Vec2::ZERO, local)));
            }
        }

        Self {
            bodies,
            joints,
            rest_length,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.bodies.len() - 1
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// Vertex strip through the current point positions
    pub fn draw(&self, space: &Space) -> Vec<Vec2> {
        self.bodies
            .iter()
            .map(|&h| space.body(h).position)
            .collect()
    }

    /// Snap every point onto the line from `a` to `b` and stop it
    pub fn reorient(&self, space: &mut Space, a: Vec2, b: Vec2) {
        let n = self.segment_count() as f32;
        for (i, &h) in self.bodies.iter().enumerate() {
            let body = space.body_mut(h);
            body.position = a.lerp(b, i as f32 / n);
            body.halt();
        }
    }

    /// Free every point mass and joint
    pub fn destroy(self, space: &mut Space) {
        for joint in self.joints {
            space.remove_joint(joint);
        }
        for body in self.bodies {
            space.destroy_body(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 150.0;

    #[test]
    fn test_points_are_interpolated() {
        let mut space = Space::new();
        let tether = Tether::new(
            &mut space,
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            None,
            None,
            TetherConfig::default(),
        );
        assert_eq!(tether.segment_count(), 2);
        assert_eq!(tether.rest_length(), 50.0);
        assert_eq!(
            tether.draw(&space),
            vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), Vec2::new(100.0, 0.0)]
        );
        assert_eq!(space.joint_count(), 2);
    }

    #[test]
    fn test_reorient_snaps_and_stops() {
        let mut space = Space::new();
        let tether = Tether::new(
            &mut space,
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            None,
            None,
            TetherConfig::default(),
        );
        for _ in 0..10 {
            space.step(DT);
        }
        tether.reorient(&mut space, Vec2::ZERO, Vec2::new(0.0, 100.0));
        assert_eq!(
            tether.draw(&space),
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 50.0), Vec2::new(0.0, 100.0)]
        );
        for &h in tether.bodies() {
            assert_eq!(space.body(h).velocity, Vec2::ZERO);
            assert_eq!(space.body(h).angular_velocity, 0.0);
        }
    }

    #[test]
    fn test_zero_length_tether_is_degenerate_but_safe() {
        let mut space = Space::new();
        let p = Vec2::new(5.0, 5.0);
        let tether = Tether::new(&mut space, p, p, None, None, TetherConfig::default().with_segments(0));
        assert_eq!(tether.segment_count(), 1);
        assert_eq!(tether.rest_length(), 0.0);
        assert!(tether.draw(&space).iter().all(|&q| q == p));
        space.step(DT);
        assert!(tether.draw(&space).iter().all(|q| q.is_finite()));
    }

    #[test]
    fn test_ends_pinned_to_anchor_bodies() {
        let mut space = Space::new();
        let anchor = space.add_body(Body::new_static(Vec2::new(0.0, 200.0)));
        let tether = Tether::new(
            &mut space,
            Vec2::new(0.0, 200.0),
            Vec2::new(0.0, 100.0),
            Some(anchor),
            None,
            TetherConfig::default().with_segments(4),
        );
        assert_eq!(space.joint_count(), 5);
        for _ in 0..300 {
            space.step(DT);
        }
        let points = tether.draw(&space);
        assert!((points[0] - Vec2::new(0.0, 200.0)).length() < 2.0);
        // Hanging under gravity the rope should not stretch much past its length
        assert!(points[4].distance(points[0]) < 110.0);
    }

    #[test]
    fn test_destroy_frees_points_and_joints() {
        let mut space = Space::new();
        let anchor = space.add_body(Body::new_static(Vec2::ZERO));
        let tether = Tether::new(
            &mut space,
            Vec2::ZERO,
            Vec2::new(30.0, 0.0),
            Some(anchor),
            None,
            TetherConfig::default().with_segments(3),
        );
        assert_eq!(space.body_count(), 5);
        tether.destroy(&mut space);
        assert_eq!(space.body_count(), 1);
        assert_eq!(space.joint_count(), 0);
    }
}
