//! Free-floating level hazards

use glam::Vec2;

use super::catalog::ComponentSpec;
use super::physics::{Body, BodyHandle, CircleShape, Space};
use super::tether::{Tether, TetherConfig};
use crate::consts::OBSTACLE_GROUP;

const BARRAGE_LIFT: Vec2 = Vec2::new(0.0, 100_000.0);
const BARRAGE_TETHER_DENSITY: f32 = 5.0;
/// Rope segments per unit of altitude
const BARRAGE_SEGMENTS_PER_UNIT: f32 = 0.01;
/// Longer ropes get longer segments instead of more of them
pub const MAX_BARRAGE_SEGMENTS: usize = 64;

/// A balloon on a rope from a fixed anchor, never part of the craft
#[derive(Debug, Clone)]
pub struct BarrageBalloon {
    anchor: BodyHandle,
    body: BodyHandle,
    tether: Tether,
    altitude: f32,
}

impl BarrageBalloon {
    pub fn new(space: &mut Space, spec: &ComponentSpec, anchor: Vec2, altitude: f32) -> Self {
        let knot = anchor + Vec2::new(0.0, altitude);
        let mut body = Body::new(spec.mass(), spec.moment).with_position(knot - spec.insertion_point);
        for &(offset, radius) in &spec.circles {
            body.add_shape(CircleShape::new(offset, radius).with_group(OBSTACLE_GROUP));
        }
        let body = space.add_body(body);
        let anchor_body = space.add_body(Body::new_static(anchor));

        let segments = ((altitude * BARRAGE_SEGMENTS_PER_UNIT) as usize).clamp(1, MAX_BARRAGE_SEGMENTS);
        let tether = Tether::new(
            space,
            anchor,
            knot,
            Some(anchor_body),
            Some(body),
            TetherConfig::default()
                .with_segments(segments)
                .with_density(BARRAGE_TETHER_DENSITY)
                .with_group(OBSTACLE_GROUP),
        );

        Self {
            anchor: anchor_body,
            body,
            tether,
            altitude,
        }
    }

    /// Apply this tick's lift
    pub fn update(&self, space: &mut Space) {
        let body = space.body_mut(self.body);
        body.reset_forces();
        body.apply_force(BARRAGE_LIFT, Vec2::ZERO);
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn anchor(&self, space: &Space) -> Vec2 {
        space.body(self.anchor).position
    }

    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    pub fn position(&self, space: &Space) -> Vec2 {
        space.body(self.body).position
    }

    pub fn rotation(&self, space: &Space) -> f32 {
        space.body(self.body).angle
    }

    pub fn tether(&self) -> &Tether {
        &self.tether
    }

    pub fn destroy(self, space: &mut Space) {
        self.tether.destroy(space);
        space.destroy_body(self.body);
        space.destroy_body(self.anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{Catalog, ComponentKind};

    fn balloon(space: &mut Space, altitude: f32) -> BarrageBalloon {
        let catalog = Catalog::builtin().unwrap();
        BarrageBalloon::new(
            space,
            catalog.spec(ComponentKind::BarrageBalloon),
            Vec2::new(1000.0, 50.0),
            altitude,
        )
    }

    #[test]
    fn test_segment_count_follows_altitude() {
        let mut space = Space::new();
        assert_eq!(balloon(&mut space, 450.0).tether().segment_count(), 4);
        assert_eq!(balloon(&mut space, 30.0).tether().segment_count(), 1);
    }

    #[test]
    fn test_huge_altitude_caps_segment_count() {
        let mut space = Space::new();
        let b = balloon(&mut space, 1.0e9);
        assert_eq!(b.tether().segment_count(), MAX_BARRAGE_SEGMENTS);
        assert!(space.body_count() <= MAX_BARRAGE_SEGMENTS + 3);
        assert!((b.tether().rest_length() - 1.0e9 / MAX_BARRAGE_SEGMENTS as f32).abs() < 1.0e3);
    }

    #[test]
    fn test_rope_runs_from_anchor_to_knot() {
        let mut space = Space::new();
        let b = balloon(&mut space, 400.0);
        let points = b.tether().draw(&space);
        assert_eq!(points[0], Vec2::new(1000.0, 50.0));
        assert!((points[4] - Vec2::new(1000.0, 450.0)).length() < 1e-3);
        assert_eq!(b.anchor(&space), Vec2::new(1000.0, 50.0));
    }

    #[test]
    fn test_lift_reapplied_each_tick() {
        let mut space = Space::new();
        let b = balloon(&mut space, 400.0);
        b.update(&mut space);
        b.update(&mut space);
        assert_eq!(space.body(b.body()).force(), BARRAGE_LIFT);
    }

    #[test]
    fn test_balloon_floats_and_rope_holds() {
        let mut space = Space::new();
        let b = balloon(&mut space, 400.0);
        for _ in 0..150 {
            b.update(&mut space);
            for _ in 0..5 {
                space.step(0.2 / 30.0);
            }
        }
        let knot_height = b.position(&space).y - 50.0;
        assert!(knot_height > 200.0, "sank to {knot_height}");
        assert!(knot_height < 700.0, "rope stretched to {knot_height}");
    }

    #[test]
    fn test_destroy_clears_bodies() {
        let mut space = Space::new();
        let b = balloon(&mut space, 200.0);
        b.destroy(&mut space);
        assert_eq!(space.body_count(), 0);
        assert_eq!(space.joint_count(), 0);
    }
}
