//! World: physics space, level geometry, Susie and the per-level flight state
//!
//! One `update` per frame: check for a crash or the goal, run the component
//! models, then advance physics in several small substeps.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, ComponentKind};
use super::component::ComponentId;
use super::level::{LevelDescription, ObstacleKind};
use super::obstacle::BarrageBalloon;
use super::physics::{Segment, SegmentHandle, Space};
use super::slots::SlotId;
use super::squid::Squid;
use crate::consts::{FLOOR_RADIUS, ISLAND_RADIUS, WALL_HEIGHT, WALL_RADIUS};
use crate::error::SimResult;
use crate::{Rect, Tuning};

/// Launch deck Susie starts on
const DECK_START: Vec2 = Vec2::new(0.0, 20.0);
const DECK_END: Vec2 = Vec2::new(676.0, 20.0);
/// Ramp off the end of the deck
const RAMP_END: Vec2 = Vec2::new(876.0, -80.0);
/// Start wall stands just behind the deck
const START_WALL_X: f32 = -50.0;

/// Per-level flight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    Flying,
    /// Hit the sea; terminal until reset
    Crashed,
    /// Reached the goal; terminal until reset
    Won,
}

/// Notifications for presentation, each fired once per state change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Distance flown in metres
    Crashed { distance: f32 },
    Goal,
}

#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    catalog: Arc<Catalog>,
    space: Space,
    squid: Squid,
    level: LevelDescription,
    segments: Vec<SegmentHandle>,
    obstacles: Vec<BarrageBalloon>,
    phase: FlightPhase,
    events: Vec<GameEvent>,
    tick: u64,
    crash_distance: Option<f32>,
}

impl World {
    pub fn new(catalog: Arc<Catalog>, tuning: Tuning, level: LevelDescription) -> Self {
        let mut space = Space::new();
        space.gravity = tuning.gravity;
        space.damping = tuning.space_damping;
        space.iterations = tuning.solver_iterations;

        let mut squid = Squid::new(&mut space, Arc::clone(&catalog), &tuning, level.start);
        squid.set_money(level.money);

        let mut world = Self {
            tuning,
            catalog,
            space,
            squid,
            level,
            segments: Vec::new(),
            obstacles: Vec::new(),
            phase: FlightPhase::Flying,
            events: Vec::new(),
            tick: 0,
            crash_distance: None,
        };
        world.reset();
        log::info!("World created on level '{}'", world.level.title);
        world
    }

    /// Switch level: strips Susie and hands out the new level's money
    pub fn load(&mut self, level: LevelDescription) {
        self.squid.detach_all(&mut self.space);
        self.squid.set_money(level.money);
        self.level = level;
        self.reset();
        log::info!(
            "Loaded level '{}' ({} obstacles, goal: {})",
            self.level.title,
            self.level.obstacles.len(),
            self.level.has_goal()
        );
    }

    /// Restart the current level, keeping Susie's parts
    pub fn reset(&mut self) {
        self.build_level();
        self.squid.reset(&mut self.space, self.level.start);
        self.phase = FlightPhase::Flying;
        self.events.clear();
        self.tick = 0;
        self.crash_distance = None;
    }

    fn build_level(&mut self) {
        for handle in self.segments.drain(..) {
            self.space.remove_segment(handle);
        }
        for obstacle in self.obstacles.drain(..) {
            obstacle.destroy(&mut self.space);
        }

        let friction = self.tuning.shape_friction;
        let elasticity = self.tuning.shape_elasticity;
        let add = |space: &mut Space, a: Vec2, b: Vec2, radius: f32| {
            let mut segment = Segment::new(a, b, radius);
            segment.friction = friction;
            segment.elasticity = elasticity;
            space.add_segment(segment)
        };

        let mut segments = vec![
            add(&mut self.space, DECK_START, DECK_END, FLOOR_RADIUS),
            add(&mut self.space, DECK_END, RAMP_END, FLOOR_RADIUS),
            add(
                &mut self.space,
                Vec2::new(START_WALL_X, 0.0),
                Vec2::new(START_WALL_X, WALL_HEIGHT),
                WALL_RADIUS,
            ),
        ];
        // An open level has no far boundary
        if self.level.has_goal() {
            let x = self.level.width + WALL_RADIUS;
            segments.push(add(
                &mut self.space,
                Vec2::new(x, 0.0),
                Vec2::new(x, WALL_HEIGHT),
                WALL_RADIUS,
            ));
        }

        let barrage = self.catalog.spec(ComponentKind::BarrageBalloon);
        for placement in &self.level.obstacles {
            let p = placement.position;
            let extent = placement.extent;
            match placement.kind {
                ObstacleKind::Island => segments.push(add(
                    &mut self.space,
                    p - Vec2::new(extent, 0.0),
                    p + Vec2::new(extent, 0.0),
                    ISLAND_RADIUS,
                )),
                ObstacleKind::Wall => segments.push(add(
                    &mut self.space,
                    p,
                    p + Vec2::new(0.0, extent),
                    WALL_RADIUS,
                )),
                ObstacleKind::BarrageBalloon => self.obstacles.push(BarrageBalloon::new(
                    &mut self.space,
                    barrage,
                    p,
                    extent,
                )),
            }
        }
        self.segments = segments;
    }

    /// Advance one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.phase == FlightPhase::Flying {
            self.check_flight();
        }

        self.squid.update(&mut self.space, dt);
        for obstacle in &self.obstacles {
            obstacle.update(&mut self.space);
        }

        let step = self.tuning.substep(dt);
        for _ in 0..self.tuning.substeps {
            self.space.step(step);
        }
        self.tick += 1;
    }

    fn check_flight(&mut self) {
        let position = self.position();
        if position.y < self.tuning.sea_level {
            let distance = self.distance();
            self.space.remove_body(self.squid.body());
            self.phase = FlightPhase::Crashed;
            self.crash_distance = Some(distance);
            self.events.push(GameEvent::Crashed { distance });
            log::info!("Crashed after {:.1} m on tick {}", distance, self.tick);
        } else if self.level.goal.is_some_and(|goal| goal.contains(position)) {
            self.phase = FlightPhase::Won;
            self.events.push(GameEvent::Goal);
            log::info!("Reached the goal of '{}' on tick {}", self.level.title, self.tick);
        }
    }

    /// Take the notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn is_crashed(&self) -> bool {
        self.phase == FlightPhase::Crashed
    }

    pub fn has_won(&self) -> bool {
        self.phase == FlightPhase::Won
    }

    pub fn crash_distance(&self) -> Option<f32> {
        self.crash_distance
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn position(&self) -> Vec2 {
        self.space.body(self.squid.body()).position
    }

    /// Orientation in radians
    pub fn rotation(&self) -> f32 {
        self.space.body(self.squid.body()).angle
    }

    pub fn velocity(&self) -> Vec2 {
        self.space.body(self.squid.body()).velocity
    }

    /// Height above the sea
    pub fn altitude(&self) -> f32 {
        self.position().y - self.tuning.sea_level
    }

    /// Horizontal distance in metres
    pub fn distance(&self) -> f32 {
        self.position().x * self.tuning.distance_scale
    }

    pub fn level(&self) -> &LevelDescription {
        &self.level
    }

    pub fn goal(&self) -> Option<Rect> {
        self.level.goal
    }

    pub fn obstacles(&self) -> &[BarrageBalloon] {
        &self.obstacles
    }

    pub fn static_segments(&self) -> impl Iterator<Item = &Segment> {
        self.space.segments()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn squid(&self) -> &Squid {
        &self.squid
    }

    /// Both halves at once, for build-phase edits
    pub fn split_mut(&mut self) -> (&mut Space, &mut Squid) {
        (&mut self.space, &mut self.squid)
    }

    pub fn attach(&mut self, kind: ComponentKind, slot: Option<SlotId>) -> SimResult<ComponentId> {
        self.squid.attach(&mut self.space, kind, slot)
    }

    pub fn remove_any(&mut self, kind: ComponentKind) -> SimResult<ComponentId> {
        self.squid.remove_any(&mut self.space, kind)
    }

    pub fn purchase(&mut self, kind: ComponentKind, slot: Option<SlotId>) -> SimResult<ComponentId> {
        self.squid.purchase(&mut self.space, kind, slot)
    }

    pub fn sell(&mut self, kind: ComponentKind) -> SimResult<i64> {
        self.squid.sell(&mut self.space, kind)
    }

    pub fn press(&mut self, key: usize) {
        self.squid.press(key);
    }

    pub fn release(&mut self, key: usize) {
        self.squid.release(key);
    }
}
