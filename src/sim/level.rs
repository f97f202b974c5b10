//! Level descriptions
//!
//! The data the simulation needs from a level: its size, starting money, where
//! Susie spawns, static obstacles and an optional goal region.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::DEFAULT_START;
use crate::error::{SimError, SimResult};

/// Title of generated open levels
pub const FREEFLIGHT_TITLE: &str = "Free Flight";
/// Money available in generated open levels
const FREEFLIGHT_MONEY: i64 = 3000;
/// No obstacles this close to the start
const FREEFLIGHT_CLEAR_ZONE: f32 = 1500.0;
/// Largest obstacle extent a level may ask for
pub const MAX_OBSTACLE_EXTENT: f32 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Horizontal slab centred on `position`, spanning `±extent`
    Island,
    /// Vertical barrier rising `extent` from `position`
    Wall,
    /// Floats `extent` above a rope anchor at `position`
    BarrageBalloon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub kind: ObstacleKind,
    pub position: Vec2,
    pub extent: f32,
}

impl ObstaclePlacement {
    pub fn new(kind: ObstacleKind, position: Vec2, extent: f32) -> Self {
        Self {
            kind,
            position,
            extent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescription {
    pub title: String,
    /// Distance from the start wall to the far edge
    pub width: f32,
    /// Money for the build phase
    pub money: i64,
    /// Where Susie spawns
    pub start: Vec2,
    pub obstacles: Vec<ObstaclePlacement>,
    /// Reaching this wins the level; open levels have none
    pub goal: Option<Rect>,
}

impl Default for LevelDescription {
    fn default() -> Self {
        Self {
            title: FREEFLIGHT_TITLE.to_string(),
            width: 10_000.0,
            money: FREEFLIGHT_MONEY,
            start: DEFAULT_START,
            obstacles: Vec::new(),
            goal: None,
        }
    }
}

impl LevelDescription {
    pub fn from_json(json: &str) -> SimResult<Self> {
        let level: LevelDescription =
            serde_json::from_str(json).map_err(|e| SimError::data("level", e))?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::io(path.display().to_string(), e))?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level '{}' from {}", level.title, path.display());
        Ok(level)
    }

    fn validate(&self) -> SimResult<()> {
        let context = format!("level '{}'", self.title);
        if !(self.width > 0.0) {
            return Err(SimError::data(context, "width must be positive"));
        }
        if self.money < 0 {
            return Err(SimError::data(context, "money can't be negative"));
        }
        if let Some(goal) = &self.goal {
            if !(goal.width() > 0.0 && goal.height() > 0.0) {
                return Err(SimError::data(context, "goal region is empty"));
            }
        }
        if let Some(bad) = self.obstacles.iter().find(|o| !(o.extent > 0.0)) {
            return Err(SimError::data(
                context,
                format!("{:?} at {} has no extent", bad.kind, bad.position),
            ));
        }
        if let Some(bad) = self.obstacles.iter().find(|o| o.extent > MAX_OBSTACLE_EXTENT) {
            return Err(SimError::data(
                context,
                format!(
                    "{:?} at {} spans {}, more than {}",
                    bad.kind, bad.position, bad.extent, MAX_OBSTACLE_EXTENT
                ),
            ));
        }
        Ok(())
    }

    /// An open level with a seeded scatter of islands and barrage balloons
    pub fn freeflight(seed: u64, width: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut obstacles = Vec::new();

        let mut x = FREEFLIGHT_CLEAR_ZONE;
        while x < width - FREEFLIGHT_CLEAR_ZONE / 3.0 {
            let island = Vec2::new(x, rng.random_range(20.0..120.0));
            obstacles.push(ObstaclePlacement::new(
                ObstacleKind::Island,
                island,
                rng.random_range(80.0..300.0),
            ));
            if rng.random_bool(0.3) {
                obstacles.push(ObstaclePlacement::new(
                    ObstacleKind::BarrageBalloon,
                    island,
                    rng.random_range(300.0..900.0),
                ));
            }
            x += rng.random_range(1200.0..2500.0);
        }

        log::debug!(
            "Generated freeflight level (seed {}) with {} obstacles",
            seed,
            obstacles.len()
        );
        Self {
            width,
            obstacles,
            ..Self::default()
        }
    }

    pub fn has_goal(&self) -> bool {
        self.goal.is_some()
    }
}
