//! Best flight distances per level
//!
//! Persisted as JSON, tracks the top 10 crash distances of each level.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Maximum number of records kept per level
pub const MAX_RECORDS: usize = 10;

/// A single flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Distance flown in metres
    pub distance: f32,
    /// Whether the flight reached the goal
    #[serde(default)]
    pub reached_goal: bool,
}

/// Best flights, keyed by level title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlightRecords {
    pub levels: BTreeMap<String, Vec<FlightRecord>>,
}

impl FlightRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for a level, best first
    pub fn level(&self, title: &str) -> &[FlightRecord] {
        self.levels.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Best distance on a level
    pub fn best(&self, title: &str) -> Option<f32> {
        self.level(title).first().map(|r| r.distance)
    }

    /// Check if a distance would make the table
    pub fn qualifies(&self, title: &str, distance: f32) -> bool {
        if !(distance > 0.0) {
            return false;
        }
        let entries = self.level(title);
        entries.len() < MAX_RECORDS || entries.last().is_none_or(|r| distance > r.distance)
    }

    /// Record a flight; returns the 1-based rank achieved, if any
    pub fn add(&mut self, title: &str, distance: f32, reached_goal: bool) -> Option<usize> {
        if !self.qualifies(title, distance) {
            return None;
        }
        let entries = self.levels.entry(title.to_string()).or_default();
        let pos = entries
            .iter()
            .position(|r| distance > r.distance)
            .unwrap_or(entries.len());
        entries.insert(
            pos,
            FlightRecord {
                distance,
                reached_goal,
            },
        );
        entries.truncate(MAX_RECORDS);
        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.values().all(Vec::is_empty)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::data("flight records", e))
    }

    /// Load from `path`; a missing or unreadable file starts a fresh table
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let Ok(json) = std::fs::read_to_string(path) else {
            log::info!("No flight records found, starting fresh");
            return Self::new();
        };
        match Self::from_json(&json) {
            Ok(records) => {
                log::info!("Loaded flight records for {} levels", records.levels.len());
                records
            }
            Err(e) => {
                log::warn!("Discarding {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).map_err(|e| SimError::data("flight records", e))?;
        std::fs::write(path, json).map_err(|e| SimError::io(path.display().to_string(), e))?;
        log::info!("Flight records saved ({} levels)", self.levels.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_sorted_descending() {
        let mut records = FlightRecords::new();
        assert_eq!(records.add("Harbour", 120.0, false), Some(1));
        assert_eq!(records.add("Harbour", 300.0, true), Some(1));
        assert_eq!(records.add("Harbour", 200.0, false), Some(2));
        let distances: Vec<f32> = records.level("Harbour").iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![300.0, 200.0, 120.0]);
        assert_eq!(records.best("Harbour"), Some(300.0));
        assert_eq!(records.best("Elsewhere"), None);
    }

    #[test]
    fn test_table_is_capped() {
        let mut records = FlightRecords::new();
        for i in 1..=MAX_RECORDS {
            records.add("Open Sea", i as f32 * 10.0, false);
        }
        assert!(!records.qualifies("Open Sea", 5.0));
        assert_eq!(records.add("Open Sea", 5.0, false), None);
        assert_eq!(records.add("Open Sea", 55.0, false), Some(6));
        assert_eq!(records.level("Open Sea").len(), MAX_RECORDS);
        assert_eq!(records.level("Open Sea").last().unwrap().distance, 20.0);
    }

    #[test]
    fn test_zero_distance_never_qualifies() {
        let mut records = FlightRecords::new();
        assert_eq!(records.add("Harbour", 0.0, false), None);
        assert!(records.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("susie-records-{}.json", std::process::id()));
        let mut records = FlightRecords::new();
        records.add("Harbour", 42.0, true);
        records.save(&path).unwrap();
        assert_eq!(FlightRecords::load(&path), records);
        let _ = std::fs::remove_file(&path);

        assert!(FlightRecords::load(&path).is_empty());
    }
}
