//! Susie headless runner
//!
//! Builds a craft on a level, flies it until it crashes or reaches the goal,
//! and records the distance. Usage: `susie [level.json]`

#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use susie::sim::{Catalog, ComponentKind, GameEvent, LevelDescription, World};
#[cfg(not(target_arch = "wasm32"))]
use susie::{FlightRecords, SimResult, Tuning};

#[cfg(not(target_arch = "wasm32"))]
const TUNING_PATH: &str = "susie-tuning.json";
#[cfg(not(target_arch = "wasm32"))]
const RECORDS_PATH: &str = "susie-records.json";
/// Give up after two minutes of flight
#[cfg(not(target_arch = "wasm32"))]
const MAX_FLIGHT_SECONDS: f32 = 120.0;

/// Parts bought before launch, cheapest setup that leaves the deck
#[cfg(not(target_arch = "wasm32"))]
const LOADOUT: [ComponentKind; 4] = [
    ComponentKind::LargeFuelTank,
    ComponentKind::JetEngine,
    ComponentKind::Wing,
    ComponentKind::Balloon,
];

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Susie (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core has no browser entry point
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> SimResult<()> {
    let tuning = Tuning::load(TUNING_PATH);
    let level = match std::env::args().nth(1) {
        Some(path) => LevelDescription::load(path)?,
        None => {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            log::info!("Free flight with seed: {}", seed);
            LevelDescription::freeflight(seed, 20_000.0)
        }
    };

    let catalog = Arc::new(Catalog::builtin()?);
    let frame_time = tuning.frame_time();
    let max_ticks = (MAX_FLIGHT_SECONDS / frame_time) as u64;
    let mut world = World::new(catalog, tuning, level);

    for kind in LOADOUT {
        if let Err(e) = world.purchase(kind, None) {
            log::warn!("Skipping {}: {}", kind.name(), e);
        }
    }
    world.reset();
    log::info!(
        "Launching with {:.0} kg, {:.0} fuel, {} left",
        world.squid().total_weight(),
        world.squid().fuel(),
        world.squid().money()
    );

    // Keys count from 1; hold every control down
    let controls = world.squid().controls().len();
    for key in 1..=controls {
        world.press(key % 10);
    }

    let mut outcome = None;
    while outcome.is_none() && world.tick() < max_ticks {
        world.update(frame_time);
        for event in world.drain_events() {
            outcome = Some(event);
        }
        if world.tick() % 30 == 0 {
            log::debug!(
                "tick {}: distance {:.1} m, altitude {:.0}, fuel {:.1}",
                world.tick(),
                world.distance(),
                world.altitude(),
                world.squid().fuel()
            );
        }
    }

    let (distance, reached_goal) = match outcome {
        Some(GameEvent::Crashed { distance }) => (distance, false),
        Some(GameEvent::Goal) => (world.distance(), true),
        None => {
            log::info!("Still airborne after {} s", MAX_FLIGHT_SECONDS);
            (world.distance(), false)
        }
    };
    log::info!(
        "Flight over: {:.1} m{}",
        distance,
        if reached_goal { ", goal reached" } else { "" }
    );

    let mut records = FlightRecords::load(RECORDS_PATH);
    let title = world.level().title.clone();
    if let Some(rank) = records.add(&title, distance, reached_goal) {
        log::info!("New record #{} on '{}'", rank, title);
        records.save(RECORDS_PATH)?;
    }
    Ok(())
}
