//! End-to-end flights through the public API

use std::sync::Arc;

use glam::Vec2;
use susie::sim::{
    Catalog, ComponentKind, FlightPhase, GameEvent, LevelDescription, Space, Tether, TetherConfig,
    World,
};
use susie::{Rect, SimError, Tuning};

const DT: f32 = 1.0 / 30.0;

fn world(level: LevelDescription) -> World {
    let catalog = Arc::new(Catalog::builtin().expect("builtin catalog parses"));
    World::new(catalog, Tuning::default(), level)
}

fn teleport(world: &mut World, position: Vec2) {
    let (space, squid) = world.split_mut();
    let body = space.body_mut(squid.body());
    body.position = position;
    body.halt();
}

#[test]
fn test_fuel_tank_scenario() {
    let mut w = world(LevelDescription::default());
    assert_eq!(w.squid().total_weight(), 25.0);

    w.attach(ComponentKind::LargeFuelTank, None).unwrap();
    assert_eq!(w.squid().fuel_capacity(), 75.0);

    w.reset();
    assert_eq!(w.squid().fuel(), 75.0);

    let (_, squid) = w.split_mut();
    assert!(!squid.draw_fuel(80.0));
    assert_eq!(squid.fuel(), 75.0);
    assert!(squid.draw_fuel(75.0));
    assert_eq!(squid.fuel(), 0.0);
    assert!(!squid.draw_fuel(0.1));
    assert!(squid.draw_fuel(0.0));
}

#[test]
fn test_tether_scenario() {
    let mut space = Space::new();
    let tether = Tether::new(
        &mut space,
        Vec2::ZERO,
        Vec2::new(100.0, 0.0),
        None,
        None,
        TetherConfig::default().with_segments(2),
    );
    assert_eq!(
        tether.draw(&space),
        vec![Vec2::ZERO, Vec2::new(50.0, 0.0), Vec2::new(100.0, 0.0)]
    );

    for _ in 0..10 {
        space.step(DT);
    }
    tether.reorient(&mut space, Vec2::ZERO, Vec2::new(0.0, 100.0));
    assert_eq!(
        tether.draw(&space),
        vec![Vec2::ZERO, Vec2::new(0.0, 50.0), Vec2::new(0.0, 100.0)]
    );
    for &body in tether.bodies() {
        assert_eq!(space.body(body).velocity, Vec2::ZERO);
        assert_eq!(space.body(body).angular_velocity, 0.0);
    }
}

#[test]
fn test_crash_reports_distance_once() {
    let mut w = world(LevelDescription::default());
    teleport(&mut w, Vec2::new(1000.0, -1.0));
    w.update(DT);
    assert_eq!(w.phase(), FlightPhase::Crashed);
    assert_eq!(w.drain_events(), vec![GameEvent::Crashed { distance: 100.0 }]);

    for _ in 0..30 {
        w.update(DT);
    }
    assert!(w.drain_events().is_empty());
    assert_eq!(w.phase(), FlightPhase::Crashed);
}

#[test]
fn test_goal_reported_once() {
    let level = LevelDescription {
        title: "Harbour".into(),
        width: 4000.0,
        goal: Some(Rect::new(Vec2::new(3600.0, 0.0), Vec2::new(4000.0, 400.0))),
        ..LevelDescription::default()
    };
    let mut w = world(level);
    teleport(&mut w, Vec2::new(3800.0, 200.0));
    w.update(DT);
    assert_eq!(w.drain_events(), vec![GameEvent::Goal]);

    teleport(&mut w, Vec2::new(3000.0, 200.0));
    w.update(DT);
    teleport(&mut w, Vec2::new(3800.0, 200.0));
    w.update(DT);
    assert!(w.drain_events().is_empty());
    assert_eq!(w.phase(), FlightPhase::Won);
}

#[test]
fn test_jet_burns_fuel_while_held() {
    let mut w = world(LevelDescription::default());
    w.attach(ComponentKind::LargeFuelTank, None).unwrap();
    let jet = w.attach(ComponentKind::JetEngine, None).unwrap();
    w.reset();

    w.press(1);
    for _ in 0..30 {
        w.update(DT);
    }
    assert!((w.squid().fuel() - 74.0).abs() < 1e-3, "fuel = {}", w.squid().fuel());
    let sound = w.squid().component(jet).and_then(|c| c.sound()).unwrap();
    assert!(sound.is_playing());

    w.release(1);
    let before = w.squid().fuel();
    w.update(DT);
    assert_eq!(w.squid().fuel(), before);
    let sound = w.squid().component(jet).and_then(|c| c.sound()).unwrap();
    assert!(!sound.is_playing());
}

#[test]
fn test_rocket_fires_once_until_reset() {
    let mut w = world(LevelDescription::default());
    let rocket = w.attach(ComponentKind::Rocket, None).unwrap();

    w.press(1);
    w.release(1);
    w.update(DT);
    assert!(w.squid().component(rocket).unwrap().is_active());

    for _ in 0..70 {
        w.update(DT);
    }
    assert!(!w.squid().component(rocket).unwrap().is_active());
    w.press(1);
    assert!(!w.squid().component(rocket).unwrap().is_active());

    w.reset();
    w.press(1);
    assert!(w.squid().component(rocket).unwrap().is_active());
}

#[test]
fn test_build_phase_economy() {
    let level = LevelDescription {
        money: 800,
        ..LevelDescription::default()
    };
    let mut w = world(level);
    w.purchase(ComponentKind::JetEngine, None).unwrap();
    assert_eq!(w.squid().money(), 50);

    let weight = w.squid().total_weight();
    assert!(matches!(
        w.purchase(ComponentKind::Wing, None),
        Err(SimError::InsufficientFunds { price: 200, money: 50 })
    ));
    assert_eq!(w.squid().total_weight(), weight);

    assert_eq!(w.sell(ComponentKind::JetEngine), Ok(750));
    assert_eq!(w.squid().money(), 800);
    assert!(matches!(
        w.sell(ComponentKind::JetEngine),
        Err(SimError::NotAttached { .. })
    ));
}

#[test]
fn test_freeflight_world_flies_deterministically() {
    let fly = || {
        let mut w = world(LevelDescription::freeflight(42, 15_000.0));
        w.purchase(ComponentKind::LargeFuelTank, None).unwrap();
        w.purchase(ComponentKind::JetEngine, None).unwrap();
        w.purchase(ComponentKind::Balloon, None).unwrap();
        w.reset();
        w.press(1);
        for _ in 0..90 {
            w.update(DT);
        }
        (w.position(), w.squid().fuel(), w.phase())
    };
    assert_eq!(fly(), fly());
}
