//! Susie, the main body
//!
//! Owns the rigid body, the slot registry, the mounted components and the fuel
//! reservoir. Rigidly mounted parts add their mass, inertia and collision
//! circles to the body; floating parts hang off their own bodies by tethers.

use std::sync::Arc;

use glam::Vec2;

use super::catalog::{Catalog, ComponentKind};
use super::component::{Component, ComponentId, ControlMode, Mounting, UpdateContext};
use super::fuel::FuelReservoir;
use super::physics::{Body, BodyHandle, CircleShape, Space};
use super::slots::{SlotId, Slots};
use crate::consts::CRAFT_GROUP;
use crate::error::{SimError, SimResult};
use crate::{Tuning, VecExt};

/// Number of control keys; key 0 addresses the tenth control
const CONTROL_KEYS: usize = 10;

#[derive(Debug, Clone)]
pub struct Squid {
    catalog: Arc<Catalog>,
    body: BodyHandle,
    slots: Slots,
    components: Vec<Component>,
    next_id: u32,
    fuel: FuelReservoir,
    money: i64,
    angular_velocity_damping: f32,
    sea_level: f32,
    friction: f32,
    elasticity: f32,
}

impl Squid {
    pub fn new(space: &mut Space, catalog: Arc<Catalog>, tuning: &Tuning, position: Vec2) -> Self {
        let spec = catalog.spec(ComponentKind::Susie);
        let mut body = Body::new(spec.mass(), spec.moment).with_position(position);
        body.angular_velocity_limit = Some(tuning.angular_velocity_limit);
        let body = space.add_body(body);

        let mut slots = Slots::new();
        for &(offset, flags) in &spec.slots {
            slots.add_slot(offset, flags);
        }

        let mut squid = Self {
            catalog,
            body,
            slots,
            components: Vec::new(),
            next_id: 0,
            fuel: FuelReservoir::default(),
            money: 0,
            angular_velocity_damping: tuning.angular_velocity_damping,
            sea_level: tuning.sea_level,
            friction: tuning.shape_friction,
            elasticity: tuning.shape_elasticity,
        };
        squid.recompute(space);
        squid
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn find_slot(&self, kind: ComponentKind) -> SimResult<SlotId> {
        self.slots.find_slot(&kind)
    }

    pub fn can_attach(&self, slot: SlotId, kind: ComponentKind) -> bool {
        self.slots.can_attach(slot, &kind)
    }

    pub fn slot_world_position(&self, space: &Space, slot: SlotId) -> SimResult<Vec2> {
        self.slots.slot_world_position(slot, space.body(self.body))
    }

    /// Mount a new `kind`, in `slot` or the first slot that accepts it
    pub fn attach(
        &mut self,
        space: &mut Space,
        kind: ComponentKind,
        slot: Option<SlotId>,
    ) -> SimResult<ComponentId> {
        let slot = match slot {
            Some(slot) => {
                self.slots.get(slot)?;
                if !self.slots.can_attach(slot, &kind) {
                    return Err(SimError::IncompatibleAttachment { slot, kind });
                }
                slot
            }
            None => self.slots.find_slot(&kind)?,
        };

        let target = self.slots.get(slot)?;
        let mounting = Mounting {
            slot,
            flags: target.flags,
            point: target.local_position,
        };
        let id = ComponentId(self.next_id);
        let component = Component::new(
            id,
            self.catalog.spec(kind),
            mounting,
            space,
            self.body,
        );
        if let Err(e) = self.slots.attach(slot, id, &component) {
            component.destroy(space);
            return Err(e);
        }

        self.next_id += 1;
        self.components.push(component);
        self.recompute(space);
        log::debug!("Attached {} to slot {}", kind.name(), slot.0);
        Ok(id)
    }

    /// Detach the earliest attached component of `kind`
    pub fn remove_any(&mut self, space: &mut Space, kind: ComponentKind) -> SimResult<ComponentId> {
        let index = self
            .components
            .iter()
            .position(|c| c.kind() == kind)
            .ok_or(SimError::NotAttached { kind })?;
        self.slots.remove(&self.components[index])?;
        let component = self.components.remove(index);
        let id = component.id();
        component.destroy(space);
        self.recompute(space);
        log::debug!("Removed {}", kind.name());
        Ok(id)
    }

    /// Remove every component (used when switching levels)
    pub fn detach_all(&mut self, space: &mut Space) {
        self.slots.detach_all();
        for component in self.components.drain(..) {
            component.destroy(space);
        }
        self.recompute(space);
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind() == kind)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// Attached components in update order
    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.slots.attached().filter_map(|id| self.component(id))
    }

    /// Put the body back at `position`, at rest, fuelled, with every part reset
    pub fn reset(&mut self, space: &mut Space, position: Vec2) {
        space.add_back(self.body);
        let body = space.body_mut(self.body);
        body.position = position;
        body.angle = 0.0;
        body.halt();
        body.reset_forces();

        self.recompute(space);
        self.fuel.refill();
        for component in self.components.iter_mut() {
            component.reset(space, self.body);
        }
    }

    /// Advance every component one tick, then damp rotation
    pub fn update(&mut self, space: &mut Space, dt: f32) {
        space.body_mut(self.body).reset_forces();

        let mut ctx = UpdateContext {
            space,
            squid: self.body,
            fuel: &mut self.fuel,
            sea_level: self.sea_level,
            dt,
        };
        for id in self.slots.attached() {
            if let Some(component) = self.components.iter_mut().find(|c| c.id() == id) {
                component.update(&mut ctx);
            }
        }

        // Flat rotational drag, independent of spin rate
        ctx.space.body_mut(self.body).angular_velocity *= self.angular_velocity_damping;
    }

    /// Base mass plus every attached part
    pub fn total_weight(&self) -> f32 {
        self.catalog.spec(ComponentKind::Susie).mass()
            + self.components.iter().map(|c| c.kind().mass()).sum::<f32>()
    }

    pub fn fuel_capacity(&self) -> f32 {
        self.components.iter().map(|c| c.kind().capacity()).sum()
    }

    pub fn fuel(&self) -> f32 {
        self.fuel.fuel()
    }

    pub fn fuel_reservoir(&self) -> &FuelReservoir {
        &self.fuel
    }

    pub fn draw_fuel(&mut self, amount: f32) -> bool {
        self.fuel.draw(amount)
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn set_money(&mut self, money: i64) {
        self.money = money;
    }

    /// Buy and mount a part; money only changes if the attach succeeds
    pub fn purchase(
        &mut self,
        space: &mut Space,
        kind: ComponentKind,
        slot: Option<SlotId>,
    ) -> SimResult<ComponentId> {
        let price = kind.price();
        if price > self.money {
            return Err(SimError::InsufficientFunds {
                price,
                money: self.money,
            });
        }
        let id = self.attach(space, kind, slot)?;
        self.money -= price;
        log::info!("Bought {} for ${}", kind.name(), price);
        Ok(id)
    }

    /// Remove a part and refund its price
    pub fn sell(&mut self, space: &mut Space, kind: ComponentKind) -> SimResult<i64> {
        self.remove_any(space, kind)?;
        let price = kind.price();
        self.money += price;
        log::info!("Sold {} for ${}", kind.name(), price);
        Ok(price)
    }

    /// Drag a floating part; false if it has no free position
    pub fn set_component_position(&mut self, space: &mut Space, id: ComponentId, position: Vec2) -> bool {
        let squid = self.body;
        self.component_mut(id)
            .is_some_and(|c| c.set_position(space, squid, position))
    }

    /// Turn a part in the editor; false if its angle is fixed
    pub fn set_component_angle(&mut self, space: &mut Space, id: ComponentId, degrees: f32) -> bool {
        let turned = self
            .component_mut(id)
            .is_some_and(|c| c.set_angle(degrees));
        if turned {
            self.recompute(space);
        }
        turned
    }

    /// Player-controllable components in update order
    pub fn controls(&self) -> Vec<ComponentId> {
        self.components()
            .filter(|c| c.control_mode() != ControlMode::None)
            .map(Component::id)
            .collect()
    }

    fn control(&self, key: usize) -> Option<ComponentId> {
        let index = (key + CONTROL_KEYS - 1) % CONTROL_KEYS;
        self.controls().get(index).copied()
    }

    /// Key `key` went down
    pub fn press(&mut self, key: usize) {
        let Some(id) = self.control(key) else {
            return;
        };
        if let Some(component) = self.component_mut(id) {
            match component.control_mode() {
                ControlMode::Press | ControlMode::OneShot => component.set_active(true),
                ControlMode::Toggle => {
                    let active = component.is_active();
                    component.set_active(!active);
                }
                ControlMode::None => {}
            }
        }
    }

    /// Key `key` came up
    pub fn release(&mut self, key: usize) {
        let Some(id) = self.control(key) else {
            return;
        };
        if let Some(component) = self.component_mut(id) {
            if component.control_mode() == ControlMode::Press {
                component.set_active(false);
            }
        }
    }

    fn shape(&self, offset: Vec2, radius: f32) -> CircleShape {
        CircleShape::new(offset, radius)
            .with_group(CRAFT_GROUP)
            .with_material(self.friction, self.elasticity)
    }

    /// Rebuild mass, inertia, collision circles and fuel capacity from the mounted parts
    fn recompute(&mut self, space: &mut Space) {
        let base = self.catalog.spec(ComponentKind::Susie);
        let mut mass = base.mass();
        let mut moment = base.moment;
        let mut shapes: Vec<CircleShape> = base
            .circles
            .iter()
            .map(|&(offset, radius)| self.shape(offset, radius))
            .collect();

        for component in self.components.iter().filter(|c| c.is_rigid()) {
            let spec = self.catalog.spec(component.kind());
            let centre = component.mount_centre();
            mass += spec.mass();
            moment += spec.moment + spec.mass() * centre.length_squared();
            shapes.extend(spec.circles.iter().map(|&(offset, radius)| {
                self.shape(centre + offset.rotated_deg(component.angle()), radius)
            }));
        }

        let body = space.body_mut(self.body);
        body.set_mass(mass);
        body.set_moment(moment);
        body.clear_shapes();
        for shape in shapes {
            body.add_shape(shape);
        }
        let capacity = self.fuel_capacity();
        self.fuel.set_capacity(capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (Space, Squid) {
        let mut space = Space::new();
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let squid = Squid::new(&mut space, catalog, &Tuning::default(), Vec2::new(250.0, 145.0));
        (space, squid)
    }

    #[test]
    fn test_new_squid_has_base_mass_and_slots() {
        let (space, squid) = setup();
        assert_eq!(squid.total_weight(), 25.0);
        assert_eq!(squid.fuel_capacity(), 0.0);
        assert_eq!(space.body(squid.body()).mass(), 25.0);
        assert_eq!(squid.slots().len(), 7);
        assert!(!space.body(squid.body()).shapes().is_empty());
    }

    #[test]
    fn test_attach_tank_then_reset_fills_fuel() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::LargeFuelTank, None).unwrap();
        assert_eq!(squid.fuel_capacity(), 75.0);
        assert_eq!(squid.total_weight(), 105.0);
        assert_eq!(space.body(squid.body()).mass(), 105.0);

        squid.reset(&mut space, Vec2::new(250.0, 145.0));
        assert_eq!(squid.fuel(), 75.0);
        assert!(!squid.draw_fuel(80.0));
        assert_eq!(squid.fuel(), 75.0);
        assert!(squid.draw_fuel(75.0));
        assert_eq!(squid.fuel(), 0.0);
        assert!(!squid.draw_fuel(0.1));
    }

    #[test]
    fn test_failed_attach_changes_nothing() {
        let (mut space, mut squid) = setup();
        let bodies = space.body_count();
        let nose = SlotId(0);
        let err = squid.attach(&mut space, ComponentKind::Balloon, Some(nose));
        assert_eq!(
            err,
            Err(SimError::IncompatibleAttachment {
                slot: nose,
                kind: ComponentKind::Balloon
            })
        );
        assert!(matches!(
            squid.attach(&mut space, ComponentKind::Wing, Some(SlotId(42))),
            Err(SimError::UnknownSlot { .. })
        ));
        assert!(matches!(
            squid.attach(&mut space, ComponentKind::BarrageBalloon, None),
            Err(SimError::NoCompatibleSlot { .. })
        ));
        assert_eq!(squid.total_weight(), 25.0);
        assert_eq!(squid.slots().attached_count(), 0);
        assert_eq!(space.body_count(), bodies);
    }

    #[test]
    fn test_slots_fill_up() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::Rotor, None).unwrap();
        squid.attach(&mut space, ComponentKind::Balloon, None).unwrap();
        assert_eq!(
            squid.attach(&mut space, ComponentKind::HotAirBalloon, None),
            Err(SimError::NoCompatibleSlot {
                kind: ComponentKind::HotAirBalloon
            })
        );
    }

    #[test]
    fn test_remove_any_restores_totals_and_frees_bodies() {
        let (mut space, mut squid) = setup();
        let bodies = space.body_count();
        squid.attach(&mut space, ComponentKind::Balloon, None).unwrap();
        assert!(space.body_count() > bodies);
        assert_eq!(squid.total_weight(), 28.0);
        // Floating parts don't ride on the rigid body
        assert_eq!(space.body(squid.body()).mass(), 25.0);

        squid.remove_any(&mut space, ComponentKind::Balloon).unwrap();
        assert_eq!(space.body_count(), bodies);
        assert_eq!(squid.total_weight(), 25.0);
        assert_eq!(
            squid.remove_any(&mut space, ComponentKind::Balloon),
            Err(SimError::NotAttached {
                kind: ComponentKind::Balloon
            })
        );
    }

    #[test]
    fn test_remove_any_takes_the_first_match() {
        let (mut space, mut squid) = setup();
        let first = squid.attach(&mut space, ComponentKind::Wing, None).unwrap();
        let second = squid.attach(&mut space, ComponentKind::Wing, None).unwrap();
        assert_eq!(squid.remove_any(&mut space, ComponentKind::Wing), Ok(first));
        assert!(squid.component(first).is_none());
        assert!(squid.component(second).is_some());
        assert_eq!(squid.remove_any(&mut space, ComponentKind::Wing), Ok(second));
        assert!(!squid.has(ComponentKind::Wing));
    }

    #[test]
    fn test_off_centre_part_adds_parallel_axis_moment() {
        let (mut space, mut squid) = setup();
        let base = space.body(squid.body()).moment();
        let id = squid
            .attach(&mut space, ComponentKind::SmallFuelTank, Some(SlotId(4)))
            .unwrap();
        let centre = squid.component(id).unwrap().mount_centre();
        let spec = squid.catalog().spec(ComponentKind::SmallFuelTank);
        let expected = base + spec.moment + spec.mass() * centre.length_squared();
        assert!((space.body(squid.body()).moment() - expected).abs() < expected * 1e-5);
    }

    #[test]
    fn test_purchase_and_sell() {
        let (mut space, mut squid) = setup();
        squid.set_money(800);
        assert_eq!(
            squid.purchase(&mut space, ComponentKind::Rotor, None),
            Err(SimError::InsufficientFunds {
                price: 900,
                money: 800
            })
        );
        squid.purchase(&mut space, ComponentKind::JetEngine, None).unwrap();
        assert_eq!(squid.money(), 50);

        // Refused attach keeps the money
        let err = squid.purchase(&mut space, ComponentKind::Tentacle, Some(SlotId(0)));
        assert!(err.is_err());
        assert_eq!(squid.money(), 50);

        assert_eq!(squid.sell(&mut space, ComponentKind::JetEngine), Ok(750));
        assert_eq!(squid.money(), 800);
        assert!(squid.sell(&mut space, ComponentKind::JetEngine).is_err());
    }

    #[test]
    fn test_controls_follow_update_order_and_wrap() {
        let (mut space, mut squid) = setup();
        let side_jet = squid
            .attach(&mut space, ComponentKind::JetEngine, Some(SlotId(5)))
            .unwrap();
        let rotor = squid.attach(&mut space, ComponentKind::Rotor, None).unwrap();
        squid.attach(&mut space, ComponentKind::SmallFuelTank, None).unwrap();
        assert_eq!(squid.controls(), vec![rotor, side_jet]);

        squid.press(1);
        assert!(squid.component(rotor).unwrap().is_active());
        squid.release(1);
        assert!(squid.component(rotor).unwrap().is_active());
        squid.press(1);
        assert!(!squid.component(rotor).unwrap().is_active());

        squid.press(2);
        assert!(squid.component(side_jet).unwrap().is_active());
        squid.release(2);
        assert!(!squid.component(side_jet).unwrap().is_active());

        // Nothing bound to these keys
        squid.press(3);
        squid.press(0);
        squid.release(7);
        assert!(!squid.component(rotor).unwrap().is_active());
        assert!(!squid.component(side_jet).unwrap().is_active());
    }

    #[test]
    fn test_key_zero_is_tenth_control() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::Rotor, None).unwrap();
        assert_eq!(squid.control(1), squid.control(11));
        assert_eq!(squid.control(0), None);
        assert_eq!(squid.control(10), None);
    }

    #[test]
    fn test_update_applies_thrust_and_damps_spin() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::Rotor, None).unwrap();
        squid.attach(&mut space, ComponentKind::LargeFuelTank, None).unwrap();
        squid.reset(&mut space, Vec2::new(0.0, 500.0));
        squid.press(1);

        space.body_mut(squid.body()).angular_velocity = 1.0;
        squid.update(&mut space, 1.0 / 30.0);
        let body = space.body(squid.body());
        assert!(body.force().y > 40_000.0);
        assert!((body.angular_velocity - 0.8).abs() < 1e-6);
        assert!(squid.fuel() < 75.0);
    }

    #[test]
    fn test_side_part_draws_fuel_after_the_others() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::SmallFuelTank, None).unwrap();
        // Attached first, but a SIDE slot updates last
        let side_jet = squid.attach(&mut space, ComponentKind::JetEngine, Some(SlotId(5))).unwrap();
        let tail_jet = squid.attach(&mut space, ComponentKind::JetEngine, Some(SlotId(1))).unwrap();
        squid.reset(&mut space, Vec2::new(0.0, 500.0));

        let dt = 1.0 / 30.0;
        let rate = squid.component(tail_jet).unwrap().fuel_use().unwrap().rate;
        let spare = squid.fuel() - rate * dt * 1.5;
        assert!(squid.draw_fuel(spare));
        squid.component_mut(side_jet).unwrap().set_active(true);
        squid.component_mut(tail_jet).unwrap().set_active(true);
        squid.update(&mut space, dt);

        // Tail at x = -52 gets full thrust, side at x = 8 gets half
        let body = space.body(squid.body());
        let full = body.force().y / 1.5;
        let expected = -52.0 * full + 8.0 * 0.5 * full;
        assert!(
            (body.torque() - expected).abs() < expected.abs() * 1e-3,
            "torque {} expected {}",
            body.torque(),
            expected
        );
        assert!(squid.fuel_reservoir().is_empty());
    }

    #[test]
    fn test_reset_keeps_components_and_returns_body() {
        let (mut space, mut squid) = setup();
        squid.attach(&mut space, ComponentKind::Wing, None).unwrap();
        space.remove_body(squid.body());
        space.body_mut(squid.body()).velocity = Vec2::new(100.0, 0.0);
        squid.reset(&mut space, Vec2::new(10.0, 20.0));
        let body = space.body(squid.body());
        assert!(body.is_in_space());
        assert_eq!(body.position, Vec2::new(10.0, 20.0));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(squid.has(ComponentKind::Wing));
    }

    #[test]
    fn test_set_component_angle_and_position() {
        let (mut space, mut squid) = setup();
        let wing = squid.attach(&mut space, ComponentKind::Wing, None).unwrap();
        assert!(squid.set_component_angle(&mut space, wing, 50.0));
        assert_eq!(squid.component(wing).unwrap().angle(), 20.0);
        assert!(!squid.set_component_position(&mut space, wing, Vec2::ZERO));

        let balloon = squid.attach(&mut space, ComponentKind::Balloon, None).unwrap();
        assert!(squid.set_component_position(&mut space, balloon, Vec2::new(300.0, 300.0)));
        let component = squid.component(balloon).unwrap();
        assert_eq!(
            component.world_position(&space, squid.body()),
            Vec2::new(300.0, 300.0)
        );
    }

    #[test]
    fn test_detach_all_empties_everything() {
        let (mut space, mut squid) = setup();
        let bodies = space.body_count();
        squid.attach(&mut space, ComponentKind::Balloon, None).unwrap();
        squid.attach(&mut space, ComponentKind::Tentacle, None).unwrap();
        squid.attach(&mut space, ComponentKind::SmallFuelTank, None).unwrap();
        squid.detach_all(&mut space);
        assert_eq!(squid.components().count(), 0);
        assert_eq!(squid.total_weight(), 25.0);
        assert_eq!(space.body_count(), bodies);
        assert_eq!(space.joint_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_attach_then_remove_restores_totals(picks in proptest::collection::vec(0usize..13, 1..6)) {
            let (mut space, mut squid) = setup();
            let weight = squid.total_weight();
            let capacity = squid.fuel_capacity();
            let mut attached = Vec::new();
            for pick in picks {
                let kind = ComponentKind::ATTACHABLE[pick];
                if squid.attach(&mut space, kind, None).is_ok() {
                    attached.push(kind);
                }
            }
            for kind in attached.into_iter().rev() {
                prop_assert!(squid.remove_any(&mut space, kind).is_ok());
            }
            prop_assert_eq!(squid.total_weight(), weight);
            prop_assert_eq!(squid.fuel_capacity(), capacity);
            prop_assert_eq!(space.body(squid.body()).mass(), weight);
        }
    }
}
