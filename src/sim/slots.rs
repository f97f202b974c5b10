//! Attachment slots on Susie's body
//!
//! Each slot is a local attachment point tagged with the categories of
//! component it accepts. A slot holds at most one component and a component
//! occupies at most one slot. The attached list is kept in registration order
//! with side-mounted components moved to the end, which fixes the update order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::ComponentKind;
use super::component::ComponentId;
use super::physics::Body;
use crate::error::{SimError, SimResult};

/// Combinable slot categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SlotFlags(u8);

impl SlotFlags {
    pub const EMPTY: Self = Self(0);
    pub const SIDE: Self = Self(1);
    pub const BOTTOM: Self = Self(2);
    pub const TOP: Self = Self(4);
    pub const NOSE: Self = Self(8);
    pub const TAIL: Self = Self(16);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Any flag in common
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parse a single flag name as used in catalog data
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "side" => Some(Self::SIDE),
            "bottom" => Some(Self::BOTTOM),
            "top" => Some(Self::TOP),
            "nose" => Some(Self::NOSE),
            "tail" => Some(Self::TAIL),
            _ => None,
        }
    }
}

impl std::ops::BitOr for SlotFlags {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        self.union(other)
    }
}

impl std::ops::BitAnd for SlotFlags {
    type Output = Self;
    fn bitand(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }
}

/// Stable slot identifier (registration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

/// Anything that can be tested against a slot: a component kind or a live instance
pub trait Attachable {
    fn kind(&self) -> ComponentKind;

    /// The live instance, if any; a slot already holding it still accepts it
    fn instance(&self) -> Option<ComponentId> {
        None
    }

    fn slot_mask(&self) -> SlotFlags {
        self.kind().slot_mask()
    }
}

impl Attachable for ComponentKind {
    fn kind(&self) -> ComponentKind {
        *self
    }
}

/// A single attachment point
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Offset from the body's centre of gravity
    pub local_position: Vec2,
    pub flags: SlotFlags,
    occupant: Option<ComponentId>,
}

impl Slot {
    pub fn occupant(&self) -> Option<ComponentId> {
        self.occupant
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Registry of slots and the components currently attached to them
#[derive(Debug, Clone, Default)]
pub struct Slots {
    slots: Vec<Slot>,
    attached: Vec<(ComponentId, SlotId)>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot; ids follow registration order
    pub fn add_slot(&mut self, local_position: Vec2, flags: SlotFlags) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(Slot {
            local_position,
            flags,
            occupant: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: SlotId) -> SimResult<&Slot> {
        self.slots.get(slot.0).ok_or(SimError::UnknownSlot {
            slot,
            count: self.slots.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots.iter().enumerate().map(|(i, s)| (SlotId(i), s))
    }

    /// True iff the slot is empty (or already holds this very instance) and
    /// the categories overlap
    pub fn can_attach(&self, slot: SlotId, component: &impl Attachable) -> bool {
        let Some(s) = self.slots.get(slot.0) else {
            return false;
        };
        let free = match s.occupant {
            None => true,
            Some(occupant) => component.instance() == Some(occupant),
        };
        free && s.flags.intersects(component.slot_mask())
    }

    /// First slot, in registration order, that accepts the component
    pub fn find_slot(&self, component: &impl Attachable) -> SimResult<SlotId> {
        (0..self.slots.len())
            .map(SlotId)
            .find(|&slot| self.can_attach(slot, component))
            .ok_or(SimError::NoCompatibleSlot {
                kind: component.kind(),
            })
    }

    /// Bind `id` to `slot`; re-attaching an instance moves it out of its old slot
    pub fn attach(
        &mut self,
        slot: SlotId,
        id: ComponentId,
        component: &impl Attachable,
    ) -> SimResult<()> {
        let candidate = Candidate {
            kind: component.kind(),
            mask: component.slot_mask(),
            id,
        };
        if !self.can_attach(slot, &candidate) {
            return Err(SimError::IncompatibleAttachment {
                slot,
                kind: component.kind(),
            });
        }

        if let Some(pos) = self.attached.iter().position(|&(c, _)| c == id) {
            let (_, old) = self.attached.remove(pos);
            self.slots[old.0].occupant = None;
        }

        self.slots[slot.0].occupant = Some(id);
        self.attached.push((id, slot));
        let slots = &self.slots;
        self.attached
            .sort_by_key(|&(_, s)| slots[s.0].flags.intersects(SlotFlags::SIDE));
        Ok(())
    }

    /// Free the slot held by `component`
    pub fn remove(&mut self, component: &impl Attachable) -> SimResult<SlotId> {
        let not_attached = SimError::NotAttached {
            kind: component.kind(),
        };
        let id = component.instance().ok_or(not_attached.clone())?;
        let pos = self
            .attached
            .iter()
            .position(|&(c, _)| c == id)
            .ok_or(not_attached)?;
        let (_, slot) = self.attached.remove(pos);
        self.slots[slot.0].occupant = None;
        Ok(slot)
    }

    /// Empty every slot
    pub fn detach_all(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.occupant = None;
        }
        self.attached.clear();
    }

    /// Attached components in update order
    pub fn attached(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.attached.iter().map(|&(c, _)| c)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn slot_of(&self, id: ComponentId) -> Option<SlotId> {
        self.attached
            .iter()
            .find(|&&(c, _)| c == id)
            .map(|&(_, s)| s)
    }

    /// Slot position in world space for the owning body's current pose
    pub fn slot_world_position(&self, slot: SlotId, body: &Body) -> SimResult<Vec2> {
        Ok(body.local_to_world(self.get(slot)?.local_position))
    }
}

/// Internal stand-in carrying an explicit instance id
struct Candidate {
    kind: ComponentKind,
    mask: SlotFlags,
    id: ComponentId,
}

impl Attachable for Candidate {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn instance(&self) -> Option<ComponentId> {
        Some(self.id)
    }

    fn slot_mask(&self) -> SlotFlags {
        self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> Slots {
        let mut slots = Slots::new();
        slots.add_slot(Vec2::new(60.0, 0.0), SlotFlags::NOSE);
        slots.add_slot(Vec2::new(0.0, 30.0), SlotFlags::TOP);
        slots.add_slot(Vec2::new(0.0, -30.0), SlotFlags::BOTTOM);
        slots.add_slot(Vec2::new(10.0, 0.0), SlotFlags::SIDE);
        slots
    }

    #[test]
    fn test_find_slot_returns_first_compatible() {
        let slots = registry();
        assert_eq!(slots.find_slot(&ComponentKind::Balloon), Ok(SlotId(1)));
        assert_eq!(slots.find_slot(&ComponentKind::LargeFuelTank), Ok(SlotId(1)));
        assert_eq!(slots.find_slot(&ComponentKind::Wing), Ok(SlotId(3)));
    }

    #[test]
    fn test_find_slot_without_match_fails() {
        let mut slots = Slots::new();
        slots.add_slot(Vec2::ZERO, SlotFlags::NOSE);
        assert_eq!(
            slots.find_slot(&ComponentKind::Balloon),
            Err(SimError::NoCompatibleSlot {
                kind: ComponentKind::Balloon
            })
        );
    }

    #[test]
    fn test_attach_rejects_occupied_and_incompatible() {
        let mut slots = registry();
        slots
            .attach(SlotId(1), ComponentId(1), &ComponentKind::Balloon)
            .unwrap();
        let err = slots.attach(SlotId(1), ComponentId(2), &ComponentKind::Balloon);
        assert!(matches!(err, Err(SimError::IncompatibleAttachment { .. })));
        let err = slots.attach(SlotId(0), ComponentId(3), &ComponentKind::Balloon);
        assert!(matches!(err, Err(SimError::IncompatibleAttachment { .. })));
        assert_eq!(slots.attached_count(), 1);
    }

    #[test]
    fn test_reattach_same_instance_is_idempotent() {
        let mut slots = registry();
        slots
            .attach(SlotId(1), ComponentId(7), &ComponentKind::SmallFuelTank)
            .unwrap();
        slots
            .attach(SlotId(1), ComponentId(7), &ComponentKind::SmallFuelTank)
            .unwrap();
        assert_eq!(slots.attached_count(), 1);

        // Moving to another compatible slot frees the first
        slots
            .attach(SlotId(2), ComponentId(7), &ComponentKind::SmallFuelTank)
            .unwrap();
        assert!(slots.get(SlotId(1)).unwrap().is_empty());
        assert_eq!(slots.slot_of(ComponentId(7)), Some(SlotId(2)));
    }

    #[test]
    fn test_side_components_sorted_last() {
        let mut slots = registry();
        slots
            .attach(SlotId(3), ComponentId(1), &ComponentKind::Wing)
            .unwrap();
        slots
            .attach(SlotId(0), ComponentId(2), &ComponentKind::JetEngine)
            .unwrap();
        slots
            .attach(SlotId(1), ComponentId(3), &ComponentKind::Balloon)
            .unwrap();
        let order: Vec<_> = slots.attached().collect();
        assert_eq!(order, vec![ComponentId(2), ComponentId(3), ComponentId(1)]);
    }

    #[test]
    fn test_remove_and_detach_all() {
        let mut slots = registry();
        slots
            .attach(SlotId(0), ComponentId(1), &ComponentKind::JetEngine)
            .unwrap();
        slots
            .attach(SlotId(1), ComponentId(2), &ComponentKind::Balloon)
            .unwrap();
        assert!(slots.remove(&ComponentKind::JetEngine).is_err());
        slots.detach_all();
        assert_eq!(slots.attached_count(), 0);
        assert!(slots.iter().all(|(_, s)| s.is_empty()));
    }

    #[test]
    fn test_slot_world_position_follows_body() {
        let slots = registry();
        let mut body = Body::new(1.0, 1.0).with_position(Vec2::new(100.0, 50.0));
        body.angle = std::f32::consts::PI;
        let p = slots.slot_world_position(SlotId(0), &body).unwrap();
        assert!((p - Vec2::new(40.0, 50.0)).length() < 1e-4);
        assert!(slots.slot_world_position(SlotId(9), &body).is_err());
    }

    proptest! {
        #[test]
        fn prop_can_attach_matches_mask_when_empty(flag_bits in 1u8..32, kind_index in 0usize..14) {
            let kind = ComponentKind::ATTACHABLE[kind_index % ComponentKind::ATTACHABLE.len()];
            let mut slots = Slots::new();
            let flags = SlotFlags(flag_bits);
            let slot = slots.add_slot(Vec2::ZERO, flags);
            prop_assert_eq!(slots.can_attach(slot, &kind), flags.intersects(kind.slot_mask()));

            if slots.can_attach(slot, &kind) {
                slots.attach(slot, ComponentId(1), &kind).unwrap();
                prop_assert!(!slots.can_attach(slot, &kind));
            }
        }

        #[test]
        fn prop_find_slot_is_attachable(masks in proptest::collection::vec(0u8..32, 0..8), kind_index in 0usize..14) {
            let kind = ComponentKind::ATTACHABLE[kind_index % ComponentKind::ATTACHABLE.len()];
            let mut slots = Slots::new();
            for bits in &masks {
                slots.add_slot(Vec2::ZERO, SlotFlags(*bits));
            }
            match slots.find_slot(&kind) {
                Ok(slot) => prop_assert!(slots.can_attach(slot, &kind)),
                Err(_) => prop_assert!((0..masks.len()).all(|i| !slots.can_attach(SlotId(i), &kind))),
            }
        }
    }
}
