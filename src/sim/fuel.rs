//! Shared fuel reservoir

/// Fuel held by the main body, filled up to the capacity of its tanks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuelReservoir {
    fuel: f32,
    capacity: f32,
}

impl FuelReservoir {
    pub fn new(capacity: f32) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            fuel: capacity,
            capacity,
        }
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.fuel <= 0.0
    }

    /// Change capacity; the reserve never exceeds it
    pub fn set_capacity(&mut self, capacity: f32) {
        self.capacity = capacity.max(0.0);
        self.fuel = self.fuel.min(self.capacity);
    }

    pub fn refill(&mut self) {
        self.fuel = self.capacity;
    }

    /// Take exactly `amount`, or nothing at all if there isn't that much
    pub fn draw(&mut self, amount: f32) -> bool {
        if amount.is_nan() {
            return false;
        }
        if amount <= 0.0 {
            return true;
        }
        if amount > self.fuel {
            return false;
        }
        self.fuel -= amount;
        true
    }

    /// Take as much of `amount` as is available and return what was taken
    pub fn draw_up_to(&mut self, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let taken = amount.min(self.fuel);
        self.fuel -= taken;
        taken
    }
}
