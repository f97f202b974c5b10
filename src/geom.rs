//! Vector helpers and axis-aligned rectangles
//!
//! Vectors are `glam::Vec2`; `VecExt` adds the few operations the game needs
//! that glam spells differently (degree rotation, safe rescaling).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero
const LENGTH_EPSILON: f32 = 1e-6;

/// Extra vector operations used throughout the simulation
pub trait VecExt {
    /// Rotate counter-clockwise by an angle in radians
    fn rotated(self, radians: f32) -> Vec2;
    /// Rotate counter-clockwise by an angle in degrees
    fn rotated_deg(self, degrees: f32) -> Vec2;
    /// Rescale to the given length; zero vector if this one has no length
    fn scaled_to(self, length: f32) -> Vec2;
    /// Angle of the vector in degrees
    fn angle_deg(self) -> f32;
}

impl VecExt for Vec2 {
    #[inline]
    fn rotated(self, radians: f32) -> Vec2 {
        Vec2::from_angle(radians).rotate(self)
    }

    #[inline]
    fn rotated_deg(self, degrees: f32) -> Vec2 {
        self.rotated(degrees.to_radians())
    }

    fn scaled_to(self, length: f32) -> Vec2 {
        let current = self.length();
        if current < LENGTH_EPSILON {
            Vec2::ZERO
        } else {
            self * (length / current)
        }
    }

    #[inline]
    fn angle_deg(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }
}

/// Axis-aligned rectangle between a bottom-left and top-right corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub bl: Vec2,
    pub tr: Vec2,
}

impl Rect {
    pub fn new(bl: Vec2, tr: Vec2) -> Self {
        Self { bl, tr }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.bl.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.tr.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.bl.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.tr.y
    }

    pub fn width(&self) -> f32 {
        self.tr.x - self.bl.x
    }

    pub fn height(&self) -> f32 {
        self.tr.y - self.bl.y
    }

    /// Bottom-right corner
    pub fn br(&self) -> Vec2 {
        Vec2::new(self.tr.x, self.bl.y)
    }

    /// Top-left corner
    pub fn tl(&self) -> Vec2 {
        Vec2::new(self.bl.x, self.tr.y)
    }

    /// Corners counter-clockwise from bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [self.bl, self.br(), self.tr, self.tl()]
    }

    /// Half-open containment: left <= x < right, bottom <= y < top
    pub fn contains(&self, point: Vec2) -> bool {
        self.left() <= point.x
            && point.x < self.right()
            && self.bottom() <= point.y
            && point.y < self.top()
    }

    /// A rect bigger than this one by `margin` in every direction
    pub fn extend(&self, margin: f32) -> Rect {
        let m = Vec2::splat(margin);
        Rect::new(self.bl - m, self.tr + m)
    }

    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.bl + offset, self.tr + offset)
    }
}
