//! Mathematical types shared between ingestion and the engine.
//!
//! Everything is expressed in canvas pixels and degrees.

use crate::constants::INTENSITY_REFERENCE_AMOUNT;
use serde::{Deserialize, Serialize};

/// 2D Vector - positions, velocities, scales
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a Vec2 with both components set to `v`
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit scale
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Component-wise product
    #[must_use]
    pub fn scaled_by(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Placement of a scene object: position, per-axis scale and rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in canvas pixels
    pub position: Vec2,
    /// Per-axis scale (1.0 = native size)
    pub scale: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
}

impl Transform {
    /// Identity transform at the origin
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Creates a transform
    #[must_use]
    pub const fn new(position: Vec2, scale: Vec2, rotation: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Identity transform placed at `position`
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, Vec2::ONE, 0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Normalised 0-1 intensity of a donation amount.
///
/// `INTENSITY_REFERENCE_AMOUNT` and above map to 1.0. Negative or
/// non-finite amounts map to 0.0.
#[must_use]
pub fn intensity_for_amount(amount: f64) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    (amount / INTENSITY_REFERENCE_AMOUNT).clamp(0.0, 1.0)
}
