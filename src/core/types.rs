//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Control tick counter (one arbitration + execution cycle)
pub type Tick = u64;

/// Angle in radians
pub type Angle = f32;

/// Robot number within the team (1-based, as on the jersey)
pub type PlayerNumber = u8;

/// Team number as assigned by the game controller
pub type TeamNumber = u8;

/// 2D position in millimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Direction of the vector, 0 for the zero vector
    pub fn angle(&self) -> Angle {
        self.y.atan2(self.x)
    }

    pub fn rotated(&self, angle: Angle) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Rotation plus translation, either field-absolute or robot-relative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    pub rotation: Angle,
    pub translation: Vec2,
}

impl Pose2 {
    pub fn new(rotation: Angle, translation: Vec2) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Pose with the same value on all three axes, used for speed limits
    pub fn uniform(value: f32) -> Self {
        Self::new(value, Vec2::new(value, value))
    }

    /// Transform a field-absolute point into this pose's frame
    pub fn to_relative(&self, point: Vec2) -> Vec2 {
        (point - self.translation).rotated(-self.rotation)
    }

    /// Transform a point in this pose's frame into field coordinates
    pub fn to_absolute(&self, point: Vec2) -> Vec2 {
        point.rotated(self.rotation) + self.translation
    }
}

/// Normalize an angle into (-pi, pi]
pub fn normalize_angle(angle: Angle) -> Angle {
    let two_pi = std::f32::consts::TAU;
    let mut a = angle % two_pi;
    if a <= -std::f32::consts::PI {
        a += two_pi;
    } else if a > std::f32::consts::PI {
        a -= two_pi;
    }
    a
}
