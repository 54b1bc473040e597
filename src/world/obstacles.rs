//! Obstacles around the robot

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Opponent,
    Teammate,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre relative to the robot (mm)
    pub center: Vec2,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleModel {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleModel {
    pub fn opponent_is_close(&self, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::Opponent && o.center.norm() < radius)
    }
}
