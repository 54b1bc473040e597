//! Self localization and static field geometry

use serde::{Deserialize, Serialize};

use crate::core::types::{Angle, Pose2, Vec2};

/// Self-localization estimate in field coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotPose {
    pub pose: Pose2,
}

impl RobotPose {
    pub fn new(rotation: Angle, translation: Vec2) -> Self {
        Self {
            pose: Pose2::new(rotation, translation),
        }
    }

    pub fn translation(&self) -> Vec2 {
        self.pose.translation
    }

    pub fn rotation(&self) -> Angle {
        self.pose.rotation
    }

    /// Field-absolute point in robot-relative coordinates
    pub fn to_relative(&self, point: Vec2) -> Vec2 {
        self.pose.to_relative(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldDimensions {
    pub x_pos_opponent_ground_line: f32,
    pub x_pos_own_ground_line: f32,
    pub y_pos_left_sideline: f32,
    pub y_pos_right_sideline: f32,
    pub center_circle_radius: f32,
}

impl Default for FieldDimensions {
    /// Standard 9 x 6 m field
    fn default() -> Self {
        Self {
            x_pos_opponent_ground_line: 4500.0,
            x_pos_own_ground_line: -4500.0,
            y_pos_left_sideline: 3000.0,
            y_pos_right_sideline: -3000.0,
            center_circle_radius: 750.0,
        }
    }
}

impl FieldDimensions {
    pub fn opponent_goal_center(&self) -> Vec2 {
        Vec2::new(self.x_pos_opponent_ground_line, 0.0)
    }
}

/// Tactical default position assigned to this robot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultPose {
    pub own_default_pose: Pose2,
}
