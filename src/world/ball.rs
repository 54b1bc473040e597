//! Filtered ball estimate

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Default interval for `ball_was_seen` in milliseconds
pub const BALL_SEEN_INTERVAL_MS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBall {
    /// Ball position in field coordinates
    pub position_on_field: Vec2,
    /// Ball position relative to the robot
    pub position_relative: Vec2,
    /// Predicted position where the ball comes to rest, field coordinates
    pub end_position_on_field: Vec2,
    /// Milliseconds since the ball was last perceived by anyone on the team
    pub time_since_last_seen_ms: u32,
}

impl Default for FieldBall {
    fn default() -> Self {
        Self {
            position_on_field: Vec2::default(),
            position_relative: Vec2::default(),
            end_position_on_field: Vec2::default(),
            time_since_last_seen_ms: u32::MAX,
        }
    }
}

impl FieldBall {
    /// Was the ball seen within the last `interval_ms` milliseconds?
    pub fn ball_was_seen(&self, interval_ms: u32) -> bool {
        self.time_since_last_seen_ms < interval_ms
    }

    pub fn ball_was_seen_recently(&self) -> bool {
        self.ball_was_seen(BALL_SEEN_INTERVAL_MS)
    }
}
