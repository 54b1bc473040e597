//! Card tuning parameters loaded from TOML
//!
//! Every card reads its thresholds and speeds from one immutable section.
//! Changing a value means rebuilding the registry, never mutating a running card.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{CardError, Result};
use crate::core::types::Vec2;

/// Options shared by every card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    /// Walk speed ratio used when a card does not define its own (0.0 to 1.0)
    pub walk_speed: f32,
    /// Length of one control tick in milliseconds
    pub tick_period_ms: u32,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            walk_speed: 1.0,
            tick_period_ms: 12,
        }
    }
}

/// Opponent kickoff: hold position until the ball has left the centre
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OppKickoffParams {
    /// Distance from the centre point (mm) after which the ball counts as kicked
    pub ball_kicked_threshold: f32,
    /// The card only applies while at least this many seconds remain in the half
    pub kickoff_window_secs: i32,
}

impl Default for OppKickoffParams {
    fn default() -> Self {
        Self {
            ball_kicked_threshold: 200.0,
            kickoff_window_secs: 590,
        }
    }
}

/// Ready-state positioning for the own kickoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyOwnKickoffParams {
    /// Target per offense role index, right-most first
    pub offense_targets: Vec<Vec2>,
    /// Offset from the default pose for robots without an offense slot
    pub default_offset: Vec2,
    /// Walk speed ratio towards the target
    pub speed_ratio: f32,
}

impl Default for ReadyOwnKickoffParams {
    fn default() -> Self {
        Self {
            offense_targets: vec![
                Vec2::new(-500.0, 0.0),
                Vec2::new(-700.0, -2000.0),
                Vec2::new(-700.0, 2000.0),
            ],
            default_offset: Vec2::new(450.0, 0.0),
            speed_ratio: 1.0,
        }
    }
}

/// Chase the ball and dribble towards the opponent goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseBallParams {
    /// Walk speed ratio while searching for the ball
    pub walk_speed: f32,
    /// Ball counts as lost after this many milliseconds without a sighting
    pub ball_not_seen_timeout_ms: u32,
    /// Margin around the half-way line (mm)
    pub threshold: f32,
    /// Radius (mm) in which an opponent counts as close for defenders
    pub opponent_close_radius: f32,
    /// Stay out when a teammate is already chasing or clearing
    pub avoid_clustering: bool,
}

impl Default for ChaseBallParams {
    fn default() -> Self {
        Self {
            walk_speed: 0.8,
            ball_not_seen_timeout_ms: 7000,
            threshold: 1000.0,
            opponent_close_radius: 800.0,
            avoid_clustering: false,
        }
    }
}

/// Complete behavior configuration, one section per card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub global: GlobalOptions,
    #[serde(default)]
    pub opp_kickoff: OppKickoffParams,
    #[serde(default)]
    pub ready_own_kickoff: ReadyOwnKickoffParams,
    #[serde(default)]
    pub chase_ball: ChaseBallParams,
}

impl BehaviorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: BehaviorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no card can run with
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("global.walk_speed", self.global.walk_speed),
            ("chase_ball.walk_speed", self.chase_ball.walk_speed),
            ("ready_own_kickoff.speed_ratio", self.ready_own_kickoff.speed_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(CardError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.global.tick_period_ms == 0 {
            return Err(CardError::InvalidConfig(
                "global.tick_period_ms must be positive".to_string(),
            ));
        }
        let distances = [
            ("opp_kickoff.ball_kicked_threshold", self.opp_kickoff.ball_kicked_threshold),
            ("chase_ball.threshold", self.chase_ball.threshold),
            ("chase_ball.opponent_close_radius", self.chase_ball.opponent_close_radius),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(CardError::InvalidConfig(format!(
                    "{} must be a finite non-negative distance, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
