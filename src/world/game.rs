//! Game controller state as seen by this robot

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerNumber, TeamNumber};

/// Primary game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Initial,
    Ready,
    Set,
    Playing,
    Finished,
}

/// Set play currently in progress, `None` during open play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SetPlay {
    #[default]
    None,
    GoalKick,
    PushingFreeKick,
    CornerKick,
    KickIn,
    PenaltyKick,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub state: GameState,
    pub set_play: SetPlay,
    /// Team that has the right to kick, for kickoffs and set plays
    pub kicking_team: TeamNumber,
    /// Seconds remaining in the current half
    pub secs_remaining: i32,
}

impl Default for GameInfo {
    fn default() -> Self {
        Self {
            state: GameState::Initial,
            set_play: SetPlay::None,
            kicking_team: 0,
            secs_remaining: 600,
        }
    }
}

impl GameInfo {
    pub fn is_kicking_team(&self, team: &OwnTeamInfo) -> bool {
        self.kicking_team == team.team_number
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnTeamInfo {
    pub team_number: TeamNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotInfo {
    pub number: PlayerNumber,
}
