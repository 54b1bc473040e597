//! Role assignment and teammate behavior status

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerNumber;

/// Upper bound on teammates any card iterates over in one tick
pub const MAX_TEAMMATES: usize = 6;

/// What a robot reports it is doing, shared with teammates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Unknown,
    DefaultBehavior,
    OppFreeKick,
    OppKickoff,
    OwnFreeKick,
    ChaseBallCard,
    ClearOwnHalfCard,
    ClearOwnHalfCardGoalie,
    OffenseForwardPassCard,
    OffenseReceivePassCard,
    /// Published while the robot runs the safe fallback command
    SafeDefault,
}

impl Activity {
    /// Activities that own the ball, so other robots should keep out of the way
    pub fn is_engaging_ball(self) -> bool {
        matches!(
            self,
            Activity::ChaseBallCard
                | Activity::ClearOwnHalfCard
                | Activity::ClearOwnHalfCardGoalie
                | Activity::OffenseForwardPassCard
                | Activity::OffenseReceivePassCard
        )
    }
}

/// Tactical roles computed by the team role assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateRoles {
    /// Offense players, right-most first
    pub offense: Vec<PlayerNumber>,
    pub defense: Vec<PlayerNumber>,
    pub goal_keeper: Option<PlayerNumber>,
}

impl TeammateRoles {
    pub fn is_tactical_offense(&self, number: PlayerNumber) -> bool {
        self.offense.contains(&number)
    }

    pub fn is_tactical_defense(&self, number: PlayerNumber) -> bool {
        self.defense.contains(&number)
    }

    pub fn is_tactical_goal_keeper(&self, number: PlayerNumber) -> bool {
        self.goal_keeper == Some(number)
    }

    /// Position of `number` among the offense players
    pub fn offense_role_index(&self, number: PlayerNumber) -> Option<usize> {
        self.offense.iter().position(|n| *n == number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Role {
    /// This robot is the one assigned to play the ball
    pub play_ball: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeamActivity {
    #[default]
    Normal,
    /// Few robots left on the field; defenders hold their positions
    SparseGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamBehaviorStatus {
    pub role: Role,
    pub team_activity: TeamActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teammate {
    pub number: PlayerNumber,
    pub activity: Activity,
}

/// Latest status received from each teammate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamData {
    pub teammates: Vec<Teammate>,
}

impl TeamData {
    /// Teammates considered by cards, capped at `MAX_TEAMMATES`
    pub fn bounded(&self) -> impl Iterator<Item = &Teammate> {
        self.teammates.iter().take(MAX_TEAMMATES)
    }

    pub fn a_buddy_is_engaging_ball(&self) -> bool {
        self.bounded().any(|t| t.activity.is_engaging_ball())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_queries() {
        let roles = TeammateRoles {
            offense: vec![4, 5],
            defense: vec![2, 3],
            goal_keeper: Some(1),
        };
        assert!(roles.is_tactical_offense(5));
        assert!(!roles.is_tactical_offense(2));
        assert!(roles.is_tactical_defense(3));
        assert!(roles.is_tactical_goal_keeper(1));
        assert_eq!(roles.offense_role_index(5), Some(1));
        assert_eq!(roles.offense_role_index(1), None);
    }

    #[test]
    fn test_teammate_scan_is_bounded() {
        let mut data = TeamData::default();
        for n in 0..MAX_TEAMMATES as u8 {
            data.teammates.push(Teammate {
                number: n,
                activity: Activity::DefaultBehavior,
            });
        }
        data.teammates.push(Teammate {
            number: 99,
            activity: Activity::ChaseBallCard,
        });

        assert_eq!(data.bounded().count(), MAX_TEAMMATES);
        assert!(!data.a_buddy_is_engaging_ball());
    }
}
