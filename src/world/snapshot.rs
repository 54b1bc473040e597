//! Read-only world model view valid for one tick

use serde::{Deserialize, Serialize};

use crate::world::ball::FieldBall;
use crate::world::field::{DefaultPose, FieldDimensions, RobotPose};
use crate::world::game::{GameInfo, OwnTeamInfo, RobotInfo};
use crate::world::obstacles::ObstacleModel;
use crate::world::team::{TeamBehaviorStatus, TeamData, TeammateRoles};

/// Everything the producers published for the current tick
///
/// The arbiter only ever borrows a snapshot immutably, so cards never observe
/// a partially updated world within one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub game_info: GameInfo,
    pub own_team_info: OwnTeamInfo,
    pub robot_info: RobotInfo,
    pub field_ball: FieldBall,
    pub robot_pose: RobotPose,
    pub field_dimensions: FieldDimensions,
    pub default_pose: DefaultPose,
    pub teammate_roles: TeammateRoles,
    pub team_behavior_status: TeamBehaviorStatus,
    pub team_data: TeamData,
    pub obstacle_model: ObstacleModel,
}
