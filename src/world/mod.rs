//! World model data consumed by the cards
//!
//! Producers (game controller, localization, ball filter, role assignment,
//! team communication) live outside this crate and fill a `WorldSnapshot` per tick.

pub mod ball;
pub mod field;
pub mod game;
pub mod obstacles;
pub mod snapshot;
pub mod team;

pub use ball::{FieldBall, BALL_SEEN_INTERVAL_MS};
pub use field::{DefaultPose, FieldDimensions, RobotPose};
pub use game::{GameInfo, GameState, OwnTeamInfo, RobotInfo, SetPlay};
pub use obstacles::{Obstacle, ObstacleKind, ObstacleModel};
pub use snapshot::WorldSnapshot;
pub use team::{
    Activity, Role, TeamActivity, TeamBehaviorStatus, TeamData, Teammate, TeammateRoles,
    MAX_TEAMMATES,
};
