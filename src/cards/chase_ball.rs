//! Chase the ball and dribble it towards the opponent goal
//!
//! Offense players chase whenever the ball is not deep in our half. Defenders
//! join in open play when an opponent is close and the ball rolls into our half,
//! unless the team is in sparse-game mode.

use crate::card::{CardBuilder, FsmCard};
use crate::core::config::ChaseBallParams;
use crate::core::error::{CardFault, Result};
use crate::core::types::{Pose2, Vec2};
use crate::fsm::{StateGraph, StateId};
use crate::ports::{Reads, Representation, SkillCommand, SkillKind};
use crate::world::{Activity, SetPlay, TeamActivity};

pub const NAME: &str = "chase_ball";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChaseState {
    GoToBallAndDribble,
    SearchForBall,
}

impl StateId for ChaseState {
    fn name(self) -> &'static str {
        match self {
            ChaseState::GoToBallAndDribble => "go_to_ball_and_dribble",
            ChaseState::SearchForBall => "search_for_ball",
        }
    }
}

fn offense_chases(
    r: &Reads<'_>,
    params: &ChaseBallParams,
) -> std::result::Result<bool, CardFault> {
    let me = r.robot_info()?.number;
    if !r.teammate_roles()?.is_tactical_offense(me) {
        return Ok(false);
    }
    if r.field_ball()?.position_on_field.x <= -params.threshold {
        return Ok(false);
    }
    if params.avoid_clustering && r.team_data()?.a_buddy_is_engaging_ball() {
        return Ok(false);
    }
    Ok(true)
}

fn defense_chases(
    r: &Reads<'_>,
    params: &ChaseBallParams,
) -> std::result::Result<bool, CardFault> {
    let me = r.robot_info()?.number;
    Ok(r.game_info()?.set_play == SetPlay::None
        && r.obstacle_model()?.opponent_is_close(params.opponent_close_radius)
        && r.teammate_roles()?.is_tactical_defense(me)
        && r.field_ball()?.end_position_on_field.x < -params.threshold
        && r.team_behavior_status()?.team_activity != TeamActivity::SparseGame)
}

pub fn chase_ball_card(params: &ChaseBallParams) -> Result<FsmCard<ChaseState, ()>> {
    let timeout = params.ball_not_seen_timeout_ms;
    let walk_speed = params.walk_speed;

    let graph = StateGraph::<ChaseState, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::ChaseBallCard)))
        .initial_state(ChaseState::GoToBallAndDribble, move |s| {
            s.transition("ball_lost", ChaseState::SearchForBall, move |r, _, _| {
                Ok(!r.field_ball()?.ball_was_seen(timeout))
            })
            .action(|r, _, w| {
                let goal = r.field_dimensions()?.opponent_goal_center();
                w.call(SkillCommand::GoToBallAndDribble {
                    target_direction: r.robot_pose()?.to_relative(goal).angle(),
                    align_precisely: true,
                })
            })
        })
        .state(ChaseState::SearchForBall, move |s| {
            s.transition("ball_seen", ChaseState::GoToBallAndDribble, |r, _, _| {
                Ok(r.field_ball()?.ball_was_seen_recently())
            })
            .action(move |_, _, w| {
                w.call(SkillCommand::LookForward)?;
                // Turn on the spot
                w.call(SkillCommand::WalkAtRelativeSpeed(Pose2::new(
                    walk_speed,
                    Vec2::new(0.0, 0.0),
                )))
            })
        })
        .build()?;

    let params = params.clone();
    CardBuilder::new(NAME)
        .requires(Representation::GameInfo)
        .requires(Representation::RobotInfo)
        .requires(Representation::RobotPose)
        .requires(Representation::FieldBall)
        .requires(Representation::FieldDimensions)
        .requires(Representation::ObstacleModel)
        .requires(Representation::TeammateRoles)
        .requires(Representation::TeamBehaviorStatus)
        .requires(Representation::TeamData)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::GoToBallAndDribble)
        .calls(SkillKind::WalkAtRelativeSpeed)
        .preconditions(move |r| Ok(offense_chases(r, &params)? || defense_chases(r, &params)?))
        .exit_when_not_applicable()
        .states(graph)
        .build()
}
