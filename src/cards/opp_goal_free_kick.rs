//! Opponent goal kick: block from the own default position, facing the ball

use crate::card::{CardBuilder, FsmCard};
use crate::cards::SetPlayState;
use crate::core::config::GlobalOptions;
use crate::core::error::Result;
use crate::core::types::Pose2;
use crate::fsm::StateGraph;
use crate::ports::{AvoidanceHint, Representation, SkillCommand, SkillKind};
use crate::world::{Activity, SetPlay};

pub const NAME: &str = "opp_goal_free_kick";

pub fn opp_goal_free_kick_card(global: &GlobalOptions) -> Result<FsmCard<SetPlayState, ()>> {
    let walk_speed = global.walk_speed;

    let graph = StateGraph::<SetPlayState, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::OppFreeKick)))
        .initial_state(SetPlayState::Init, move |s| {
            s.action(move |r, _, w| {
                w.call(SkillCommand::LookForward)?;

                let ball = r.field_ball()?;
                let robot = r.robot_pose()?;
                let home = r.default_pose()?.own_default_pose.translation;
                let blocking = Pose2::new(ball.position_relative.angle(), robot.to_relative(home));
                w.call(SkillCommand::WalkToPose {
                    target: blocking,
                    speed: Pose2::uniform(walk_speed),
                    avoidance: AvoidanceHint::rough(),
                    keep_target_rotation: true,
                })
            })
        })
        .state(SetPlayState::Active, |s| s)
        .state(SetPlayState::Standby, |s| s)
        .build()?;

    CardBuilder::new(NAME)
        .requires(Representation::GameInfo)
        .requires(Representation::OwnTeamInfo)
        .requires(Representation::FieldBall)
        .requires(Representation::RobotPose)
        .requires(Representation::DefaultPose)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::WalkToPose)
        .preconditions(|r| {
            let game = r.game_info()?;
            Ok(!game.is_kicking_team(r.own_team_info()?) && game.set_play == SetPlay::GoalKick)
        })
        .exit_when_not_applicable()
        .states(graph)
        .build()
}
