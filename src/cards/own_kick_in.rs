//! Own kick-in: the ball player walks to the ball and kicks at goal

use crate::card::{CardBuilder, FsmCard};
use crate::cards::SetPlayState;
use crate::core::error::Result;
use crate::fsm::StateGraph;
use crate::ports::{Representation, SkillCommand, SkillKind};
use crate::world::{Activity, SetPlay};

pub const NAME: &str = "own_kick_in";

pub fn own_kick_in_card() -> Result<FsmCard<SetPlayState, ()>> {
    let graph = StateGraph::<SetPlayState, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::OwnFreeKick)))
        .initial_state(SetPlayState::Init, |s| {
            s.action(|_, _, w| {
                w.call(SkillCommand::LookForward)?;
                w.call(SkillCommand::WalkToBallAndKickAtGoal)
            })
        })
        .state(SetPlayState::Active, |s| s)
        .state(SetPlayState::Standby, |s| s)
        .build()?;

    CardBuilder::new(NAME)
        .requires(Representation::GameInfo)
        .requires(Representation::OwnTeamInfo)
        .requires(Representation::TeamBehaviorStatus)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::WalkToBallAndKickAtGoal)
        .preconditions(|r| {
            let game = r.game_info()?;
            Ok(r.team_behavior_status()?.role.play_ball
                && game.is_kicking_team(r.own_team_info()?)
                && game.set_play == SetPlay::KickIn)
        })
        .exit_when_not_applicable()
        .states(graph)
        .build()
}
