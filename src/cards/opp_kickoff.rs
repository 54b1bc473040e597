//! Opponent kickoff: offense and defense wait until the ball leaves the centre

use crate::card::{CardBuilder, FsmCard};
use crate::core::config::OppKickoffParams;
use crate::core::error::Result;
use crate::fsm::{StateGraph, StateId};
use crate::ports::{Representation, SkillCommand, SkillKind};
use crate::world::{Activity, GameState};

pub const NAME: &str = "opp_kickoff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickoffState {
    Init,
    Forward,
    Back,
}

impl StateId for KickoffState {
    fn name(self) -> &'static str {
        match self {
            KickoffState::Init => "init",
            KickoffState::Forward => "forward",
            KickoffState::Back => "back",
        }
    }
}

pub fn opp_kickoff_card(params: &OppKickoffParams) -> Result<FsmCard<KickoffState, ()>> {
    let threshold = params.ball_kicked_threshold;
    let window = params.kickoff_window_secs;

    let graph = StateGraph::<KickoffState, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::OppKickoff)))
        .initial_state(KickoffState::Init, |s| {
            s.transition("tactical_offense", KickoffState::Forward, |r, _, _| {
                Ok(r.teammate_roles()?.is_tactical_offense(r.robot_info()?.number))
            })
            .transition("tactical_defense", KickoffState::Back, |r, _, _| {
                Ok(r.teammate_roles()?.is_tactical_defense(r.robot_info()?.number))
            })
            .action(|_, _, w| {
                w.call(SkillCommand::LookForward)?;
                w.call(SkillCommand::Stand)
            })
        })
        .state(KickoffState::Forward, |s| {
            s.action(|_, _, w| {
                w.call(SkillCommand::LookForward)?;
                w.call(SkillCommand::Stand)
            })
        })
        .state(KickoffState::Back, |s| {
            s.action(|_, _, w| {
                w.call(SkillCommand::LookForward)?;
                w.call(SkillCommand::Stand)
            })
        })
        .build()?;

    CardBuilder::new(NAME)
        .requires(Representation::GameInfo)
        .requires(Representation::OwnTeamInfo)
        .requires(Representation::FieldBall)
        .requires(Representation::RobotInfo)
        .requires(Representation::TeammateRoles)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::Stand)
        .preconditions(move |r| {
            let game = r.game_info()?;
            let me = r.robot_info()?.number;
            Ok(!game.is_kicking_team(r.own_team_info()?)
                && game.secs_remaining >= window
                && game.state == GameState::Playing
                && r.field_ball()?.position_on_field.norm() < threshold
                && !r.teammate_roles()?.is_tactical_goal_keeper(me))
        })
        .exit_when_not_applicable()
        .states(graph)
        .build()
}
