//! Leaf cards for set plays, kickoffs and open play
//!
//! Each card declares exactly the representations it reads and the skills it
//! calls, and publishes its activity to teammates every tick.

pub mod chase_ball;
pub mod opp_goal_free_kick;
pub mod opp_kickoff;
pub mod own_kick_in;
pub mod ready_own_kickoff;
pub mod stand_fallback;

pub use chase_ball::{chase_ball_card, ChaseState};
pub use opp_goal_free_kick::opp_goal_free_kick_card;
pub use opp_kickoff::{opp_kickoff_card, KickoffState};
pub use own_kick_in::own_kick_in_card;
pub use ready_own_kickoff::ready_own_kickoff_card;
pub use stand_fallback::stand_fallback_card;

use crate::arbiter::RegistryBuilder;
use crate::core::config::BehaviorConfig;
use crate::core::error::Result;
use crate::fsm::StateId;

/// States of the free kick cards: position once, then hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetPlayState {
    Init,
    Active,
    Standby,
}

impl StateId for SetPlayState {
    fn name(self) -> &'static str {
        match self {
            SetPlayState::Init => "init",
            SetPlayState::Active => "active",
            SetPlayState::Standby => "standby",
        }
    }
}

/// The match registry in priority order
pub fn standard_registry(config: &BehaviorConfig) -> Result<RegistryBuilder> {
    config.validate()?;

    Ok(RegistryBuilder::new()
        .register(ready_own_kickoff_card(&config.ready_own_kickoff)?)
        .register(opp_kickoff_card(&config.opp_kickoff)?)
        .register(opp_goal_free_kick_card(&config.global)?)
        .register(own_kick_in_card()?)
        .register(chase_ball_card(&config.chase_ball)?)
        .fallback(stand_fallback_card()?))
}
