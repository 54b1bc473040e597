use thiserror::Error;

use crate::ports::{ActuatorGroup, Representation, SkillKind};

/// Configuration errors. The control loop refuses to start when one of these is raised.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Card '{card}' requires {port:?} but no producer is wired for it")]
    UnboundReadPort {
        card: &'static str,
        port: Representation,
    },

    #[error("Card '{card}' calls {skill:?} but the skill surface does not provide it")]
    UnboundSkill { card: &'static str, skill: SkillKind },

    #[error("Registry has no cards")]
    EmptyRegistry,

    #[error("Card '{0}' registered twice")]
    DuplicateCard(&'static str),

    #[error("Registry has neither a fallback card nor a catch-all card")]
    NoFallback,

    #[error("State graph of '{0}' has no initial state")]
    NoInitialState(&'static str),

    #[error("State graph of '{owner}' declares a second initial state '{state}'")]
    MultipleInitialStates {
        owner: &'static str,
        state: &'static str,
    },

    #[error("State graph of '{owner}' declares state '{state}' twice")]
    DuplicateState {
        owner: &'static str,
        state: &'static str,
    },

    #[error("State graph of '{owner}': transition '{guard}' in '{from}' targets undeclared state '{to}'")]
    UnknownTransitionTarget {
        owner: &'static str,
        from: &'static str,
        guard: &'static str,
        to: &'static str,
    },

    #[error("Card '{0}' has no precondition")]
    MissingPrecondition(&'static str),

    #[error("Card '{0}' has no postcondition")]
    MissingPostcondition(&'static str),

    #[error("Card '{0}' has no state graph")]
    MissingStateGraph(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CardError>;

/// Faults raised while evaluating a guard or running an action.
///
/// These are local to one tick: the arbiter logs them and resolves the tick to the fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardFault {
    #[error("Card '{card}' read {port:?} without declaring it")]
    UndeclaredRead {
        card: &'static str,
        port: Representation,
    },

    #[error("Card '{card}' called {skill:?} without declaring it")]
    UndeclaredSkill { card: &'static str, skill: SkillKind },

    #[error("Card '{card}' called {skill:?} twice in one tick")]
    DuplicateCommand { card: &'static str, skill: SkillKind },

    #[error("Card '{card}' commanded {group:?} with both {first:?} and {second:?}")]
    ActuatorConflict {
        card: &'static str,
        group: ActuatorGroup,
        first: SkillKind,
        second: SkillKind,
    },

    #[error("Precondition of '{card}' failed: {reason}")]
    Precondition { card: &'static str, reason: String },

    #[error("Postcondition of '{card}' failed: {reason}")]
    Postcondition { card: &'static str, reason: String },

    #[error("Guard '{guard}' in state '{state}' failed: {reason}")]
    Guard {
        state: &'static str,
        guard: &'static str,
        reason: String,
    },

    #[error("Action of state '{state}' failed: {reason}")]
    Action { state: &'static str, reason: String },

    #[error("{0}")]
    Other(String),
}

impl CardFault {
    /// Free-form fault for guard and action bodies
    pub fn other(reason: impl Into<String>) -> Self {
        CardFault::Other(reason.into())
    }
}
