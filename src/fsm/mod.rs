//! Hierarchical state-machine runtime shared by cards and nested skills
//!
//! Each step runs in a fixed order:
//! - transition phase: the first holding guard of the current state picks the target
//! - action phase: statements shared by every state, then the target state's action
//! - cursor update: time-in-state restarts on a state change, otherwise counts up
//!
//! A machine only pauses between steps, by staying in a state.

pub mod graph;
pub mod machine;

pub use graph::{Action, GraphBuilder, Guard, StateGraph, StateId, StateSpec, TransitionChoice};
pub use machine::{Cursor, ResetPolicy, StateMachine, StepReport};
