//! Card Control - Precondition-gated behavior arbitration for soccer robots
//!
//! Cards encode narrow slices of strategy. Every tick the arbiter picks the one
//! card allowed to command the actuators and steps its state machine.

pub mod arbiter;
pub mod card;
pub mod cards;
pub mod control;
pub mod core;
pub mod fsm;
pub mod ports;
pub mod world;
