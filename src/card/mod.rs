//! Cards: behavior units with activation guards and an internal state machine
//!
//! Architecture: Trait + builder
//! - `Card` is the object-safe interface the arbiter drives
//! - `CardBuilder` wires ports, guards and a `StateGraph` into an `FsmCard`

pub mod builder;

pub use builder::{CardBuilder, Execute, FsmCard};

use crate::core::error::CardFault;
use crate::core::types::Tick;
use crate::fsm::StepReport;
use crate::ports::{Ports, Reads, Writes};

/// A behavior the arbiter can activate
///
/// Guards must be pure functions of the declared read ports. Only
/// `execute_step` may touch the card's own state and the skill surface.
pub trait Card: Send {
    fn name(&self) -> &'static str;

    /// Declared read and write ports
    fn ports(&self) -> &Ports;

    /// Entry guard, checked each tick while the card is inactive
    fn preconditions(&self, reads: &Reads<'_>) -> Result<bool, CardFault>;

    /// Exit guard, checked each tick while the card is active
    fn postconditions(&self, reads: &Reads<'_>) -> Result<bool, CardFault>;

    /// True when the precondition is constant true
    fn is_catch_all(&self) -> bool {
        false
    }

    /// Restart the state machine at its initial state
    fn reset(&mut self, now: Tick);

    /// One transition + action cycle of the state machine
    fn execute_step(
        &mut self,
        now: Tick,
        reads: &Reads<'_>,
        writes: &mut Writes<'_>,
    ) -> Result<StepReport, CardFault>;

    /// Name of the state the cursor is in
    fn current_state(&self) -> &'static str;

    fn initial_state(&self) -> &'static str;
}
