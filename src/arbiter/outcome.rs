//! Per-tick arbitration results and counters

use serde::Serialize;

use crate::core::error::CardFault;
use crate::core::types::Tick;
use crate::ports::CommandFrame;

/// How the active card for a tick was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// Active card's postconditions did not hold; it keeps running
    Kept,
    /// Postconditions held and the same card won the scan again (no reset)
    Reselected,
    /// A different card won the scan and was reset
    Switched,
    /// No card applied, or a fault occurred; the fallback card ran
    Fallback,
    /// Nothing could run; the safe default frame was issued
    SafeDefault,
}

/// Observable result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub tick: Tick,
    /// Card that executed this tick
    pub active: Option<&'static str>,
    /// State the card's cursor is in after the step
    pub state: Option<&'static str>,
    pub resolution: Resolution,
    /// The executing card was reset before its step
    pub activated: bool,
    /// The step changed state
    pub transitioned: bool,
    /// Guard that fired during the step
    pub guard: Option<&'static str>,
    /// Commands committed for this tick
    pub frame: CommandFrame,
    /// Fault raised this tick, already handled
    pub fault: Option<CardFault>,
}

impl TickOutcome {
    pub(crate) fn safe_default(tick: Tick, fault: Option<CardFault>) -> Self {
        Self {
            tick,
            active: None,
            state: None,
            resolution: Resolution::SafeDefault,
            activated: false,
            transitioned: false,
            guard: None,
            frame: CommandFrame::safe(),
            fault,
        }
    }

    /// (card, state) pair, the unit of determinism checks
    pub fn decision(&self) -> (Option<&'static str>, Option<&'static str>) {
        (self.active, self.state)
    }
}

/// Running counters over the arbiter's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArbiterStats {
    pub ticks: u64,
    /// Resets of a card because it became active
    pub activations: u64,
    pub faults: u64,
    pub fallback_ticks: u64,
    pub safe_default_ticks: u64,
}
