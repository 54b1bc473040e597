//! State machine instance: a cursor into a `StateGraph` plus card-local scratch

use crate::core::error::CardFault;
use crate::core::types::Tick;
use crate::fsm::graph::{StateGraph, StateId};
use crate::ports::{Reads, Writes};

/// Position of a state machine: current state and how long it has been there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<S> {
    state: S,
    entered_at: Tick,
    ticks_in_state: u64,
}

impl<S: StateId> Cursor<S> {
    pub fn new(state: S, now: Tick) -> Self {
        Self {
            state,
            entered_at: now,
            ticks_in_state: 0,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// Tick at which the current state was entered
    pub fn entered_at(&self) -> Tick {
        self.entered_at
    }

    /// Completed steps spent in the current state
    pub fn ticks_in_state(&self) -> u64 {
        self.ticks_in_state
    }

    fn advance(self, target: S, now: Tick) -> Self {
        if target == self.state {
            Self {
                ticks_in_state: self.ticks_in_state + 1,
                ..self
            }
        } else {
            Self::new(target, now)
        }
    }
}

/// What happens to card scratch when the machine is reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Scratch goes back to its default value together with the cursor
    #[default]
    Fresh,
    /// Scratch survives reactivation; only the cursor restarts. A step that
    /// faulted still clears it on the next reset.
    KeepScratch,
}

/// Outcome of one step, by state name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub from: &'static str,
    pub to: &'static str,
    /// Guard that selected the target, `None` when no guard held
    pub guard: Option<&'static str>,
}

impl StepReport {
    pub fn transitioned(&self) -> bool {
        self.from != self.to
    }
}

/// Running instance of a state graph
pub struct StateMachine<S, L> {
    graph: StateGraph<S, L>,
    cursor: Cursor<S>,
    scratch: L,
    policy: ResetPolicy,
    /// Set when a step faulted after the action may have touched scratch
    stale: bool,
}

impl<S: StateId, L: Default> StateMachine<S, L> {
    pub fn new(graph: StateGraph<S, L>) -> Self {
        Self::with_policy(graph, ResetPolicy::Fresh)
    }

    pub fn with_policy(graph: StateGraph<S, L>, policy: ResetPolicy) -> Self {
        let cursor = Cursor::new(graph.initial(), 0);
        Self {
            graph,
            cursor,
            scratch: L::default(),
            policy,
            stale: false,
        }
    }

    /// Back to the initial state; scratch per reset policy
    pub fn reset(&mut self, now: Tick) {
        self.cursor = Cursor::new(self.graph.initial(), now);
        if self.policy == ResetPolicy::Fresh || self.stale {
            self.scratch = L::default();
            self.stale = false;
        }
    }

    /// One transition + action cycle
    ///
    /// The action is the one of the state selected by this tick's transition
    /// phase. The cursor only moves when both phases succeed. Scratch writes
    /// made before a failing action are not rolled back; the scratch is marked
    /// stale instead and the next reset discards it under either policy.
    pub fn step(
        &mut self,
        now: Tick,
        reads: &Reads<'_>,
        writes: &mut Writes<'_>,
    ) -> Result<StepReport, CardFault> {
        let choice = self.graph.next_state(&self.cursor, &self.scratch, reads)?;
        if let Err(fault) = self
            .graph
            .run_action(choice.target, reads, &mut self.scratch, writes)
        {
            self.stale = true;
            return Err(fault);
        }

        let from = self.cursor.state();
        self.cursor = self.cursor.advance(choice.target, now);

        Ok(StepReport {
            from: from.name(),
            to: choice.target.name(),
            guard: choice.guard,
        })
    }

    pub fn state(&self) -> S {
        self.cursor.state()
    }

    pub fn cursor(&self) -> &Cursor<S> {
        &self.cursor
    }

    pub fn scratch(&self) -> &L {
        &self.scratch
    }

    pub fn graph(&self) -> &StateGraph<S, L> {
        &self.graph
    }
}
