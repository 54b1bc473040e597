//! State graphs: named states with ordered transition guards and one action each

use ahash::AHashMap;
use std::fmt;
use std::hash::Hash;

use crate::core::error::{CardError, CardFault, Result};
use crate::fsm::machine::Cursor;
use crate::ports::{Reads, Writes};

/// Tagged-variant state identifier
///
/// Cards implement this on a plain enum; the name is what shows up in
/// telemetry and logs.
pub trait StateId: Copy + Eq + Hash + fmt::Debug + Send + 'static {
    fn name(self) -> &'static str;
}

/// Transition guard: pure function of the read ports, the cursor and card scratch
pub type Guard<S, L> =
    Box<dyn Fn(&Reads<'_>, &Cursor<S>, &L) -> std::result::Result<bool, CardFault> + Send>;

/// Action body: issues skill calls and may update card scratch
pub type Action<L> =
    Box<dyn Fn(&Reads<'_>, &mut L, &mut Writes<'_>) -> std::result::Result<(), CardFault> + Send>;

struct TransitionSpec<S, L> {
    name: &'static str,
    target: S,
    guard: Guard<S, L>,
}

/// Declaration of one state, filled in by the closure passed to the graph builder
pub struct StateSpec<S, L> {
    id: S,
    transitions: Vec<TransitionSpec<S, L>>,
    action: Option<Action<L>>,
}

impl<S: StateId, L> StateSpec<S, L> {
    fn new(id: S) -> Self {
        Self {
            id,
            transitions: Vec::new(),
            action: None,
        }
    }

    /// Add a guarded transition; guards are checked in declaration order
    pub fn transition<G>(mut self, name: &'static str, target: S, guard: G) -> Self
    where
        G: Fn(&Reads<'_>, &Cursor<S>, &L) -> std::result::Result<bool, CardFault> + Send + 'static,
    {
        self.transitions.push(TransitionSpec {
            name,
            target,
            guard: Box::new(guard),
        });
        self
    }

    /// Set the action body. A state without one issues nothing of its own.
    pub fn action<A>(mut self, action: A) -> Self
    where
        A: Fn(&Reads<'_>, &mut L, &mut Writes<'_>) -> std::result::Result<(), CardFault>
            + Send
            + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }
}

struct StateNode<S, L> {
    spec: StateSpec<S, L>,
}

/// Result of the transition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionChoice<S> {
    pub target: S,
    /// Guard that fired, `None` when the state is kept
    pub guard: Option<&'static str>,
}

/// Immutable state graph of one card or skill
pub struct StateGraph<S, L> {
    owner: &'static str,
    initial: S,
    nodes: Vec<StateNode<S, L>>,
    index: AHashMap<S, usize>,
    every_tick: Option<Action<L>>,
}

impl<S: StateId, L> StateGraph<S, L> {
    pub fn builder(owner: &'static str) -> GraphBuilder<S, L> {
        GraphBuilder {
            owner,
            initial: Vec::new(),
            nodes: Vec::new(),
            every_tick: None,
        }
    }

    pub fn initial(&self) -> S {
        self.initial
    }

    /// State names in declaration order
    pub fn state_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.spec.id.name()).collect()
    }

    fn node(&self, state: S) -> std::result::Result<&StateNode<S, L>, CardFault> {
        self.index
            .get(&state)
            .map(|i| &self.nodes[*i])
            .ok_or_else(|| CardFault::other(format!("{} has no state {:?}", self.owner, state)))
    }

    /// Transition phase: the first guard that holds picks the target, otherwise
    /// the current state is kept
    pub fn next_state(
        &self,
        cursor: &Cursor<S>,
        scratch: &L,
        reads: &Reads<'_>,
    ) -> std::result::Result<TransitionChoice<S>, CardFault> {
        let node = self.node(cursor.state())?;
        for transition in &node.spec.transitions {
            let holds = (transition.guard)(reads, cursor, scratch).map_err(|fault| match fault {
                CardFault::Other(reason) => CardFault::Guard {
                    state: cursor.state().name(),
                    guard: transition.name,
                    reason,
                },
                other => other,
            })?;
            if holds {
                return Ok(TransitionChoice {
                    target: transition.target,
                    guard: Some(transition.name),
                });
            }
        }
        Ok(TransitionChoice {
            target: cursor.state(),
            guard: None,
        })
    }

    /// Action phase: statements shared by all states first, then the state's own action
    pub fn run_action(
        &self,
        state: S,
        reads: &Reads<'_>,
        scratch: &mut L,
        writes: &mut Writes<'_>,
    ) -> std::result::Result<(), CardFault> {
        let node = self.node(state)?;
        let wrap = |fault: CardFault| match fault {
            CardFault::Other(reason) => CardFault::Action {
                state: state.name(),
                reason,
            },
            other => other,
        };
        if let Some(every_tick) = &self.every_tick {
            every_tick(reads, scratch, writes).map_err(wrap)?;
        }
        if let Some(action) = &node.spec.action {
            action(reads, scratch, writes).map_err(wrap)?;
        }
        Ok(())
    }
}

/// Builder for `StateGraph`; validation happens in `build`
pub struct GraphBuilder<S, L> {
    owner: &'static str,
    initial: Vec<S>,
    nodes: Vec<StateSpec<S, L>>,
    every_tick: Option<Action<L>>,
}

impl<S: StateId, L> GraphBuilder<S, L> {
    pub fn initial_state<F>(mut self, id: S, declare: F) -> Self
    where
        F: FnOnce(StateSpec<S, L>) -> StateSpec<S, L>,
    {
        self.initial.push(id);
        self.nodes.push(declare(StateSpec::new(id)));
        self
    }

    pub fn state<F>(mut self, id: S, declare: F) -> Self
    where
        F: FnOnce(StateSpec<S, L>) -> StateSpec<S, L>,
    {
        self.nodes.push(declare(StateSpec::new(id)));
        self
    }

    /// Statements executed every tick before the active state's action
    pub fn every_tick<A>(mut self, action: A) -> Self
    where
        A: Fn(&Reads<'_>, &mut L, &mut Writes<'_>) -> std::result::Result<(), CardFault>
            + Send
            + 'static,
    {
        self.every_tick = Some(Box::new(action));
        self
    }

    pub fn build(self) -> Result<StateGraph<S, L>> {
        let owner = self.owner;
        let initial = match self.initial.as_slice() {
            [] => return Err(CardError::NoInitialState(owner)),
            [only] => *only,
            [_, second, ..] => {
                return Err(CardError::MultipleInitialStates {
                    owner,
                    state: second.name(),
                })
            }
        };

        let mut index = AHashMap::with_capacity(self.nodes.len());
        for (i, spec) in self.nodes.iter().enumerate() {
            if index.insert(spec.id, i).is_some() {
                return Err(CardError::DuplicateState {
                    owner,
                    state: spec.id.name(),
                });
            }
        }

        for spec in &self.nodes {
            if let Some(t) = spec.transitions.iter().find(|t| !index.contains_key(&t.target)) {
                return Err(CardError::UnknownTransitionTarget {
                    owner,
                    from: spec.id.name(),
                    guard: t.name,
                    to: t.target.name(),
                });
            }
        }

        Ok(StateGraph {
            owner,
            initial,
            nodes: self.nodes.into_iter().map(|spec| StateNode { spec }).collect(),
            index,
            every_tick: self.every_tick,
        })
    }
}
