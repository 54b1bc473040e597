//! Registration API for cards

use crate::card::Card;
use crate::core::error::{CardError, CardFault, Result};
use crate::core::types::Tick;
use crate::fsm::{ResetPolicy, StateGraph, StateId, StateMachine, StepReport};
use crate::ports::{Ports, Reads, Representation, SkillKind, Writes};

type Predicate = Box<dyn Fn(&Reads<'_>) -> std::result::Result<bool, CardFault> + Send>;

enum Precondition {
    Always,
    When(Predicate),
}

enum Postcondition {
    /// Exit as soon as the precondition no longer holds
    NotApplicable,
    When(Predicate),
}

/// State id for cards that do the same thing every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Execute;

impl StateId for Execute {
    fn name(self) -> &'static str {
        "execute"
    }
}

/// Card driven by a `StateGraph`
pub struct FsmCard<S, L> {
    name: &'static str,
    ports: Ports,
    precondition: Precondition,
    postcondition: Postcondition,
    machine: StateMachine<S, L>,
}

impl<S: StateId, L: Default> FsmCard<S, L> {
    pub fn machine(&self) -> &StateMachine<S, L> {
        &self.machine
    }

    fn check_precondition(&self, reads: &Reads<'_>) -> std::result::Result<bool, CardFault> {
        match &self.precondition {
            Precondition::Always => Ok(true),
            Precondition::When(f) => f(reads).map_err(|fault| match fault {
                CardFault::Other(reason) => CardFault::Precondition {
                    card: self.name,
                    reason,
                },
                other => other,
            }),
        }
    }

    fn check_postcondition(&self, reads: &Reads<'_>) -> std::result::Result<bool, CardFault> {
        let finished = match (&self.postcondition, &self.precondition) {
            (Postcondition::NotApplicable, Precondition::Always) => return Ok(false),
            (Postcondition::NotApplicable, Precondition::When(f)) => {
                f(reads).map(|applies| !applies)
            }
            (Postcondition::When(f), _) => f(reads),
        };
        finished.map_err(|fault| match fault {
            CardFault::Other(reason) => CardFault::Postcondition {
                card: self.name,
                reason,
            },
            other => other,
        })
    }
}

impl<S: StateId, L: Default + Send + 'static> Card for FsmCard<S, L> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn preconditions(&self, reads: &Reads<'_>) -> std::result::Result<bool, CardFault> {
        self.check_precondition(reads)
    }

    fn postconditions(&self, reads: &Reads<'_>) -> std::result::Result<bool, CardFault> {
        self.check_postcondition(reads)
    }

    fn is_catch_all(&self) -> bool {
        matches!(self.precondition, Precondition::Always)
    }

    fn reset(&mut self, now: Tick) {
        self.machine.reset(now);
    }

    fn execute_step(
        &mut self,
        now: Tick,
        reads: &Reads<'_>,
        writes: &mut Writes<'_>,
    ) -> std::result::Result<StepReport, CardFault> {
        self.machine.step(now, reads, writes)
    }

    fn current_state(&self) -> &'static str {
        self.machine.state().name()
    }

    fn initial_state(&self) -> &'static str {
        self.machine.graph().initial().name()
    }
}

/// Builder replacing per-card boilerplate: ports, guards, state graph
pub struct CardBuilder<S, L> {
    name: &'static str,
    ports: Ports,
    precondition: Option<Precondition>,
    postcondition: Option<Postcondition>,
    policy: ResetPolicy,
    graph: Option<StateGraph<S, L>>,
}

impl<S: StateId, L: Default + Send + 'static> CardBuilder<S, L> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ports: Ports::new(),
            precondition: None,
            postcondition: None,
            policy: ResetPolicy::Fresh,
            graph: None,
        }
    }

    pub fn requires(mut self, representation: Representation) -> Self {
        self.ports = self.ports.requires(representation);
        self
    }

    pub fn calls(mut self, skill: SkillKind) -> Self {
        self.ports = self.ports.calls(skill);
        self
    }

    pub fn preconditions<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Reads<'_>) -> std::result::Result<bool, CardFault> + Send + 'static,
    {
        self.precondition = Some(Precondition::When(Box::new(predicate)));
        self
    }

    /// Constant true precondition: the card can always run
    pub fn always(mut self) -> Self {
        self.precondition = Some(Precondition::Always);
        self
    }

    pub fn postconditions<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Reads<'_>) -> std::result::Result<bool, CardFault> + Send + 'static,
    {
        self.postcondition = Some(Postcondition::When(Box::new(predicate)));
        self
    }

    /// Postcondition is the negated precondition
    pub fn exit_when_not_applicable(mut self) -> Self {
        self.postcondition = Some(Postcondition::NotApplicable);
        self
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn states(mut self, graph: StateGraph<S, L>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn build(self) -> Result<FsmCard<S, L>> {
        let precondition = self
            .precondition
            .ok_or(CardError::MissingPrecondition(self.name))?;
        let postcondition = self
            .postcondition
            .ok_or(CardError::MissingPostcondition(self.name))?;
        let graph = self.graph.ok_or(CardError::MissingStateGraph(self.name))?;

        Ok(FsmCard {
            name: self.name,
            ports: self.ports,
            precondition,
            postcondition,
            machine: StateMachine::with_policy(graph, self.policy),
        })
    }
}
