//! Host glue: feeds snapshots to the arbiter and hands frames to the skill surface

use std::collections::{BTreeMap, BTreeSet};

use crate::arbiter::{Arbiter, RegistryBuilder, TickOutcome};
use crate::core::error::Result;
use crate::ports::{ActuatorGroup, CommandFrame, Representation, SkillCommand, SkillKind, Wiring};
use crate::world::WorldSnapshot;

/// Executes skill commands on the robot
///
/// `submit` must not block; completion shows up in later snapshots.
pub trait SkillSurface {
    /// Skills this surface can execute
    fn capabilities(&self) -> BTreeSet<SkillKind>;

    fn submit(&mut self, frame: &CommandFrame);
}

const GROUP_ORDER: [ActuatorGroup; 3] = [
    ActuatorGroup::Status,
    ActuatorGroup::Head,
    ActuatorGroup::Body,
];

/// Last commanded output per actuator group
///
/// A group the active card left alone this tick keeps its previous command.
#[derive(Debug, Clone)]
pub struct CommandLatch {
    held: BTreeMap<ActuatorGroup, SkillCommand>,
}

impl Default for CommandLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLatch {
    /// Latch holding the safe default frame
    pub fn new() -> Self {
        let held = CommandFrame::safe()
            .commands()
            .iter()
            .map(|c| (c.group(), c.clone()))
            .collect();
        Self { held }
    }

    /// Overlay this tick's frame on the held outputs and return the complete command
    pub fn apply(&mut self, frame: &CommandFrame) -> CommandFrame {
        for command in frame.commands() {
            self.held.insert(command.group(), command.clone());
        }
        self.current()
    }

    /// Complete command currently held, status first
    pub fn current(&self) -> CommandFrame {
        let mut frame = CommandFrame::new();
        for group in GROUP_ORDER {
            if let Some(command) = self.held.get(&group) {
                frame.push(command.clone());
            }
        }
        frame
    }

    pub fn held(&self, group: ActuatorGroup) -> Option<&SkillCommand> {
        self.held.get(&group)
    }
}

/// Fixed-period loop body: arbitrate, latch, submit
pub struct ControlLoop<S> {
    arbiter: Arbiter,
    surface: S,
    latch: CommandLatch,
}

impl<S: SkillSurface> ControlLoop<S> {
    /// Bind the registry against the surface's skills and the produced representations
    pub fn new(
        registry: RegistryBuilder,
        surface: S,
        produced: impl IntoIterator<Item = Representation>,
    ) -> Result<Self> {
        let wiring = Wiring::new()
            .with_representations(produced)
            .with_skills(surface.capabilities());
        let arbiter = registry.build(&wiring)?;
        tracing::info!(
            "Control loop ready: cards {:?}, fallback {:?}",
            arbiter.card_names(),
            arbiter.fallback_name()
        );

        Ok(Self {
            arbiter,
            surface,
            latch: CommandLatch::new(),
        })
    }

    /// One control tick
    pub fn run_tick(&mut self, snapshot: &WorldSnapshot) -> TickOutcome {
        let outcome = self.arbiter.tick(snapshot);
        let issued = self.latch.apply(&outcome.frame);
        self.surface.submit(&issued);
        outcome
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn latch(&self) -> &CommandLatch {
        &self.latch
    }
}

/// Surface that executes every skill by remembering what it was told
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    submitted: Vec<CommandFrame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &[CommandFrame] {
        &self.submitted
    }

    pub fn last(&self) -> Option<&CommandFrame> {
        self.submitted.last()
    }
}

impl SkillSurface for RecordingSurface {
    fn capabilities(&self) -> BTreeSet<SkillKind> {
        SkillKind::ALL.into_iter().collect()
    }

    fn submit(&mut self, frame: &CommandFrame) {
        self.submitted.push(frame.clone());
    }
}
