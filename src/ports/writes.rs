//! Per-tick staging of skill calls

use std::collections::BTreeSet;

use crate::core::error::CardFault;
use crate::ports::skills::{CommandFrame, SkillCommand, SkillKind};

/// Write handle onto the skill surface for one card and one tick
///
/// Calls are staged in order and only become a `CommandFrame` when the whole
/// step succeeded; a faulted step drops them.
pub struct Writes<'a> {
    card: &'static str,
    declared: &'a BTreeSet<SkillKind>,
    staged: Vec<SkillCommand>,
}

impl<'a> Writes<'a> {
    pub fn new(card: &'static str, declared: &'a BTreeSet<SkillKind>) -> Self {
        Self {
            card,
            declared,
            staged: Vec::new(),
        }
    }

    pub fn card(&self) -> &'static str {
        self.card
    }

    /// Issue a skill command for this tick
    pub fn call(&mut self, command: SkillCommand) -> Result<(), CardFault> {
        let kind = command.kind();
        if !self.declared.contains(&kind) {
            return Err(CardFault::UndeclaredSkill {
                card: self.card,
                skill: kind,
            });
        }

        if let Some(pos) = self.staged.iter().position(|c| c.kind() == kind) {
            if kind.allows_overwrite() {
                self.staged[pos] = command;
                return Ok(());
            }
            return Err(CardFault::DuplicateCommand {
                card: self.card,
                skill: kind,
            });
        }

        if let Some(other) = self.staged.iter().find(|c| c.group() == kind.group()) {
            return Err(CardFault::ActuatorConflict {
                card: self.card,
                group: kind.group(),
                first: other.kind(),
                second: kind,
            });
        }

        self.staged.push(command);
        Ok(())
    }

    pub fn staged(&self) -> &[SkillCommand] {
        &self.staged
    }

    pub fn into_frame(self) -> CommandFrame {
        CommandFrame::from_commands(self.staged)
    }
}
