//! Data-dependency ports
//!
//! A card declares the world-model representations it reads and the skills it
//! calls. The host declares what it actually provides in a `Wiring`; the
//! registry refuses to build when a declared port has no binding.

pub mod reads;
pub mod skills;
pub mod writes;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::error::{CardError, Result};

pub use reads::Reads;
pub use skills::{ActuatorGroup, AvoidanceHint, CommandFrame, KickKind, SkillCommand, SkillKind};
pub use writes::Writes;

/// World-model representations a card may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Representation {
    GameInfo,
    OwnTeamInfo,
    RobotInfo,
    FieldBall,
    RobotPose,
    FieldDimensions,
    DefaultPose,
    TeammateRoles,
    TeamBehaviorStatus,
    TeamData,
    ObstacleModel,
}

impl Representation {
    pub const ALL: [Representation; 11] = [
        Representation::GameInfo,
        Representation::OwnTeamInfo,
        Representation::RobotInfo,
        Representation::FieldBall,
        Representation::RobotPose,
        Representation::FieldDimensions,
        Representation::DefaultPose,
        Representation::TeammateRoles,
        Representation::TeamBehaviorStatus,
        Representation::TeamData,
        Representation::ObstacleModel,
    ];
}

/// Ports declared by one card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ports {
    reads: BTreeSet<Representation>,
    skills: BTreeSet<SkillKind>,
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires(mut self, representation: Representation) -> Self {
        self.reads.insert(representation);
        self
    }

    pub fn calls(mut self, skill: SkillKind) -> Self {
        self.skills.insert(skill);
        self
    }

    pub fn reads(&self) -> &BTreeSet<Representation> {
        &self.reads
    }

    pub fn skills(&self) -> &BTreeSet<SkillKind> {
        &self.skills
    }
}

/// What the enclosing process provides: producers for representations and
/// executable skills
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wiring {
    reads: BTreeSet<Representation>,
    skills: BTreeSet<SkillKind>,
}

impl Wiring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every representation and every skill bound
    pub fn full() -> Self {
        Self {
            reads: Representation::ALL.into_iter().collect(),
            skills: SkillKind::ALL.into_iter().collect(),
        }
    }

    pub fn provide(mut self, representation: Representation) -> Self {
        self.reads.insert(representation);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillKind>) -> Self {
        self.skills.extend(skills);
        self
    }

    pub fn with_representations(
        mut self,
        representations: impl IntoIterator<Item = Representation>,
    ) -> Self {
        self.reads.extend(representations);
        self
    }

    /// Check that every port `card` declares has a binding
    pub fn bind(&self, card: &'static str, ports: &Ports) -> Result<()> {
        if let Some(port) = ports.reads.iter().find(|r| !self.reads.contains(r)) {
            return Err(CardError::UnboundReadPort { card, port: *port });
        }
        if let Some(skill) = ports.skills.iter().find(|s| !self.skills.contains(s)) {
            return Err(CardError::UnboundSkill {
                card,
                skill: *skill,
            });
        }
        Ok(())
    }
}
