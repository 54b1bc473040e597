//! Skill commands a card can issue in one tick
//!
//! The set is closed: hosts dispatch on `SkillCommand` through a `SkillSurface`
//! instead of looking skills up by name at runtime.

use serde::{Deserialize, Serialize};

use crate::core::types::{Angle, Pose2, Vec2};
use crate::world::Activity;

/// Actuators that a single tick may command at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActuatorGroup {
    Head,
    Body,
    /// Behavior status broadcast to teammates
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    Activity,
    Stand,
    LookForward,
    LookActive,
    WalkToPose,
    WalkToPoint,
    WalkAtRelativeSpeed,
    GoToBallAndKick,
    GoToBallAndDribble,
    WalkToBallAndKickAtGoal,
}

impl SkillKind {
    pub const ALL: [SkillKind; 10] = [
        SkillKind::Activity,
        SkillKind::Stand,
        SkillKind::LookForward,
        SkillKind::LookActive,
        SkillKind::WalkToPose,
        SkillKind::WalkToPoint,
        SkillKind::WalkAtRelativeSpeed,
        SkillKind::GoToBallAndKick,
        SkillKind::GoToBallAndDribble,
        SkillKind::WalkToBallAndKickAtGoal,
    ];

    pub fn group(self) -> ActuatorGroup {
        match self {
            SkillKind::Activity => ActuatorGroup::Status,
            SkillKind::LookForward | SkillKind::LookActive => ActuatorGroup::Head,
            SkillKind::Stand
            | SkillKind::WalkToPose
            | SkillKind::WalkToPoint
            | SkillKind::WalkAtRelativeSpeed
            | SkillKind::GoToBallAndKick
            | SkillKind::GoToBallAndDribble
            | SkillKind::WalkToBallAndKickAtGoal => ActuatorGroup::Body,
        }
    }

    /// Skills where a second call in the same tick replaces the first
    pub fn allows_overwrite(self) -> bool {
        matches!(self, SkillKind::Activity)
    }
}

/// How the walk skill should treat obstacles on the way to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceHint {
    pub enabled: bool,
    /// Plan around obstacles coarsely; fine avoidance is left to the walk engine
    pub rough_position: bool,
    pub disable_near_obstacle_avoidance: bool,
}

impl AvoidanceHint {
    pub fn rough() -> Self {
        Self {
            enabled: true,
            rough_position: true,
            disable_near_obstacle_avoidance: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickKind {
    ForwardFastLeft,
    ForwardFastRight,
    WalkForwardsLeft,
    WalkForwardsRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillCommand {
    Activity(Activity),
    Stand,
    LookForward,
    LookActive,
    WalkToPose {
        /// Target relative to the robot
        target: Pose2,
        speed: Pose2,
        avoidance: AvoidanceHint,
        keep_target_rotation: bool,
    },
    WalkToPoint {
        /// Target relative to the robot
        target: Pose2,
        speed_ratio: f32,
        rough: bool,
    },
    /// Walk with a speed ratio per axis, no target
    WalkAtRelativeSpeed(Pose2),
    GoToBallAndKick {
        target_direction: Angle,
        kick: KickKind,
    },
    GoToBallAndDribble {
        target_direction: Angle,
        align_precisely: bool,
    },
    WalkToBallAndKickAtGoal,
}

impl SkillCommand {
    pub fn kind(&self) -> SkillKind {
        match self {
            SkillCommand::Activity(_) => SkillKind::Activity,
            SkillCommand::Stand => SkillKind::Stand,
            SkillCommand::LookForward => SkillKind::LookForward,
            SkillCommand::LookActive => SkillKind::LookActive,
            SkillCommand::WalkToPose { .. } => SkillKind::WalkToPose,
            SkillCommand::WalkToPoint { .. } => SkillKind::WalkToPoint,
            SkillCommand::WalkAtRelativeSpeed(_) => SkillKind::WalkAtRelativeSpeed,
            SkillCommand::GoToBallAndKick { .. } => SkillKind::GoToBallAndKick,
            SkillCommand::GoToBallAndDribble { .. } => SkillKind::GoToBallAndDribble,
            SkillCommand::WalkToBallAndKickAtGoal => SkillKind::WalkToBallAndKickAtGoal,
        }
    }

    pub fn group(&self) -> ActuatorGroup {
        self.kind().group()
    }

    pub fn walk_to_point(target: Vec2, rotation: Angle, speed_ratio: f32) -> Self {
        SkillCommand::WalkToPoint {
            target: Pose2::new(rotation, target),
            speed_ratio,
            rough: true,
        }
    }
}

/// Commands committed for one tick, in call order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    commands: Vec<SkillCommand>,
}

impl CommandFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_commands(commands: Vec<SkillCommand>) -> Self {
        Self { commands }
    }

    /// Stand still and look ahead; issued whenever a tick cannot produce anything better
    pub fn safe() -> Self {
        Self {
            commands: vec![
                SkillCommand::Activity(Activity::SafeDefault),
                SkillCommand::LookForward,
                SkillCommand::Stand,
            ],
        }
    }

    pub fn commands(&self) -> &[SkillCommand] {
        &self.commands
    }

    pub fn kinds(&self) -> Vec<SkillKind> {
        self.commands.iter().map(|c| c.kind()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn for_group(&self, group: ActuatorGroup) -> Option<&SkillCommand> {
        self.commands.iter().find(|c| c.group() == group)
    }

    pub fn body(&self) -> Option<&SkillCommand> {
        self.for_group(ActuatorGroup::Body)
    }

    pub fn head(&self) -> Option<&SkillCommand> {
        self.for_group(ActuatorGroup::Head)
    }

    pub fn activity(&self) -> Option<Activity> {
        self.commands.iter().find_map(|c| match c {
            SkillCommand::Activity(a) => Some(*a),
            _ => None,
        })
    }

    pub(crate) fn push(&mut self, command: SkillCommand) {
        self.commands.push(command);
    }
}
