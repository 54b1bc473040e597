//! Per-tick read view restricted to a card's declared representations

use std::collections::BTreeSet;

use crate::core::error::CardFault;
use crate::ports::Representation;
use crate::world::{
    DefaultPose, FieldBall, FieldDimensions, GameInfo, ObstacleModel, OwnTeamInfo, RobotInfo,
    RobotPose, TeamBehaviorStatus, TeamData, TeammateRoles, WorldSnapshot,
};

/// Read-only handle into the world snapshot for one card and one tick
///
/// Accessing a representation the card did not declare is a fault, so a
/// card's guards can only depend on the ports it registered.
#[derive(Clone, Copy)]
pub struct Reads<'a> {
    card: &'static str,
    declared: &'a BTreeSet<Representation>,
    snapshot: &'a WorldSnapshot,
}

impl<'a> Reads<'a> {
    pub fn new(
        card: &'static str,
        declared: &'a BTreeSet<Representation>,
        snapshot: &'a WorldSnapshot,
    ) -> Self {
        Self {
            card,
            declared,
            snapshot,
        }
    }

    pub fn card(&self) -> &'static str {
        self.card
    }

    fn check(&self, port: Representation) -> Result<(), CardFault> {
        if self.declared.contains(&port) {
            Ok(())
        } else {
            Err(CardFault::UndeclaredRead {
                card: self.card,
                port,
            })
        }
    }

    pub fn game_info(&self) -> Result<&'a GameInfo, CardFault> {
        self.check(Representation::GameInfo)?;
        Ok(&self.snapshot.game_info)
    }

    pub fn own_team_info(&self) -> Result<&'a OwnTeamInfo, CardFault> {
        self.check(Representation::OwnTeamInfo)?;
        Ok(&self.snapshot.own_team_info)
    }

    pub fn robot_info(&self) -> Result<&'a RobotInfo, CardFault> {
        self.check(Representation::RobotInfo)?;
        Ok(&self.snapshot.robot_info)
    }

    pub fn field_ball(&self) -> Result<&'a FieldBall, CardFault> {
        self.check(Representation::FieldBall)?;
        Ok(&self.snapshot.field_ball)
    }

    pub fn robot_pose(&self) -> Result<&'a RobotPose, CardFault> {
        self.check(Representation::RobotPose)?;
        Ok(&self.snapshot.robot_pose)
    }

    pub fn field_dimensions(&self) -> Result<&'a FieldDimensions, CardFault> {
        self.check(Representation::FieldDimensions)?;
        Ok(&self.snapshot.field_dimensions)
    }

    pub fn default_pose(&self) -> Result<&'a DefaultPose, CardFault> {
        self.check(Representation::DefaultPose)?;
        Ok(&self.snapshot.default_pose)
    }

    pub fn teammate_roles(&self) -> Result<&'a TeammateRoles, CardFault> {
        self.check(Representation::TeammateRoles)?;
        Ok(&self.snapshot.teammate_roles)
    }

    pub fn team_behavior_status(&self) -> Result<&'a TeamBehaviorStatus, CardFault> {
        self.check(Representation::TeamBehaviorStatus)?;
        Ok(&self.snapshot.team_behavior_status)
    }

    pub fn team_data(&self) -> Result<&'a TeamData, CardFault> {
        self.check(Representation::TeamData)?;
        Ok(&self.snapshot.team_data)
    }

    pub fn obstacle_model(&self) -> Result<&'a ObstacleModel, CardFault> {
        self.check(Representation::ObstacleModel)?;
        Ok(&self.snapshot.obstacle_model)
    }
}
