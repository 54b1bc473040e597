//! Ready state before our own kickoff: offense lines up behind the ball
//!
//! The n-th offense player (right-most first) takes the n-th configured
//! target. Everyone else walks a bit in front of its default position.

use crate::card::{CardBuilder, Execute, FsmCard};
use crate::core::config::ReadyOwnKickoffParams;
use crate::core::error::Result;
use crate::core::types::normalize_angle;
use crate::fsm::StateGraph;
use crate::ports::{Representation, SkillCommand, SkillKind};
use crate::world::{Activity, GameState};

pub const NAME: &str = "ready_own_kickoff";

pub fn ready_own_kickoff_card(params: &ReadyOwnKickoffParams) -> Result<FsmCard<Execute, ()>> {
    let params = params.clone();

    let graph = StateGraph::<Execute, ()>::builder(NAME)
        .every_tick(|_, _, w| w.call(SkillCommand::Activity(Activity::DefaultBehavior)))
        .initial_state(Execute, move |s| {
            s.action(move |r, _, w| {
                let home = r.default_pose()?.own_default_pose;
                let robot = r.robot_pose()?;
                let slot = r
                    .teammate_roles()?
                    .offense_role_index(r.robot_info()?.number)
                    .and_then(|i| params.offense_targets.get(i));
                let target = match slot {
                    Some(target) => *target,
                    None => home.translation + params.default_offset,
                };

                w.call(SkillCommand::LookActive)?;
                w.call(SkillCommand::walk_to_point(
                    robot.to_relative(target),
                    normalize_angle(home.rotation - robot.rotation()),
                    params.speed_ratio,
                ))
            })
        })
        .build()?;

    CardBuilder::new(NAME)
        .requires(Representation::GameInfo)
        .requires(Representation::OwnTeamInfo)
        .requires(Representation::RobotInfo)
        .requires(Representation::RobotPose)
        .requires(Representation::DefaultPose)
        .requires(Representation::TeammateRoles)
        .calls(SkillKind::Activity)
        .calls(SkillKind::LookActive)
        .calls(SkillKind::WalkToPoint)
        .preconditions(|r| {
            let game = r.game_info()?;
            Ok(game.is_kicking_team(r.own_team_info()?) && game.state == GameState::Ready)
        })
        .exit_when_not_applicable()
        .states(graph)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::testing;
    use crate::core::types::{Pose2, Vec2};
    use crate::world::{RobotPose, TeammateRoles, WorldSnapshot};

    fn ready_snapshot(number: u8) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::default();
        snapshot.own_team_info.team_number = 5;
        snapshot.game_info.kicking_team = 5;
        snapshot.game_info.state = GameState::Ready;
        snapshot.robot_info.number = number;
        snapshot.teammate_roles = TeammateRoles {
            offense: vec![4, 5, 6],
            defense: vec![2, 3],
            goal_keeper: Some(1),
        };
        snapshot.default_pose.own_default_pose = Pose2::new(0.0, Vec2::new(-3000.0, 0.0));
        snapshot
    }

    fn walk_target(number: u8) -> Pose2 {
        let mut card = ready_own_kickoff_card(&ReadyOwnKickoffParams::default()).unwrap();
        let (_, frame) = testing::step(&mut card, 1, &ready_snapshot(number)).unwrap();
        assert_eq!(frame.head(), Some(&SkillCommand::LookActive));
        match frame.body() {
            Some(SkillCommand::WalkToPoint {
                target,
                speed_ratio,
                ..
            }) => {
                assert_eq!(*speed_ratio, 1.0);
                *target
            }
            other => panic!("expected WalkToPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_applies_in_ready_for_own_kickoff() {
        let card = ready_own_kickoff_card(&ReadyOwnKickoffParams::default()).unwrap();
        assert!(testing::applies(&card, &ready_snapshot(4)));

        let mut set = ready_snapshot(4);
        set.game_info.state = GameState::Set;
        assert!(!testing::applies(&card, &set));
        assert!(testing::finished(&card, &set));
    }

    #[test]
    fn test_offense_index_picks_target() {
        // Robot stands at the origin facing forward, so relative equals absolute
        assert_eq!(walk_target(4).translation, Vec2::new(-500.0, 0.0));
        assert_eq!(walk_target(5).translation, Vec2::new(-700.0, -2000.0));
        assert_eq!(walk_target(6).translation, Vec2::new(-700.0, 2000.0));
    }

    #[test]
    fn test_other_roles_step_ahead_of_default_pose() {
        assert_eq!(walk_target(2).translation, Vec2::new(-2550.0, 0.0));
    }

    #[test]
    fn test_target_is_relative_to_robot() {
        let mut card = ready_own_kickoff_card(&ReadyOwnKickoffParams::default()).unwrap();
        let mut snapshot = ready_snapshot(4);
        snapshot.robot_pose = RobotPose::new(0.0, Vec2::new(-1500.0, 1000.0));

        let (_, frame) = testing::step(&mut card, 1, &snapshot).unwrap();
        match frame.body() {
            Some(SkillCommand::WalkToPoint { target, .. }) => {
                assert_eq!(target.translation, Vec2::new(1000.0, -1000.0));
            }
            other => panic!("expected WalkToPoint, got {:?}", other),
        }
    }
}
