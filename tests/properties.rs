//! Property tests: arbitration over random snapshot sequences is deterministic
//! and never runs more than one card per tick.

use card_control::arbiter::{Arbiter, Resolution};
use card_control::card::Card;
use card_control::cards::{
    chase_ball_card, opp_goal_free_kick_card, opp_kickoff_card, own_kick_in_card,
    ready_own_kickoff_card, standard_registry,
};
use card_control::core::config::BehaviorConfig;
use card_control::core::types::Vec2;
use card_control::ports::{Reads, Wiring};
use card_control::world::{
    GameState, Obstacle, ObstacleKind, SetPlay, TeamActivity, TeammateRoles, WorldSnapshot,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_game_state() -> impl Strategy<Value = GameState> {
    prop_oneof![
        Just(GameState::Initial),
        Just(GameState::Ready),
        Just(GameState::Set),
        Just(GameState::Playing),
        Just(GameState::Finished),
    ]
}

fn arb_set_play() -> impl Strategy<Value = SetPlay> {
    prop_oneof![
        3 => Just(SetPlay::None),
        1 => Just(SetPlay::GoalKick),
        1 => Just(SetPlay::KickIn),
        1 => Just(SetPlay::CornerKick),
    ]
}

prop_compose! {
    fn arb_snapshot()(
        state in arb_game_state(),
        set_play in arb_set_play(),
        own_kick in any::<bool>(),
        number in 1u8..=6,
        ball_x in -4500.0f32..4500.0,
        ball_y in -3000.0f32..3000.0,
        seen_ms in prop_oneof![Just(0u32), 0u32..10_000],
        secs_remaining in 560i32..=600,
        play_ball in any::<bool>(),
        opponent_at in 200.0f32..2000.0,
        sparse in any::<bool>(),
    ) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::default();
        snapshot.own_team_info.team_number = 5;
        snapshot.game_info.state = state;
        snapshot.game_info.set_play = set_play;
        snapshot.game_info.kicking_team = if own_kick { 5 } else { 9 };
        snapshot.game_info.secs_remaining = secs_remaining;
        snapshot.robot_info.number = number;
        snapshot.teammate_roles = TeammateRoles {
            offense: vec![4, 5, 6],
            defense: vec![2, 3],
            goal_keeper: Some(1),
        };
        snapshot.field_ball.position_on_field = Vec2::new(ball_x, ball_y);
        snapshot.field_ball.end_position_on_field = Vec2::new(ball_x * 0.9, ball_y);
        snapshot.field_ball.time_since_last_seen_ms = seen_ms;
        snapshot.team_behavior_status.role.play_ball = play_ball;
        if sparse {
            snapshot.team_behavior_status.team_activity = TeamActivity::SparseGame;
        }
        snapshot.obstacle_model.obstacles.push(Obstacle {
            center: Vec2::new(opponent_at, 0.0),
            kind: ObstacleKind::Opponent,
        });
        snapshot
    }
}

fn standard_arbiter() -> Arbiter {
    standard_registry(&BehaviorConfig::default())
        .unwrap()
        .build(&Wiring::full())
        .unwrap()
}

fn standard_cards() -> Vec<Box<dyn Card>> {
    let config = BehaviorConfig::default();
    vec![
        Box::new(ready_own_kickoff_card(&config.ready_own_kickoff).unwrap()),
        Box::new(opp_kickoff_card(&config.opp_kickoff).unwrap()),
        Box::new(opp_goal_free_kick_card(&config.global).unwrap()),
        Box::new(own_kick_in_card().unwrap()),
        Box::new(chase_ball_card(&config.chase_ball).unwrap()),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// The same registry fed the same snapshots makes the same decisions.
    #[test]
    fn replay_gives_identical_decisions(
        snapshots in prop::collection::vec(arb_snapshot(), 1..60),
    ) {
        let mut first = standard_arbiter();
        let mut second = standard_arbiter();

        for snapshot in &snapshots {
            let a = first.tick(snapshot);
            let b = second.tick(snapshot);
            prop_assert_eq!(a.decision(), b.decision());
            prop_assert_eq!(a.frame, b.frame);
        }
        prop_assert_eq!(first.stats(), second.stats());
    }

    /// Exactly one card runs every tick and it is the one the arbiter reports as active.
    #[test]
    fn one_card_runs_per_tick(
        snapshots in prop::collection::vec(arb_snapshot(), 1..60),
    ) {
        let mut arbiter = standard_arbiter();
        let mut registered = arbiter.card_names();
        registered.extend(arbiter.fallback_name());

        for snapshot in &snapshots {
            let outcome = arbiter.tick(snapshot);
            prop_assert!(outcome.fault.is_none());
            prop_assert_ne!(outcome.resolution, Resolution::SafeDefault);

            let active = outcome.active.expect("standard registry always has a card");
            prop_assert!(registered.contains(&active));
            prop_assert_eq!(arbiter.active_card(), Some(active));
            prop_assert_eq!(arbiter.active_state(), outcome.state);
            prop_assert!(outcome.frame.activity().is_some());
        }
    }

    /// Guards give the same answer however often they are asked within a tick.
    #[test]
    fn guards_are_idempotent(snapshot in arb_snapshot()) {
        for card in standard_cards() {
            let reads = Reads::new(card.name(), card.ports().reads(), &snapshot);
            let pre = card.preconditions(&reads).unwrap();
            let post = card.postconditions(&reads).unwrap();
            for _ in 0..3 {
                prop_assert_eq!(card.preconditions(&reads).unwrap(), pre);
                prop_assert_eq!(card.postconditions(&reads).unwrap(), post);
            }
            prop_assert_eq!(post, !pre);
        }
    }

    /// An active card whose exit condition does not hold keeps running
    /// without being reset.
    #[test]
    fn kept_card_is_never_reset(snapshot in arb_snapshot()) {
        let mut arbiter = standard_arbiter();
        arbiter.tick(&snapshot);
        let outcome = arbiter.tick(&snapshot);
        if outcome.resolution == Resolution::Kept {
            prop_assert!(!outcome.activated);
        }
        prop_assert_eq!(arbiter.stats().activations, 1);
    }
}
