//! Integration tests for the activation protocol

use card_control::arbiter::{Arbiter, Resolution, TickOutcome};
use card_control::card::{Card, CardBuilder, Execute, FsmCard};
use card_control::core::error::{CardError, CardFault};
use card_control::fsm::{ResetPolicy, StateGraph, StateId};
use card_control::ports::{Reads, Representation, SkillCommand, SkillKind, Wiring};
use card_control::world::{SetPlay, WorldSnapshot};

fn snapshot(set_play: SetPlay, kicking_team: u8) -> WorldSnapshot {
    let mut snapshot = WorldSnapshot::default();
    snapshot.own_team_info.team_number = 5;
    snapshot.game_info.kicking_team = kicking_team;
    snapshot.game_info.set_play = set_play;
    snapshot
}

fn standing(name: &'static str) -> StateGraph<Execute, ()> {
    StateGraph::<Execute, ()>::builder(name)
        .initial_state(Execute, |s| s.action(|_, _, w| w.call(SkillCommand::Stand)))
        .build()
        .unwrap()
}

/// Applies while the opponent takes a goal kick
fn card_x() -> FsmCard<Execute, ()> {
    CardBuilder::new("card_x")
        .requires(Representation::GameInfo)
        .requires(Representation::OwnTeamInfo)
        .calls(SkillKind::Stand)
        .preconditions(|r| {
            let game = r.game_info()?;
            Ok(!game.is_kicking_team(r.own_team_info()?) && game.set_play == SetPlay::GoalKick)
        })
        .exit_when_not_applicable()
        .states(standing("card_x"))
        .build()
        .unwrap()
}

fn card_y() -> FsmCard<Execute, ()> {
    CardBuilder::new("card_y")
        .calls(SkillKind::Stand)
        .always()
        .exit_when_not_applicable()
        .states(standing("card_y"))
        .build()
        .unwrap()
}

fn never(name: &'static str) -> FsmCard<Execute, ()> {
    CardBuilder::new(name)
        .calls(SkillKind::Stand)
        .preconditions(|_| Ok(false))
        .exit_when_not_applicable()
        .states(standing(name))
        .build()
        .unwrap()
}

fn on_set_play(name: &'static str, set_play: SetPlay) -> FsmCard<Execute, ()> {
    CardBuilder::new(name)
        .requires(Representation::GameInfo)
        .calls(SkillKind::Stand)
        .preconditions(move |r| Ok(r.game_info()?.set_play == set_play))
        .exit_when_not_applicable()
        .states(standing(name))
        .build()
        .unwrap()
}

#[test]
fn test_specific_card_wins_over_catch_all() {
    let mut arbiter = Arbiter::builder()
        .register(card_x())
        .register(never("filler_a"))
        .register(never("filler_b"))
        .register(never("filler_c"))
        .register(card_y())
        .build(&Wiring::full())
        .unwrap();

    let outcome = arbiter.tick(&snapshot(SetPlay::GoalKick, 9));
    assert_eq!(outcome.active, Some("card_x"));

    let outcome = arbiter.tick(&snapshot(SetPlay::GoalKick, 5));
    assert_eq!(outcome.active, Some("card_y"));
}

#[test]
fn test_registry_that_can_deadlock_is_rejected() {
    let result = Arbiter::builder()
        .register(card_x())
        .register(never("filler"))
        .build(&Wiring::full());
    assert!(matches!(result, Err(CardError::NoFallback)));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Search {
    Init,
    Searching,
}

impl StateId for Search {
    fn name(self) -> &'static str {
        match self {
            Search::Init => "init",
            Search::Searching => "searching",
        }
    }
}

/// g1: ball not seen recently, g2: ball seen recently
fn searcher() -> FsmCard<Search, ()> {
    let graph = StateGraph::<Search, ()>::builder("searcher")
        .initial_state(Search::Init, |s| {
            s.transition("g1", Search::Searching, |r, _, _| {
                Ok(!r.field_ball()?.ball_was_seen_recently())
            })
            .action(|_, _, w| w.call(SkillCommand::LookForward))
        })
        .state(Search::Searching, |s| {
            s.transition("g2", Search::Init, |r, _, _| {
                Ok(r.field_ball()?.ball_was_seen_recently())
            })
            .action(|_, _, w| w.call(SkillCommand::LookActive))
        })
        .build()
        .unwrap();

    CardBuilder::new("searcher")
        .requires(Representation::FieldBall)
        .calls(SkillKind::LookForward)
        .calls(SkillKind::LookActive)
        .always()
        .exit_when_not_applicable()
        .states(graph)
        .build()
        .unwrap()
}

#[test]
fn test_transition_then_act_in_same_tick() {
    let mut arbiter = Arbiter::builder()
        .register(searcher())
        .build(&Wiring::full())
        .unwrap();

    let mut world = WorldSnapshot::default();
    world.field_ball.time_since_last_seen_ms = 0;
    let outcome = arbiter.tick(&world);
    assert_eq!(outcome.state, Some("init"));
    assert_eq!(outcome.frame.head(), Some(&SkillCommand::LookForward));

    world.field_ball.time_since_last_seen_ms = 2000;
    let outcome = arbiter.tick(&world);
    assert_eq!(outcome.state, Some("searching"));
    assert_eq!(outcome.guard, Some("g1"));
    assert!(outcome.transitioned);
    assert_eq!(outcome.frame.head(), Some(&SkillCommand::LookActive));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Phase {
    Settle,
    Act,
}

impl StateId for Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Settle => "settle",
            Phase::Act => "act",
        }
    }
}

/// Leaves `settle` after one tick there
fn two_phase(name: &'static str, set_play: SetPlay) -> FsmCard<Phase, ()> {
    let graph = StateGraph::<Phase, ()>::builder(name)
        .initial_state(Phase::Settle, |s| {
            s.transition("settled", Phase::Act, |_, cursor, _| {
                Ok(cursor.ticks_in_state() >= 1)
            })
            .action(|_, _, w| w.call(SkillCommand::Stand))
        })
        .state(Phase::Act, |s| {
            s.action(|_, _, w| w.call(SkillCommand::WalkToBallAndKickAtGoal))
        })
        .build()
        .unwrap();

    CardBuilder::new(name)
        .requires(Representation::GameInfo)
        .calls(SkillKind::Stand)
        .calls(SkillKind::WalkToBallAndKickAtGoal)
        .preconditions(move |r| Ok(r.game_info()?.set_play == set_play))
        .exit_when_not_applicable()
        .states(graph)
        .build()
        .unwrap()
}

#[test]
fn test_reactivated_card_starts_over() {
    let mut arbiter = Arbiter::builder()
        .register(two_phase("kick_in", SetPlay::KickIn))
        .register(on_set_play("goal_kick", SetPlay::GoalKick))
        .fallback(card_y())
        .build(&Wiring::full())
        .unwrap();

    let kick_in = snapshot(SetPlay::KickIn, 5);
    assert_eq!(arbiter.tick(&kick_in).state, Some("settle"));
    assert_eq!(arbiter.tick(&kick_in).state, Some("act"));

    let outcome = arbiter.tick(&snapshot(SetPlay::GoalKick, 5));
    assert_eq!(outcome.active, Some("goal_kick"));
    // Inactive cards keep their cursor but are not stepped
    assert_eq!(arbiter.card_state("kick_in"), Some("act"));

    let outcome = arbiter.tick(&kick_in);
    assert_eq!(outcome.active, Some("kick_in"));
    assert!(outcome.activated);
    assert_eq!(outcome.state, Some("settle"));
    assert_eq!(outcome.frame.body(), Some(&SkillCommand::Stand));
}

#[test]
fn test_kept_card_resumes_where_it_paused() {
    let mut arbiter = Arbiter::builder()
        .register(two_phase("kick_in", SetPlay::KickIn))
        .fallback(card_y())
        .build(&Wiring::full())
        .unwrap();

    let kick_in = snapshot(SetPlay::KickIn, 5);
    arbiter.tick(&kick_in);
    for _ in 0..5 {
        let outcome = arbiter.tick(&kick_in);
        assert_eq!(outcome.resolution, Resolution::Kept);
        assert_eq!(outcome.state, Some("act"));
        assert!(!outcome.activated);
    }
    assert_eq!(arbiter.stats().activations, 1);
}

/// Counts its steps in scratch and only kicks from the third step on
fn patient_kicker(policy: ResetPolicy) -> FsmCard<Phase, u32> {
    let graph = StateGraph::<Phase, u32>::builder("kick_in")
        .initial_state(Phase::Settle, |s| {
            s.transition("settled", Phase::Act, |_, cursor, _| {
                Ok(cursor.ticks_in_state() >= 1)
            })
            .action(|_, steps, w| {
                *steps += 1;
                if *steps >= 3 {
                    w.call(SkillCommand::WalkToBallAndKickAtGoal)
                } else {
                    w.call(SkillCommand::Stand)
                }
            })
        })
        .state(Phase::Act, |s| {
            s.action(|_, steps, w| {
                *steps += 1;
                w.call(SkillCommand::Stand)
            })
        })
        .build()
        .unwrap();

    CardBuilder::new("kick_in")
        .requires(Representation::GameInfo)
        .calls(SkillKind::Stand)
        .calls(SkillKind::WalkToBallAndKickAtGoal)
        .preconditions(|r| Ok(r.game_info()?.set_play == SetPlay::KickIn))
        .exit_when_not_applicable()
        .reset_policy(policy)
        .states(graph)
        .build()
        .unwrap()
}

/// Kick-in for two ticks, a goal kick in between, then the kick-in again
fn reactivate(policy: ResetPolicy) -> TickOutcome {
    let mut arbiter = Arbiter::builder()
        .register(patient_kicker(policy))
        .register(on_set_play("goal_kick", SetPlay::GoalKick))
        .fallback(card_y())
        .build(&Wiring::full())
        .unwrap();

    let kick_in = snapshot(SetPlay::KickIn, 5);
    arbiter.tick(&kick_in);
    assert_eq!(arbiter.tick(&kick_in).state, Some("act"));
    assert_eq!(
        arbiter.tick(&snapshot(SetPlay::GoalKick, 5)).active,
        Some("goal_kick")
    );
    arbiter.tick(&kick_in)
}

#[test]
fn test_keep_scratch_survives_reactivation() {
    let outcome = reactivate(ResetPolicy::KeepScratch);
    assert_eq!(outcome.active, Some("kick_in"));
    assert!(outcome.activated);
    // Cursor restarts, the step count carries over
    assert_eq!(outcome.state, Some("settle"));
    assert_eq!(
        outcome.frame.body(),
        Some(&SkillCommand::WalkToBallAndKickAtGoal)
    );
}

#[test]
fn test_fresh_scratch_starts_over_on_reactivation() {
    let outcome = reactivate(ResetPolicy::Fresh);
    assert!(outcome.activated);
    assert_eq!(outcome.state, Some("settle"));
    assert_eq!(outcome.frame.body(), Some(&SkillCommand::Stand));
}

#[test]
fn test_fault_does_not_touch_other_cards() {
    let graph = StateGraph::<Execute, ()>::builder("glitchy")
        .initial_state(Execute, |s| {
            s.action(|r, _, w| {
                if r.game_info()?.secs_remaining < 0 {
                    return Err(CardFault::other("clock underflow"));
                }
                w.call(SkillCommand::Stand)
            })
        })
        .build()
        .unwrap();
    let glitchy = CardBuilder::new("glitchy")
        .requires(Representation::GameInfo)
        .calls(SkillKind::Stand)
        .preconditions(|r| Ok(r.game_info()?.set_play == SetPlay::CornerKick))
        .exit_when_not_applicable()
        .states(graph)
        .build()
        .unwrap();

    let mut arbiter = Arbiter::builder()
        .register(glitchy)
        .register(two_phase("kick_in", SetPlay::KickIn))
        .fallback(card_y())
        .build(&Wiring::full())
        .unwrap();

    let kick_in = snapshot(SetPlay::KickIn, 5);
    arbiter.tick(&kick_in);
    arbiter.tick(&kick_in);
    assert_eq!(arbiter.card_state("kick_in"), Some("act"));

    let mut corner = snapshot(SetPlay::CornerKick, 5);
    corner.game_info.secs_remaining = -1;
    let outcome = arbiter.tick(&corner);
    assert_eq!(outcome.active, Some("card_y"));
    assert_eq!(outcome.resolution, Resolution::Fallback);
    assert_eq!(
        outcome.fault,
        Some(CardFault::Action {
            state: "execute",
            reason: "clock underflow".to_string()
        })
    );
    assert_eq!(arbiter.card_state("kick_in"), Some("act"));

    // The fallback is not sticky; the healthy card is picked up again next tick
    corner.game_info.secs_remaining = 300;
    let outcome = arbiter.tick(&corner);
    assert_eq!(outcome.active, Some("glitchy"));
    assert!(outcome.fault.is_none());
    assert_eq!(arbiter.stats().faults, 1);
}

#[test]
fn test_conflicting_commands_fault() {
    let graph = StateGraph::<Execute, ()>::builder("greedy")
        .initial_state(Execute, |s| {
            s.action(|_, _, w| {
                w.call(SkillCommand::Stand)?;
                w.call(SkillCommand::WalkToBallAndKickAtGoal)
            })
        })
        .build()
        .unwrap();
    let greedy = CardBuilder::new("greedy")
        .calls(SkillKind::Stand)
        .calls(SkillKind::WalkToBallAndKickAtGoal)
        .preconditions(|_| Ok(true))
        .exit_when_not_applicable()
        .states(graph)
        .build()
        .unwrap();

    let mut arbiter = Arbiter::builder()
        .register(greedy)
        .fallback(card_y())
        .build(&Wiring::full())
        .unwrap();

    let outcome = arbiter.tick(&WorldSnapshot::default());
    assert!(matches!(
        outcome.fault,
        Some(CardFault::ActuatorConflict {
            card: "greedy",
            first: SkillKind::Stand,
            second: SkillKind::WalkToBallAndKickAtGoal,
            ..
        })
    ));
    assert_eq!(outcome.frame.kinds(), vec![SkillKind::Stand]);
}

#[test]
fn test_guards_are_idempotent_within_a_tick() {
    let card = card_x();
    let world = snapshot(SetPlay::GoalKick, 9);
    let reads = Reads::new(card.name(), card.ports().reads(), &world);
    let first = card.preconditions(&reads).unwrap();
    for _ in 0..10 {
        assert_eq!(card.preconditions(&reads).unwrap(), first);
        assert_eq!(card.postconditions(&reads).unwrap(), !first);
    }
}
