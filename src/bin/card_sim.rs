//! Headless Card Simulator
//!
//! Drives the standard card registry through a scripted match and prints a
//! per-tick arbitration trace.

use std::error::Error;
use std::path::PathBuf;

use card_control::arbiter::ArbiterStats;
use card_control::cards::standard_registry;
use card_control::control::{ControlLoop, RecordingSurface};
use card_control::core::config::BehaviorConfig;
use card_control::core::types::{Pose2, Tick, Vec2};
use card_control::ports::{ActuatorGroup, Representation, SkillCommand};
use card_control::world::{
    GameState, Obstacle, ObstacleKind, RobotPose, SetPlay, TeammateRoles, WorldSnapshot,
};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const OWN_TEAM: u8 = 5;
const OPPONENT_TEAM: u8 = 9;
const ROBOT_NUMBER: u8 = 4;
/// Distance the simulated robot covers per tick at full speed (mm)
const STEP_MM: f32 = 25.0;

/// Headless Card Simulator - scripted match through the standard registry
#[derive(Parser, Debug)]
#[command(name = "card_sim")]
#[command(about = "Run the standard card registry through a scripted match")]
struct Args {
    /// Number of control ticks to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Random seed for the ball walk
    #[arg(long)]
    seed: Option<u64>,

    /// Behavior config (TOML)
    #[arg(long, default_value = "data/behavior/default.toml")]
    config: PathBuf,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging of every arbitration decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum Phase {
    ReadyOwnKickoff,
    OppKickoff,
    OpenPlay,
    OwnKickIn,
    OppGoalKick,
}

impl Phase {
    fn at(tick: Tick, total: Tick) -> Self {
        match tick * 5 / total.max(1) {
            0 => Phase::ReadyOwnKickoff,
            1 => Phase::OppKickoff,
            2 => Phase::OpenPlay,
            3 => Phase::OwnKickIn,
            _ => Phase::OppGoalKick,
        }
    }
}

#[derive(Serialize)]
struct TraceRow {
    tick: Tick,
    phase: Phase,
    active: Option<&'static str>,
    state: Option<&'static str>,
    resolution: String,
    activated: bool,
    guard: Option<&'static str>,
    fault: Option<String>,
    issued: Vec<String>,
}

#[derive(Serialize)]
struct SimReport {
    seed: u64,
    ticks: u64,
    stats: ArbiterStats,
    trace: Vec<TraceRow>,
}

/// Scripted world: game controller timeline, a wandering ball and a robot
/// that follows its own walk commands
struct ScriptedMatch {
    snapshot: WorldSnapshot,
    rng: ChaCha8Rng,
    tick_period_ms: u32,
}

impl ScriptedMatch {
    fn new(seed: u64, tick_period_ms: u32) -> Self {
        let mut snapshot = WorldSnapshot::default();
        snapshot.own_team_info.team_number = OWN_TEAM;
        snapshot.robot_info.number = ROBOT_NUMBER;
        snapshot.teammate_roles = TeammateRoles {
            offense: vec![ROBOT_NUMBER, 5],
            defense: vec![2, 3],
            goal_keeper: Some(1),
        };
        snapshot.default_pose.own_default_pose = Pose2::new(0.0, Vec2::new(-2500.0, 0.0));
        snapshot.robot_pose = RobotPose::new(0.0, Vec2::new(-3000.0, -2900.0));
        snapshot.obstacle_model.obstacles.push(Obstacle {
            center: Vec2::new(1200.0, 300.0),
            kind: ObstacleKind::Opponent,
        });

        Self {
            snapshot,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_period_ms,
        }
    }

    /// Update the game controller state and the ball for `tick`
    fn advance(&mut self, tick: Tick, phase: Phase) -> &WorldSnapshot {
        let game = &mut self.snapshot.game_info;
        game.set_play = SetPlay::None;
        self.snapshot.team_behavior_status.role.play_ball = false;

        match phase {
            Phase::ReadyOwnKickoff => {
                game.state = GameState::Ready;
                game.kicking_team = OWN_TEAM;
                self.snapshot.field_ball.position_on_field = Vec2::default();
            }
            Phase::OppKickoff => {
                game.state = GameState::Playing;
                game.kicking_team = OPPONENT_TEAM;
            }
            Phase::OpenPlay => {
                game.state = GameState::Playing;
                let ball = &mut self.snapshot.field_ball;
                let nudge = Vec2::new(
                    self.rng.gen_range(-60.0..60.0),
                    self.rng.gen_range(-60.0..60.0),
                );
                ball.position_on_field = ball.position_on_field + nudge;
                ball.end_position_on_field = ball.position_on_field;
            }
            Phase::OwnKickIn => {
                game.set_play = SetPlay::KickIn;
                game.kicking_team = OWN_TEAM;
                self.snapshot.team_behavior_status.role.play_ball = true;
            }
            Phase::OppGoalKick => {
                game.set_play = SetPlay::GoalKick;
                game.kicking_team = OPPONENT_TEAM;
            }
        }

        let elapsed_secs = (tick * u64::from(self.tick_period_ms) / 1000) as i32;
        self.snapshot.game_info.secs_remaining = 600 - elapsed_secs;

        // Ball perception drops out now and then
        let ball = &mut self.snapshot.field_ball;
        if self.rng.gen_bool(0.9) {
            ball.time_since_last_seen_ms = 0;
        } else {
            ball.time_since_last_seen_ms =
                ball.time_since_last_seen_ms.saturating_add(self.tick_period_ms);
        }
        ball.position_relative = self.snapshot.robot_pose.to_relative(ball.position_on_field);

        &self.snapshot
    }

    /// Move the robot along the body command it was given
    fn follow(&mut self, body: Option<&SkillCommand>) {
        let relative = match body {
            Some(SkillCommand::WalkToPoint { target, speed_ratio, .. }) => {
                clamp(target.translation, STEP_MM * speed_ratio)
            }
            Some(SkillCommand::WalkToPose { target, speed, .. }) => {
                clamp(target.translation, STEP_MM * speed.translation.x)
            }
            Some(
                SkillCommand::GoToBallAndDribble { .. } | SkillCommand::GoToBallAndKick { .. },
            ) => {
                clamp(self.snapshot.field_ball.position_relative, STEP_MM)
            }
            _ => return,
        };
        let pose = &mut self.snapshot.robot_pose.pose;
        pose.translation = pose.to_absolute(relative);
    }
}

fn clamp(v: Vec2, max: f32) -> Vec2 {
    let norm = v.norm();
    if norm <= max || norm == 0.0 {
        v
    } else {
        v * (max / norm)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        "card_control=debug"
    } else {
        "card_control=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = if args.config.exists() {
        BehaviorConfig::load(&args.config)?
    } else {
        tracing::warn!(
            "Config {} not found, using defaults",
            args.config.display()
        );
        BehaviorConfig::default()
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let registry = standard_registry(&config)?;
    let mut control = ControlLoop::new(registry, RecordingSurface::new(), Representation::ALL)?;
    let mut world = ScriptedMatch::new(seed, config.global.tick_period_ms);

    let mut trace = Vec::with_capacity(args.ticks as usize);
    for tick in 0..args.ticks {
        let phase = Phase::at(tick, args.ticks);
        let snapshot = world.advance(tick, phase).clone();
        let outcome = control.run_tick(&snapshot);

        let issued = control
            .surface()
            .last()
            .map(|frame| frame.commands().to_vec())
            .unwrap_or_default();
        world.follow(issued.iter().find(|c| c.group() == ActuatorGroup::Body));

        trace.push(TraceRow {
            tick: outcome.tick,
            phase,
            active: outcome.active,
            state: outcome.state,
            resolution: format!("{:?}", outcome.resolution),
            activated: outcome.activated,
            guard: outcome.guard,
            fault: outcome.fault.as_ref().map(|f| f.to_string()),
            issued: issued.iter().map(|c| format!("{:?}", c.kind())).collect(),
        });
    }

    let report = SimReport {
        seed,
        ticks: args.ticks,
        stats: control.arbiter().stats(),
        trace,
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn print_text(report: &SimReport) {
    println!("Card Simulation");
    println!("===============");
    for row in &report.trace {
        if !row.activated && row.guard.is_none() && row.fault.is_none() {
            continue;
        }
        println!(
            "[{:>5}] {:<16} {:<20} {:<24} {}",
            row.tick,
            format!("{:?}", row.phase),
            row.active.unwrap_or("-"),
            row.state.unwrap_or("-"),
            row.guard.or(row.fault.as_deref()).unwrap_or("")
        );
    }
    println!();
    println!("Ticks: {}", report.stats.ticks);
    println!("Activations: {}", report.stats.activations);
    println!("Faults: {}", report.stats.faults);
    println!("Fallback ticks: {}", report.stats.fallback_ticks);
    println!("Safe default ticks: {}", report.stats.safe_default_ticks);
    println!("Seed: {}", report.seed);
}
