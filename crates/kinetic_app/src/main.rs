//! # kinetic_app: scenario driver
//!
//! Runs one motion scenario against the in-memory [`SimWorld`] host and logs
//! what happened.
//!
//! ## Startup Sequence
//!
//! 1. Initialise tracing (`RUST_LOG` overrides the `kinetic_app=info` default).
//! 2. Load the optional JSON config; CLI flags override file values.
//! 3. Spawn the actor, queue the scenario's task list, and enter the tick loop.

mod config;
mod tick;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kinetic_math::{Transform3D, Vec3};
use kinetic_motion::{
    HoldFlag, MotionExecutor, grapple_sequence, levitation_sequence, motion_registry,
};
use kinetic_world::{SimWorld, TransformHost};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use tick::TickLoop;

#[derive(Parser)]
#[command(name = "kinetic_app", about = "Run grapple and levitation scenarios")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target ticks per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Stop after this many ticks (0 = until the scenario finishes)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Seed for the levitation random source
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[command(subcommand)]
    scenario: Scenario,
}

#[derive(Subcommand)]
enum Scenario {
    /// Pull the actor to a target point and stand it on the surface there
    Grapple {
        /// Target point as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,4,-12")]
        target: Vec3,

        /// Surface normal at the target as x,y,z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,1")]
        normal: Vec3,
    },
    /// Float the actor until the hold time runs out
    Levitate {
        /// Seconds of simulated time before the hold is dropped
        #[arg(long, default_value_t = 5.0)]
        hold_secs: f32,
    },
}

fn parse_vec3(raw: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = raw
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|err| format!("`{part}`: {err}")))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got `{raw}`")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kinetic_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(tick_rate) = args.tick_rate {
        config.tick.tick_rate = tick_rate;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.tick.max_ticks = max_ticks;
    }
    config.validate().context("invalid configuration")?;

    let hold = HoldFlag::default();
    let registry = motion_registry(&config.motion, hold.clone(), StdRng::seed_from_u64(args.seed));
    let mut executor = MotionExecutor::with_config(registry, config.executor);

    let mut world = SimWorld::new();
    let actor = world.spawn_body(Transform3D::IDENTITY);
    let hold_secs = match args.scenario {
        Scenario::Grapple { target, normal } => {
            info!(%actor, %target, %normal, "grapple scenario");
            executor.run(grapple_sequence(actor, actor, target, normal));
            None
        }
        Scenario::Levitate { hold_secs } => {
            if !hold_secs.is_finite() || hold_secs < 0.0 {
                bail!("hold-secs must be a non-negative number of seconds");
            }
            info!(%actor, hold_secs, "levitation scenario");
            hold.hold();
            executor.run(levitation_sequence(actor));
            Some(hold_secs)
        }
    };

    let mut tick_loop = TickLoop::new(config.tick, world, executor, hold);
    if let Some(secs) = hold_secs {
        tick_loop = tick_loop.with_hold_secs(secs);
    }
    tick_loop.run_async().await?;

    for report in tick_loop.executor_mut().take_outcomes() {
        info!(
            task = %report.key,
            outcome = ?report.outcome,
            attempts = report.attempts,
            waited = report.waited,
            "record resolved"
        );
    }
    if let Some(t) = tick_loop.world().transform(actor) {
        info!(
            position = %t.position,
            rotation = ?t.rotation,
            driven = tick_loop.world().is_externally_driven(actor),
            ticks = tick_loop.tick_id(),
            "final actor transform"
        );
    }

    Ok(())
}
