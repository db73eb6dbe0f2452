#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use core::time::Duration;
use cli::commands::{decode, generate};
use cli::config::{CliArgs, CliConfig, ClockKind, Command};
use cli::telemetry::init_telemetry;
use snowleaf::{
    IdGenerator, InterruptibleSleep, MemoryWorkerIdProvider, MonotonicClock, StaticWorkerId,
    SystemClock, ThreadRandom, TimeSource, acquire_worker_id,
};
use std::io::{BufWriter, Write};
use tokio::signal;

// mimalloc: the default musl allocator is slow under threaded contention.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;

    match config.command {
        Command::Generate { count } => run_generate(&config, count).await,
        Command::Decode { id } => {
            println!("{}", decode(id, config.epoch)?);
            Ok(())
        }
    }
}

async fn run_generate(config: &CliConfig, count: u64) -> anyhow::Result<()> {
    let worker_id = match config.worker_id {
        Some(worker_id) => acquire_worker_id(&StaticWorkerId(worker_id), &config.host_identity)?,
        None => acquire_worker_id(&MemoryWorkerIdProvider::new(), &config.host_identity)?,
    };

    if cfg!(debug_assertions) {
        tracing::info!("Generating {} IDs with full config: {:#?}", count, config);
    } else {
        tracing::info!(worker_id, count, clock = ?config.clock, "Generating IDs");
    }

    let sleeper = InterruptibleSleep::new();
    let stop = sleeper.clone();
    let epoch = config.epoch;
    let clock = config.clock;

    // `next_id` blocks, so generation stays off the async workers.
    let mut task = tokio::task::spawn_blocking(move || match clock {
        ClockKind::System => write_ids(SystemClock, worker_id, epoch, count, sleeper),
        ClockKind::Monotonic => write_ids(MonotonicClock::new(), worker_id, epoch, count, sleeper),
    });

    let issued = tokio::select! {
        res = &mut task => res??,
        () = ctrl_c() => {
            tracing::info!("Received Ctrl+C signal, stopping");
            stop.interrupt();
            task.await??
        }
    };

    tracing::info!(issued, "Done");
    Ok(())
}

fn write_ids<T: TimeSource>(
    time: T,
    worker_id: u64,
    epoch: Duration,
    count: u64,
    sleeper: InterruptibleSleep,
) -> anyhow::Result<u64> {
    let stop = sleeper.clone();
    let generator = IdGenerator::with_parts(worker_id, epoch, time, ThreadRandom, sleeper)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let issued = generate(&generator, count, &stop, &mut out)?;
    out.flush()?;
    Ok(issued)
}

async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {:?}", e);
        // Without a handler the run can only end by finishing.
        std::future::pending::<()>().await;
    }
}
