//! Tetra Quest runner (default binary).
//!
//! Headless: the game state is streamed as JSON lines on stdout for whatever
//! renders it. `replay` plays a script deterministically; `live` reads the
//! keyboard through crossterm and drives the async engine in real time.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal;
use tokio::sync::mpsc;

use tetra_quest::core::{GameSession, Observation};
use tetra_quest::engine::{spawn_engine, EngineConfig, EngineError};
use tetra_quest::input::{should_quit, InputController};
use tetra_quest::replay::play;
use tetra_quest::script::parse_script;
use tetra_quest::types::GameStatus;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for piece selection (default: TETRA_SEED or 1)
    #[arg(long, global = true)]
    seed: Option<u32>,
    /// Command queue capacity in live mode (default: TETRA_MAX_PENDING or 16)
    #[arg(long, global = true)]
    max_pending: Option<usize>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a command script and print one observation per step
    Replay {
        /// Script file; stdin when omitted
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Play from the keyboard (Enter starts, q quits)
    Live,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_pending) = cli.max_pending {
        config = config.with_max_pending(max_pending);
    }

    match cli.mode.unwrap_or(Mode::Live) {
        Mode::Replay { script } => replay(&config, script.as_deref()),
        Mode::Live => live(&config),
    }
}

fn write_observation(out: &mut impl Write, obs: &Observation) -> Result<()> {
    serde_json::to_writer(&mut *out, obs).context("failed to encode observation")?;
    out.write_all(b"\n")?;
    Ok(())
}

fn replay(config: &EngineConfig, script: Option<&Path>) -> Result<()> {
    let text = match script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let steps = parse_script(&text)?;
    eprintln!(
        "[tetra-quest] replaying {} steps (seed {})",
        steps.len(),
        config.seed
    );

    let mut session = GameSession::new(config.seed);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    play(&mut session, &steps, |obs| write_observation(&mut out, &obs))?;
    out.flush()?;

    eprintln!(
        "[tetra-quest] done: {} score {}, lines {}, level {}",
        session.status().as_str(),
        session.score(),
        session.lines(),
        session.level()
    );
    Ok(())
}

fn live(config: &EngineConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let result = rt.block_on(run_live(config));

    // Always try to restore terminal state.
    let _ = terminal::disable_raw_mode();
    result
}

async fn run_live(config: &EngineConfig) -> Result<()> {
    eprintln!("[tetra-quest] live: Enter starts, p pauses, r resets, q quits\r");

    let mut engine = spawn_engine(config);
    let input = InputController::new();
    let mut status = GameStatus::NotStarted;

    let (key_tx, mut keys) = mpsc::unbounded_channel::<KeyEvent>();
    let stop = Arc::new(AtomicBool::new(false));
    let reader_stop = Arc::clone(&stop);
    let reader = tokio::task::spawn_blocking(move || -> io::Result<()> {
        while !reader_stop.load(Ordering::Relaxed) {
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key_tx.send(key).is_err() {
                        break;
                    }
                }
            }
        }
        Ok(())
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else { break };
                if should_quit(key) {
                    break;
                }
                let Some(command) = input.translate(key, status) else {
                    continue;
                };
                match engine.try_send(command) {
                    Ok(()) => {}
                    Err(EngineError::Busy) => {
                        eprintln!("[tetra-quest] dropped {} (queue full)\r", command.as_str());
                    }
                    Err(EngineError::Closed) => break,
                }
            }
            obs = engine.next_observation() => {
                let Some(obs) = obs else { break };
                status = obs.snapshot.status;
                write_observation(&mut out, &obs)?;
                out.flush()?;
            }
        }
    }

    stop.store(true, Ordering::Relaxed);
    reader
        .await
        .context("key reader task failed")?
        .context("failed to read terminal events")?;

    let session = engine.shutdown().await?;
    eprintln!(
        "[tetra-quest] bye: score {}, lines {}, level {}\r",
        session.score(),
        session.lines(),
        session.level()
    );
    Ok(())
}
