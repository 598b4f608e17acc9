//! Headless runner (default binary).
//!
//! Plays a seeded game with the greedy autoplayer and prints every event as
//! one JSON object per line.
//!
//! ```text
//! stackfall [CONFIG.json] [--duration-ms N] [--replay-out PATH] [--replay-in PATH]
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` for spawn, kick and lock detail.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use stackfall::core::EngineConfig;
use stackfall::engine::{choose_placement, Replay, Session};
use stackfall::types::{GameMode, TICK_MS};

const DEFAULT_DURATION_MS: u64 = 60_000;

/// Pause between autoplayer inputs
const INPUT_INTERVAL_MS: u64 = 100;

#[derive(Debug, Parser)]
#[command(name = "stackfall")]
#[command(about = "Headless autoplayer for the stackfall engine")]
struct Args {
    /// Engine config as JSON; defaults apply when omitted
    config: Option<PathBuf>,

    /// Game time to autoplay
    #[arg(long, default_value_t = DEFAULT_DURATION_MS)]
    duration_ms: u64,

    /// Write the recorded inputs here when the run ends
    #[arg(long)]
    replay_out: Option<PathBuf>,

    /// Play a recorded replay instead of autoplaying
    #[arg(long, conflicts_with_all = ["config", "duration_ms"])]
    replay_in: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate().context("config rejected")?;
    Ok(config)
}

fn flush_events(session: &mut Session, out: &mut impl Write) -> Result<()> {
    for event in session.game_mut().drain_events() {
        serde_json::to_writer(&mut *out, &event)?;
        out.write_all(b"\n")?;
    }
    for event in session.game_mut().drain_net_events() {
        serde_json::to_writer(&mut *out, &event)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn autoplay(session: &mut Session, duration_ms: u64, out: &mut impl Write) -> Result<()> {
    let mut plan = Vec::new();
    let mut next_input_ms = 0;
    while session.clock_ms() < duration_ms && !session.game().is_game_over() {
        if session.clock_ms() >= next_input_ms && session.game().mode() == GameMode::Drop {
            if plan.is_empty() {
                plan = choose_placement(session.game()).unwrap_or_default();
                plan.reverse();
            }
            if let Some(action) = plan.pop() {
                session.apply(action)?;
                next_input_ms = session.clock_ms() + INPUT_INTERVAL_MS;
            }
        }
        session.step()?;
        flush_events(session, out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut session = if let Some(path) = args.replay_in.as_deref() {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let replay: Replay = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("playing {} inputs from {}", replay.len(), path.display());
        replay.play()?
    } else {
        let config = load_config(args.config.as_deref())?;
        let mut session = Session::new(config, TICK_MS)?;
        session.start_recording()?;
        autoplay(&mut session, args.duration_ms, &mut out)?;
        session
    };
    flush_events(&mut session, &mut out)?;

    if let Some(path) = args.replay_out.as_deref() {
        if let Some(replay) = session.take_replay() {
            let json = serde_json::to_string_pretty(&replay)?;
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} inputs to {}", replay.len(), path.display());
        }
    }

    let game = session.game();
    let stats = game.stats();
    info!(
        "finished at {}ms: score {}, level {}, {} pieces ({:.1}/min), {} rows",
        session.clock_ms(),
        game.score(),
        game.level(),
        stats.pieces,
        stats.pieces_per_minute(),
        stats.cleared_lines
    );
    serde_json::to_writer(&mut out, &game.snapshot())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_autoplay_args() {
        let args = Args::try_parse_from([
            "stackfall",
            "game.json",
            "--duration-ms",
            "5000",
            "--replay-out",
            "run.json",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("game.json")));
        assert_eq!(args.duration_ms, 5000);
        assert_eq!(args.replay_out, Some(PathBuf::from("run.json")));
        assert!(args.replay_in.is_none());

        let defaults = Args::try_parse_from(["stackfall"]).unwrap();
        assert_eq!(defaults.duration_ms, DEFAULT_DURATION_MS);
        assert!(defaults.config.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_args() {
        assert!(Args::try_parse_from(["stackfall", "--duration-ms", "soon"]).is_err());
        assert!(Args::try_parse_from(["stackfall", "--speed", "3"]).is_err());
        assert!(
            Args::try_parse_from(["stackfall", "game.json", "--replay-in", "run.json"]).is_err()
        );
    }
}
