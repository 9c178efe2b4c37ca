//! Headless duel session: connects to the agent and plays matches.
//!
//! ```text
//! duel-session --port 12345 --agent-side b --opponent random --seed 7
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use buckshot_duel::core::{DuelConfig, GameRng, SessionConfig, Side};
use buckshot_duel::duel::Duel;
use buckshot_duel::policy::RandomPolicy;
use buckshot_duel::session::SessionServer;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AgentSide {
    A,
    B,
    Both,
}

impl AgentSide {
    fn sides(self) -> Vec<Side> {
        match self {
            AgentSide::A => vec![Side::A],
            AgentSide::B => vec![Side::B],
            AgentSide::Both => Side::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Opponent {
    /// Uniformly random legal actions.
    Random,
    /// No policy; non-agent sides wait for human input.
    Human,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent host.
    #[arg(long)]
    host: Option<String>,

    /// Agent port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Seed for deterministic decks and grants (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with `duel` and `session` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side(s) played by the agent.
    #[arg(long, value_enum)]
    agent_side: Option<AgentSide>,

    /// Policy for sides not played by the agent.
    #[arg(long, value_enum, default_value_t = Opponent::Random)]
    opponent: Opponent,

    /// Starting and maximum lives per side.
    #[arg(long)]
    max_lives: Option<u32>,

    /// Stop after this many finished matches.
    #[arg(long)]
    max_matches: Option<u32>,

    /// Frame messages with newlines.
    #[arg(long, default_value_t = false)]
    line_terminated: bool,

    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    duel: DuelConfig,
    session: SessionConfig,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let FileConfig {
        duel: mut duel_config,
        session: mut session_config,
    } = load_config(args.config.as_ref())?;

    if let Some(max_lives) = args.max_lives {
        duel_config.max_lives = max_lives;
    }
    duel_config.auto_start = true;

    if let Some(host) = args.host {
        session_config.host = host;
    }
    if let Some(port) = args.port {
        session_config.port = port;
    }
    if let Some(agent_side) = args.agent_side {
        session_config.agent_sides = agent_side.sides();
    }
    if let Some(max_matches) = args.max_matches {
        session_config.max_matches = Some(max_matches);
    }
    if args.line_terminated {
        session_config.line_terminated = true;
    }

    let rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    info!(seed = rng.seed(), ?duel_config, "starting duel");
    let duel = Duel::with_rng(duel_config, rng).context("invalid duel config")?;

    let mut server = SessionServer::new(duel, session_config).context("start session")?;
    if let Opponent::Random = args.opponent {
        server = server.with_opponent(Box::new(RandomPolicy));
    }

    server.run().context("session failed")?;
    Ok(())
}
