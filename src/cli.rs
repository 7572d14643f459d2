//! Command-line interface for a2a_arena.

use a2a_arena::ProposerKind;
use clap::{Parser, Subcommand};

/// Agent-to-agent tic-tac-toe arena
#[derive(Parser, Debug)]
#[command(name = "a2a_arena")]
#[command(
    about = "Two move proposers play tic-tac-toe through a shared rules engine",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play matches until declined
    Play {
        /// Path to arena config file (defaults are used if it does not exist)
        #[arg(short, long, default_value = "arena.toml")]
        config: std::path::PathBuf,

        /// Proposer kind for X
        #[arg(long)]
        x: Option<ProposerKind>,

        /// Proposer kind for O
        #[arg(long)]
        o: Option<ProposerKind>,

        /// Seed for reproducible fallbacks and noisy proposers
        #[arg(long)]
        seed: Option<u64>,

        /// Seconds a proposer may take before forfeiting its turn
        #[arg(long)]
        turn_timeout_secs: Option<u64>,

        /// Abort a match after this many turns
        #[arg(long)]
        max_turns: Option<usize>,

        /// Play a single match without asking to continue
        #[arg(long)]
        once: bool,

        /// Print each match report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in proposer kinds
    Kinds,
}
