//! a2a_arena - agent-to-agent tic-tac-toe CLI
//!
//! Runs matches between two built-in proposers and renders them on the
//! terminal.

#![warn(missing_docs)]

mod cli;

use a2a_arena::console::{
    render_event, render_notification, render_summary, spawn_line_reader, wants_rematch,
};
use a2a_arena::{
    ArenaConfig, MoveExtractor, Notifier, Orchestrator, Overrides, ProposerKind, SessionId,
};
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufReader, Write};
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Play {
            config,
            x,
            o,
            seed,
            turn_timeout_secs,
            max_turns,
            once,
            json,
        } => {
            let overrides = Overrides {
                x,
                o,
                seed,
                turn_timeout_secs,
                max_turns,
            };
            run_play(config, overrides, once, json).await
        }
        Command::Kinds => {
            for kind in ProposerKind::iter() {
                println!("{:<12} {}", kind, kind.description());
            }
            Ok(())
        }
    }
}

/// Plays matches until the user declines another or interrupts.
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_play(
    config_path: PathBuf,
    overrides: Overrides,
    once: bool,
    json: bool,
) -> Result<()> {
    let config = ArenaConfig::load_or_default(&config_path)?.apply(overrides)?;
    let mut answers = spawn_line_reader(BufReader::new(std::io::stdin()))?;

    loop {
        tokio::select! {
            result = play_one(&config, json) => result?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\nMatch interrupted. Exiting...");
                return Ok(());
            }
        }

        if once {
            return Ok(());
        }

        print!("\nPlay again? (s/n): ");
        std::io::stdout().flush()?;

        let answer = tokio::select! {
            line = answers.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };

        match answer {
            Some(answer) if wants_rematch(&answer) => continue,
            _ => {
                println!("\nThanks for watching!");
                return Ok(());
            }
        }
    }
}

/// Runs one match, rendering events and notifications as they arrive.
///
/// A failed match is reported and swallowed so the session can go on.
#[instrument(skip_all)]
async fn play_one(config: &ArenaConfig, json: bool) -> Result<()> {
    let seed = *config.match_config().seed();
    let extractor = match seed {
        Some(seed) => MoveExtractor::seeded(seed),
        None => MoveExtractor::from_entropy(),
    };

    let (notifier, mut inbox) = Notifier::channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let renderer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            println!("{}", render_event(&event));
        }
    });
    let mailman = tokio::spawn(async move {
        while let Some(notification) = inbox.recv().await {
            println!("{}", render_notification(&notification));
        }
    });

    // Seats get distinct seeds so two noisy proposers do not mirror each other.
    let mut orchestrator = Orchestrator::new(
        config.player_x().build(seed),
        config.player_o().build(seed.map(|s| s.wrapping_add(1))),
        extractor,
        notifier,
    )
    .with_events(event_tx)
    .with_settings(config.match_config().settings());

    let result = orchestrator.run_match(SessionId::now()).await;

    drop(orchestrator);
    renderer.await?;
    mailman.await?;

    match result {
        Ok(report) => {
            println!("\n{}", render_summary(&report));
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Err(e) => {
            warn!(error = %e, "Match aborted");
            println!("\nMatch aborted: {}", e);
        }
    }

    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,a2a_arena=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Tracing initialized");
}
