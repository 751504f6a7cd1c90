//! Play command - connect to a server and play one game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_client(), start_client(), report()
//! - Level 3: (delegated to kriegspiel-client crate)
//! - Level 4: argument validation

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use kriegspiel_client::{run_client, AdvanceStrategy, ClientConfig, SessionEnd};
use kriegspiel_core::Faction;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game server address (host:port)
    #[arg(long, default_value = "127.0.0.1:6060")]
    pub server: String,

    /// Faction this client plays ("red", "blue" or an army color)
    #[arg(long, default_value = "red")]
    pub faction: String,

    /// Maximum move orders per tick
    #[arg(long, default_value = "10")]
    pub max_orders: usize,

    /// Milliseconds between order ticks
    #[arg(long, default_value = "2000")]
    pub interval_ms: u64,

    /// Connection attempts before giving up
    #[arg(long, default_value = "5")]
    pub attempts: u32,

    /// Seconds to wait between connection attempts
    #[arg(long, default_value = "5")]
    pub retry_delay_secs: u64,

    /// File the final score line is appended to
    #[arg(long, default_value = "scores.txt")]
    pub scores: PathBuf,

    /// File the final encoded map is written to
    #[arg(long, default_value = "maps.txt")]
    pub map_file: PathBuf,

    /// Do not write the score log or the final map
    #[arg(long)]
    pub no_artifacts: bool,

    /// Label written in front of the score
    #[arg(long, default_value = "kriegspiel")]
    pub label: String,

    /// Seed for the strategy RNG
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Configure client
/// 2. Play until the game ends (blocking)
/// 3. Report the outcome
pub fn run(args: PlayArgs) -> Result<()> {
    let config = configure_client(&args)?;

    tracing::info!(
        "Playing {} against {}",
        config.faction,
        config.server_addr
    );

    let end = start_client(config)?;
    report(&end);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the client configuration from command arguments
fn configure_client(args: &PlayArgs) -> Result<ClientConfig> {
    validate_args(args)?;
    let faction = Faction::parse(&args.faction)
        .with_context(|| format!("Invalid faction: {}", args.faction))?;

    let artifacts = if args.no_artifacts {
        (None, None)
    } else {
        (Some(args.scores.clone()), Some(args.map_file.clone()))
    };

    Ok(ClientConfig::default()
        .with_server_addr(args.server.clone())
        .with_faction(faction)
        .with_max_orders(args.max_orders)
        .with_order_interval(Duration::from_millis(args.interval_ms))
        .with_retries(args.attempts, Duration::from_secs(args.retry_delay_secs))
        .with_artifacts(artifacts.0, artifacts.1)
        .with_label(args.label.clone())
        .with_seed(args.seed))
}

/// Start the client (blocking)
fn start_client(config: ClientConfig) -> Result<SessionEnd> {
    let runtime = tokio::runtime::Runtime::new()?;
    let strategy = AdvanceStrategy::new(config.seed);

    runtime
        .block_on(run_client(config, strategy))
        .context("Game client failed")
}

/// Log how the game ended
fn report(end: &SessionEnd) {
    match end {
        SessionEnd::GameOver { outcome, score, .. } => {
            tracing::info!("Game finished ({:?}), score {:.2}", outcome, score.value);
        }
        SessionEnd::PlayerLeft { army } => {
            tracing::info!("Opponent {} left the game", army);
        }
        SessionEnd::ConnectionClosed => {
            tracing::info!("Server closed the connection");
        }
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn validate_args(args: &PlayArgs) -> Result<()> {
    if args.max_orders == 0 {
        anyhow::bail!("--max-orders must be at least 1");
    }
    if args.interval_ms == 0 {
        anyhow::bail!("--interval-ms must be at least 1");
    }
    if args.attempts == 0 {
        anyhow::bail!("--attempts must be at least 1");
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        play: PlayArgs,
    }

    fn parse(args: &[&str]) -> PlayArgs {
        let mut argv = vec!["kriegspiel"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).play
    }

    #[test]
    fn test_configure_defaults() {
        let config = configure_client(&parse(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:6060");
        assert_eq!(config.faction, Faction::Red);
        assert_eq!(config.max_orders_per_tick, 10);
        assert_eq!(config.order_interval, Duration::from_secs(2));
        assert_eq!(config.score_log, Some(PathBuf::from("scores.txt")));
    }

    #[test]
    fn test_configure_overrides() {
        let args = parse(&[
            "--server", "10.1.1.1:9000",
            "--faction", "#0000FF",
            "--max-orders", "3",
            "--no-artifacts",
            "--seed", "99",
        ]);
        let config = configure_client(&args).unwrap();
        assert_eq!(config.faction, Faction::Blue);
        assert_eq!(config.max_orders_per_tick, 3);
        assert!(config.final_map.is_none());
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(configure_client(&parse(&["--faction", "green"])).is_err());
        assert!(configure_client(&parse(&["--max-orders", "0"])).is_err());
    }
}
