//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use kriegspiel_core::{Faction, ScoringConfig};

/// Configuration for connecting, playing and recording a game
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Address of the game server (host:port)
    pub server_addr: String,
    /// The only faction this client agrees to play
    pub faction: Faction,
    /// Most orders sent per outbound tick
    pub max_orders_per_tick: usize,
    /// Time between outbound ticks
    pub order_interval: Duration,
    /// Connection attempts before giving up
    pub max_attempts: u32,
    /// Fixed delay between connection attempts
    pub retry_delay: Duration,
    /// Append-only score log (None disables it)
    pub score_log: Option<PathBuf>,
    /// Final encoded map, overwritten per game (None disables it)
    pub final_map: Option<PathBuf>,
    /// Label written in front of the score
    pub label: String,
    /// Seed for the strategy RNG
    pub seed: u64,
    pub scoring: ScoringConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6060".to_string(),
            faction: Faction::Red,
            max_orders_per_tick: 10,
            order_interval: Duration::from_secs(2),
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
            score_log: Some(PathBuf::from("scores.txt")),
            final_map: Some(PathBuf::from("maps.txt")),
            label: "kriegspiel".to_string(),
            seed: 0,
            scoring: ScoringConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_server_addr(mut self, addr: impl Into<String>) -> Self {
        self.server_addr = addr.into();
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_max_orders(mut self, max_orders: usize) -> Self {
        self.max_orders_per_tick = max_orders;
        self
    }

    pub fn with_order_interval(mut self, interval: Duration) -> Self {
        self.order_interval = interval;
        self
    }

    pub fn with_retries(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = delay;
        self
    }

    pub fn with_artifacts(mut self, score_log: Option<PathBuf>, final_map: Option<PathBuf>) -> Self {
        self.score_log = score_log;
        self.final_map = final_map;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.faction, Faction::Red);
        assert_eq!(config.max_orders_per_tick, 10);
        assert_eq!(config.order_interval, Duration::from_secs(2));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .with_server_addr("10.0.0.1:7000")
            .with_retries(0, Duration::from_millis(10))
            .with_artifacts(None, None)
            .with_seed(42);
        assert_eq!(config.server_addr, "10.0.0.1:7000");
        assert_eq!(config.max_attempts, 1);
        assert!(config.score_log.is_none());
        assert_eq!(config.seed, 42);
    }
}
