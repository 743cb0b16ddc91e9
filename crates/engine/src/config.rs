//! Engine configuration.

use std::env;

/// Settings for a spawned engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for uniform piece selection
    pub seed: u32,
    /// Capacity of the command queue; `try_send` reports `Busy` beyond it
    pub max_pending_commands: usize,
    /// Observations held for a slow reader. When full, the engine holds the
    /// next observation back and its events stay queued in the session.
    pub max_pending_observations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            max_pending_commands: 16,
            max_pending_observations: 64,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Read `TETRA_SEED`, `TETRA_MAX_PENDING` and `TETRA_MAX_OBSERVATIONS`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            seed: env_or("TETRA_SEED", defaults.seed),
            max_pending_commands: env_or("TETRA_MAX_PENDING", defaults.max_pending_commands),
            max_pending_observations: env_or(
                "TETRA_MAX_OBSERVATIONS",
                defaults.max_pending_observations,
            ),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_pending(mut self, max_pending_commands: usize) -> Self {
        self.max_pending_commands = max_pending_commands;
        self
    }

    pub fn with_max_observations(mut self, max_pending_observations: usize) -> Self {
        self.max_pending_observations = max_pending_observations;
        self
    }
}
