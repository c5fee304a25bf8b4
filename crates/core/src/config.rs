use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::job::Priority;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u8(key: &str, default: u8) -> u8 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            ingest: IngestConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  server:  host={}, port={}",
            self.server.host,
            self.server.port
        );
        tracing::info!(
            "  ingest:  batch_size={}, rate_limit_interval={}ms, process_delay={}ms/id",
            self.ingest.batch_size,
            self.ingest.rate_limit_interval_ms,
            self.ingest.process_delay_ms
        );
        tracing::info!(
            "  weights: HIGH={}, MEDIUM={}, LOW={}",
            self.ingest.weights.high,
            self.ingest.weights.medium,
            self.ingest.weights.low
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8000),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

// ── Ingestion ─────────────────────────────────────────────────

/// Batching and dispatch knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Max ids per batch (clamped to at least 1).
    pub batch_size: usize,
    /// Minimum spacing between dispatch starts, in milliseconds.
    pub rate_limit_interval_ms: u64,
    /// Simulated processing delay per id, in milliseconds.
    pub process_delay_ms: u64,
    pub weights: PriorityWeights,
}

impl IngestConfig {
    fn from_env() -> Self {
        Self {
            batch_size: env_usize("BATCH_SIZE", 3).max(1),
            rate_limit_interval_ms: env_u64("RATE_LIMIT_INTERVAL_MS", 5_000),
            process_delay_ms: env_u64("PROCESS_DELAY_MS", 1_000),
            weights: PriorityWeights::from_env(),
        }
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn process_delay(&self) -> Duration {
        Duration::from_millis(self.process_delay_ms)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            rate_limit_interval_ms: 5_000,
            process_delay_ms: 1_000,
            weights: PriorityWeights::default(),
        }
    }
}

// ── Priority weights ──────────────────────────────────────────

/// Queue ordering weights; lower value means served first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

impl PriorityWeights {
    fn from_env() -> Self {
        Self {
            high: env_u8("PRIORITY_WEIGHT_HIGH", 1),
            medium: env_u8("PRIORITY_WEIGHT_MEDIUM", 2),
            low: env_u8("PRIORITY_WEIGHT_LOW", 3),
        }
    }

    pub fn weight_for(&self, priority: Priority) -> u8 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            high: 1,
            medium: 2,
            low: 3,
        }
    }
}
