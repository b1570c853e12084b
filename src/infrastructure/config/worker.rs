//! Worker endpoint settings.

use std::time::Duration;

use serde::Deserialize;

/// `[worker]` section: how to reach a worker's generation server.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Port the generation server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Use `wss`/`https` instead of `ws`/`http`.
    #[serde(default)]
    pub tls: bool,
    /// Timeout for the advisory shutdown notice (milliseconds).
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
    /// Timeout for opening a generation session (milliseconds).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Longest silence tolerated mid-stream (seconds).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Fragments buffered per generation stream.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_ms() -> u64 {
    2_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_idle_timeout_secs() -> u64 {
    120
}

fn default_stream_buffer() -> usize {
    64
}

impl WorkerConfig {
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            tls: false,
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            idle_timeout_secs: default_idle_timeout_secs(),
            stream_buffer: default_stream_buffer(),
        }
    }
}
