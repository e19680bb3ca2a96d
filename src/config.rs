//! Server configuration from the environment

use crate::state_machine::DEFAULT_RESPONSE_DELAY;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;

/// How long a session may go without an attached stream before it is closed
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Simulated "thinking" time before each scripted reply
    pub response_delay: Duration,
    pub session_idle: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            response_delay: DEFAULT_RESPONSE_DELAY,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

impl AppConfig {
    /// Read `CODEPAD_PORT`, `CODEPAD_RESPONSE_DELAY_MS` and `CODEPAD_SESSION_IDLE_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(&lookup, "CODEPAD_PORT", defaults.port);
        let response_delay = parse_or(
            &lookup,
            "CODEPAD_RESPONSE_DELAY_MS",
            u64::try_from(defaults.response_delay.as_millis()).unwrap_or(500),
        );
        let session_idle = parse_or(
            &lookup,
            "CODEPAD_SESSION_IDLE_MS",
            u64::try_from(defaults.session_idle.as_millis()).unwrap_or(30_000),
        );

        Self {
            port,
            response_delay: Duration::from_millis(response_delay),
            session_idle: Duration::from_millis(session_idle),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, fallback = %default, "Ignoring invalid setting");
            default
        }),
    }
}
