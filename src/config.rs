use std::env;
use std::time::Duration;

use uuid::Uuid;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MINE_TIMEOUT_SECS: u64 = 60;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Identity used as the sender of mining rewards.
    pub node_address: String,
    pub peer_timeout: Duration,
    /// Deadline for a single proof-of-work search; `None` searches forever.
    /// The ledger lock is held for the whole search, so every other request
    /// waits on it until the deadline.
    pub mine_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable values fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let node_address = lookup("NODE_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let peer_timeout = lookup("PEER_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS));
        let mine_timeout = match lookup("MINE_TIMEOUT_SECS") {
            Some(v) if v.trim().eq_ignore_ascii_case("off") => None,
            v => Some(Duration::from_secs(
                v.and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_MINE_TIMEOUT_SECS),
            )),
        };

        Self {
            host,
            port,
            node_address,
            peer_timeout,
            mine_timeout,
        }
    }
}
