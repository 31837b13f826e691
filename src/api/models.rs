use crate::blockchain::{Block, Ledger};
use crate::config::Settings;
use crate::error::FetchError;
use crate::network::{HttpChainFetcher, NodeRegistry, PeerOutcome};
use crate::transaction::Transaction;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// Per-process node context, built once at startup and shared by every handler.
///
/// The ledger sits behind one mutex so mining (read tip, solve, append, clear
/// pool), transaction submission and chain replacement are serialized.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub nodes: Mutex<NodeRegistry>,
    pub node_address: String,
    pub fetcher: HttpChainFetcher,
    pub mine_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        Ok(Self {
            ledger: Mutex::new(Ledger::new()),
            nodes: Mutex::new(NodeRegistry::new()),
            node_address: settings.node_address.clone(),
            fetcher: HttpChainFetcher::new(settings.peer_timeout)?,
            mine_timeout: settings.mine_timeout,
        })
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: String,
    pub puzzle_solution: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: format!("Congratulations, you have just mined block {}!", block.index),
            index: block.index,
            timestamp: block.timestamp,
            puzzle_solution: block.puzzle_solution,
            previous_hash: block.previous_hash,
            transactions: block.transactions,
        }
    }
}

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub message: &'static str,
    pub valid: bool,
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing key is reported by name instead of as a
/// generic JSON error. `amount` is `None` only when the key is absent; any
/// present value, `null` included, is taken as is.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct PeerReport<'a> {
    pub node: &'a str,
    pub outcome: &'a PeerOutcome,
}

#[derive(Serialize)]
pub struct ReplaceResponse<'a> {
    pub message: &'static str,
    pub replaced: bool,
    pub chain: &'a [Block],
    pub peers: Vec<PeerReport<'a>>,
}
