pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use validator::is_valid_chain;

/// Hex prefix a proof digest must start with.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Puzzle solution hard-coded into the genesis block.
pub const GENESIS_SOLUTION: u64 = 1;

/// Sentinel previous-hash carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Receiver of the reward transaction added to every mined block.
pub const REWARD_RECEIVER: &str = "Maajee";

/// Amount of the mining reward.
pub const REWARD_AMOUNT: u64 = 1;
