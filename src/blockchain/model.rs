use log::debug;
use serde_json::{Value, json};

use super::{
    Block, GENESIS_PREVIOUS_HASH, GENESIS_SOLUTION, REWARD_AMOUNT, REWARD_RECEIVER, pow,
    validator::is_valid_chain,
};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory ledger: the chain plus the pool of pending transactions.
///
/// Both collections live behind whatever single lock owns the `Ledger`, so
/// "append block + clear pool" is one step for every other caller.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.create_block(GENESIS_SOLUTION, GENESIS_PREVIOUS_HASH.to_string());
        ledger
    }

    /// Append a block sealing the whole pending pool. The solution and hash are
    /// trusted as given; the mining flow is responsible for their consistency.
    pub fn create_block(&mut self, puzzle_solution: u64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, puzzle_solution, previous_hash, transactions);
        self.chain.push(block);
        self.previous_block()
    }

    /// Return the last block in the chain.
    pub fn previous_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction and return the index of the block expected to
    /// include it. The index is informational and reserves nothing.
    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: Value,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, receiver, amount));
        self.previous_block().index + 1
    }

    /// Run the whole mining unit: solve against the previous block, add the
    /// reward transaction and seal the pool. `should_stop` can abort the
    /// search, in which case nothing is modified.
    pub fn mine_block(
        &mut self,
        miner_address: &str,
        should_stop: impl FnMut() -> bool,
    ) -> Result<&Block, LedgerError> {
        let previous = self.previous_block();
        let previous_solution = previous.puzzle_solution;
        let previous_hash = previous.digest();

        let solution = pow::solve_until(previous_solution, should_stop)
            .ok_or(LedgerError::MiningAborted { previous_solution })?;
        debug!("MINER - solved {previous_solution} -> {solution}");

        self.submit_transaction(miner_address, REWARD_RECEIVER, json!(REWARD_AMOUNT));
        Ok(self.create_block(solution, previous_hash))
    }

    /// Swap the owned chain wholesale. Callers validate first.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    /// Adopt `candidate` only if it is still strictly longer than the current
    /// chain. Returns whether the swap happened.
    pub fn replace_chain_if_longer(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            return false;
        }
        self.replace_chain(candidate);
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Never true after construction; the genesis block is always present.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run the chain validator over the owned chain.
    pub fn is_valid(&self) -> bool {
        is_valid_chain(&self.chain)
    }
}
