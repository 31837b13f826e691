use std::sync::Mutex;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::NodeRegistry;
use crate::blockchain::{Block, Ledger, is_valid_chain};
use crate::error::FetchError;

/// What a peer reports from its `get_chain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Source of peer chains. Production nodes go over HTTP; tests plug in
/// in-memory peers.
pub trait ChainFetcher {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<PeerChain, FetchError>>;
}

/// How a single peer fared during a consensus pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeerOutcome {
    /// Fetch failed or the response could not be decoded.
    Unreachable { reason: String },
    /// Chain is not longer than the best seen so far.
    NotLonger { length: usize },
    /// Reported length disagrees with the chain actually sent.
    LengthMismatch { reported: usize, actual: usize },
    /// Longer, but fails validation.
    Invalid { length: usize },
    /// Longer and valid; became the running best.
    Candidate { length: usize },
}

#[derive(Debug)]
pub struct Resolution {
    pub replaced: bool,
    pub outcomes: Vec<(String, PeerOutcome)>,
}

/// Longest-valid-chain conflict resolution.
pub struct Resolver<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: ChainFetcher> Resolver<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Ask every registered peer for its chain and adopt the longest valid one
    /// if it beats the local chain.
    ///
    /// Peers are queried one at a time in address order, so among equally long
    /// winners the lexicographically smallest address is kept. No lock is held
    /// while waiting on the network; the final swap re-checks the length under
    /// the ledger lock in case a block was mined meanwhile.
    pub async fn resolve(
        &self,
        ledger: &Mutex<Ledger>,
        registry: &Mutex<NodeRegistry>,
    ) -> Resolution {
        let peers: Vec<String> = {
            let registry = registry.lock().expect("mutex poisoned");
            registry.all().iter().cloned().collect()
        };
        let mut best_length = {
            let ledger = ledger.lock().expect("mutex poisoned");
            ledger.len()
        };
        debug!(
            "CONSENSUS - scanning {} peers (local length {best_length})",
            peers.len()
        );

        let mut best_chain: Option<Vec<Block>> = None;
        let mut outcomes = Vec::with_capacity(peers.len());

        for peer in peers {
            let outcome = match self.fetcher.fetch_chain(&peer).await {
                Err(e) => PeerOutcome::Unreachable {
                    reason: e.to_string(),
                },
                Ok(PeerChain { length, chain }) => {
                    if length <= best_length {
                        PeerOutcome::NotLonger { length }
                    } else if length != chain.len() {
                        PeerOutcome::LengthMismatch {
                            reported: length,
                            actual: chain.len(),
                        }
                    } else if !is_valid_chain(&chain) {
                        PeerOutcome::Invalid { length }
                    } else {
                        best_length = length;
                        best_chain = Some(chain);
                        PeerOutcome::Candidate { length }
                    }
                }
            };

            match &outcome {
                PeerOutcome::Unreachable { reason } => {
                    warn!("CONSENSUS - peer {peer} unreachable: {reason}")
                }
                PeerOutcome::LengthMismatch { reported, actual } => warn!(
                    "CONSENSUS - peer {peer} reported length {reported} but sent {actual} blocks"
                ),
                PeerOutcome::Invalid { length } => {
                    warn!("CONSENSUS - peer {peer} sent an invalid chain of length {length}")
                }
                other => debug!("CONSENSUS - peer {peer}: {other:?}"),
            }
            outcomes.push((peer, outcome));
        }

        let replaced = match best_chain {
            Some(chain) => {
                let mut ledger = ledger.lock().expect("mutex poisoned");
                ledger.replace_chain_if_longer(chain)
            }
            None => false,
        };
        if replaced {
            info!("CONSENSUS - adopted peer chain of length {best_length}");
        }

        Resolution { replaced, outcomes }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{ChainFetcher, PeerChain, PeerOutcome, Resolver};
    use crate::blockchain::{Block, Ledger};
    use crate::error::FetchError;
    use crate::network::NodeRegistry;

    /// Peers answering from memory; unknown peers are unreachable.
    #[derive(Default)]
    struct StaticPeers {
        chains: HashMap<String, PeerChain>,
    }

    impl StaticPeers {
        fn with(mut self, peer: &str, chain: Vec<Block>) -> Self {
            let length = chain.len();
            self.chains.insert(peer.to_string(), PeerChain { length, chain });
            self
        }

        fn with_reported(mut self, peer: &str, length: usize, chain: Vec<Block>) -> Self {
            self.chains.insert(peer.to_string(), PeerChain { length, chain });
            self
        }
    }

    impl ChainFetcher for StaticPeers {
        async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
            self.chains.get(peer).cloned().ok_or(FetchError::Status(404))
        }
    }

    fn mined(blocks: usize) -> Ledger {
        let mut ledger = Ledger::new();
        for _ in 0..blocks {
            ledger.mine_block("miner", || false).unwrap();
        }
        ledger
    }

    fn registry(peers: &[&str]) -> Mutex<NodeRegistry> {
        let mut registry = NodeRegistry::new();
        for peer in peers {
            registry.add(peer).unwrap();
        }
        Mutex::new(registry)
    }

    #[actix_web::test]
    async fn adopts_longest_valid_chain() {
        let peer_a = mined(4).chain().to_vec();
        let peer_b = mined(2).chain().to_vec();
        let fetcher = StaticPeers::default()
            .with("a.peer:5000", peer_a.clone())
            .with("b.peer:5000", peer_b);
        let ledger = Mutex::new(mined(3));
        let nodes = registry(&["a.peer:5000", "b.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(resolution.replaced);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.chain(), peer_a.as_slice());
        assert_eq!(
            resolution.outcomes,
            vec![
                ("a.peer:5000".to_string(), PeerOutcome::Candidate { length: 5 }),
                ("b.peer:5000".to_string(), PeerOutcome::NotLonger { length: 3 }),
            ]
        );
    }

    #[actix_web::test]
    async fn keeps_local_chain_when_nothing_is_longer() {
        let fetcher = StaticPeers::default().with("a.peer:5000", mined(1).chain().to_vec());
        let local = mined(1);
        let before = local.chain().to_vec();
        let ledger = Mutex::new(local);
        let nodes = registry(&["a.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(!resolution.replaced);
        assert_eq!(ledger.lock().unwrap().chain(), before.as_slice());
    }

    #[actix_web::test]
    async fn rejects_longer_invalid_chain() {
        let mut forged = mined(3).chain().to_vec();
        forged[2].previous_hash = "f".repeat(64);
        let fetcher = StaticPeers::default().with("a.peer:5000", forged);
        let ledger = Mutex::new(Ledger::new());
        let nodes = registry(&["a.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(!resolution.replaced);
        assert_eq!(ledger.lock().unwrap().len(), 1);
        assert_eq!(resolution.outcomes[0].1, PeerOutcome::Invalid { length: 4 });
    }

    #[actix_web::test]
    async fn rejects_inflated_length() {
        let fetcher =
            StaticPeers::default().with_reported("a.peer:5000", 10, mined(1).chain().to_vec());
        let ledger = Mutex::new(Ledger::new());
        let nodes = registry(&["a.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(!resolution.replaced);
        assert_eq!(
            resolution.outcomes[0].1,
            PeerOutcome::LengthMismatch { reported: 10, actual: 2 }
        );
    }

    #[actix_web::test]
    async fn unreachable_peers_are_skipped() {
        let longer = mined(2).chain().to_vec();
        let fetcher = StaticPeers::default().with("b.peer:5000", longer.clone());
        let ledger = Mutex::new(Ledger::new());
        let nodes = registry(&["a.peer:5000", "b.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(resolution.replaced);
        assert!(matches!(resolution.outcomes[0].1, PeerOutcome::Unreachable { .. }));
        assert_eq!(ledger.lock().unwrap().chain(), longer.as_slice());
    }

    #[actix_web::test]
    async fn equal_length_tie_goes_to_smallest_address() {
        let first = mined(2).chain().to_vec();
        let second = mined(2).chain().to_vec();
        let fetcher = StaticPeers::default()
            .with("z.peer:5000", second)
            .with("a.peer:5000", first.clone());
        let ledger = Mutex::new(Ledger::new());
        let nodes = registry(&["z.peer:5000", "a.peer:5000"]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(resolution.replaced);
        assert_eq!(ledger.lock().unwrap().chain(), first.as_slice());
        assert_eq!(resolution.outcomes[1].1, PeerOutcome::NotLonger { length: 3 });
    }

    #[actix_web::test]
    async fn no_peers_means_no_change() {
        let fetcher = StaticPeers::default();
        let ledger = Mutex::new(Ledger::new());
        let nodes = registry(&[]);

        let resolution = Resolver::new(&fetcher).resolve(&ledger, &nodes).await;

        assert!(!resolution.replaced);
        assert!(resolution.outcomes.is_empty());
    }
}
