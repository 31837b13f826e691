pub mod client;
pub mod consensus;
pub mod registry;

pub use client::HttpChainFetcher;
pub use consensus::{PeerOutcome, Resolver};
pub use registry::NodeRegistry;
