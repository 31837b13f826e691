use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::consensus::{ChainFetcher, PeerChain};
use crate::error::FetchError;

/// Fetches peer chains from `GET http://<peer>/get_chain`.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
        let response = self.client.get(chain_url(peer)).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }
        // A body without `length`/`chain` counts as a failed fetch.
        response.json::<PeerChain>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Malformed(e.to_string())
            } else {
                FetchError::Transport(e)
            }
        })
    }
}

fn chain_url(peer: &str) -> String {
    format!("http://{peer}/get_chain")
}
