use std::collections::BTreeSet;

use url::Url;

use crate::error::RegistryError;

/// Deduplicated set of peer addresses in canonical `host:port` form.
///
/// Backed by a `BTreeSet`, so peers are always visited in lexicographic order.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer given as a URL (`http://127.0.0.1:5001/`) or a bare
    /// `host:port`. Re-adding a known peer is a no-op; returns whether the
    /// address was new.
    pub fn add(&mut self, address: &str) -> Result<bool, RegistryError> {
        let canonical = canonical_address(address)?;
        Ok(self.nodes.insert(canonical))
    }

    pub fn all(&self) -> &BTreeSet<String> {
        &self.nodes
    }
}

/// Normalize a peer URL or address to `host:port`, filling in the scheme's
/// default port when none is given.
pub fn canonical_address(address: &str) -> Result<String, RegistryError> {
    let invalid = || RegistryError::InvalidAddress(address.to_string());
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| invalid())?;

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    let port = url.port_or_known_default().ok_or_else(invalid)?;
    Ok(format!("{host}:{port}"))
}
