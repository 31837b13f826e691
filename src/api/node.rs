use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, ConnectRequest, ConnectResponse, PeerReport, ReplaceResponse};
use crate::error::ApiError;
use crate::network::{Resolver, registry::canonical_address};

/// Register peers. The whole batch is rejected if any address is malformed.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> Result<HttpResponse, ApiError> {
    let nodes = body.into_inner().nodes.ok_or(ApiError::MissingNodes)?;
    for node in &nodes {
        canonical_address(node)?;
    }

    let total_nodes = {
        let mut registry = state.nodes.lock().expect("mutex poisoned");
        for node in &nodes {
            registry.add(node)?;
        }
        registry.all().iter().cloned().collect::<Vec<_>>()
    };
    info!("NODES - {} peers known", total_nodes.len());

    Ok(HttpResponse::Created().json(ConnectResponse {
        message: "All nodes are now connected. The ledger now contains the following nodes:",
        total_nodes,
    }))
}

/// Run a consensus pass and report the resulting chain.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> HttpResponse {
    let resolution = Resolver::new(&state.fetcher)
        .resolve(&state.ledger, &state.nodes)
        .await;

    let message = if resolution.replaced {
        "The nodes had different chains so the chain was replaced by the longest one."
    } else {
        "All good, the chain is the largest one."
    };
    let peers = resolution
        .outcomes
        .iter()
        .map(|(node, outcome)| PeerReport { node, outcome })
        .collect();
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ReplaceResponse {
        message,
        replaced: resolution.replaced,
        chain: ledger.chain(),
        peers,
    })
}
