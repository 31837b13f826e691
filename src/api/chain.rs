use actix_web::{HttpResponse, get, web};
use log::info;
use std::time::Instant;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::error::ApiError;

/// Get the full chain. Peers fetch this during consensus.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the local chain.
#[get("/is_valid")]
pub async fn validate_chain(state: web::Data<AppState>) -> HttpResponse {
    let valid = state.ledger.lock().expect("mutex poisoned").is_valid();
    let message = if valid {
        "All Good, Blockchain is valid."
    } else {
        "Something went wrong! Blockchain is Invalid."
    };
    HttpResponse::Ok().json(ValidateResponse { message, valid })
}

/// Mine a new block from the pending pool plus this node's reward.
///
/// The search runs on the blocking pool with the ledger lock held for the
/// whole unit, so no submission or replacement can interleave with it.
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let worker = state.clone();
    let block = web::block(move || {
        let deadline = worker.mine_timeout.map(|timeout| Instant::now() + timeout);
        let mut ledger = worker.ledger.lock().expect("mutex poisoned");
        ledger
            .mine_block(&worker.node_address, || {
                deadline.is_some_and(|deadline| Instant::now() >= deadline)
            })
            .cloned()
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(
        "MINER - sealed block #{} (solution={}, txs={})",
        block.index,
        block.puzzle_solution,
        block.transactions.len()
    );
    Ok(HttpResponse::Ok().json(MineResponse::from(block)))
}
