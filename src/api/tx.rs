use actix_web::{HttpResponse, post, web};
use log::debug;

use super::models::{AppState, NewTxRequest, NewTxResponse};
use crate::error::ApiError;

/// Queue a transaction for the next mined block. Values are not checked.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, ApiError> {
    let NewTxRequest {
        sender,
        receiver,
        amount,
    } = body.into_inner();
    let sender = sender.ok_or(ApiError::MissingField("sender"))?;
    let receiver = receiver.ok_or(ApiError::MissingField("receiver"))?;
    let amount = amount.ok_or(ApiError::MissingField("amount"))?;

    let (index, pending) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let index = ledger.submit_transaction(sender, receiver, amount);
        (index, ledger.pending().len())
    };
    debug!("POST /add_transaction - queued for block {index} ({pending} pending)");

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to block {index}"),
        index,
    }))
}
