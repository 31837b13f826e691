mod chain;
mod health;
pub mod models;
mod node;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

/// Routes are mounted at the root: peers fetch `/get_chain` directly.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::validate_chain)
        .service(chain::mine_block)
        .service(tx::add_transaction)
        .service(node::connect_node)
        .service(node::replace_chain);
}
