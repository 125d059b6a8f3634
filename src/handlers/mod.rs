pub mod event;
pub mod gift;

use actix_web::web;

/// Registers every route. Owner routes take an `OwnerSession` and answer
/// 401 on their own when the request carries no identity.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(event::init_public_routes)
        .configure(gift::init_public_routes)
        .configure(event::init_routes_with_auth)
        .configure(gift::init_routes_with_auth);
}
