use std::io;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use wishlist_service::{
    config::Config,
    db, handlers,
    service::{auth::{jwt::JwtKeys, AuthMiddleware}, log::{init_logger, LoggerMiddleware}},
    AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    init_logger();

    let config = Config::from_env()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let store = db::connect(&config)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    let state = web::Data::new(AppState::new(store, &config));
    let keys = JwtKeys::from_secret(&config.jwt_secret);

    info!("listening on {}:{}", config.bind_addr, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware::new(keys.clone()))
            .wrap(LoggerMiddleware)
            .configure(handlers::init_routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
