pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;
pub mod validation;

use sqlx::{postgres::Postgres, Pool};

use crate::{config::Config, db::Store};

pub type PGPool = Pool<Postgres>;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub store: Store,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            public_base_url: config.public_base_url.clone(),
        }
    }
}
