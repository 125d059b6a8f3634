pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use log::info;
use uuid::Uuid;

use crate::{
    config::{Config, StoreBackend},
    models::{Event, Gift},
};

#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display(fmt = "database error: {}", message)]
    Database { message: String },

    /// A row came back in a shape the domain types cannot represent.
    #[display(fmt = "corrupt row: {}", message)]
    CorruptRow { message: String },
}

impl StoreError {
    pub fn database(message: impl Into<String>) -> Self {
        StoreError::Database {
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        StoreError::CorruptRow {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::database(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The record store the services talk to.
///
/// Every mutation outside the reservation path is filtered by `owner_id`,
/// so a mismatched owner simply matches zero rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_event(&self, event: &Event) -> StoreResult<()>;

    /// All events, newest first.
    async fn select_events(&self) -> StoreResult<Vec<Event>>;

    async fn select_event(&self, id: Uuid) -> StoreResult<Option<Event>>;

    async fn count_gifts(&self, event_id: Uuid) -> StoreResult<u64>;

    async fn insert_gift(&self, gift: &Gift) -> StoreResult<()>;

    /// Gifts of one event, newest first.
    async fn select_gifts(&self, event_id: Uuid) -> StoreResult<Vec<Gift>>;

    async fn select_gift(&self, id: Uuid) -> StoreResult<Option<Gift>>;

    /// Sets the gift to reserved only where `id = id AND status =
    /// 'available'`, as one atomic write. `None` means no row matched.
    async fn reserve_gift_if_available(
        &self,
        id: Uuid,
        guest_name: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Gift>>;

    /// Clears any reservation on the owner's gift regardless of its status.
    async fn release_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Gift>>;

    /// Returns the number of deleted rows.
    async fn delete_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<u64>;

    /// Removes the event's gifts and then the event in one unit. `None`
    /// when the event did not match, in which case nothing is removed.
    async fn delete_event_with_gifts(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<u64>>;
}

pub type Store = Arc<dyn RecordStore>;

pub async fn connect(config: &Config) -> StoreResult<Store> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = postgres::init_db_pool(&config.database_url, config.db_max_connections).await?;
            postgres::migrate(&pool).await?;
            Ok(Arc::new(postgres::PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            info!("using in-memory record store");
            Ok(Arc::new(memory::MemoryStore::new()))
        }
    }
}
