#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use wishlist_service::{
    db::{memory::MemoryStore, RecordStore, Store, StoreError, StoreResult},
    dto::{NewEventDto, NewGiftDto},
    models::{Event, Gift},
    service::{
        self,
        session::{OwnerIdentity, OwnerSession},
    },
};

pub fn store() -> Store {
    Arc::new(MemoryStore::new())
}

pub fn owner() -> OwnerSession {
    session_for(Uuid::new_v4())
}

pub fn session_for(owner_id: Uuid) -> OwnerSession {
    OwnerSession::require(Some(OwnerIdentity::new(owner_id))).unwrap()
}

pub async fn event(store: &Store, session: &OwnerSession, title: &str) -> Event {
    let dto = NewEventDto {
        title: title.to_string(),
        ..Default::default()
    };
    service::event::create_event(store.as_ref(), session, dto).await.unwrap()
}

pub async fn gift(store: &Store, session: &OwnerSession, event_id: Uuid, title: &str) -> Gift {
    let dto = NewGiftDto {
        title: title.to_string(),
        ..Default::default()
    };
    service::gift::create_gift(store.as_ref(), session, event_id, dto)
        .await
        .unwrap()
}

/// Every call fails as if the network were down.
pub struct FailingStore;

fn refused<T>() -> StoreResult<T> {
    Err(StoreError::database("connection refused"))
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert_event(&self, _: &Event) -> StoreResult<()> {
        refused()
    }

    async fn select_events(&self) -> StoreResult<Vec<Event>> {
        refused()
    }

    async fn select_event(&self, _: Uuid) -> StoreResult<Option<Event>> {
        refused()
    }

    async fn count_gifts(&self, _: Uuid) -> StoreResult<u64> {
        refused()
    }

    async fn insert_gift(&self, _: &Gift) -> StoreResult<()> {
        refused()
    }

    async fn select_gifts(&self, _: Uuid) -> StoreResult<Vec<Gift>> {
        refused()
    }

    async fn select_gift(&self, _: Uuid) -> StoreResult<Option<Gift>> {
        refused()
    }

    async fn reserve_gift_if_available(&self, _: Uuid, _: &str, _: DateTime<Utc>) -> StoreResult<Option<Gift>> {
        refused()
    }

    async fn release_gift(&self, _: Uuid, _: Uuid) -> StoreResult<Option<Gift>> {
        refused()
    }

    async fn delete_gift(&self, _: Uuid, _: Uuid) -> StoreResult<u64> {
        refused()
    }

    async fn delete_event_with_gifts(&self, _: Uuid, _: Uuid) -> StoreResult<Option<u64>> {
        refused()
    }
}
