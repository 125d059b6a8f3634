//! In-process record store.
//!
//! Holds both tables behind one lock, so each call is atomic with respect
//! to every other call, the same per-row guarantee the Postgres store gets
//! from row-level write serialization. Used by the test suite and for
//! `STORE_BACKEND=memory` development runs.

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{Event, Gift, GiftState};

struct Row<T> {
    // Insertion order, breaks ties between equal `created_at` values.
    seq: u64,
    value: T,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    events: HashMap<Uuid, Row<Event>>,
    gifts: HashMap<Uuid, Row<Gift>>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(mut rows: Vec<&Row<T>>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by_key(|row| Reverse((created_at(&row.value), row.seq)));
    rows.into_iter().map(|row| row.value.clone()).collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(StoreError::database(format!("duplicate event id {}", event.id)));
        }
        let seq = tables.next_seq();
        tables.events.insert(
            event.id,
            Row {
                seq,
                value: event.clone(),
            },
        );
        Ok(())
    }

    async fn select_events(&self) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.events.values().collect(), |e: &Event| e.created_at))
    }

    async fn select_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).map(|row| row.value.clone()))
    }

    async fn count_gifts(&self, event_id: Uuid) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        let count = tables
            .gifts
            .values()
            .filter(|row| row.value.event_id == Some(event_id))
            .count();
        Ok(count as u64)
    }

    async fn insert_gift(&self, gift: &Gift) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.gifts.contains_key(&gift.id) {
            return Err(StoreError::database(format!("duplicate gift id {}", gift.id)));
        }
        if let Some(event_id) = gift.event_id {
            if !tables.events.contains_key(&event_id) {
                return Err(StoreError::database(format!(
                    "gift references missing event {event_id}"
                )));
            }
        }
        let seq = tables.next_seq();
        tables.gifts.insert(
            gift.id,
            Row {
                seq,
                value: gift.clone(),
            },
        );
        Ok(())
    }

    async fn select_gifts(&self, event_id: Uuid) -> StoreResult<Vec<Gift>> {
        let tables = self.tables.read().await;
        let rows: Vec<&Row<Gift>> = tables
            .gifts
            .values()
            .filter(|row| row.value.event_id == Some(event_id))
            .collect();
        Ok(newest_first(rows, |g: &Gift| g.created_at))
    }

    async fn select_gift(&self, id: Uuid) -> StoreResult<Option<Gift>> {
        let tables = self.tables.read().await;
        Ok(tables.gifts.get(&id).map(|row| row.value.clone()))
    }

    async fn reserve_gift_if_available(
        &self,
        id: Uuid,
        guest_name: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Gift>> {
        let mut tables = self.tables.write().await;
        match tables.gifts.get_mut(&id) {
            Some(row) if row.value.state.is_available() => {
                row.value.state = GiftState::Reserved {
                    reserved_by: guest_name.to_string(),
                    reservation_date: at,
                };
                Ok(Some(row.value.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Gift>> {
        let mut tables = self.tables.write().await;
        match tables.gifts.get_mut(&id) {
            Some(row) if row.value.owner_id == owner_id => {
                row.value.state = GiftState::Available;
                Ok(Some(row.value.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let owned = matches!(tables.gifts.get(&id), Some(row) if row.value.owner_id == owner_id);
        if owned {
            tables.gifts.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn delete_event_with_gifts(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<u64>> {
        let mut tables = self.tables.write().await;
        let owned = matches!(tables.events.get(&id), Some(row) if row.value.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        let before = tables.gifts.len();
        tables.gifts.retain(|_, row| row.value.event_id != Some(id));
        let removed = (before - tables.gifts.len()) as u64;
        tables.events.remove(&id);
        Ok(Some(removed))
    }
}
