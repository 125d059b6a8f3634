use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoreResult};
use crate::{
    models::{Event, Gift, GiftRow, GiftStatus},
    PGPool,
};

const EVENT_COLUMNS: &str = "id, owner_id, title, description, event_date, created_at";

const GIFT_COLUMNS: &str = "id, event_id, owner_id, title, link, description, image_url, \
     category, status, reserved_by, reservation_date, created_at";

pub async fn init_db_pool(db_url: &str, max_connections: u32) -> StoreResult<PGPool> {
    warn!("connecting to database with at most {} connections", max_connections);
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await?;
    info!("connected to postgresql");
    Ok(pool)
}

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS events (
        id UUID PRIMARY KEY,
        owner_id UUID NOT NULL,
        title VARCHAR(100) NOT NULL,
        description VARCHAR(500),
        event_date DATE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS gifts (
        id UUID PRIMARY KEY,
        event_id UUID REFERENCES events(id) ON DELETE CASCADE,
        owner_id UUID NOT NULL,
        title VARCHAR(100) NOT NULL,
        link VARCHAR(2000),
        description VARCHAR(500),
        image_url VARCHAR(2000),
        category TEXT NOT NULL DEFAULT 'other',
        status TEXT NOT NULL DEFAULT 'available',
        reserved_by VARCHAR(50),
        reservation_date TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT gifts_reservation_consistent CHECK (
            (status = 'available' AND reserved_by IS NULL AND reservation_date IS NULL)
            OR (status = 'reserved' AND reserved_by IS NOT NULL AND reservation_date IS NOT NULL)
        )
    )",
    "CREATE INDEX IF NOT EXISTS gifts_event_id_idx ON gifts (event_id)",
    "CREATE INDEX IF NOT EXISTS events_created_at_idx ON events (created_at DESC)",
];

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn migrate(pool: &PGPool) -> StoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database schema is up to date");
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PGPool,
}

impl PgStore {
    pub fn new(pool: PGPool) -> Self {
        Self { pool }
    }
}

fn into_gift(row: Option<GiftRow>) -> StoreResult<Option<Gift>> {
    row.map(Gift::try_from).transpose()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO events (id, owner_id, title, description, event_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.id)
        .bind(event.owner_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn select_events(&self) -> StoreResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
        let events = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn select_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn count_gifts(&self, event_id: Uuid) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gifts WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|_| StoreError::corrupt(format!("negative row count {count}")))
    }

    async fn insert_gift(&self, gift: &Gift) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO gifts (id, event_id, owner_id, title, link, description, image_url,
                category, status, reserved_by, reservation_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(gift.id)
        .bind(gift.event_id)
        .bind(gift.owner_id)
        .bind(&gift.title)
        .bind(&gift.link)
        .bind(&gift.description)
        .bind(&gift.image_url)
        .bind(gift.category.as_str())
        .bind(gift.state.status().as_str())
        .bind(gift.state.reserved_by())
        .bind(gift.state.reservation_date())
        .bind(gift.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn select_gifts(&self, event_id: Uuid) -> StoreResult<Vec<Gift>> {
        let sql = format!(
            "SELECT {GIFT_COLUMNS} FROM gifts WHERE event_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, GiftRow>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Gift::try_from).collect()
    }

    async fn select_gift(&self, id: Uuid) -> StoreResult<Option<Gift>> {
        let sql = format!("SELECT {GIFT_COLUMNS} FROM gifts WHERE id = $1");
        let row = sqlx::query_as::<_, GiftRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        into_gift(row)
    }

    async fn reserve_gift_if_available(
        &self,
        id: Uuid,
        guest_name: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Gift>> {
        // The status predicate is the whole concurrency guard: Postgres
        // serializes writers on the row, and the loser re-evaluates the
        // WHERE clause against the winner's committed version.
        let sql = format!(
            "UPDATE gifts SET status = $2, reserved_by = $3, reservation_date = $4
            WHERE id = $1 AND status = $5
            RETURNING {GIFT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GiftRow>(&sql)
            .bind(id)
            .bind(GiftStatus::Reserved.as_str())
            .bind(guest_name)
            .bind(at)
            .bind(GiftStatus::Available.as_str())
            .fetch_optional(&self.pool)
            .await?;
        into_gift(row)
    }

    async fn release_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Gift>> {
        let sql = format!(
            "UPDATE gifts SET status = $3, reserved_by = NULL, reservation_date = NULL
            WHERE id = $1 AND owner_id = $2
            RETURNING {GIFT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GiftRow>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(GiftStatus::Available.as_str())
            .fetch_optional(&self.pool)
            .await?;
        into_gift(row)
    }

    async fn delete_gift(&self, id: Uuid, owner_id: Uuid) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM gifts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_event_with_gifts(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        // Row lock blocks concurrent gift inserts (their foreign key check
        // needs a share lock on this row) until the transaction ends.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM events WHERE id = $1 AND owner_id = $2 FOR UPDATE")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let gifts = sqlx::query("DELETE FROM gifts WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(gifts))
    }
}
