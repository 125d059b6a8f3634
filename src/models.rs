use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::db::StoreError;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// An event as listed to guests and owners, with the number of gifts it
/// held when it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub gifts_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftStatus {
    Available,
    Reserved,
}

impl GiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftStatus::Available => "available",
            GiftStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GiftStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(GiftStatus::Available),
            "reserved" => Ok(GiftStatus::Reserved),
            other => Err(StoreError::corrupt(format!("unknown gift status '{other}'"))),
        }
    }
}

/// Reservation state of a gift. A reserved gift always carries both the
/// guest name and the reservation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GiftState {
    Available,
    Reserved {
        reserved_by: String,
        reservation_date: DateTime<Utc>,
    },
}

impl GiftState {
    pub fn status(&self) -> GiftStatus {
        match self {
            GiftState::Available => GiftStatus::Available,
            GiftState::Reserved { .. } => GiftStatus::Reserved,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, GiftState::Available)
    }

    pub fn reserved_by(&self) -> Option<&str> {
        match self {
            GiftState::Available => None,
            GiftState::Reserved { reserved_by, .. } => Some(reserved_by),
        }
    }

    pub fn reservation_date(&self) -> Option<DateTime<Utc>> {
        match self {
            GiftState::Available => None,
            GiftState::Reserved {
                reservation_date, ..
            } => Some(*reservation_date),
        }
    }

    /// Rebuilds the state from the three stored columns, rejecting any
    /// combination other than all-set or all-clear.
    pub fn from_columns(
        status: GiftStatus,
        reserved_by: Option<String>,
        reservation_date: Option<DateTime<Utc>>,
    ) -> Result<Self, StoreError> {
        match (status, reserved_by, reservation_date) {
            (GiftStatus::Available, None, None) => Ok(GiftState::Available),
            (GiftStatus::Reserved, Some(reserved_by), Some(reservation_date)) => {
                Ok(GiftState::Reserved {
                    reserved_by,
                    reservation_date,
                })
            }
            (status, by, at) => Err(StoreError::corrupt(format!(
                "gift status '{}' with reserved_by set: {}, reservation_date set: {}",
                status,
                by.is_some(),
                at.is_some()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCategory {
    Electronics,
    Clothing,
    Books,
    Toys,
    Home,
    Sports,
    Beauty,
    Food,
    #[default]
    Other,
}

impl GiftCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCategory::Electronics => "electronics",
            GiftCategory::Clothing => "clothing",
            GiftCategory::Books => "books",
            GiftCategory::Toys => "toys",
            GiftCategory::Home => "home",
            GiftCategory::Sports => "sports",
            GiftCategory::Beauty => "beauty",
            GiftCategory::Food => "food",
            GiftCategory::Other => "other",
        }
    }
}

impl FromStr for GiftCategory {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "electronics" => GiftCategory::Electronics,
            "clothing" => GiftCategory::Clothing,
            "books" => GiftCategory::Books,
            "toys" => GiftCategory::Toys,
            "home" => GiftCategory::Home,
            "sports" => GiftCategory::Sports,
            "beauty" => GiftCategory::Beauty,
            "food" => GiftCategory::Food,
            "other" => GiftCategory::Other,
            other => return Err(StoreError::corrupt(format!("unknown gift category '{other}'"))),
        };
        Ok(category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gift {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: GiftCategory,
    #[serde(flatten)]
    pub state: GiftState,
    pub created_at: DateTime<Utc>,
}

/// A `gifts` row exactly as the database returns it.
#[derive(Debug, FromRow)]
pub struct GiftRow {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub status: String,
    pub reserved_by: Option<String>,
    pub reservation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GiftRow> for Gift {
    type Error = StoreError;

    fn try_from(row: GiftRow) -> Result<Self, Self::Error> {
        let status: GiftStatus = row.status.parse()?;
        let state = GiftState::from_columns(status, row.reserved_by, row.reservation_date)?;
        Ok(Gift {
            id: row.id,
            event_id: row.event_id,
            owner_id: row.owner_id,
            title: row.title,
            link: row.link,
            description: row.description,
            image_url: row.image_url,
            category: row.category.parse()?,
            state,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, reserved_by: Option<&str>, at: Option<DateTime<Utc>>) -> GiftRow {
        GiftRow {
            id: Uuid::new_v4(),
            event_id: Some(Uuid::new_v4()),
            owner_id: Uuid::new_v4(),
            title: "Kettle".to_string(),
            link: None,
            description: None,
            image_url: None,
            category: "home".to_string(),
            status: status.to_string(),
            reserved_by: reserved_by.map(str::to_string),
            reservation_date: at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn consistent_rows_convert() {
        let gift = Gift::try_from(row("available", None, None)).unwrap();
        assert!(gift.state.is_available());
        assert_eq!(gift.category, GiftCategory::Home);

        let now = Utc::now();
        let gift = Gift::try_from(row("reserved", Some("Alice"), Some(now))).unwrap();
        assert_eq!(gift.state.reserved_by(), Some("Alice"));
        assert_eq!(gift.state.reservation_date(), Some(now));
    }

    #[test]
    fn partial_reservation_rows_are_rejected() {
        let now = Utc::now();
        assert!(Gift::try_from(row("reserved", Some("Alice"), None)).is_err());
        assert!(Gift::try_from(row("reserved", None, Some(now))).is_err());
        assert!(Gift::try_from(row("available", Some("Alice"), None)).is_err());
        assert!(Gift::try_from(row("available", None, Some(now))).is_err());
        assert!(Gift::try_from(row("pending", None, None)).is_err());
    }

    #[test]
    fn gift_json_hides_owner_and_flattens_state() {
        let now = Utc::now();
        let gift = Gift::try_from(row("reserved", Some("Bob"), Some(now))).unwrap();
        let json = serde_json::to_value(&gift).unwrap();
        assert_eq!(json["status"], "reserved");
        assert_eq!(json["reserved_by"], "Bob");
        assert!(json.get("owner_id").is_none());

        let available = Gift::try_from(row("available", None, None)).unwrap();
        let json = serde_json::to_value(&available).unwrap();
        assert_eq!(json["status"], "available");
        assert!(json.get("reserved_by").is_none());
    }

    #[test]
    fn categories_use_lowercase_names_on_the_wire() {
        let parsed: GiftCategory = serde_json::from_str("\"books\"").unwrap();
        assert_eq!(parsed, GiftCategory::Books);
        assert_eq!(serde_json::to_value(GiftCategory::Electronics).unwrap(), "electronics");
        assert!(serde_json::from_str::<GiftCategory>("\"Books\"").is_err());
    }
}
