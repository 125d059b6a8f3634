use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::GiftCategory;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewEventDto {
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewGiftDto {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<GiftCategory>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReserveGiftDto {
    pub guest_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEventResponse {
    pub gifts_removed: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

impl Claims {
    pub fn new(owner_id: &Uuid, exp: usize) -> Self {
        Self {
            sub: *owner_id,
            exp,
        }
    }
}
