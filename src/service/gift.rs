use chrono::Utc;
use log::info;
use uuid::Uuid;

use super::{event::get_owned_event, session::OwnerSession, store_failure};
use crate::{
    db::RecordStore,
    dto::NewGiftDto,
    errors::AppError,
    models::{Gift, GiftState},
    validation::{self, DESCRIPTION_MAX},
};

/// Gifts of a single event, newest first. Read-only and open to guests.
pub async fn list_gifts(store: &dyn RecordStore, event_id: Uuid) -> Result<Vec<Gift>, AppError> {
    store.select_gifts(event_id).await.map_err(store_failure)
}

/// Adds an `available` gift to one of the session's events.
pub async fn create_gift(
    store: &dyn RecordStore,
    session: &OwnerSession,
    event_id: Uuid,
    dto: NewGiftDto,
) -> Result<Gift, AppError> {
    let NewGiftDto {
        title,
        link,
        description,
        image_url,
        category,
    } = dto;
    let gift = Gift {
        id: Uuid::new_v4(),
        event_id: Some(event_id),
        owner_id: session.owner_id(),
        title: validation::title("title", &title)?,
        link: validation::optional_url("link", link.as_deref())?,
        description: validation::optional_text("description", description.as_deref(), DESCRIPTION_MAX)?,
        image_url: validation::optional_url("image_url", image_url.as_deref())?,
        category: category.unwrap_or_default(),
        state: GiftState::Available,
        created_at: Utc::now(),
    };

    get_owned_event(store, session, event_id).await?;
    store.insert_gift(&gift).await.map_err(store_failure)?;
    info!("gift {} added to event {}", gift.id, event_id);
    Ok(gift)
}

/// Deletes the owner's gift whether or not it is reserved.
pub async fn delete_gift(store: &dyn RecordStore, session: &OwnerSession, gift_id: Uuid) -> Result<(), AppError> {
    let rows_affected = store
        .delete_gift(gift_id, session.owner_id())
        .await
        .map_err(store_failure)?;
    if rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    info!("gift {} deleted", gift_id);
    Ok(())
}
