use chrono::Utc;
use futures::future::try_join_all;
use log::info;
use uuid::Uuid;

use super::{session::OwnerSession, store_failure};
use crate::{
    db::RecordStore,
    dto::NewEventDto,
    errors::AppError,
    models::{Event, EventSummary},
    validation::{self, DESCRIPTION_MAX},
};

/// Events newest first, each with its gift count.
///
/// Counts are separate queries issued after the listing, so a gift added in
/// between may be missed by that window.
pub async fn list_events(store: &dyn RecordStore) -> Result<Vec<EventSummary>, AppError> {
    let events = store.select_events().await.map_err(store_failure)?;
    let counts = try_join_all(events.iter().map(|event| store.count_gifts(event.id)))
        .await
        .map_err(store_failure)?;
    Ok(events
        .into_iter()
        .zip(counts)
        .map(|(event, gifts_count)| EventSummary { event, gifts_count })
        .collect())
}

pub async fn create_event(
    store: &dyn RecordStore,
    session: &OwnerSession,
    dto: NewEventDto,
) -> Result<Event, AppError> {
    let event = Event {
        id: Uuid::new_v4(),
        owner_id: session.owner_id(),
        title: validation::title("title", &dto.title)?,
        description: validation::optional_text("description", dto.description.as_deref(), DESCRIPTION_MAX)?,
        event_date: dto.event_date,
        created_at: Utc::now(),
    };
    store.insert_event(&event).await.map_err(store_failure)?;
    info!("event {} created", event.id);
    Ok(event)
}

/// Fetches an event only if the session owns it. Someone else's event is
/// reported exactly like a missing one.
pub async fn get_owned_event(
    store: &dyn RecordStore,
    session: &OwnerSession,
    event_id: Uuid,
) -> Result<Event, AppError> {
    match store.select_event(event_id).await.map_err(store_failure)? {
        Some(event) if event.owner_id == session.owner_id() => Ok(event),
        _ => Err(AppError::NotFound),
    }
}

/// Deletes the event together with all of its gifts and returns how many
/// gifts went with it.
pub async fn delete_event(
    store: &dyn RecordStore,
    session: &OwnerSession,
    event_id: Uuid,
) -> Result<u64, AppError> {
    let res = store
        .delete_event_with_gifts(event_id, session.owner_id())
        .await
        .map_err(store_failure)?;
    match res {
        Some(gifts_removed) => {
            info!("event {} deleted with {} gifts", event_id, gifts_removed);
            Ok(gifts_removed)
        }
        None => Err(AppError::NotFound),
    }
}

/// Guest-facing URL for one event, or for the event list when `event_id`
/// is `None`.
pub fn share_link(base_url: &str, event_id: Option<Uuid>) -> String {
    let base_url = base_url.trim_end_matches('/');
    match event_id {
        Some(id) => format!("{base_url}/guest?event={id}"),
        None => format!("{base_url}/guest"),
    }
}
