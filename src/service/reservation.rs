//! Reservation engine.
//!
//! A guest claim is a single compare-and-set against the store: set the
//! reservation where the gift is still `available`. Whoever the store
//! reports as having changed the row won; everyone else gets
//! [`AppError::ReservationConflict`]. There is no lock and no retry.

use chrono::Utc;
use log::info;
use uuid::Uuid;

use super::{session::OwnerSession, store_failure};
use crate::{db::RecordStore, errors::AppError, models::Gift, validation::GuestName};

/// Claims `gift_id` for `guest_name`. No session is needed.
///
/// A missing gift and an already reserved gift both come back as
/// `ReservationConflict`, including a repeat by the guest who won.
pub async fn reserve(store: &dyn RecordStore, gift_id: Uuid, guest_name: &str) -> Result<Gift, AppError> {
    let guest = GuestName::parse(guest_name)?;
    let res = store
        .reserve_gift_if_available(gift_id, guest.as_str(), Utc::now())
        .await;
    match res {
        Ok(Some(gift)) => {
            info!("gift {} reserved by {}", gift_id, guest.as_str());
            Ok(gift)
        }
        Ok(None) => {
            info!("reservation of gift {} by {} lost: not available", gift_id, guest.as_str());
            Err(AppError::ReservationConflict)
        }
        Err(err) => Err(store_failure(err)),
    }
}

/// Returns the owner's gift to `available`, whatever its current state.
pub async fn cancel_reservation(
    store: &dyn RecordStore,
    session: &OwnerSession,
    gift_id: Uuid,
) -> Result<Gift, AppError> {
    let released = store
        .release_gift(gift_id, session.owner_id())
        .await
        .map_err(store_failure)?;
    match released {
        Some(gift) => {
            info!("reservation on gift {} cancelled by owner", gift_id);
            Ok(gift)
        }
        None => Err(AppError::NotFound),
    }
}
