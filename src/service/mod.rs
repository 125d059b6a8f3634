pub mod auth;
pub mod event;
pub mod gift;
pub mod log;
pub mod reservation;
pub mod session;

use ::log::error;

use crate::{db::StoreError, errors::AppError};

/// Logs a store failure and turns it into the generic error a caller sees.
pub(crate) fn store_failure(err: StoreError) -> AppError {
    error!("STORE FAILURE: {}", err);
    AppError::StoreUnavailable
}
