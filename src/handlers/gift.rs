use actix_web::{delete, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::ReserveGiftDto,
    errors::AppError,
    service::{self, session::OwnerSession},
    AppState,
};

/// Guest claim. Answers 409 when someone else got there first or the gift
/// is gone.
#[post("/gifts/{id}/reserve")]
pub async fn reserve(
    gift_id: web::Path<Uuid>,
    dto: web::Json<ReserveGiftDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let gift = service::reservation::reserve(state.store.as_ref(), gift_id.into_inner(), &dto.guest_name).await?;
    Ok(HttpResponse::Ok().json(gift))
}

#[post("/gifts/{id}/cancel")]
pub async fn cancel(
    session: OwnerSession,
    gift_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let gift = service::reservation::cancel_reservation(state.store.as_ref(), &session, gift_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gift))
}

#[delete("/gifts/{id}")]
pub async fn delete(
    session: OwnerSession,
    gift_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    service::gift::delete_gift(state.store.as_ref(), &session, gift_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(reserve);
}

pub fn init_routes_with_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(cancel).service(delete);
}
