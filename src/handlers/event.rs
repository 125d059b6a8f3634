use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::{DeleteEventResponse, NewEventDto, NewGiftDto, ShareLinkResponse},
    errors::AppError,
    service::{self, session::OwnerSession},
    AppState,
};

#[get("/events")]
pub async fn get_all(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let events = service::event::list_events(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[get("/events/{id}/gifts")]
pub async fn get_gifts(event_id: web::Path<Uuid>, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let gifts = service::gift::list_gifts(state.store.as_ref(), event_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gifts))
}

#[post("/events")]
pub async fn create(
    session: OwnerSession,
    new_event_dto: web::Json<NewEventDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let event = service::event::create_event(state.store.as_ref(), &session, new_event_dto.into_inner()).await?;
    Ok(HttpResponse::Created().json(event))
}

#[delete("/events/{id}")]
pub async fn delete(
    session: OwnerSession,
    event_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let gifts_removed = service::event::delete_event(state.store.as_ref(), &session, event_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteEventResponse { gifts_removed }))
}

#[post("/events/{id}/gifts")]
pub async fn create_gift(
    session: OwnerSession,
    event_id: web::Path<Uuid>,
    new_gift_dto: web::Json<NewGiftDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let gift = service::gift::create_gift(
        state.store.as_ref(),
        &session,
        event_id.into_inner(),
        new_gift_dto.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(gift))
}

#[get("/events/{id}/share")]
pub async fn share(
    session: OwnerSession,
    event_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let event = service::event::get_owned_event(state.store.as_ref(), &session, event_id.into_inner()).await?;
    let url = service::event::share_link(&state.public_base_url, Some(event.id));
    Ok(HttpResponse::Ok().json(ShareLinkResponse { url }))
}

pub fn init_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all).service(get_gifts);
}

pub fn init_routes_with_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(delete)
        .service(create_gift)
        .service(share);
}
