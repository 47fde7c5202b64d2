use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::event_service::{self, EventFilterQuery};
use crate::services::reminder_service::{self, ScheduleReminderRequest};

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventFilterQuery),
    responses(
        (status = 200, description = "Events in the selected window", body = event_service::EventListResponse),
        (status = 400, description = "Invalid filter parameters")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_events(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    query: web::Query<EventFilterQuery>,
) -> HttpResponse {
    log::info!("📅 GET /events - user: {}", user.sub);

    match event_service::list_events(&db, &user.sub, &query).await {
        Ok(response) => {
            log::info!("✅ Listed {} events", response.total);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Event listing failed: {}", e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/events/shorts",
    tag = "Events",
    responses(
        (status = 200, description = "Short-video promo feed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn shorts_feed(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("🎬 GET /events/shorts - user: {}", user.sub);

    match event_service::shorts_feed(&db, &user.sub).await {
        Ok(shorts) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "shorts": shorts,
            "total": shorts.len()
        })),
        Err(e) => {
            log::warn!("❌ Shorts feed failed: {}", e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    responses(
        (status = 200, description = "Event details"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_event(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let event_id = path.into_inner();
    log::info!("📅 GET /events/{}", event_id);

    match event_service::get_event(&db, &event_id).await {
        Ok(event) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "event": event
        })),
        Err(e) => {
            log::warn!("❌ Event lookup failed for {}: {}", event_id, e);
            super::error_response(&e)
        }
    }
}

pub async fn toggle_like(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let event_id = path.into_inner();
    log::info!("❤️ POST /events/{}/like - user: {}", event_id, user.sub);

    match event_service::toggle_like(&db, &user.sub, &event_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Like toggle failed for {}: {}", event_id, e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/reminder",
    tag = "Reminders",
    request_body = ScheduleReminderRequest,
    responses(
        (status = 201, description = "Reminder scheduled"),
        (status = 400, description = "Reminder time already passed"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn schedule_reminder(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<ScheduleReminderRequest>,
) -> HttpResponse {
    let event_id = path.into_inner();
    log::info!("🔔 POST /events/{}/reminder - user: {}", event_id, user.sub);

    match reminder_service::schedule(&db, &user.sub, &event_id, &request).await {
        Ok(reminder) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "reminder": reminder
        })),
        Err(e) => {
            log::warn!("❌ Reminder scheduling failed for {}: {}", event_id, e);
            super::error_response(&e)
        }
    }
}
