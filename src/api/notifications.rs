use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::NotificationSettingsResponse;
use crate::services::reminder_service::{self, PushTokenRequest, UpdateSettingsRequest};

#[utoipa::path(
    get,
    path = "/api/reminders",
    tag = "Reminders",
    responses(
        (status = 200, description = "Pending reminders, soonest first")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reminders(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("🔔 GET /reminders - user: {}", user.sub);

    match reminder_service::list_pending(&db, &user.sub).await {
        Ok(reminders) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "reminders": reminders,
            "total": reminders.len()
        })),
        Err(e) => {
            log::warn!("❌ Reminder listing failed: {}", e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    tag = "Reminders",
    responses(
        (status = 200, description = "Reminder cancelled"),
        (status = 404, description = "Reminder not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_reminder(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let reminder_id = path.into_inner();
    log::info!("🔕 DELETE /reminders/{} - user: {}", reminder_id, user.sub);

    match reminder_service::cancel(&db, &user.sub, &reminder_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Reminder cancelled"
        })),
        Err(e) => {
            log::warn!("❌ Reminder cancel failed for {}: {}", reminder_id, e);
            super::error_response(&e)
        }
    }
}

pub async fn get_settings(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("⚙️ GET /notifications/settings - user: {}", user.sub);

    match reminder_service::get_settings(&db, &user.sub).await {
        Ok(settings) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "settings": NotificationSettingsResponse::from(settings)
        })),
        Err(e) => {
            log::warn!("❌ Settings lookup failed: {}", e);
            super::error_response(&e)
        }
    }
}

pub async fn update_settings(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateSettingsRequest>,
) -> HttpResponse {
    log::info!(
        "⚙️ PUT /notifications/settings - user: {} (enabled: {}, lead: {})",
        user.sub,
        request.enabled,
        request.default_lead_minutes
    );

    match reminder_service::update_settings(&db, &user.sub, &request).await {
        Ok(settings) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "settings": settings
        })),
        Err(e) => {
            log::warn!("❌ Settings update failed: {}", e);
            super::error_response(&e)
        }
    }
}

pub async fn register_push_token(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<PushTokenRequest>,
) -> HttpResponse {
    log::info!("📱 POST /notifications/token - user: {}", user.sub);

    match reminder_service::register_push_token(&db, &user.sub, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Push token registered"
        })),
        Err(e) => {
            log::warn!("❌ Push token registration failed: {}", e);
            super::error_response(&e)
        }
    }
}
