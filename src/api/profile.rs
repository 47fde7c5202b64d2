use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::profile_service::{self, RatingRequest, UpdateProfileRequest};

#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "Profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️ PUT /profile - user: {}", user.sub);

    match profile_service::update_profile(&db, &user.sub, &request).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": profile
        })),
        Err(e) => {
            log::warn!("❌ Profile update failed for {}: {}", user.sub, e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/profile/{id}",
    tag = "Profile",
    responses(
        (status = 200, description = "Public profile"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("👤 GET /profile/{}", user_id);

    match profile_service::get_profile(&db, &user_id).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": profile
        })),
        Err(e) => {
            log::warn!("❌ Profile lookup failed for {}: {}", user_id, e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/profile/{id}/rating",
    tag = "Profile",
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating recorded"),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_rating(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<RatingRequest>,
) -> HttpResponse {
    let target_id = path.into_inner();
    log::info!(
        "⭐ POST /profile/{}/rating - {} stars from {}",
        target_id,
        request.rating,
        user.sub
    );

    match profile_service::add_rating(&db, &user.sub, &target_id, &request).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": profile
        })),
        Err(e) => {
            log::warn!("❌ Rating failed for {}: {}", target_id, e);
            super::error_response(&e)
        }
    }
}
