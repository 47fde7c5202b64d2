use actix_web::{get, post, web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::match_service::{self, SwipeRequest};

/// GET /api/discovery - next profile for the swipe deck
#[get("")]
pub async fn next_profile(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("🔍 GET /discovery - user: {}", user.sub);

    match match_service::next_profile(&db, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => {
            log::info!("ℹ️ Discovery empty for {}: {}", user.sub, e);
            super::error_response(&e)
        }
    }
}

/// POST /api/discovery/swipe - record a like or pass
#[post("/swipe")]
pub async fn swipe(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<SwipeRequest>,
) -> impl Responder {
    log::info!(
        "{} POST /discovery/swipe - {} -> {}",
        if request.liked { "👍" } else { "👎" },
        user.sub,
        request.target_id
    );

    match match_service::swipe(&db, &user.sub, &request).await {
        Ok(response) => {
            if response.matched {
                log::info!("💘 Mutual like: {} + {}", user.sub, request.target_id);
            }
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Swipe failed: {}", e);
            super::error_response(&e)
        }
    }
}

/// GET /api/matches - the caller's matches, newest first
#[get("")]
pub async fn list_matches(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("💬 GET /matches - user: {}", user.sub);

    match match_service::list_matches(&db, &user.sub).await {
        Ok(matches) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "matches": matches,
            "total": matches.len()
        })),
        Err(e) => {
            log::warn!("❌ Match listing failed: {}", e);
            super::error_response(&e)
        }
    }
}
