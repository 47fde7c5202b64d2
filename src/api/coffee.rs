use actix_web::{delete, get, post, web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::coffee_service;

/// POST /api/coffee/match - pair up or join the waiting queue
#[post("/match")]
pub async fn request_match(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("☕ POST /coffee/match - user: {}", user.sub);

    match coffee_service::request_match(&db, &user.sub).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Coffee match failed: {}", e);
            super::error_response(&e)
        }
    }
}

/// GET /api/coffee/session - active session with the countdown
#[get("/session")]
pub async fn get_session(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("☕ GET /coffee/session - user: {}", user.sub);

    match coffee_service::get_session(&db, &user.sub).await {
        Ok(session) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "session": session
        })),
        Err(e) => super::error_response(&e),
    }
}

/// DELETE /api/coffee/session - leave the queue and end the chat window
#[delete("/session")]
pub async fn leave(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("☕ DELETE /coffee/session - user: {}", user.sub);

    match coffee_service::leave(&db, &user.sub).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Left random coffee"
        })),
        Err(e) => {
            log::warn!("❌ Coffee leave failed: {}", e);
            super::error_response(&e)
        }
    }
}
