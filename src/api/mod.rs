pub mod auth;
pub mod coffee;
pub mod events;
pub mod health;
pub mod matches;
pub mod metrics;
pub mod notifications;
pub mod profile;
pub mod swagger;

use actix_web::HttpResponse;

use crate::utils::error::AppError;

/// AppError -> HTTP status + `{ success: false, error }` body.
/// Internal failures keep their detail in the log, not the response.
pub(crate) fn error_response(error: &AppError) -> HttpResponse {
    match error {
        AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": error.message()
        })),
        AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": error.message()
        })),
        AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": error.message()
        })),
        AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
            "success": false,
            "error": error.message()
        })),
        AppError::DatabaseError(_) | AppError::ExternalError(_) => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Server error"
            }))
        }
    }
}
