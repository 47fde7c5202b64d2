use actix_web::{cookie::time::Duration as CookieDuration, cookie::Cookie, web, HttpResponse};
use serde::Serialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::UserPublic;
use crate::services::auth_service::{
    self, AuthResponse, FacebookAuthRequest, GoogleAuthRequest, LoginRequest, RegisterRequest,
    VkAuthRequest,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserPublic,
}

// The token also travels as an httpOnly cookie so webview clients stay
// logged in without holding the token in JS.
fn token_cookie(token: &str) -> Cookie<'static> {
    let days: i64 = std::env::var("JWT_COOKIE_EXPIRE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);

    let secure = std::env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    Cookie::build("token", token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(CookieDuration::days(days))
        .finish()
}

fn auth_ok(status: actix_web::http::StatusCode, response: AuthResponse) -> HttpResponse {
    let cookie = token_cookie(&response.token);
    HttpResponse::build(status).cookie(cookie).json(response)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            auth_ok(actix_web::http::StatusCode::CREATED, response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            auth_ok(actix_web::http::StatusCode::OK, response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            super::error_response(&e)
        }
    }
}

pub async fn google_auth(
    db: web::Data<MongoDB>,
    request: web::Json<GoogleAuthRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/google");

    match auth_service::google_auth(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Google login: {}", response.user.email);
            auth_ok(actix_web::http::StatusCode::OK, response)
        }
        Err(e) => {
            log::warn!("❌ Google login failed: {}", e);
            super::error_response(&e)
        }
    }
}

pub async fn facebook_auth(
    db: web::Data<MongoDB>,
    request: web::Json<FacebookAuthRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/facebook");

    match auth_service::facebook_auth(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Facebook login: {}", response.user.email);
            auth_ok(actix_web::http::StatusCode::OK, response)
        }
        Err(e) => {
            log::warn!("❌ Facebook login failed: {}", e);
            super::error_response(&e)
        }
    }
}

pub async fn vk_auth(db: web::Data<MongoDB>, request: web::Json<VkAuthRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/vk");

    match auth_service::vk_auth(&db, &request).await {
        Ok(response) => {
            log::info!("✅ VK login: {}", response.user.email);
            auth_ok(actix_web::http::StatusCode::OK, response)
        }
        Err(e) => {
            log::warn!("❌ VK login failed: {}", e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("👤 GET /auth/me - user: {}", user.sub);

    match auth_service::get_current_user(&db, &user.sub).await {
        Ok(current) => HttpResponse::Ok().json(MeResponse {
            success: true,
            user: UserPublic::from(current),
        }),
        Err(e) => {
            log::warn!("❌ Failed to load current user {}: {}", user.sub, e);
            super::error_response(&e)
        }
    }
}
