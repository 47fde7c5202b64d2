use crate::database::MongoDB;
use crate::models::{AuthProvider, User, UserPublic};
use crate::utils::error::AppError;
use crate::utils::validation;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GoogleAuthRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FacebookAuthRequest {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VkAuthRequest {
    pub code: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserPublic,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tatcon-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tatcon-app".to_string())
}

// Generate JWT token (24h expiry)
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Unauthorized(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Password check for email accounts; OAuth accounts have nothing to match
pub fn check_password(user: &User, password: &str) -> Result<(), AppError> {
    let stored = user.password.as_ref().ok_or_else(|| {
        AppError::Unauthorized(format!(
            "This account uses {} login. Please sign in with {}.",
            user.auth_provider.as_str(),
            user.auth_provider.as_str()
        ))
    })?;

    let valid = verify(password, stored)
        .map_err(|e| AppError::Unauthorized(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(())
}

// Email/password registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    validation::validate_name(&request.name)?;
    validation::validate_email(&request.email)?;

    if request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Password is required for email registration".to_string(),
        ));
    }
    if request.photo.is_empty() {
        return Err(AppError::InvalidRequest(
            "Profile photo is required".to_string(),
        ));
    }

    let collection = db.collection::<User>("users");
    let email = request.email.trim().to_lowercase();

    // Duplicate email is a conflict, not a validation error
    let existing = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        user_id: ObjectId::new().to_hex(),
        name: request.name.trim().to_string(),
        email,
        photo: request.photo.clone(),
        interests: Vec::new(),
        description: String::new(),
        meeting_goal: String::new(),
        is_new_user: true,
        rating: 0.0,
        rating_count: 0,
        auth_provider: AuthProvider::Email,
        provider_id: None,
        password: Some(hashed_password),
        created_at: Utc::now().timestamp(),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

    log::info!("✅ User registered: {} (provider: email)", new_user.email);

    let token = generate_jwt(&new_user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserPublic::from(new_user),
    })
}

// Email/password login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Please provide email and password".to_string(),
        ));
    }

    let collection = db.collection::<User>("users");
    let email = request.email.trim().to_lowercase();

    let user = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    check_password(&user, &request.password)?;

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserPublic::from(user),
    })
}

// Google sign-in: the client sends the ID token, we verify it with Google
pub async fn google_auth(db: &MongoDB, request: &GoogleAuthRequest) -> Result<AuthResponse, AppError> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| AppError::ExternalError("GOOGLE_CLIENT_ID not configured".to_string()))?;

    let client = reqwest::Client::new();
    let response = client
        .get("https://oauth2.googleapis.com/tokeninfo")
        .query(&[("id_token", request.id_token.as_str())])
        .send()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to verify Google token: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Unauthorized("Invalid Google token".to_string()));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to parse token info: {}", e)))?;

    // The token must have been issued for this app
    let aud = payload["aud"].as_str().unwrap_or_default();
    if aud != client_id {
        return Err(AppError::Unauthorized(
            "Google token was issued for another application".to_string(),
        ));
    }

    let email = payload["email"]
        .as_str()
        .ok_or_else(|| AppError::InvalidRequest("Email not provided by Google".to_string()))?
        .to_string();
    let sub = payload["sub"]
        .as_str()
        .ok_or_else(|| AppError::ExternalError("No subject in Google token".to_string()))?
        .to_string();
    let name = payload["name"].as_str().unwrap_or(&email).to_string();
    let picture = payload["picture"].as_str().unwrap_or_default().to_string();

    finish_oauth_login(db, AuthProvider::Google, &sub, &email, &name, &picture).await
}

// Facebook sign-in: profile fetched from the Graph API with the client's token
pub async fn facebook_auth(
    db: &MongoDB,
    request: &FacebookAuthRequest,
) -> Result<AuthResponse, AppError> {
    let url = format!(
        "https://graph.facebook.com/v13.0/{}?fields=id,name,email,picture&access_token={}",
        urlencoding::encode(&request.user_id),
        urlencoding::encode(&request.access_token)
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to reach Facebook: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Unauthorized("Invalid Facebook token".to_string()));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to parse Facebook profile: {}", e)))?;

    let email = payload["email"]
        .as_str()
        .ok_or_else(|| AppError::InvalidRequest("Email not provided by Facebook".to_string()))?
        .to_string();
    let id = payload["id"]
        .as_str()
        .ok_or_else(|| AppError::ExternalError("No id in Facebook profile".to_string()))?
        .to_string();
    let name = payload["name"].as_str().unwrap_or(&email).to_string();
    let picture = payload["picture"]["data"]["url"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    finish_oauth_login(db, AuthProvider::Facebook, &id, &email, &name, &picture).await
}

// VK sign-in: authorization code exchange, then users.get for the profile
pub async fn vk_auth(db: &MongoDB, request: &VkAuthRequest) -> Result<AuthResponse, AppError> {
    let client_id = std::env::var("VK_CLIENT_ID")
        .map_err(|_| AppError::ExternalError("VK_CLIENT_ID not configured".to_string()))?;
    let client_secret = std::env::var("VK_CLIENT_SECRET")
        .map_err(|_| AppError::ExternalError("VK_CLIENT_SECRET not configured".to_string()))?;
    let redirect_uri = std::env::var("VK_REDIRECT_URI")
        .map_err(|_| AppError::ExternalError("VK_REDIRECT_URI not configured".to_string()))?;

    let params = vec![
        ("client_id", client_id.as_str()),
        ("client_secret", client_secret.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
        ("code", request.code.as_str()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let client = reqwest::Client::new();
    let token_response = client
        .get(format!("https://oauth.vk.com/access_token?{}", query_string))
        .send()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to reach VK: {}", e)))?;

    if !token_response.status().is_success() {
        return Err(AppError::Unauthorized(
            "Failed to exchange VK authorization code".to_string(),
        ));
    }

    let tokens: serde_json::Value = token_response
        .json()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to parse VK token response: {}", e)))?;

    let access_token = tokens["access_token"]
        .as_str()
        .ok_or_else(|| AppError::Unauthorized("No access token from VK".to_string()))?
        .to_string();
    let vk_user_id = tokens["user_id"]
        .as_i64()
        .ok_or_else(|| AppError::ExternalError("No user_id from VK".to_string()))?;
    let email = tokens["email"]
        .as_str()
        .ok_or_else(|| AppError::InvalidRequest("Email not provided by VK".to_string()))?
        .to_string();

    let user_url = format!(
        "https://api.vk.com/method/users.get?user_ids={}&fields=photo_200&access_token={}&v=5.131",
        vk_user_id,
        urlencoding::encode(&access_token)
    );

    let user_response = client
        .get(&user_url)
        .send()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to fetch VK profile: {}", e)))?;

    let payload: serde_json::Value = user_response
        .json()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to parse VK profile: {}", e)))?;

    let profile = &payload["response"][0];
    let first_name = profile["first_name"].as_str().unwrap_or_default();
    let last_name = profile["last_name"].as_str().unwrap_or_default();
    let name = format!("{} {}", first_name, last_name).trim().to_string();
    let photo = profile["photo_200"].as_str().unwrap_or_default().to_string();

    finish_oauth_login(
        db,
        AuthProvider::Vk,
        &vk_user_id.to_string(),
        &email,
        &name,
        &photo,
    )
    .await
}

// Find-or-create for OAuth logins. An existing email account is migrated to
// the provider rather than duplicated.
async fn finish_oauth_login(
    db: &MongoDB,
    provider: AuthProvider,
    provider_id: &str,
    email: &str,
    name: &str,
    photo: &str,
) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>("users");
    let email = email.trim().to_lowercase();

    let user = if let Some(mut existing) = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
    {
        if existing.auth_provider != provider {
            log::info!(
                "🔁 Migrating account {} to provider {}",
                existing.user_id,
                provider.as_str()
            );

            collection
                .update_one(
                    doc! { "user_id": &existing.user_id },
                    doc! { "$set": {
                        "auth_provider": provider.as_str(),
                        "provider_id": provider_id,
                    }},
                )
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to update provider: {}", e)))?;

            existing.auth_provider = provider;
            existing.provider_id = Some(provider_id.to_string());
        }
        existing
    } else {
        let new_user = User {
            id: None,
            user_id: ObjectId::new().to_hex(),
            name: if name.is_empty() {
                email.clone()
            } else {
                name.to_string()
            },
            email: email.clone(),
            photo: photo.to_string(),
            interests: Vec::new(),
            description: String::new(),
            meeting_goal: String::new(),
            is_new_user: true,
            rating: 0.0,
            rating_count: 0,
            auth_provider: provider,
            provider_id: Some(provider_id.to_string()),
            password: None, // OAuth accounts never carry a password
            created_at: Utc::now().timestamp(),
        };

        collection
            .insert_one(&new_user)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

        log::info!(
            "✅ User registered: {} (provider: {})",
            new_user.email,
            provider.as_str()
        );

        new_user
    };

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserPublic::from(user),
    })
}

// Current user from token subject
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");

    collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(password: Option<String>, provider: AuthProvider) -> User {
        User {
            id: None,
            user_id: "abc123".into(),
            name: "Test User".into(),
            email: "test@example.com".into(),
            photo: "https://example.com/p.jpg".into(),
            interests: vec![],
            description: String::new(),
            meeting_goal: String::new(),
            is_new_user: true,
            rating: 0.0,
            rating_count: 0,
            auth_provider: provider,
            provider_id: None,
            password,
            created_at: 0,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let user = test_user(None, AuthProvider::Google);
        let token = generate_jwt(&user).unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "abc123");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.aud, get_jwt_audience());
        assert_eq!(claims.iss, get_jwt_issuer());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let claims = Claims {
            sub: "abc123".into(),
            email: "test@example.com".into(),
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: "someone-else".into(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims {
            sub: "abc123".into(),
            email: "test@example.com".into(),
            iat: (Utc::now() - Duration::hours(2)).timestamp() as usize,
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token").is_err());
    }

    #[test]
    fn test_wrong_password_rejected() {
        // Low cost keeps the test fast; production path uses DEFAULT_COST
        let hashed = hash("correct-horse", 4).unwrap();
        let user = test_user(Some(hashed), AuthProvider::Email);

        assert!(check_password(&user, "correct-horse").is_ok());
        match check_password(&user, "wrong-horse") {
            Err(AppError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_oauth_account_has_no_password_to_match() {
        let user = test_user(None, AuthProvider::Vk);

        match check_password(&user, "anything") {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("vk")),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_email_registration_conflicts() {
        let db = crate::database::MongoDB::new("mongodb://localhost:27017/tatcon_test")
            .await
            .unwrap();

        let suffix = ObjectId::new().to_hex();
        let request = RegisterRequest {
            name: "Duplicate Test".into(),
            email: format!("dup-{}@example.com", suffix),
            password: "secret123".into(),
            photo: "https://example.com/p.jpg".into(),
        };

        assert!(register(&db, &request).await.is_ok());

        match register(&db, &request).await {
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }
}
