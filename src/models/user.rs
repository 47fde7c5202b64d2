use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Identity method used to create the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    Facebook,
    Vk,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
            AuthProvider::Facebook => "facebook",
            AuthProvider::Vk => "vk",
        }
    }
}

/// User document in the "users" collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String, // PRIMARY IDENTIFIER (ObjectId hex)
    pub name: String,
    pub email: String,
    pub photo: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meeting_goal: String,
    #[serde(default = "default_is_new_user")]
    pub is_new_user: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: i64,
    pub auth_provider: AuthProvider,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub provider_id: Option<String>,
    /// bcrypt hash, present only for email accounts; never leaves the service
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    pub created_at: i64,
}

fn default_is_new_user() -> bool {
    true
}

impl User {
    pub fn is_email_auth(&self) -> bool {
        self.auth_provider == AuthProvider::Email
    }
}

/// Profile view returned by the API (password stripped, camelCase wire format)
#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub interests: Vec<String>,
    pub description: String,
    pub meeting_goal: String,
    pub is_new_user: bool,
    pub rating: f64,
    pub rating_count: i64,
    pub auth_provider: AuthProvider,
    pub created_at: i64,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.user_id,
            name: user.name,
            email: user.email,
            photo: user.photo,
            interests: user.interests,
            description: user.description,
            meeting_goal: user.meeting_goal,
            is_new_user: user.is_new_user,
            rating: user.rating,
            rating_count: user.rating_count,
            auth_provider: user.auth_provider,
            created_at: user.created_at,
        }
    }
}
