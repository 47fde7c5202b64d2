use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::UserPublic;

/// One discovery decision per (user, target) pair - upserted on repeat swipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub target_id: String,
    pub liked: bool,
    pub created_at: i64,
}

/// Mutual like in the "matches" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub match_id: String,
    pub user_a: String,
    pub user_b: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_message: Option<String>,
    pub matched_at: i64,
}

impl Match {
    /// The other side of the match, from `user_id`'s point of view
    pub fn partner_of(&self, user_id: &str) -> &str {
        if self.user_a == user_id {
            &self.user_b
        } else {
            &self.user_a
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: String,
    pub partner: UserPublic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub matched_at: i64,
}
