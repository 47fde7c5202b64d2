use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::UserPublic;

/// Chat window length once two users are paired
pub const COFFEE_WINDOW_SECS: i64 = 900; // 15 minutes

/// Waiting user in the "coffee_queue" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeQueueEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub joined_at: i64,
}

/// Paired coffee chat in the "coffee_sessions" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub session_id: String,
    pub user_a: String,
    pub user_b: String,
    pub started_at: i64,
    pub expires_at: i64,
}

impl CoffeeSession {
    pub fn partner_of(&self, user_id: &str) -> &str {
        if self.user_a == user_id {
            &self.user_b
        } else {
            &self.user_a
        }
    }

    pub fn remaining_seconds(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeSessionResponse {
    pub id: String,
    pub partner: UserPublic,
    pub started_at: i64,
    pub expires_at: i64,
    pub remaining_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(started_at: i64) -> CoffeeSession {
        CoffeeSession {
            id: None,
            session_id: "s1".into(),
            user_a: "a".into(),
            user_b: "b".into(),
            started_at,
            expires_at: started_at + COFFEE_WINDOW_SECS,
        }
    }

    #[test]
    fn test_remaining_seconds_counts_down() {
        let s = session(1_000);
        assert_eq!(s.remaining_seconds(1_000), 900);
        assert_eq!(s.remaining_seconds(1_300), 600);
    }

    #[test]
    fn test_remaining_seconds_clamps_at_zero() {
        let s = session(1_000);
        assert_eq!(s.remaining_seconds(1_900), 0);
        assert_eq!(s.remaining_seconds(5_000), 0);
    }

    #[test]
    fn test_expiry_boundary() {
        let s = session(1_000);
        assert!(!s.is_expired(1_899));
        assert!(s.is_expired(1_900));
    }

    #[test]
    fn test_partner_of_either_side() {
        let s = session(0);
        assert_eq!(s.partner_of("a"), "b");
        assert_eq!(s.partner_of("b"), "a");
    }
}
