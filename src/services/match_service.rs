use crate::database::MongoDB;
use crate::models::{Match, MatchResponse, Swipe, User, UserPublic};
use crate::utils::error::AppError;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_id: String,
    pub liked: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub success: bool,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#match: Option<MatchResponse>,
}

// Next profile the user has not decided on yet
pub async fn next_profile(db: &MongoDB, user_id: &str) -> Result<UserPublic, AppError> {
    let swipes = db.collection::<Swipe>("swipes");

    let mut cursor = swipes
        .find(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut seen: Vec<Bson> = vec![Bson::from(user_id)];
    while let Some(result) = cursor.next().await {
        if let Ok(swipe) = result {
            seen.push(Bson::from(swipe.target_id));
        }
    }

    let users = db.collection::<User>("users");
    let candidate = users
        .find_one(doc! { "user_id": { "$nin": seen } })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("No more profiles to show".to_string()))?;

    Ok(UserPublic::from(candidate))
}

// Record the decision; a mutual like becomes a match
pub async fn swipe(
    db: &MongoDB,
    user_id: &str,
    request: &SwipeRequest,
) -> Result<SwipeResponse, AppError> {
    if request.target_id == user_id {
        return Err(AppError::InvalidRequest(
            "You cannot swipe on yourself".to_string(),
        ));
    }

    let users = db.collection::<User>("users");
    users
        .find_one(doc! { "user_id": &request.target_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let now = Utc::now().timestamp();
    let swipes = db.collection::<Swipe>("swipes");

    // One decision per pair; a repeat swipe overwrites the previous one
    swipes
        .update_one(
            doc! { "user_id": user_id, "target_id": &request.target_id },
            doc! { "$set": { "liked": request.liked, "created_at": now } },
        )
        .upsert(true)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to record swipe: {}", e)))?;

    if !request.liked {
        return Ok(SwipeResponse {
            success: true,
            matched: false,
            r#match: None,
        });
    }

    // Mutual?
    let reciprocal = swipes
        .find_one(doc! { "user_id": &request.target_id, "target_id": user_id, "liked": true })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if reciprocal.is_none() {
        return Ok(SwipeResponse {
            success: true,
            matched: false,
            r#match: None,
        });
    }

    let matches = db.collection::<Match>("matches");

    // The pair may already have a match from an earlier like exchange
    let pair_filter = doc! { "$or": [
        { "user_a": user_id, "user_b": &request.target_id },
        { "user_a": &request.target_id, "user_b": user_id },
    ]};

    let existing = matches
        .find_one(pair_filter)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let matched = match existing {
        Some(m) => m,
        None => {
            let new_match = Match {
                id: None,
                match_id: ObjectId::new().to_hex(),
                user_a: user_id.to_string(),
                user_b: request.target_id.clone(),
                last_message: None,
                matched_at: now,
            };
            matches
                .insert_one(&new_match)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to create match: {}", e)))?;

            log::info!("💘 New match: {} + {}", user_id, request.target_id);
            new_match
        }
    };

    let response = to_response(db, user_id, matched).await?;

    Ok(SwipeResponse {
        success: true,
        matched: true,
        r#match: Some(response),
    })
}

// Matches for the caller, newest first, partner profile embedded
pub async fn list_matches(db: &MongoDB, user_id: &str) -> Result<Vec<MatchResponse>, AppError> {
    let matches = db.collection::<Match>("matches");

    let mut cursor = matches
        .find(doc! { "$or": [ { "user_a": user_id }, { "user_b": user_id } ] })
        .sort(doc! { "matched_at": -1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut result = Vec::new();
    while let Some(item) = cursor.next().await {
        match item {
            Ok(m) => match to_response(db, user_id, m).await {
                Ok(response) => result.push(response),
                // A match whose partner document vanished is skipped, not fatal
                Err(AppError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            },
            Err(e) => log::warn!("⚠️ Skipping unreadable match document: {}", e),
        }
    }

    Ok(result)
}

async fn to_response(db: &MongoDB, user_id: &str, m: Match) -> Result<MatchResponse, AppError> {
    let users = db.collection::<User>("users");

    let partner = users
        .find_one(doc! { "user_id": m.partner_of(user_id) })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Match partner not found".to_string()))?;

    Ok(MatchResponse {
        id: m.match_id,
        partner: UserPublic::from(partner),
        last_message: m.last_message,
        matched_at: m.matched_at,
    })
}
