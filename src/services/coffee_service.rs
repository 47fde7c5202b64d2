use crate::database::MongoDB;
use crate::models::{
    CoffeeQueueEntry, CoffeeSession, CoffeeSessionResponse, User, UserPublic, COFFEE_WINDOW_SECS,
};
use crate::utils::error::AppError;
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeMatchResponse {
    pub success: bool,
    /// "matched" once paired, "waiting" while in the queue
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<CoffeeSessionResponse>,
}

// Pair with the longest-waiting other student, or join the queue
pub async fn request_match(db: &MongoDB, user_id: &str) -> Result<CoffeeMatchResponse, AppError> {
    let now = Utc::now().timestamp();

    // An unexpired session means the previous request already succeeded
    if let Some(session) = active_session(db, user_id, now).await? {
        let response = to_response(db, user_id, &session, now).await?;
        return Ok(CoffeeMatchResponse {
            success: true,
            status: "matched".to_string(),
            session: Some(response),
        });
    }

    let queue = db.collection::<CoffeeQueueEntry>("coffee_queue");

    // FIFO: take the partner who has waited longest
    let waiting = queue
        .find_one(doc! { "user_id": { "$ne": user_id } })
        .sort(doc! { "joined_at": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let partner = match waiting {
        Some(entry) => entry,
        None => {
            // Nobody to pair with - enqueue (idempotent per user)
            queue
                .update_one(
                    doc! { "user_id": user_id },
                    doc! { "$setOnInsert": { "user_id": user_id, "joined_at": now } },
                )
                .upsert(true)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to join queue: {}", e)))?;

            log::info!("☕ User {} waiting for a coffee partner", user_id);

            return Ok(CoffeeMatchResponse {
                success: true,
                status: "waiting".to_string(),
                session: None,
            });
        }
    };

    // Pair up: both leave the queue, one session starts
    queue
        .delete_many(doc! { "user_id": { "$in": [user_id, &partner.user_id] } })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let session = CoffeeSession {
        id: None,
        session_id: ObjectId::new().to_hex(),
        user_a: user_id.to_string(),
        user_b: partner.user_id.clone(),
        started_at: now,
        expires_at: now + COFFEE_WINDOW_SECS,
    };

    db.collection::<CoffeeSession>("coffee_sessions")
        .insert_one(&session)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create session: {}", e)))?;

    log::info!("☕ Coffee match: {} + {}", user_id, partner.user_id);

    let response = to_response(db, user_id, &session, now).await?;

    Ok(CoffeeMatchResponse {
        success: true,
        status: "matched".to_string(),
        session: Some(response),
    })
}

// Active session lookup; expired sessions are not active
pub async fn get_session(db: &MongoDB, user_id: &str) -> Result<CoffeeSessionResponse, AppError> {
    let now = Utc::now().timestamp();

    let session = active_session(db, user_id, now)
        .await?
        .ok_or_else(|| AppError::NotFound("No active coffee session".to_string()))?;

    to_response(db, user_id, &session, now).await
}

// Leave: drop out of the queue and end any active session
pub async fn leave(db: &MongoDB, user_id: &str) -> Result<(), AppError> {
    let queue = db.collection::<CoffeeQueueEntry>("coffee_queue");
    queue
        .delete_many(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let sessions = db.collection::<CoffeeSession>("coffee_sessions");
    let now = Utc::now().timestamp();

    // Ending a session closes the chat window for both sides
    sessions
        .update_many(
            doc! {
                "$or": [ { "user_a": user_id }, { "user_b": user_id } ],
                "expires_at": { "$gt": now },
            },
            doc! { "$set": { "expires_at": now } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    log::info!("☕ User {} left random coffee", user_id);
    Ok(())
}

async fn active_session(
    db: &MongoDB,
    user_id: &str,
    now: i64,
) -> Result<Option<CoffeeSession>, AppError> {
    let sessions = db.collection::<CoffeeSession>("coffee_sessions");

    sessions
        .find_one(doc! {
            "$or": [ { "user_a": user_id }, { "user_b": user_id } ],
            "expires_at": { "$gt": now },
        })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

async fn to_response(
    db: &MongoDB,
    user_id: &str,
    session: &CoffeeSession,
    now: i64,
) -> Result<CoffeeSessionResponse, AppError> {
    let users = db.collection::<User>("users");

    let partner = users
        .find_one(doc! { "user_id": session.partner_of(user_id) })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Coffee partner not found".to_string()))?;

    Ok(CoffeeSessionResponse {
        id: session.session_id.clone(),
        partner: UserPublic::from(partner),
        started_at: session.started_at,
        expires_at: session.expires_at,
        remaining_seconds: session.remaining_seconds(now),
    })
}
