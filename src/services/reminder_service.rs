use crate::database::MongoDB;
use crate::models::{
    Event, NotificationSettings, NotificationSettingsResponse, Reminder, ReminderResponse,
    ReminderStatus,
};
use crate::utils::error::AppError;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReminderRequest {
    /// Defaults to the user's saved preference (30 minutes until changed)
    pub lead_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub enabled: bool,
    pub default_lead_minutes: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenRequest {
    pub push_token: String,
}

/// trigger = start − lead; a trigger in the past cannot be scheduled
pub fn compute_trigger(event_date: i64, lead_minutes: i64, now: i64) -> Result<i64, AppError> {
    if lead_minutes <= 0 {
        return Err(AppError::InvalidRequest(
            "Lead time must be positive".to_string(),
        ));
    }

    let trigger_at = event_date - lead_minutes * 60;
    if trigger_at <= now {
        return Err(AppError::InvalidRequest(
            "Reminder time has already passed".to_string(),
        ));
    }

    Ok(trigger_at)
}

// Schedule (or replace) the reminder for an event
pub async fn schedule(
    db: &MongoDB,
    user_id: &str,
    event_id: &str,
    request: &ScheduleReminderRequest,
) -> Result<ReminderResponse, AppError> {
    let events = db.collection::<Event>("events");

    let event = events
        .find_one(doc! { "event_id": event_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let lead_minutes = match request.lead_minutes {
        Some(lead) => lead,
        None => get_settings(db, user_id).await?.default_lead_minutes,
    };

    let now = Utc::now().timestamp();
    let trigger_at = compute_trigger(event.date, lead_minutes, now)?;

    let reminders = db.collection::<Reminder>("reminders");

    // Re-scheduling replaces the previous pending reminder for this event
    let cancelled = reminders
        .update_many(
            doc! { "user_id": user_id, "event_id": event_id, "status": "pending" },
            doc! { "$set": { "status": "cancelled" } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if cancelled.modified_count > 0 {
        log::info!(
            "🔕 Replaced {} pending reminder(s) for event {} (user {})",
            cancelled.modified_count,
            event_id,
            user_id
        );
    }

    let reminder = Reminder {
        id: None,
        reminder_id: ObjectId::new().to_hex(),
        user_id: user_id.to_string(),
        event_id: event_id.to_string(),
        event_title: event.title,
        lead_minutes,
        trigger_at,
        status: ReminderStatus::Pending,
        created_at: now,
    };

    reminders
        .insert_one(&reminder)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to schedule reminder: {}", e)))?;

    log::info!(
        "🔔 Reminder scheduled: event {} at {} ({} min lead) for user {}",
        event_id,
        trigger_at,
        lead_minutes,
        user_id
    );

    Ok(ReminderResponse::from(reminder))
}

// Cancel an own pending reminder
pub async fn cancel(db: &MongoDB, user_id: &str, reminder_id: &str) -> Result<(), AppError> {
    let reminders = db.collection::<Reminder>("reminders");

    let result = reminders
        .update_one(
            doc! { "reminder_id": reminder_id, "user_id": user_id, "status": "pending" },
            doc! { "$set": { "status": "cancelled" } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Reminder not found".to_string()));
    }

    log::info!("🔕 Reminder {} cancelled by user {}", reminder_id, user_id);
    Ok(())
}

// Pending reminders, soonest first
pub async fn list_pending(db: &MongoDB, user_id: &str) -> Result<Vec<ReminderResponse>, AppError> {
    let reminders = db.collection::<Reminder>("reminders");

    let mut cursor = reminders
        .find(doc! { "user_id": user_id, "status": "pending" })
        .sort(doc! { "trigger_at": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut result = Vec::new();
    while let Some(item) = cursor.next().await {
        match item {
            Ok(reminder) => result.push(ReminderResponse::from(reminder)),
            Err(e) => log::warn!("⚠️ Skipping unreadable reminder document: {}", e),
        }
    }

    Ok(result)
}

// Settings, falling back to defaults before the first save
pub async fn get_settings(db: &MongoDB, user_id: &str) -> Result<NotificationSettings, AppError> {
    let collection = db.collection::<NotificationSettings>("notification_settings");

    let settings = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    Ok(settings.unwrap_or_else(|| {
        NotificationSettings::defaults_for(user_id, Utc::now().timestamp())
    }))
}

pub async fn update_settings(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateSettingsRequest,
) -> Result<NotificationSettingsResponse, AppError> {
    if request.default_lead_minutes <= 0 {
        return Err(AppError::InvalidRequest(
            "Lead time must be positive".to_string(),
        ));
    }

    let collection = db.collection::<NotificationSettings>("notification_settings");
    let now = Utc::now().timestamp();

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                "enabled": request.enabled,
                "default_lead_minutes": request.default_lead_minutes,
                "updated_at": now,
            }},
        )
        .upsert(true)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save settings: {}", e)))?;

    let settings = get_settings(db, user_id).await?;
    Ok(NotificationSettingsResponse::from(settings))
}

// Device push token registration (replaces any previous token)
pub async fn register_push_token(
    db: &MongoDB,
    user_id: &str,
    request: &PushTokenRequest,
) -> Result<(), AppError> {
    if request.push_token.is_empty() {
        return Err(AppError::InvalidRequest(
            "Push token is required".to_string(),
        ));
    }

    let collection = db.collection::<NotificationSettings>("notification_settings");

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                "push_token": &request.push_token,
                "updated_at": Utc::now().timestamp(),
            }},
        )
        .upsert(true)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save push token: {}", e)))?;

    log::info!("📱 Push token registered for user {}", user_id);
    Ok(())
}

// Sweep query used by the scheduler job
pub async fn due_reminders(db: &MongoDB, now: i64) -> Result<Vec<Reminder>, AppError> {
    let reminders = db.collection::<Reminder>("reminders");

    let mut cursor = reminders
        .find(doc! { "status": "pending", "trigger_at": { "$lte": now } })
        .sort(doc! { "trigger_at": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut due = Vec::new();
    while let Some(item) = cursor.next().await {
        match item {
            Ok(reminder) => due.push(reminder),
            Err(e) => log::warn!("⚠️ Skipping unreadable reminder document: {}", e),
        }
    }

    Ok(due)
}

// One shot: sent means "attempted", delivery is not retried
pub async fn mark_sent(db: &MongoDB, reminder_id: &str) -> Result<(), AppError> {
    let reminders = db.collection::<Reminder>("reminders");

    reminders
        .update_one(
            doc! { "reminder_id": reminder_id },
            doc! { "$set": { "status": "sent" } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3600;

    #[test]
    fn test_trigger_is_lead_before_start() {
        let now = 1_000_000;
        let start = now + 2 * HOUR;

        let trigger = compute_trigger(start, 30, now).unwrap();
        assert_eq!(trigger, start - 30 * 60);
    }

    #[test]
    fn test_lead_exceeding_time_to_event_is_rejected() {
        let now = 1_000_000;
        let start = now + HOUR;

        // 90 minutes of lead against a one-hour gap lands in the past
        match compute_trigger(start, 90, now) {
            Err(AppError::InvalidRequest(_)) => {}
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_trigger_exactly_now_is_rejected() {
        let now = 1_000_000;
        let start = now + 30 * 60;

        assert!(compute_trigger(start, 30, now).is_err());
    }

    #[test]
    fn test_past_event_is_rejected() {
        let now = 1_000_000;
        assert!(compute_trigger(now - HOUR, 15, now).is_err());
    }

    #[test]
    fn test_nonpositive_lead_is_rejected() {
        let now = 1_000_000;
        let start = now + 2 * HOUR;

        assert!(compute_trigger(start, 0, now).is_err());
        assert!(compute_trigger(start, -15, now).is_err());
    }
}
