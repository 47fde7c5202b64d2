// ==================== REMINDER SCHEDULER ====================
// Background job that fires due event reminders as Expo push notifications.
// A reminder is one-shot: marked "sent" after a single delivery attempt.

use crate::{
    database::MongoDB,
    models::Reminder,
    services::{push_service, reminder_service},
    utils::time,
};
use chrono::Utc;
use tokio::time::{interval, Duration};

/// Starts the reminder sweep loop.
/// Sweeps immediately on startup (reminders that came due while the server
/// was down still fire once), then every 60 seconds.
pub async fn start_reminder_scheduler(db: MongoDB) {
    log::info!("⏰ Starting reminder scheduler (sweeps every 60s)");

    tokio::spawn(async move {
        log::info!("🚀 Running initial reminder sweep on startup...");
        match sweep_due_reminders(&db).await {
            Ok((due, delivered)) => {
                log::info!(
                    "✅ Startup sweep completed: {} due, {} delivered",
                    due,
                    delivered
                );
            }
            Err(e) => {
                log::error!("❌ Startup reminder sweep failed: {}", e);
            }
        }

        let mut interval = interval(Duration::from_secs(60));
        interval.tick().await; // first tick completes immediately

        loop {
            interval.tick().await;

            match sweep_due_reminders(&db).await {
                Ok((0, _)) => {}
                Ok((due, delivered)) => {
                    log::info!("🔔 Reminder sweep: {} due, {} delivered", due, delivered);
                }
                Err(e) => {
                    log::error!("❌ Reminder sweep failed: {}", e);
                }
            }
        }
    });

    log::info!("✅ Reminder scheduler started successfully");
}

/// Fires every pending reminder whose trigger time has arrived.
/// Returns (due, delivered).
async fn sweep_due_reminders(db: &MongoDB) -> Result<(usize, usize), String> {
    let now = Utc::now().timestamp();

    let due = reminder_service::due_reminders(db, now)
        .await
        .map_err(|e| e.to_string())?;

    if due.is_empty() {
        return Ok((0, 0));
    }

    let mut delivered = 0;

    for reminder in &due {
        match fire_reminder(db, reminder).await {
            Ok(true) => {
                delivered += 1;
                crate::api::metrics::increment_reminders_delivered();
            }
            Ok(false) => {}
            Err(e) => {
                log::error!(
                    "  ❌ Failed to fire reminder {} for user {}: {}",
                    reminder.reminder_id,
                    reminder.user_id,
                    e
                );
            }
        }

        // Sent regardless of delivery outcome - no retries
        if let Err(e) = reminder_service::mark_sent(db, &reminder.reminder_id).await {
            log::error!(
                "  ❌ Failed to mark reminder {} as sent: {}",
                reminder.reminder_id,
                e
            );
        }
    }

    Ok((due.len(), delivered))
}

/// Pushes one reminder if the owner wants notifications and has a device
/// token. Returns whether a push actually went out.
async fn fire_reminder(db: &MongoDB, reminder: &Reminder) -> Result<bool, String> {
    let settings = reminder_service::get_settings(db, &reminder.user_id)
        .await
        .map_err(|e| e.to_string())?;

    if !settings.enabled {
        log::debug!(
            "  🔕 Notifications disabled for user {}, skipping reminder {}",
            reminder.user_id,
            reminder.reminder_id
        );
        return Ok(false);
    }

    let push_token = match &settings.push_token {
        Some(token) => token,
        None => {
            log::warn!(
                "  ⚠️ No push token for user {}, reminder {} dropped",
                reminder.user_id,
                reminder.reminder_id
            );
            return Ok(false);
        }
    };

    let body = format!(
        "{} starts in {}",
        reminder.event_title,
        time::format_lead_time(reminder.lead_minutes)
    );

    push_service::send_push(push_token, "Event reminder", &body, &reminder.event_id)
        .await
        .map_err(|e| e.to_string())?;

    log::info!(
        "  📬 Reminder delivered: event {} to user {}",
        reminder.event_id,
        reminder.user_id
    );

    Ok(true)
}
