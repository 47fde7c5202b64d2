use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Cancelled,
}

/// One-shot event reminder in the "reminders" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub reminder_id: String,

    pub user_id: String,

    pub event_id: String,

    /// Denormalized so the push body survives event edits
    pub event_title: String,

    /// Minutes before the event start at which the notification fires
    pub lead_minutes: i64,

    /// event.date - lead_minutes * 60; the sweep fires when now >= trigger_at
    pub trigger_at: i64,

    pub status: ReminderStatus,

    pub created_at: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub id: String,
    pub event_id: String,
    pub event_title: String,
    pub lead_minutes: i64,
    pub trigger_at: i64,
    pub status: ReminderStatus,
}

impl From<Reminder> for ReminderResponse {
    fn from(reminder: Reminder) -> Self {
        ReminderResponse {
            id: reminder.reminder_id,
            event_id: reminder.event_id,
            event_title: reminder.event_title,
            lead_minutes: reminder.lead_minutes,
            trigger_at: reminder.trigger_at,
            status: reminder.status,
        }
    }
}

/// Per-user notification preferences in "notification_settings"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_lead_minutes")]
    pub default_lead_minutes: i64,
    /// Expo push token registered by the device, when it has one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub push_token: Option<String>,
    pub updated_at: i64,
}

pub fn default_lead_minutes() -> i64 {
    30
}

impl NotificationSettings {
    /// Defaults used before the user ever saved preferences
    pub fn defaults_for(user_id: &str, now: i64) -> Self {
        NotificationSettings {
            id: None,
            user_id: user_id.to_string(),
            enabled: false,
            default_lead_minutes: default_lead_minutes(),
            push_token: None,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsResponse {
    pub enabled: bool,
    pub default_lead_minutes: i64,
    pub has_push_token: bool,
}

impl From<NotificationSettings> for NotificationSettingsResponse {
    fn from(settings: NotificationSettings) -> Self {
        NotificationSettingsResponse {
            enabled: settings.enabled,
            default_lead_minutes: settings.default_lead_minutes,
            has_push_token: settings.push_token.is_some(),
        }
    }
}
