use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Campus event in the "events" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub event_id: String,

    pub title: String,

    pub description: String,

    /// Start time (unix seconds, UTC)
    pub date: i64,

    /// Optional end time
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<i64>,

    pub location: String,

    pub is_online: bool,

    pub categories: Vec<String>,

    #[serde(default)]
    pub attendees: i64,

    /// Present when the event has a short-video promo
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub video_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub likes: i64,

    pub created_at: i64,
}

/// Event payload for the calendar and detail endpoints
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    pub location: String,
    pub is_online: bool,
    pub categories: Vec<String>,
    pub attendees: i64,
    pub likes: i64,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        EventResponse {
            id: event.event_id,
            title: event.title,
            description: event.description,
            date: event.date,
            end_date: event.end_date,
            location: event.location,
            is_online: event.is_online,
            categories: event.categories,
            attendees: event.attendees,
            likes: event.likes,
        }
    }
}

/// Shorts-feed payload: only video-bearing events end up here
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortResponse {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub date: i64,
    pub location: String,
    pub is_online: bool,
    pub attendees: i64,
    pub likes: i64,
    pub categories: Vec<String>,
    /// Whether the requesting user has liked this short
    pub liked: bool,
}

/// Like toggle record in "event_likes" - one per (user, event)
#[derive(Debug, Serialize, Deserialize)]
pub struct EventLike {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub event_id: String,
    pub created_at: i64,
}
