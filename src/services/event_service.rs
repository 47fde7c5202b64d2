use crate::database::MongoDB;
use crate::models::{Event, EventLike, EventResponse, ShortResponse, User};
use crate::utils::error::AppError;
use crate::utils::time::{self, TimeOfDay};
use chrono::{NaiveDate, Utc};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Calendar view selecting the date window around the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    Day,
    Week,
    Month,
}

impl CalendarView {
    fn parse(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("day") => CalendarView::Day,
            Some("week") => CalendarView::Week,
            _ => CalendarView::Month,
        }
    }

    fn window(&self, anchor: NaiveDate) -> (i64, i64) {
        match self {
            CalendarView::Day => time::day_window(anchor),
            CalendarView::Week => time::week_window(anchor),
            CalendarView::Month => time::month_window(anchor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFilter {
    All,
    Online,
    Offline,
}

impl LocationFilter {
    fn parse(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("online") => LocationFilter::Online,
            Some("offline") => LocationFilter::Offline,
            _ => LocationFilter::All,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterQuery {
    /// day | week | month (default month)
    pub view: Option<String>,
    /// Anchor date, YYYY-MM-DD (default today)
    pub date: Option<String>,
    /// Comma-separated category list
    pub categories: Option<String>,
    /// Comma-separated: morning | afternoon | evening
    pub time_of_day: Option<String>,
    /// all | online | offline
    pub location: Option<String>,
    /// Keep only events sharing a category with the caller's interests
    pub interests: Option<bool>,
}

/// In-memory filter pipeline applied after the date-window query
#[derive(Debug)]
pub struct EventFilters {
    pub categories: Vec<String>,
    pub time_of_day: Vec<TimeOfDay>,
    pub location: LocationFilter,
    /// Some(interests) when the interests filter is on
    pub user_interests: Option<Vec<String>>,
}

impl EventFilters {
    pub fn matches(&self, event: &Event) -> bool {
        if !self.categories.is_empty()
            && !event.categories.iter().any(|c| self.categories.contains(c))
        {
            return false;
        }

        if !self.time_of_day.is_empty()
            && !self.time_of_day.contains(&time::time_of_day(event.date))
        {
            return false;
        }

        match self.location {
            LocationFilter::Online if !event.is_online => return false,
            LocationFilter::Offline if event.is_online => return false,
            _ => {}
        }

        if let Some(interests) = &self.user_interests {
            if !event.categories.iter().any(|c| interests.contains(c)) {
                return false;
            }
        }

        true
    }
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub success: bool,
    pub events: Vec<EventResponse>,
    pub total: usize,
}

// Calendar listing: date window in the query, the rest filtered in memory
pub async fn list_events(
    db: &MongoDB,
    user_id: &str,
    query: &EventFilterQuery,
) -> Result<EventListResponse, AppError> {
    let anchor = match &query.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidRequest("Invalid date, expected YYYY-MM-DD".to_string())
        })?,
        None => Utc::now().date_naive(),
    };

    let view = CalendarView::parse(query.view.as_deref());
    let (start, end) = view.window(anchor);

    let time_of_day = parse_list(query.time_of_day.as_deref())
        .iter()
        .filter_map(|s| TimeOfDay::parse(s))
        .collect();

    // The interests filter needs the caller's profile
    let user_interests = if query.interests.unwrap_or(false) {
        let users = db.collection::<User>("users");
        let user = users
            .find_one(doc! { "user_id": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Some(user.interests)
    } else {
        None
    };

    let filters = EventFilters {
        categories: parse_list(query.categories.as_deref()),
        time_of_day,
        location: LocationFilter::parse(query.location.as_deref()),
        user_interests,
    };

    let collection = db.collection::<Event>("events");

    let mut cursor = collection
        .find(doc! { "date": { "$gte": start, "$lt": end } })
        .sort(doc! { "date": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch events: {}", e)))?;

    let mut events = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(event) => {
                if filters.matches(&event) {
                    events.push(EventResponse::from(event));
                }
            }
            Err(e) => log::warn!("⚠️ Skipping unreadable event document: {}", e),
        }
    }

    let total = events.len();
    Ok(EventListResponse {
        success: true,
        events,
        total,
    })
}

pub async fn get_event(db: &MongoDB, event_id: &str) -> Result<EventResponse, AppError> {
    let collection = db.collection::<Event>("events");

    let event = collection
        .find_one(doc! { "event_id": event_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(EventResponse::from(event))
}

// Promo feed: every event carrying a video, oldest start first
pub async fn shorts_feed(db: &MongoDB, user_id: &str) -> Result<Vec<ShortResponse>, AppError> {
    let liked = liked_event_ids(db, user_id).await?;

    let collection = db.collection::<Event>("events");
    let mut cursor = collection
        .find(doc! { "video_url": { "$ne": null } })
        .sort(doc! { "date": 1 })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch shorts: {}", e)))?;

    let mut shorts = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(event) => {
                let video_url = match &event.video_url {
                    Some(url) => url.clone(),
                    None => continue,
                };
                shorts.push(ShortResponse {
                    id: format!("short-{}", event.event_id),
                    liked: liked.contains(&event.event_id),
                    event_id: event.event_id,
                    title: event.title,
                    description: event.description,
                    video_url,
                    thumbnail_url: event.thumbnail_url,
                    date: event.date,
                    location: event.location,
                    is_online: event.is_online,
                    attendees: event.attendees,
                    likes: event.likes,
                    categories: event.categories,
                });
            }
            Err(e) => log::warn!("⚠️ Skipping unreadable event document: {}", e),
        }
    }

    Ok(shorts)
}

async fn liked_event_ids(db: &MongoDB, user_id: &str) -> Result<HashSet<String>, AppError> {
    let likes = db.collection::<EventLike>("event_likes");

    let mut cursor = likes
        .find(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut ids = HashSet::new();
    while let Some(result) = cursor.next().await {
        if let Ok(like) = result {
            ids.insert(like.event_id);
        }
    }
    Ok(ids)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    pub success: bool,
    pub liked: bool,
    pub likes: i64,
}

// Like toggle backed by one record per (user, event)
pub async fn toggle_like(
    db: &MongoDB,
    user_id: &str,
    event_id: &str,
) -> Result<LikeResponse, AppError> {
    let events = db.collection::<Event>("events");

    let event = events
        .find_one(doc! { "event_id": event_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let likes = db.collection::<EventLike>("event_likes");
    let filter = doc! { "user_id": user_id, "event_id": event_id };

    let existing = likes
        .find_one(filter.clone())
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let (liked, delta) = if existing.is_some() {
        likes
            .delete_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        (false, -1)
    } else {
        likes
            .insert_one(EventLike {
                id: None,
                user_id: user_id.to_string(),
                event_id: event_id.to_string(),
                created_at: Utc::now().timestamp(),
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        (true, 1)
    };

    events
        .update_one(
            doc! { "event_id": event_id },
            doc! { "$inc": { "likes": delta } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    Ok(LikeResponse {
        success: true,
        liked,
        likes: (event.likes + delta).max(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(date: i64, categories: &[&str], is_online: bool) -> Event {
        Event {
            id: None,
            event_id: "e1".into(),
            title: "Test Event".into(),
            description: String::new(),
            date,
            end_date: None,
            location: "Tech Lab 101".into(),
            is_online,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            attendees: 0,
            video_url: None,
            thumbnail_url: None,
            likes: 0,
            created_at: 0,
        }
    }

    fn ts(h: u32) -> i64 {
        Utc.with_ymd_and_hms(2025, 4, 15, h, 0, 0).unwrap().timestamp()
    }

    fn no_filters() -> EventFilters {
        EventFilters {
            categories: vec![],
            time_of_day: vec![],
            location: LocationFilter::All,
            user_interests: None,
        }
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        assert!(no_filters().matches(&event(ts(14), &["AI"], true)));
    }

    #[test]
    fn test_category_filter() {
        let filters = EventFilters {
            categories: vec!["AI".into(), "Design".into()],
            ..no_filters()
        };

        assert!(filters.matches(&event(ts(14), &["AI", "Technology"], false)));
        assert!(!filters.matches(&event(ts(14), &["Mobile"], false)));
    }

    #[test]
    fn test_time_of_day_filter() {
        let filters = EventFilters {
            time_of_day: vec![TimeOfDay::Morning, TimeOfDay::Evening],
            ..no_filters()
        };

        assert!(filters.matches(&event(ts(9), &[], false)));
        assert!(filters.matches(&event(ts(19), &[], false)));
        assert!(filters.matches(&event(ts(2), &[], false))); // evening wraps past midnight
        assert!(!filters.matches(&event(ts(14), &[], false)));
    }

    #[test]
    fn test_location_filter() {
        let online_only = EventFilters {
            location: LocationFilter::Online,
            ..no_filters()
        };
        assert!(online_only.matches(&event(ts(14), &[], true)));
        assert!(!online_only.matches(&event(ts(14), &[], false)));

        let offline_only = EventFilters {
            location: LocationFilter::Offline,
            ..no_filters()
        };
        assert!(!offline_only.matches(&event(ts(14), &[], true)));
        assert!(offline_only.matches(&event(ts(14), &[], false)));
    }

    #[test]
    fn test_interests_filter() {
        let filters = EventFilters {
            user_interests: Some(vec!["Programming".into(), "Music".into()]),
            ..no_filters()
        };

        assert!(filters.matches(&event(ts(14), &["Programming", "Web Development"], false)));
        assert!(!filters.matches(&event(ts(14), &["Design"], false)));
    }

    #[test]
    fn test_filters_combine() {
        let filters = EventFilters {
            categories: vec!["AI".into()],
            time_of_day: vec![TimeOfDay::Morning],
            location: LocationFilter::Online,
            user_interests: None,
        };

        assert!(filters.matches(&event(ts(10), &["AI"], true)));
        assert!(!filters.matches(&event(ts(10), &["AI"], false))); // offline
        assert!(!filters.matches(&event(ts(14), &["AI"], true))); // afternoon
    }

    #[test]
    fn test_view_parse_defaults_to_month() {
        assert_eq!(CalendarView::parse(None), CalendarView::Month);
        assert_eq!(CalendarView::parse(Some("bogus")), CalendarView::Month);
        assert_eq!(CalendarView::parse(Some("Day")), CalendarView::Day);
        assert_eq!(CalendarView::parse(Some("week")), CalendarView::Week);
    }

    #[test]
    fn test_parse_list_trims_and_drops_empty() {
        assert_eq!(
            parse_list(Some("AI, Design ,,Mobile")),
            vec!["AI".to_string(), "Design".to_string(), "Mobile".to_string()]
        );
        assert!(parse_list(None).is_empty());
    }
}
