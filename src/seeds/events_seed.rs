use crate::database::MongoDB;
use crate::models::Event;
use chrono::{Duration, NaiveTime, Utc};
use mongodb::bson::{doc, oid::ObjectId};

/// Seed of the demo event catalog.
/// Only inserts when the events collection is empty, so real catalogs are
/// never touched. Dates are laid out relative to today to keep the demo
/// calendar alive.
pub async fn seed_demo_events(db: &MongoDB) {
    let collection = db.collection::<Event>("events");

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);

    if count > 0 {
        log::info!("📋 Events: {} already in DB — skipping seed", count);
        return;
    }

    log::info!("📋 Events: seeding demo catalog into MongoDB...");

    let now = Utc::now().timestamp();
    let events = build_demo_events(now);

    match collection.insert_many(&events).await {
        Ok(result) => {
            log::info!(
                "   ✅ Inserted {} demo events into events collection",
                result.inserted_ids.len()
            );
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed demo events: {}", e);
        }
    }
}

/// Start timestamp `days` from today at `hour:minute` UTC
fn upcoming(days: i64, hour: u32, minute: u32) -> i64 {
    let date = (Utc::now() + Duration::days(days)).date_naive();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    date.and_time(time).and_utc().timestamp()
}

fn build_demo_events(now: i64) -> Vec<Event> {
    const PROMO_VIDEO: &str = "https://d23dyxeqlo5psv.cloudfront.net/big_buck_bunny.mp4";

    vec![
        Event {
            id: None,
            event_id: ObjectId::new().to_hex(),
            title: "Web Development Workshop".into(),
            description: "Learn the foundations of web development in this hands-on workshop. Perfect for beginners!".into(),
            date: upcoming(10, 14, 0),
            end_date: Some(upcoming(10, 16, 0)),
            location: "Tech Lab 101".into(),
            is_online: false,
            categories: vec!["Programming".into(), "Web Development".into()],
            attendees: 24,
            video_url: Some(PROMO_VIDEO.into()),
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1517245386807-bb43f82c33c4?w=500&auto=format&fit=crop".into(),
            ),
            likes: 45,
            created_at: now,
        },
        Event {
            id: None,
            event_id: ObjectId::new().to_hex(),
            title: "AI Conference".into(),
            description: "Dive into the world of artificial intelligence with talks from leading experts.".into(),
            date: upcoming(17, 10, 0),
            end_date: Some(upcoming(17, 18, 0)),
            location: "Online Zoom Meeting".into(),
            is_online: true,
            categories: vec!["AI".into(), "Machine Learning".into(), "Technology".into()],
            attendees: 78,
            video_url: Some(PROMO_VIDEO.into()),
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1591453089816-0fbb971b454c?w=500&auto=format&fit=crop".into(),
            ),
            likes: 120,
            created_at: now,
        },
        Event {
            id: None,
            event_id: ObjectId::new().to_hex(),
            title: "Mobile Development Meetup".into(),
            description: "A meetup for mobile app developers. Real-world cases, networking and a friendly atmosphere.".into(),
            date: upcoming(2, 18, 30),
            end_date: Some(upcoming(2, 20, 0)),
            location: "Digital Hub".into(),
            is_online: false,
            categories: vec!["Mobile".into(), "iOS".into(), "Android".into()],
            attendees: 42,
            video_url: Some(PROMO_VIDEO.into()),
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1551650975-87deedd944c3?w=500&auto=format&fit=crop".into(),
            ),
            likes: 37,
            created_at: now,
        },
        Event {
            id: None,
            event_id: ObjectId::new().to_hex(),
            title: "UX/UI Design Workshop".into(),
            description: "Practical workshop on user interface design. Build attractive, usable products from day one.".into(),
            date: upcoming(5, 15, 0),
            end_date: Some(upcoming(5, 17, 0)),
            location: "Design Studio".into(),
            is_online: false,
            categories: vec!["Design".into(), "UI/UX".into()],
            attendees: 30,
            video_url: Some(PROMO_VIDEO.into()),
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1587440871875-191322ee64b0?w=500&auto=format&fit=crop".into(),
            ),
            likes: 62,
            created_at: now,
        },
        Event {
            id: None,
            event_id: ObjectId::new().to_hex(),
            title: "Data Science Webinar".into(),
            description: "Online webinar on data analysis and machine learning with examples you can apply right away.".into(),
            date: upcoming(13, 12, 0),
            end_date: Some(upcoming(13, 13, 30)),
            location: "Online Streaming".into(),
            is_online: true,
            categories: vec!["Data Science".into(), "Statistics".into()],
            attendees: 65,
            video_url: Some(PROMO_VIDEO.into()),
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=500&auto=format&fit=crop".into(),
            ),
            likes: 53,
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_events_are_upcoming() {
        let now = Utc::now().timestamp();
        for event in build_demo_events(now) {
            assert!(event.date > now);
            if let Some(end) = event.end_date {
                assert!(end > event.date);
            }
        }
    }

    #[test]
    fn test_demo_events_all_carry_promos() {
        let events = build_demo_events(0);
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.video_url.is_some()));
        assert!(events.iter().all(|e| !e.categories.is_empty()));
    }
}
