use crate::database::MongoDB;
use crate::models::{User, UserPublic};
use crate::utils::error::AppError;
use crate::utils::validation;
use mongodb::bson::{doc, Bson, Document};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub interests: Option<Vec<String>>,
    pub description: Option<String>,
    pub meeting_goal: Option<String>,
    pub is_new_user: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RatingRequest {
    pub rating: f64,
}

/// $set document with exactly the fields the request supplied
pub fn build_update_document(request: &UpdateProfileRequest) -> Document {
    let mut set = Document::new();

    if let Some(name) = &request.name {
        set.insert("name", name.trim());
    }
    if let Some(photo) = &request.photo {
        set.insert("photo", photo);
    }
    if let Some(interests) = &request.interests {
        set.insert(
            "interests",
            interests.iter().map(|i| Bson::from(i.as_str())).collect::<Vec<Bson>>(),
        );
    }
    if let Some(description) = &request.description {
        set.insert("description", description);
    }
    if let Some(meeting_goal) = &request.meeting_goal {
        set.insert("meeting_goal", meeting_goal);
    }
    if let Some(is_new_user) = request.is_new_user {
        set.insert("is_new_user", is_new_user);
    }

    set
}

/// Running mean without per-rating records: (old*count + new) / (count+1)
pub fn apply_rating(rating: f64, rating_count: i64, submitted: f64) -> (f64, i64) {
    let new_count = rating_count + 1;
    let new_rating = (rating * rating_count as f64 + submitted) / new_count as f64;
    (new_rating, new_count)
}

// Partial profile update; untouched fields keep their stored values
pub async fn update_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<UserPublic, AppError> {
    if let Some(name) = &request.name {
        validation::validate_name(name)?;
    }

    let collection = db.collection::<User>("users");
    let set = build_update_document(request);

    if !set.is_empty() {
        let result = collection
            .update_one(doc! { "user_id": user_id }, doc! { "$set": set })
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update profile: {}", e)))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
    }

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserPublic::from(user))
}

// Public profile lookup
pub async fn get_profile(db: &MongoDB, user_id: &str) -> Result<UserPublic, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserPublic::from(user))
}

// Rate another user; the stored mean and count move together
pub async fn add_rating(
    db: &MongoDB,
    rater_id: &str,
    target_id: &str,
    request: &RatingRequest,
) -> Result<UserPublic, AppError> {
    validation::validate_rating(request.rating)?;

    if rater_id == target_id {
        return Err(AppError::InvalidRequest(
            "You cannot rate yourself".to_string(),
        ));
    }

    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": target_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let (new_rating, new_count) = apply_rating(user.rating, user.rating_count, request.rating);

    collection
        .update_one(
            doc! { "user_id": target_id },
            doc! { "$set": { "rating": new_rating, "rating_count": new_count } },
        )
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update rating: {}", e)))?;

    let mut updated = UserPublic::from(user);
    updated.rating = new_rating;
    updated.rating_count = new_count;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_formula() {
        // First rating becomes the mean itself
        assert_eq!(apply_rating(0.0, 0, 4.0), (4.0, 1));

        // (4*1 + 2) / 2 = 3
        assert_eq!(apply_rating(4.0, 1, 2.0), (3.0, 2));

        // (3*2 + 5) / 3 = 11/3
        let (rating, count) = apply_rating(3.0, 2, 5.0);
        assert_eq!(count, 3);
        assert!((rating - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_running_mean_equals_arithmetic_mean() {
        let submitted = [5.0, 3.0, 4.0, 1.0, 2.0, 5.0, 4.0];

        let mut rating = 0.0;
        let mut count = 0;
        for s in submitted {
            let (r, c) = apply_rating(rating, count, s);
            rating = r;
            count = c;
        }

        let expected: f64 = submitted.iter().sum::<f64>() / submitted.len() as f64;
        assert_eq!(count as usize, submitted.len());
        assert!((rating - expected).abs() < 1e-9);
    }

    #[test]
    fn test_running_mean_stays_in_range() {
        let mut rating = 0.0;
        let mut count = 0;
        for s in [1.0, 5.0, 1.0, 5.0, 5.0, 5.0, 1.0, 1.0, 1.0, 5.0] {
            let (r, c) = apply_rating(rating, count, s);
            rating = r;
            count = c;
            assert!((0.0..=5.0).contains(&rating));
        }
    }

    #[test]
    fn test_update_document_contains_only_supplied_fields() {
        let request = UpdateProfileRequest {
            name: Some("Aliya".into()),
            photo: None,
            interests: Some(vec!["Chess".into(), "AI".into()]),
            description: None,
            meeting_goal: None,
            is_new_user: Some(false),
        };

        let set = build_update_document(&request);

        assert_eq!(set.len(), 3);
        assert_eq!(set.get_str("name").unwrap(), "Aliya");
        assert!(set.get_array("interests").is_ok());
        assert!(!set.get_bool("is_new_user").unwrap());
        assert!(set.get("photo").is_none());
        assert!(set.get("description").is_none());
        assert!(set.get("meeting_goal").is_none());
    }

    #[test]
    fn test_update_document_empty_when_nothing_supplied() {
        let request = UpdateProfileRequest {
            name: None,
            photo: None,
            interests: None,
            description: None,
            meeting_goal: None,
            is_new_user: None,
        };

        assert!(build_update_document(&request).is_empty());
    }
}
