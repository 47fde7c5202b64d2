use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::error::AppError;

pub const MAX_NAME_LEN: usize = 50;

lazy_static! {
    // Same shape the mobile client validates against
    static ref EMAIL_RE: Regex =
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(
            "Please provide a valid email".to_string(),
        ))
    }
}

pub fn validate_name(name: &str) -> Result<(), AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(
            "Please provide a name".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Name cannot be longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Ratings are submitted as whole stars 1-5
pub fn validate_rating(rating: f64) -> Result<(), AppError> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(AppError::InvalidRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normal_addresses() {
        assert!(is_valid_email("student@kpfu.ru"));
        assert!(is_valid_email("first.last@example.com"));
        assert!(is_valid_email("a-b@sub.domain.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_name_length_limit() {
        assert!(validate_name("Aliya").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert!(validate_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1.0).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert!(validate_rating(3.5).is_ok());
        assert!(validate_rating(0.0).is_err());
        assert!(validate_rating(5.1).is_err());
        assert!(validate_rating(-1.0).is_err());
    }
}
