use crate::utils::error::AppError;
use serde_json::json;

fn get_push_url() -> String {
    std::env::var("EXPO_PUSH_URL")
        .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".to_string())
}

// Single Expo push message. One attempt - the caller decides what failure means.
pub async fn send_push(
    push_token: &str,
    title: &str,
    body: &str,
    event_id: &str,
) -> Result<(), AppError> {
    let client = reqwest::Client::new();

    let message = json!({
        "to": push_token,
        "title": title,
        "body": body,
        "sound": "default",
        "badge": 1,
        "data": { "eventId": event_id },
    });

    let response = client
        .post(get_push_url())
        .json(&message)
        .send()
        .await
        .map_err(|e| AppError::ExternalError(format!("Failed to reach Expo push API: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::ExternalError(format!(
            "Expo push API returned {}",
            response.status()
        )));
    }

    Ok(())
}
