use auth::LoginEvent;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Serializable login event.
///
/// Infrastructure representation for event publishing (Kafka, audit log).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename = "user_logged_in")]
pub struct LoginEventMessage {
    pub event_id: String,
    pub user_id: String,
    pub username: String,
    pub grant_type: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl From<&LoginEvent> for LoginEventMessage {
    fn from(event: &LoginEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.user.user_id.clone(),
            username: event.user.username.clone(),
            grant_type: event.grant_type.to_string(),
            success: event.success,
            detail: event.detail.clone(),
            occurred_at: event.occurred_at,
        }
    }
}
