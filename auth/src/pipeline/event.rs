use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::EventPublishError;
use super::ports::LoginEventSink;
use super::user::GrantType;
use super::user::LoginUser;

/// Notification emitted once a login completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginEvent {
    pub event_id: String,
    pub user: LoginUser,
    pub grant_type: GrantType,
    pub success: bool,
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl LoginEvent {
    /// Event for a completed login of `user`.
    pub fn succeeded(user: &LoginUser) -> Self {
        Self {
            event_id: Uuid::now_v7().to_string(),
            user: user.clone(),
            grant_type: user.grant_type.clone(),
            success: true,
            detail: None,
            occurred_at: Utc::now(),
        }
    }
}

/// Login event sink backed by an unbounded channel.
///
/// Publishing never blocks; whoever holds the receiver decides what
/// happens to the events.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<LoginEvent>,
}

impl ChannelEventSink {
    /// Create a sink together with the receiving end of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LoginEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl LoginEventSink for ChannelEventSink {
    fn publish(&self, event: LoginEvent) -> Result<(), EventPublishError> {
        self.sender
            .send(event)
            .map_err(|_| EventPublishError::ChannelClosed)
    }
}
