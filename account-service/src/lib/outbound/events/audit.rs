use async_trait::async_trait;
use auth::EventPublishError;
use auth::LoginEvent;

use super::dispatcher::LoginEventSubscriber;
use super::messages::LoginEventMessage;

/// Log target carrying the login audit trail.
pub const AUDIT_TARGET: &str = "login_audit";

/// Writes every login event to [`AUDIT_TARGET`] as JSON.
#[derive(Debug, Default)]
pub struct AuditLogSubscriber;

#[async_trait]
impl LoginEventSubscriber for AuditLogSubscriber {
    fn name(&self) -> &str {
        "audit_log"
    }

    async fn on_login(&self, event: &LoginEvent) -> Result<(), EventPublishError> {
        let payload = serde_json::to_string(&LoginEventMessage::from(event))
            .map_err(|e| EventPublishError::PublishFailed(e.to_string()))?;

        tracing::info!(target: AUDIT_TARGET, event = %payload, "Login event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use auth::GrantType;
    use auth::LoginUser;
    use tracing::Subscriber;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Layer;

    use super::*;

    #[derive(Clone, Default)]
    struct TargetRecorder(Arc<Mutex<Vec<String>>>);

    impl<S: Subscriber> Layer<S> for TargetRecorder {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0
                .lock()
                .unwrap()
                .push(event.metadata().target().to_string());
        }
    }

    #[tokio::test]
    async fn test_one_audit_line_per_event() {
        let recorder = TargetRecorder::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(recorder.clone()),
        );

        let user = LoginUser::new("42", "alice", GrantType::password());
        AuditLogSubscriber
            .on_login(&LoginEvent::succeeded(&user))
            .await
            .unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec![AUDIT_TARGET.to_string()]);
    }
}
