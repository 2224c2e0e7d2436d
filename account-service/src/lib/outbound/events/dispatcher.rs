use std::sync::Arc;

use async_trait::async_trait;
use auth::EventPublishError;
use auth::LoginEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Consumer of login events drained from the pipeline's channel.
#[async_trait]
pub trait LoginEventSubscriber: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// # Errors
    /// * `PublishFailed` - The event could not be delivered
    async fn on_login(&self, event: &LoginEvent) -> Result<(), EventPublishError>;
}

/// Drain `receiver` in a background task, handing every event to each
/// subscriber in order.
///
/// Subscriber failures are logged and do not stop delivery. The task ends
/// once every sender is dropped.
pub fn spawn_login_event_dispatcher(
    mut receiver: UnboundedReceiver<LoginEvent>,
    subscribers: Vec<Arc<dyn LoginEventSubscriber>>,
) -> JoinHandle<()> {
    tracing::info!(
        subscribers = ?subscribers.iter().map(|s| s.name().to_string()).collect::<Vec<_>>(),
        "Login event dispatcher started"
    );

    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            for subscriber in &subscribers {
                if let Err(e) = subscriber.on_login(&event).await {
                    tracing::error!(
                        subscriber = subscriber.name(),
                        event_id = %event.event_id,
                        "Failed to deliver login event: {}",
                        e
                    );
                }
            }
        }

        tracing::info!("Login event channel closed, dispatcher stopping");
    })
}
