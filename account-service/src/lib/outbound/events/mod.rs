pub mod audit;
pub mod dispatcher;
pub mod messages;
#[cfg(feature = "kafka")]
pub mod producer;

pub use audit::AuditLogSubscriber;
pub use dispatcher::spawn_login_event_dispatcher;
pub use dispatcher::LoginEventSubscriber;
#[cfg(feature = "kafka")]
pub use producer::KafkaLoginEventProducer;
