pub mod audit;
pub mod memory;
pub mod postgres;
pub mod record;

pub use audit::AuditTimestampsProvider;
pub use memory::InMemoryAccountRepository;
pub use postgres::PostgresAccountRepository;
