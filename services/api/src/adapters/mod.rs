pub mod credentials;
pub mod db;
pub mod notifier;

pub use credentials::Argon2Verifier;
pub use db::PgRecordStore;
pub use notifier::{run_delivery_worker, LogMailer, MailTransport, QueuedNotifier};
