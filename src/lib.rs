//! Local persistence and exchange engine for the SSO application onboarding
//! questionnaire: session identity, answer snapshots, progress, conditional
//! sections, unsaved-change tracking, JSON export/import and HTML reports.

pub mod cli;
pub mod form;
pub mod report;
pub mod session;
pub mod store;
pub mod transfer;

pub use form::schema::Field;
pub use form::snapshot::{FieldValue, Snapshot};
pub use session::controller::{FormSession, SessionOptions};
pub use session::error::FormError;
pub use session::port::{Control, PresentationPort, Severity};
pub use session::sheet::AnswerSheet;
pub use store::identity::FormId;
pub use store::kv::{KeyValueStore, MemoryStore, StorageError};
