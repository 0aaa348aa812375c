pub mod changes;
pub mod progress;
pub mod schema;
pub mod snapshot;
pub mod visibility;
