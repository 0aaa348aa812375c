pub mod file;
pub mod identity;
pub mod kv;
pub mod layout;
