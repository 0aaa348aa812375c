pub mod controller;
pub mod debounce;
pub mod error;
pub mod port;
pub mod sheet;
