pub mod config;
pub mod exchange;
pub mod message;
pub mod names;
pub mod session;
