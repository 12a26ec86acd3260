pub mod chat;
pub mod lifecycle;
