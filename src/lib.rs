//! Rex is a terminal client for the Rex personal chatbot backend.
//!
//! - [`core`] holds the chat session protocol, the name heuristic, the
//!   message exchange and persistent configuration.
//! - [`ui`] runs the full-screen chat terminal.
//! - [`admin`] is the line-based admin console over the backend's CRUD
//!   endpoints.
//! - [`api`] defines wire payloads and the HTTP client shared by both.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod admin;
pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
