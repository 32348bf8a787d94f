//! Core domain + application logic for linking app users to Telegram chats.
//!
//! This crate is intentionally framework-agnostic. Authentication, persistence
//! and the Telegram Bot API live behind ports (traits); the HTTP gateway is
//! implemented in the `tglink-telegram` adapter crate.

pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod outcome;
pub mod ports;
pub mod service;

pub use errors::{Error, Result};
pub use service::TelegramLinkService;
