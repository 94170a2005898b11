//! Shared domain types for all PawTalk crates.

pub mod agent;
pub mod config;
pub mod dog;
pub mod error;
pub mod message;
pub mod profile;
pub mod trace;
