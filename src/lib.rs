//! ytsdebrid - YTS movie catalog addon with Real-Debrid stream conversion
//!
//! This library crate exposes the core functionality for integration testing.

pub mod cache;
pub mod config;
pub mod debrid;
pub mod manifest;
pub mod metadata;
pub mod ranker;
pub mod resolver;
pub mod server;
