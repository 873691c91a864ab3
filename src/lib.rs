//! In-memory mock authentication backend for frontend development.

pub mod app;
pub mod auth;
pub mod config;
pub mod state;
