//! Configuration management for the elo tool
//!
//! This module handles configuration loading from environment variables
//! and TOML files, plus the small persisted state holding the current
//! competition.

pub mod app;
pub mod state;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, InteractionSettings, ServiceSettings, StorageSettings};
pub use state::{
    current_competition, resolve_competition, set_current_competition, InMemoryStateStore,
    JsonStateStore, StateStore,
};
