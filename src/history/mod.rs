//! Match history management
//!
//! This module provides the storage interface for match logs, the
//! confirmation collaborator for new players, and the service that runs
//! the rating engine against a stored log.

pub mod confirm;
pub mod service;
pub mod store;

pub use confirm::{AutoConfirm, Confirmation, PromptConfirmation};
pub use service::{HistoryService, MatchOutcome, RecordedMatch};
pub use store::{FileMatchLogStore, InMemoryMatchLogStore, MatchLogStore};
