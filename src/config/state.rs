//! Persistent key-value state
//!
//! The only value kept here is the current competition. It is read once
//! by the command line layer and then passed explicitly to the history
//! service.

use crate::error::EloError;
use crate::types::Competition;
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Key under which the current competition is stored
pub const CURRENT_COMPETITION_KEY: &str = "current_competition";

/// Trait for key-value state storage
pub trait StateStore: Send + Sync {
    /// Load all values, empty if nothing was saved yet
    fn load(&self) -> crate::error::Result<HashMap<String, String>>;

    /// Replace all values
    fn save(&self, values: &HashMap<String, String>) -> crate::error::Result<()>;
}

/// State stored as a JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> crate::error::Result<HashMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            EloError::ConfigurationError {
                message: format!("Invalid state file {}: {}", self.path.display(), e),
            }
            .into()
        })
    }

    fn save(&self, values: &HashMap<String, String>) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// In-memory state storage implementation
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> crate::error::Result<HashMap<String, String>> {
        let values = self.values.read().map_err(|_| EloError::StorageError {
            message: "Failed to acquire state read lock".to_string(),
        })?;

        Ok(values.clone())
    }

    fn save(&self, values: &HashMap<String, String>) -> crate::error::Result<()> {
        let mut stored = self.values.write().map_err(|_| EloError::StorageError {
            message: "Failed to acquire state write lock".to_string(),
        })?;

        *stored = values.clone();
        Ok(())
    }
}

/// Competition remembered as current, if any
pub fn current_competition(store: &dyn StateStore) -> crate::error::Result<Option<Competition>> {
    let values = store.load()?;

    values
        .get(CURRENT_COMPETITION_KEY)
        .map(|name| Competition::new(name).map_err(anyhow::Error::from))
        .transpose()
}

/// Remember `competition` as current, keeping any other stored values
pub fn set_current_competition(
    store: &dyn StateStore,
    competition: &Competition,
) -> crate::error::Result<()> {
    let mut values = store.load()?;
    values.insert(
        CURRENT_COMPETITION_KEY.to_string(),
        competition.as_str().to_string(),
    );
    store.save(&values)
}

/// Pick the explicitly requested competition, else the remembered one
pub fn resolve_competition(
    explicit: Option<Competition>,
    store: &dyn StateStore,
) -> crate::error::Result<Competition> {
    if let Some(competition) = explicit {
        return Ok(competition);
    }

    current_competition(store)?.ok_or_else(|| EloError::NoCompetitionSelected.into())
}
