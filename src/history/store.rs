//! Match log storage interface and implementations
//!
//! This module defines the interface for persisting the ordered match log
//! of each competition, with a flat-file and an in-memory implementation.

use crate::error::EloError;
use crate::types::{Competition, MatchEvent};
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Extension of match log files
const LOG_EXTENSION: &str = "txt";

/// Trait for match log storage operations
pub trait MatchLogStore: Send + Sync {
    /// Load the full log of a competition, empty if none exists
    fn load(&self, competition: &Competition) -> crate::error::Result<Vec<MatchEvent>>;

    /// Replace the log of a competition
    fn save(&self, competition: &Competition, events: &[MatchEvent]) -> crate::error::Result<()>;

    /// Whether a log has ever been saved for the competition
    fn exists(&self, competition: &Competition) -> crate::error::Result<bool>;

    /// All competitions with a stored log, sorted by name
    fn list_competitions(&self) -> crate::error::Result<Vec<Competition>>;
}

/// Parse the text of a log file
pub fn parse_log(competition: &Competition, contents: &str) -> crate::error::Result<Vec<MatchEvent>> {
    let mut events = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let event = MatchEvent::parse_line(line).map_err(|reason| EloError::MalformedLogEntry {
            competition: competition.to_string(),
            line: index + 1,
            reason,
        })?;
        events.push(event);
    }

    Ok(events)
}

/// Render events as the text of a log file
pub fn render_log(events: &[MatchEvent]) -> String {
    let mut contents = String::new();
    for event in events {
        contents.push_str(&event.to_line());
        contents.push('\n');
    }
    contents
}

/// Match logs stored as one text file per competition
#[derive(Debug, Clone)]
pub struct FileMatchLogStore {
    directory: PathBuf,
}

impl FileMatchLogStore {
    /// Create a store rooted at `directory`; it is created on first save
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn log_path(&self, competition: &Competition) -> PathBuf {
        self.directory
            .join(format!("{}.{}", competition.as_str(), LOG_EXTENSION))
    }
}

impl MatchLogStore for FileMatchLogStore {
    fn load(&self, competition: &Competition) -> crate::error::Result<Vec<MatchEvent>> {
        let path = self.log_path(competition);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No match log at {}, treating as empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let events = parse_log(competition, &contents)?;
        debug!("Loaded {} events from {}", events.len(), path.display());
        Ok(events)
    }

    fn save(&self, competition: &Competition, events: &[MatchEvent]) -> crate::error::Result<()> {
        fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;

        let path = self.log_path(competition);
        let temp_path = path.with_extension(format!("{}.tmp", LOG_EXTENSION));

        // Readers see either the old or the new file, never a partial write
        fs::write(&temp_path, render_log(events))
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved {} events to {}", events.len(), path.display());
        Ok(())
    }

    fn exists(&self, competition: &Competition) -> crate::error::Result<bool> {
        Ok(self.log_path(competition).is_file())
    }

    fn list_competitions(&self) -> crate::error::Result<Vec<Competition>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to list {}", self.directory.display()));
            }
        };

        let mut competitions = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list {}", self.directory.display()))?
                .path();

            if path.extension().and_then(|ext| ext.to_str()) != Some(LOG_EXTENSION) {
                continue;
            }

            if let Some(competition) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Competition::new(stem).ok())
            {
                competitions.push(competition);
            }
        }

        competitions.sort();
        Ok(competitions)
    }
}

/// In-memory match log storage implementation
#[derive(Debug, Default)]
pub struct InMemoryMatchLogStore {
    logs: RwLock<HashMap<Competition, Vec<MatchEvent>>>,
}

impl InMemoryMatchLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchLogStore for InMemoryMatchLogStore {
    fn load(&self, competition: &Competition) -> crate::error::Result<Vec<MatchEvent>> {
        let logs = self.logs.read().map_err(|_| EloError::StorageError {
            message: "Failed to acquire match log read lock".to_string(),
        })?;

        Ok(logs.get(competition).cloned().unwrap_or_default())
    }

    fn save(&self, competition: &Competition, events: &[MatchEvent]) -> crate::error::Result<()> {
        let mut logs = self.logs.write().map_err(|_| EloError::StorageError {
            message: "Failed to acquire match log write lock".to_string(),
        })?;

        logs.insert(competition.clone(), events.to_vec());
        Ok(())
    }

    fn exists(&self, competition: &Competition) -> crate::error::Result<bool> {
        let logs = self.logs.read().map_err(|_| EloError::StorageError {
            message: "Failed to acquire match log read lock".to_string(),
        })?;

        Ok(logs.contains_key(competition))
    }

    fn list_competitions(&self) -> crate::error::Result<Vec<Competition>> {
        let logs = self.logs.read().map_err(|_| EloError::StorageError {
            message: "Failed to acquire match log read lock".to_string(),
        })?;

        let mut competitions: Vec<Competition> = logs.keys().cloned().collect();
        competitions.sort();
        Ok(competitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerId;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn competition(name: &str) -> Competition {
        Competition::new(name).unwrap()
    }

    fn event(winner: &str, loser: &str, day: u32) -> MatchEvent {
        MatchEvent::new(
            PlayerId::new(winner).unwrap(),
            PlayerId::new(loser).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        )
    }

    #[test]
    fn test_parse_log_skips_blank_lines() {
        let events = parse_log(
            &competition("pool"),
            "alice,bob,2024-05-01\n\nBob,Carol,2024-05-02\n",
        )
        .unwrap();

        assert_eq!(events, vec![event("alice", "bob", 1), event("bob", "carol", 2)]);
    }

    #[test]
    fn test_parse_log_reports_line_number() {
        let err = parse_log(
            &competition("pool"),
            "alice,bob,2024-05-01\nalice;bob;2024-05-02\n",
        )
        .unwrap_err();

        match err.downcast_ref::<EloError>() {
            Some(EloError::MalformedLogEntry {
                competition, line, ..
            }) => {
                assert_eq!(competition, "pool");
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_file_store_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileMatchLogStore::new(dir.path().join("match_history"));

        assert!(store.load(&competition("pool")).unwrap().is_empty());
        assert!(!store.exists(&competition("pool")).unwrap());
        assert!(store.list_competitions().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileMatchLogStore::new(dir.path().join("match_history"));
        let log = vec![event("alice", "bob", 1), event("carol", "alice", 2)];

        store.save(&competition("pool"), &log).unwrap();

        assert!(store.exists(&competition("pool")).unwrap());
        assert_eq!(store.load(&competition("pool")).unwrap(), log);

        let raw = fs::read_to_string(dir.path().join("match_history/pool.txt")).unwrap();
        assert_eq!(raw, "alice,bob,2024-05-01\ncarol,alice,2024-05-02\n");
    }

    #[test]
    fn test_file_store_overwrites_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileMatchLogStore::new(dir.path());

        store
            .save(&competition("pool"), &[event("alice", "bob", 1), event("bob", "alice", 2)])
            .unwrap();
        store
            .save(&competition("pool"), &[event("alice", "bob", 1)])
            .unwrap();

        assert_eq!(store.load(&competition("pool")).unwrap().len(), 1);
        assert!(!dir.path().join("pool.txt.tmp").exists());
        assert_eq!(store.list_competitions().unwrap(), vec![competition("pool")]);
    }

    #[test]
    fn test_file_store_lists_competitions_sorted() {
        let dir = TempDir::new().unwrap();
        let store = FileMatchLogStore::new(dir.path());

        store.save(&competition("tt_singles"), &[]).unwrap();
        store.save(&competition("darts"), &[]).unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        assert_eq!(
            store.list_competitions().unwrap(),
            vec![competition("darts"), competition("tt_singles")]
        );
    }

    #[test]
    fn test_competitions_are_independent() {
        let store = InMemoryMatchLogStore::new();

        store
            .save(&competition("darts"), &[event("alice", "bob", 1)])
            .unwrap();

        assert_eq!(store.load(&competition("darts")).unwrap().len(), 1);
        assert!(store.load(&competition("pool")).unwrap().is_empty());
        assert!(store.exists(&competition("darts")).unwrap());
        assert!(!store.exists(&competition("pool")).unwrap());
    }
}
