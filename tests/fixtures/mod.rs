//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use chrono::NaiveDate;
use elo_ladder::error::{EloError, Result};
use elo_ladder::history::{Confirmation, HistoryService, InMemoryMatchLogStore, MatchLogStore};
use elo_ladder::rating::EloRatingCalculator;
use elo_ladder::types::{Competition, MatchEvent, PlayerId};
use elo_ladder::utils::FixedClock;
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mock! {
    pub Confirmer {}

    impl Confirmation for Confirmer {
        fn confirm(&self, player: &PlayerId) -> Result<bool>;
    }
}

/// Date stamped on every match recorded in tests
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn competition(name: &str) -> Competition {
    Competition::new(name).unwrap()
}

pub fn player(name: &str) -> PlayerId {
    PlayerId::new(name).unwrap()
}

pub fn event(winner: &str, loser: &str) -> MatchEvent {
    MatchEvent::new(player(winner), player(loser), test_date())
}

/// History service over an arbitrary store with a fixed clock
pub fn create_test_service(store: Arc<dyn MatchLogStore>) -> HistoryService {
    HistoryService::new(
        store,
        Arc::new(EloRatingCalculator::default()),
        Arc::new(FixedClock(test_date())),
    )
}

/// History service over a fresh in-memory store
pub fn create_memory_service() -> (HistoryService, Arc<InMemoryMatchLogStore>) {
    let store = Arc::new(InMemoryMatchLogStore::new());
    (create_test_service(store.clone()), store)
}

/// Store whose loads succeed but whose saves always fail
#[derive(Debug, Default)]
pub struct ReadOnlyMatchLogStore {
    inner: InMemoryMatchLogStore,
    save_attempts: AtomicUsize,
}

impl ReadOnlyMatchLogStore {
    pub fn with_log(competition: &Competition, events: &[MatchEvent]) -> Self {
        let store = Self::default();
        store
            .inner
            .save(competition, events)
            .expect("seeding in-memory store");
        store
    }

    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

impl MatchLogStore for ReadOnlyMatchLogStore {
    fn load(&self, competition: &Competition) -> Result<Vec<MatchEvent>> {
        self.inner.load(competition)
    }

    fn save(&self, _competition: &Competition, _events: &[MatchEvent]) -> Result<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(EloError::StorageError {
            message: "store is read-only".to_string(),
        }
        .into())
    }

    fn exists(&self, competition: &Competition) -> Result<bool> {
        self.inner.exists(competition)
    }

    fn list_competitions(&self) -> Result<Vec<Competition>> {
        self.inner.list_competitions()
    }
}
