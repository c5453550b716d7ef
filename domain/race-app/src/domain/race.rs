use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::{
    PaginatedResponse, Pagination, RaceId, RepoCreateError, RepoError, RepoRetrieveError,
    RepoUpdateError, SortOrder,
};

pub const DEFAULT_IN_PROGRESS: bool = true;
pub const DEFAULT_DURATION: f64 = 0.0;

/// One timed attempt owned by a user, tracked from start until it is stopped.
#[derive(Clone, Debug, PartialEq)]
pub struct Race {
    pub id: RaceId,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub in_progress: bool,
    pub duration: f64,
}

impl Race {
    pub fn started(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Marks the race as finished with the given elapsed time. Calling this on
    /// an already stopped race overwrites the recorded duration.
    pub fn stop(&mut self, time: f64) {
        self.in_progress = false;
        self.duration = time;
    }
}

/// Creation request. Fields left as `None` are filled in by the repository.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewRace {
    pub username: String,
    pub created_at: Option<DateTime<Utc>>,
    pub in_progress: Option<bool>,
    pub duration: Option<f64>,
}

impl NewRace {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), RepoCreateError> {
        let validator = UsernameValidator {
            username: self.username.trim().to_string(),
        };
        validator
            .validate()
            .map_err(|e| RepoCreateError::Validation(format!("Invalid username: {}", e)))
    }
}

#[derive(Validate)]
struct UsernameValidator {
    #[validate(length(min = 1))]
    username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceSortBy {
    Duration,
    CreatedAt,
    RaceId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceQuery {
    pub sort: Option<(SortOrder, RaceSortBy)>,
    pub pagination: Pagination,
}

impl RaceQuery {
    /// Shortest duration first, single result.
    pub fn best() -> Self {
        Self {
            sort: Some((SortOrder::Ascending, RaceSortBy::Duration)),
            pagination: Pagination {
                offset: None,
                limit: Some(1),
            },
        }
    }
}

#[async_trait::async_trait]
pub trait RaceRepository {
    async fn create_race(&self, race: NewRace) -> Result<Race, RepoCreateError>;
    async fn save_race(&self, race: &Race) -> Result<Race, RepoUpdateError>;
    async fn get_race(&self, race_id: RaceId) -> Result<Race, RepoRetrieveError>;
    async fn query_races(&self, query: RaceQuery) -> Result<PaginatedResponse<Race>, RepoError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    #[derive(Default, Clone)]
    pub struct MockRaceRepository {
        pub races: Arc<Mutex<Vec<Race>>>,
        pub fail_writes: Arc<AtomicBool>,
        pub fail_reads: Arc<AtomicBool>,
    }

    impl MockRaceRepository {
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub fn stored(&self, race_id: RaceId) -> Option<Race> {
            self.races
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == race_id)
                .cloned()
        }
    }

    #[async_trait::async_trait]
    impl RaceRepository for MockRaceRepository {
        async fn create_race(&self, race: NewRace) -> Result<Race, RepoCreateError> {
            race.validate()?;
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RepoCreateError::StorageError("store unavailable".into()));
            }
            let mut races = self.races.lock().unwrap();
            let id = races.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
            let created = Race {
                id: RaceId(id),
                username: race.username,
                created_at: race.created_at.unwrap_or_else(Utc::now),
                in_progress: race.in_progress.unwrap_or(DEFAULT_IN_PROGRESS),
                duration: race.duration.unwrap_or(DEFAULT_DURATION),
            };
            races.push(created.clone());
            Ok(created)
        }

        async fn save_race(&self, race: &Race) -> Result<Race, RepoUpdateError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RepoUpdateError::StorageError("store unavailable".into()));
            }
            let mut races = self.races.lock().unwrap();
            let stored = races
                .iter_mut()
                .find(|r| r.id == race.id)
                .ok_or(RepoUpdateError::NotFound)?;
            *stored = race.clone();
            Ok(stored.clone())
        }

        async fn get_race(&self, race_id: RaceId) -> Result<Race, RepoRetrieveError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RepoRetrieveError::StorageError("store unavailable".into()));
            }
            self.stored(race_id).ok_or(RepoRetrieveError::NotFound)
        }

        async fn query_races(
            &self,
            query: RaceQuery,
        ) -> Result<PaginatedResponse<Race>, RepoError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RepoError::StorageError("store unavailable".into()));
            }
            let mut races = self.races.lock().unwrap().clone();
            let total_count = races.len();
            if let Some((order, sort_by)) = query.sort {
                races.sort_by(|a, b| {
                    let ordering = match sort_by {
                        RaceSortBy::Duration => a.duration.total_cmp(&b.duration),
                        RaceSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                        RaceSortBy::RaceId => a.id.cmp(&b.id),
                    };
                    match order {
                        SortOrder::Ascending => ordering,
                        SortOrder::Descending => ordering.reverse(),
                    }
                });
            }
            let items = races
                .into_iter()
                .skip(query.pagination.offset.unwrap_or(0))
                .take(query.pagination.limit.unwrap_or(usize::MAX))
                .collect();
            Ok(PaginatedResponse { total_count, items })
        }
    }
}
