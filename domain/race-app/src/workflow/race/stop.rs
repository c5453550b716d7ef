use std::sync::Arc;

use crate::domain::{
    RaceId, RepoRetrieveError, RepoUpdateError,
    race::{Race, RaceRepository},
};

#[async_trait::async_trait]
pub trait StopRaceUseCase {
    async fn stop_race(&self, race_id: RaceId, time: f64) -> Result<Race, StopRaceError>;
}

#[derive(Debug)]
pub enum StopRaceError {
    RaceNotFound,
    RepositoryError(String),
}

pub struct StopRaceUseCaseImpl<R: RaceRepository> {
    race_repository: Arc<R>,
}

impl<R: RaceRepository> StopRaceUseCaseImpl<R> {
    pub fn new(race_repository: Arc<R>) -> Self {
        Self { race_repository }
    }
}

#[async_trait::async_trait]
impl<R: RaceRepository + Send + Sync + 'static> StopRaceUseCase for StopRaceUseCaseImpl<R> {
    async fn stop_race(&self, race_id: RaceId, time: f64) -> Result<Race, StopRaceError> {
        let mut race = match self.race_repository.get_race(race_id).await {
            Ok(race) => race,
            Err(RepoRetrieveError::NotFound) => return Err(StopRaceError::RaceNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load race {}: {}", race_id, e);
                return Err(StopRaceError::RepositoryError(e));
            }
        };

        if !race.is_in_progress() {
            log::debug!(
                "Race {} was already stopped at {}, overwriting",
                race_id,
                race.duration
            );
        }
        race.stop(time);

        match self.race_repository.save_race(&race).await {
            Ok(saved) => {
                log::info!("Race {} stopped after {}", race_id, saved.duration);
                Ok(saved)
            }
            Err(RepoUpdateError::NotFound) => Err(StopRaceError::RaceNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to save race {}: {}", race_id, e);
                Err(StopRaceError::RepositoryError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::race::{NewRace, mock::MockRaceRepository},
        workflow::race::start::{StartRaceUseCase, StartRaceUseCaseImpl},
    };

    use super::*;

    #[tokio::test]
    async fn test_stop_race_scenario() {
        let repo = Arc::new(MockRaceRepository::default());
        let start = StartRaceUseCaseImpl::new(repo.clone());
        let stop = StopRaceUseCaseImpl::new(repo.clone());

        let race = start.start_race("alice".to_string()).await.unwrap();
        assert!(race.is_in_progress());

        let stopped = stop.stop_race(race.id, 45.7).await.unwrap();
        assert!(!stopped.is_in_progress());
        assert_eq!(stopped.duration, 45.7);
        assert_eq!(stopped.id, race.id);
        assert_eq!(stopped.started(), race.started());

        let stored = repo.stored(race.id).unwrap();
        assert!(!stored.in_progress);
        assert_eq!(stored.duration, 45.7);

        let restopped = stop.stop_race(race.id, 10.0).await.unwrap();
        assert!(!restopped.in_progress);
        assert_eq!(restopped.duration, 10.0);
        assert_eq!(repo.stored(race.id).unwrap().duration, 10.0);
    }

    #[tokio::test]
    async fn test_stop_unknown_race() {
        let repo = Arc::new(MockRaceRepository::default());
        let stop = StopRaceUseCaseImpl::new(repo);

        assert!(matches!(
            stop.stop_race(RaceId(42), 1.0).await,
            Err(StopRaceError::RaceNotFound)
        ));
    }

    #[tokio::test]
    async fn test_stop_race_surfaces_storage_failure() {
        let repo = Arc::new(MockRaceRepository::default());
        let race = repo.create_race(NewRace::new("alice")).await.unwrap();
        repo.set_fail_writes(true);
        let stop = StopRaceUseCaseImpl::new(repo.clone());

        match stop.stop_race(race.id, 3.0).await {
            Err(StopRaceError::RepositoryError(msg)) => assert_eq!(msg, "store unavailable"),
            other => panic!("unexpected result: {:?}", other),
        }
        let stored = repo.stored(race.id).unwrap();
        assert!(stored.in_progress);
        assert_eq!(stored.duration, 0.0);
    }
}
