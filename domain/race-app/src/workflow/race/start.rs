use std::sync::Arc;

use crate::domain::{
    RepoCreateError,
    race::{NewRace, Race, RaceRepository},
};

#[async_trait::async_trait]
pub trait StartRaceUseCase {
    async fn start_race(&self, username: String) -> Result<Race, StartRaceError>;
}

#[derive(Debug)]
pub enum StartRaceError {
    InvalidUsername(String),
    RepositoryError(String),
}

pub struct StartRaceUseCaseImpl<R: RaceRepository> {
    race_repository: Arc<R>,
}

impl<R: RaceRepository> StartRaceUseCaseImpl<R> {
    pub fn new(race_repository: Arc<R>) -> Self {
        Self { race_repository }
    }
}

#[async_trait::async_trait]
impl<R: RaceRepository + Send + Sync + 'static> StartRaceUseCase for StartRaceUseCaseImpl<R> {
    async fn start_race(&self, username: String) -> Result<Race, StartRaceError> {
        match self.race_repository.create_race(NewRace::new(username)).await {
            Ok(race) => {
                log::info!("Race {} started by {}", race.id, race.username);
                Ok(race)
            }
            Err(RepoCreateError::Validation(e)) => Err(StartRaceError::InvalidUsername(e)),
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to create race: {}", e);
                Err(StartRaceError::RepositoryError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::race::mock::MockRaceRepository;

    use super::*;

    #[tokio::test]
    async fn test_start_race_applies_defaults() {
        let repo = Arc::new(MockRaceRepository::default());
        let use_case = StartRaceUseCaseImpl::new(repo.clone());

        let race = use_case.start_race("alice".to_string()).await.unwrap();
        assert_eq!(race.username, "alice");
        assert!(race.in_progress);
        assert_eq!(race.duration, 0.0);
        assert_eq!(race.started(), race.created_at);
        assert_eq!(repo.stored(race.id), Some(race));
    }

    #[tokio::test]
    async fn test_start_race_assigns_unique_ids() {
        let repo = Arc::new(MockRaceRepository::default());
        let use_case = StartRaceUseCaseImpl::new(repo.clone());

        let first = use_case.start_race("alice".to_string()).await.unwrap();
        let second = use_case.start_race("bob".to_string()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_start_race_rejects_empty_username() {
        let repo = Arc::new(MockRaceRepository::default());
        let use_case = StartRaceUseCaseImpl::new(repo.clone());

        assert!(matches!(
            use_case.start_race("".to_string()).await,
            Err(StartRaceError::InvalidUsername(_))
        ));
        assert!(repo.races.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_race_surfaces_storage_failure() {
        let repo = Arc::new(MockRaceRepository::default());
        repo.set_fail_writes(true);
        let use_case = StartRaceUseCaseImpl::new(repo);

        match use_case.start_race("alice".to_string()).await {
            Err(StartRaceError::RepositoryError(msg)) => assert_eq!(msg, "store unavailable"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
