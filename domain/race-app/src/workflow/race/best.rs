use std::sync::Arc;

use crate::domain::{
    RepoError,
    race::{Race, RaceQuery, RaceRepository},
};

#[async_trait::async_trait]
pub trait BestRaceUseCase {
    async fn best_race(&self) -> Result<Option<Race>, BestRaceError>;
}

#[derive(Debug)]
pub enum BestRaceError {
    RepositoryError(String),
}

pub struct BestRaceUseCaseImpl<R: RaceRepository> {
    race_repository: Arc<R>,
}

impl<R: RaceRepository> BestRaceUseCaseImpl<R> {
    pub fn new(race_repository: Arc<R>) -> Self {
        Self { race_repository }
    }
}

#[async_trait::async_trait]
impl<R: RaceRepository + Send + Sync + 'static> BestRaceUseCase for BestRaceUseCaseImpl<R> {
    // Unfinished races keep their default duration of 0 and are not filtered out.
    async fn best_race(&self) -> Result<Option<Race>, BestRaceError> {
        match self.race_repository.query_races(RaceQuery::best()).await {
            Ok(result) => Ok(result.items.into_iter().next()),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying best race: {}", e);
                Err(BestRaceError::RepositoryError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::race::{NewRace, mock::MockRaceRepository};

    use super::*;

    #[tokio::test]
    async fn test_best_race_empty_store() {
        let repo = Arc::new(MockRaceRepository::default());
        let use_case = BestRaceUseCaseImpl::new(repo);

        assert_eq!(use_case.best_race().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_best_race_picks_shortest_duration() {
        let repo = Arc::new(MockRaceRepository::default());
        for (username, duration) in [("a", 12.5), ("b", 3.2), ("c", 9.9)] {
            repo.create_race(NewRace {
                username: username.to_string(),
                in_progress: Some(false),
                duration: Some(duration),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        let use_case = BestRaceUseCaseImpl::new(repo);

        let best = use_case.best_race().await.unwrap().unwrap();
        assert_eq!(best.duration, 3.2);
        assert_eq!(best.username, "b");
    }

    #[tokio::test]
    async fn test_best_race_includes_unfinished() {
        let repo = Arc::new(MockRaceRepository::default());
        let mut finished = repo.create_race(NewRace::new("alice")).await.unwrap();
        finished.stop(4.0);
        repo.save_race(&finished).await.unwrap();
        let unfinished = repo.create_race(NewRace::new("bob")).await.unwrap();
        let use_case = BestRaceUseCaseImpl::new(repo);

        let best = use_case.best_race().await.unwrap().unwrap();
        assert_eq!(best.id, unfinished.id);
        assert!(best.is_in_progress());
    }

    #[tokio::test]
    async fn test_best_race_store_failure() {
        let repo = Arc::new(MockRaceRepository::default());
        repo.set_fail_reads(true);
        let use_case = BestRaceUseCaseImpl::new(repo);

        match use_case.best_race().await {
            Err(BestRaceError::RepositoryError(msg)) => assert_eq!(msg, "store unavailable"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
