use std::sync::Arc;

use crate::domain::{
    RaceId, RepoRetrieveError,
    race::{Race, RaceRepository},
};

#[async_trait::async_trait]
pub trait GetRaceUseCase {
    async fn get_race(&self, race_id: RaceId) -> Result<Option<Race>, GetRaceError>;
}

#[derive(Debug)]
pub enum GetRaceError {
    RepositoryError(String),
}

pub struct GetRaceUseCaseImpl<R: RaceRepository> {
    race_repository: Arc<R>,
}

impl<R: RaceRepository> GetRaceUseCaseImpl<R> {
    pub fn new(race_repository: Arc<R>) -> Self {
        Self { race_repository }
    }
}

#[async_trait::async_trait]
impl<R: RaceRepository + Send + Sync + 'static> GetRaceUseCase for GetRaceUseCaseImpl<R> {
    async fn get_race(&self, race_id: RaceId) -> Result<Option<Race>, GetRaceError> {
        match self.race_repository.get_race(race_id).await {
            Ok(race) => Ok(Some(race)),
            Err(RepoRetrieveError::NotFound) => Ok(None),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting race {}: {}", race_id, e);
                Err(GetRaceError::RepositoryError(e))
            }
        }
    }
}
