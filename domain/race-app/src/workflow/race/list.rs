use std::sync::Arc;

use crate::domain::{
    PaginatedResponse, RepoError,
    race::{Race, RaceQuery, RaceRepository},
};

#[async_trait::async_trait]
pub trait ListRacesUseCase {
    async fn list_races(&self, query: RaceQuery)
    -> Result<PaginatedResponse<Race>, ListRacesError>;
}

#[derive(Debug)]
pub enum ListRacesError {
    RepositoryError(String),
}

pub struct ListRacesUseCaseImpl<R: RaceRepository> {
    race_repository: Arc<R>,
}

impl<R: RaceRepository> ListRacesUseCaseImpl<R> {
    pub fn new(race_repository: Arc<R>) -> Self {
        Self { race_repository }
    }
}

#[async_trait::async_trait]
impl<R: RaceRepository + Send + Sync + 'static> ListRacesUseCase for ListRacesUseCaseImpl<R> {
    async fn list_races(
        &self,
        query: RaceQuery,
    ) -> Result<PaginatedResponse<Race>, ListRacesError> {
        match self.race_repository.query_races(query).await {
            Ok(result) => Ok(result),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying races: {}", e);
                Err(ListRacesError::RepositoryError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        Pagination, SortOrder,
        race::{NewRace, RaceSortBy, mock::MockRaceRepository},
    };

    use super::*;

    #[tokio::test]
    async fn test_list_races_sorted_and_paginated() {
        let repo = Arc::new(MockRaceRepository::default());
        for duration in [12.5, 3.2, 9.9] {
            repo.create_race(NewRace {
                username: "alice".to_string(),
                duration: Some(duration),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        let use_case = ListRacesUseCaseImpl::new(repo);

        let result = use_case
            .list_races(RaceQuery {
                sort: Some((SortOrder::Descending, RaceSortBy::Duration)),
                pagination: Pagination {
                    offset: Some(1),
                    limit: Some(5),
                },
            })
            .await
            .unwrap();
        assert_eq!(result.total_count, 3);
        let durations: Vec<f64> = result.items.iter().map(|r| r.duration).collect();
        assert_eq!(durations, vec![9.9, 3.2]);
    }
}
