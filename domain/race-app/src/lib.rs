use std::sync::Arc;

use crate::{
    domain::race::RaceRepository,
    workflow::race::{
        best::{BestRaceUseCase, BestRaceUseCaseImpl},
        get::{GetRaceUseCase, GetRaceUseCaseImpl},
        list::{ListRacesUseCase, ListRacesUseCaseImpl},
        start::{StartRaceUseCase, StartRaceUseCaseImpl},
        stop::{StopRaceUseCase, StopRaceUseCaseImpl},
    },
};

pub mod domain;
pub mod workflow;

pub struct Application {
    pub race_start_use_case: Box<dyn StartRaceUseCase + Send + Sync + 'static>,
    pub race_stop_use_case: Box<dyn StopRaceUseCase + Send + Sync + 'static>,
    pub race_best_use_case: Box<dyn BestRaceUseCase + Send + Sync + 'static>,
    pub race_get_use_case: Box<dyn GetRaceUseCase + Send + Sync + 'static>,
    pub race_list_use_case: Box<dyn ListRacesUseCase + Send + Sync + 'static>,
}

pub fn build_application<R: RaceRepository + Send + Sync + 'static>(
    race_repository: Arc<R>,
) -> Application {
    Application {
        race_start_use_case: Box::new(StartRaceUseCaseImpl::new(race_repository.clone())),
        race_stop_use_case: Box::new(StopRaceUseCaseImpl::new(race_repository.clone())),
        race_best_use_case: Box::new(BestRaceUseCaseImpl::new(race_repository.clone())),
        race_get_use_case: Box::new(GetRaceUseCaseImpl::new(race_repository.clone())),
        race_list_use_case: Box::new(ListRacesUseCaseImpl::new(race_repository)),
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{RaceId, race::mock::MockRaceRepository};

    use super::*;

    #[tokio::test]
    async fn test_application_round_trip() {
        let repo = Arc::new(MockRaceRepository::default());
        let app = build_application(repo);

        assert!(app.race_best_use_case.best_race().await.unwrap().is_none());

        let race = app
            .race_start_use_case
            .start_race("alice".to_string())
            .await
            .unwrap();
        app.race_stop_use_case
            .stop_race(race.id, 45.7)
            .await
            .unwrap();

        let fetched = app
            .race_get_use_case
            .get_race(race.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!fetched.is_in_progress());
        assert_eq!(fetched.duration, 45.7);
        assert_eq!(fetched.started(), race.started());

        let best = app.race_best_use_case.best_race().await.unwrap().unwrap();
        assert_eq!(best.id, race.id);

        assert!(
            app.race_get_use_case
                .get_race(RaceId(race.id.0 + 1))
                .await
                .unwrap()
                .is_none()
        );
    }
}
