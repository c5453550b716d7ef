use chrono::Utc;
use race_app::domain::{
    PaginatedResponse, RaceId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
    SortOrder,
    race::{
        DEFAULT_DURATION, DEFAULT_IN_PROGRESS, NewRace, Race, RaceQuery, RaceRepository,
        RaceSortBy,
    },
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};

use crate::{create_db_pool, entity::race};

const MAX_SQL_BOUND: u64 = i64::MAX as u64;

/// Clamps a page bound to what the database accepts as a signed 64-bit integer.
fn sql_bound(value: usize) -> u64 {
    u64::try_from(value)
        .unwrap_or(MAX_SQL_BOUND)
        .min(MAX_SQL_BOUND)
}

pub struct RaceRepositoryImpl {
    db: DatabaseConnection,
}

impl RaceRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    pub fn with_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_race(model: race::Model) -> Race {
        Race {
            id: RaceId(model.id),
            username: model.username,
            created_at: model.created_at,
            in_progress: model.in_progress,
            duration: model.duration,
        }
    }
}

#[async_trait::async_trait]
impl RaceRepository for RaceRepositoryImpl {
    async fn create_race(&self, new_race: NewRace) -> Result<Race, RepoCreateError> {
        new_race.validate()?;

        let active_model = race::ActiveModel {
            id: Default::default(), // Auto-increment
            username: Set(new_race.username),
            created_at: Set(new_race.created_at.unwrap_or_else(Utc::now)),
            in_progress: Set(new_race.in_progress.unwrap_or(DEFAULT_IN_PROGRESS)),
            duration: Set(new_race.duration.unwrap_or(DEFAULT_DURATION)),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;

        Ok(Self::model_to_race(model))
    }

    async fn save_race(&self, race: &Race) -> Result<Race, RepoUpdateError> {
        let existing = race::Entity::find_by_id(race.id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
            .ok_or(RepoUpdateError::NotFound)?;

        let mut model: race::ActiveModel = existing.into();
        model.username = Set(race.username.clone());
        model.created_at = Set(race.created_at);
        model.in_progress = Set(race.in_progress);
        model.duration = Set(race.duration);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;

        Ok(Self::model_to_race(updated))
    }

    async fn get_race(&self, race_id: RaceId) -> Result<Race, RepoRetrieveError> {
        let model = race::Entity::find_by_id(race_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Ok(Self::model_to_race(model))
    }

    async fn query_races(&self, query: RaceQuery) -> Result<PaginatedResponse<Race>, RepoError> {
        let mut db_query = race::Entity::find();

        let total_count = db_query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        if let Some((order, sort_by)) = query.sort {
            use sea_orm::Order;
            let order_expr = match sort_by {
                RaceSortBy::Duration => race::Column::Duration,
                RaceSortBy::CreatedAt => race::Column::CreatedAt,
                RaceSortBy::RaceId => race::Column::Id,
            };
            db_query = match order {
                SortOrder::Ascending => db_query.order_by(order_expr, Order::Asc),
                SortOrder::Descending => db_query.order_by(order_expr, Order::Desc),
            };
        }

        let limit = query.pagination.limit.map(sql_bound);
        let offset = query.pagination.offset.map(sql_bound);
        // sqlite only accepts OFFSET after a LIMIT clause
        if let Some(limit) = limit.or(offset.map(|_| MAX_SQL_BOUND)) {
            db_query = db_query.limit(limit);
        }
        if let Some(offset) = offset {
            db_query = db_query.offset(offset);
        }

        let races = db_query
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?
            .into_iter()
            .map(Self::model_to_race)
            .collect();

        Ok(PaginatedResponse {
            total_count: total_count as usize,
            items: races,
        })
    }
}
