use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use race_app::{
    domain::{
        Pagination, RaceId, SortOrder,
        race::{Race, RaceQuery, RaceSortBy},
    },
    workflow::race::{
        best::BestRaceError, get::GetRaceError, list::ListRacesError, start::StartRaceError,
        stop::StopRaceError,
    },
};

use crate::{AppState, PaginatedResponse, ServiceError};

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 500;

#[derive(serde::Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonRace {
    id: i64,
    username: String,
    started: String,
    in_progress: bool,
    duration: f64,
}

impl From<Race> for JsonRace {
    fn from(race: Race) -> Self {
        JsonRace {
            id: race.id.0,
            started: race.started().to_rfc3339(),
            in_progress: race.is_in_progress(),
            username: race.username,
            duration: race.duration,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonStartRaceRequest {
    username: String,
}

#[derive(serde::Deserialize)]
pub struct JsonStopRaceRequest {
    time: f64,
}

#[derive(serde::Deserialize, Default)]
pub struct JsonRaceFilter {
    limit: Option<usize>,
    page: Option<usize>,
    skip: Option<usize>,
    order: Option<String>,
    sort: Option<String>,
}

impl From<StartRaceError> for ServiceError {
    fn from(value: StartRaceError) -> Self {
        match value {
            StartRaceError::InvalidUsername(msg) => ServiceError::BadRequest(msg),
            StartRaceError::RepositoryError(_) => {
                ServiceError::Internal("Failed to create race".to_string())
            }
        }
    }
}

impl From<StopRaceError> for ServiceError {
    fn from(value: StopRaceError) -> Self {
        match value {
            StopRaceError::RaceNotFound => ServiceError::NotFound("Race not found".to_string()),
            StopRaceError::RepositoryError(_) => {
                ServiceError::Internal("Failed to stop race".to_string())
            }
        }
    }
}

impl From<BestRaceError> for ServiceError {
    fn from(value: BestRaceError) -> Self {
        match value {
            BestRaceError::RepositoryError(_) => {
                ServiceError::Internal("Failed to query best race".to_string())
            }
        }
    }
}

impl From<GetRaceError> for ServiceError {
    fn from(value: GetRaceError) -> Self {
        match value {
            GetRaceError::RepositoryError(_) => {
                ServiceError::Internal("Failed to retrieve race".to_string())
            }
        }
    }
}

impl From<ListRacesError> for ServiceError {
    fn from(value: ListRacesError) -> Self {
        match value {
            ListRacesError::RepositoryError(_) => {
                ServiceError::Internal("Failed to query races".to_string())
            }
        }
    }
}

pub async fn start(
    State(app_state): State<AppState>,
    Json(request): Json<JsonStartRaceRequest>,
) -> Result<(StatusCode, Json<JsonRace>), ServiceError> {
    let race = app_state
        .app
        .race_start_use_case
        .start_race(request.username)
        .await?;
    Ok((StatusCode::CREATED, Json(race.into())))
}

pub async fn stop(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    Json(request): Json<JsonStopRaceRequest>,
) -> Result<Json<JsonRace>, ServiceError> {
    let race = app_state
        .app
        .race_stop_use_case
        .stop_race(RaceId(id), request.time)
        .await?;
    Ok(Json(race.into()))
}

pub async fn get_best(State(app_state): State<AppState>) -> Result<Json<JsonRace>, ServiceError> {
    match app_state.app.race_best_use_case.best_race().await? {
        Some(race) => Ok(Json(race.into())),
        None => Err(ServiceError::NotFound("No races recorded".to_string())),
    }
}

pub async fn get_by_id(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonRace>, ServiceError> {
    match app_state.app.race_get_use_case.get_race(RaceId(id)).await? {
        Some(race) => Ok(Json(race.into())),
        None => Err(ServiceError::NotFound("Race not found".to_string())),
    }
}

pub async fn get_all(
    State(app_state): State<AppState>,
    Query(filter): Query<JsonRaceFilter>,
) -> Result<Json<PaginatedResponse<JsonRace>>, ServiceError> {
    let page = filter.page.unwrap_or(0);
    let limit = page_size(&filter);
    let query = race_query_from_filter(&filter, page, limit)?;

    let res = app_state.app.race_list_use_case.list_races(query).await?;

    let total = res.total_count;
    Ok(Json(PaginatedResponse {
        items: res.items.into_iter().map(JsonRace::from).collect(),
        total,
        page,
        per_page: limit,
        total_pages: total.div_ceil(limit),
    }))
}

/// Requested page size, zero treated as unset and capped at `MAX_PAGE_SIZE`.
fn page_size(filter: &JsonRaceFilter) -> usize {
    filter
        .limit
        .filter(|&l| l > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
}

fn race_query_from_filter(
    filter: &JsonRaceFilter,
    page: usize,
    limit: usize,
) -> Result<RaceQuery, ServiceError> {
    let skip = filter.skip.unwrap_or(0);
    let offset = if page > 1 {
        (page - 1).saturating_mul(limit)
    } else {
        skip
    };

    let sort = filter
        .sort
        .as_ref()
        .and_then(|sort_str| match sort_str.trim().to_lowercase().as_str() {
            "" => None,
            "duration" => Some(Ok(RaceSortBy::Duration)),
            "created_at" | "started" => Some(Ok(RaceSortBy::CreatedAt)),
            "id" => Some(Ok(RaceSortBy::RaceId)),
            _ => Some(Err(ServiceError::BadRequest(
                "Invalid sort field".to_string(),
            ))),
        })
        .transpose()?
        .unwrap_or(RaceSortBy::RaceId);

    let order = filter
        .order
        .as_ref()
        .and_then(|order_str| match order_str.trim().to_lowercase().as_str() {
            "asc" => Some(Ok(SortOrder::Ascending)),
            "desc" => Some(Ok(SortOrder::Descending)),
            "" => None,
            _ => Some(Err(ServiceError::BadRequest(
                "Invalid sort order".to_string(),
            ))),
        })
        .transpose()?
        .unwrap_or(SortOrder::Ascending);

    Ok(RaceQuery {
        sort: Some((order, sort)),
        pagination: Pagination {
            offset: Some(offset),
            limit: Some(limit),
        },
    })
}
