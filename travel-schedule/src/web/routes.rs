//! HTTP route handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::controller::{CarrierInfoController, ListSource, NO_CARRIER_CODE, Picker, Snapshot};
use crate::domain::{CarrierDetails, CarrierRow, FilterCriteria, LoadingState, StationItem};
use crate::domain::format::today_utc;
use crate::rasp::SegmentQuery;
use crate::stories::{CursorMove, StoriesStore, StoryCursor};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cities", get(get_cities))
        .route("/api/cities/load", post(load_cities))
        .route("/api/cities/query", put(set_city_query))
        .route("/api/cities/events", get(city_events))
        .route("/api/cities/:city/stations", get(get_stations))
        .route("/api/cities/:city/stations/load", post(load_stations))
        .route("/api/cities/:city/stations/query", put(set_station_query))
        .route("/api/cities/:city/stations/events", get(station_events))
        .route("/api/segments", get(get_segments))
        .route("/api/segments/load", post(load_segments))
        .route("/api/segments/filter", put(filter_segments).delete(reset_segment_filter))
        .route("/api/segments/filter/options", get(filter_options))
        .route("/api/segments/events", get(segment_events))
        .route("/api/carriers/:code", get(get_carrier))
        .route("/api/stories", get(get_stories))
        .route("/api/stories/:id/viewed", post(mark_story_viewed))
        .route("/api/stories/:id/pages/:page", get(get_story_page))
        .route("/api/stories/:id/pages/:page/next", post(next_story_page))
        .route("/api/stories/:id/pages/:page/prev", post(prev_story_page))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

type EventStream = Sse<BoxStream<'static, Result<Event, Infallible>>>;

/// Stream a controller's snapshots: the current one, then every change.
///
/// Ends when the controller is dropped.
fn snapshot_events<R>(rx: watch::Receiver<Snapshot<R>>) -> EventStream
where
    R: Serialize + Send + Sync + 'static,
{
    let stream = futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let event = {
            let snapshot = rx.borrow_and_update();
            Event::default().event("snapshot").json_data(&*snapshot)
        };
        match event {
            Ok(event) => Some((Ok(event), (rx, false))),
            Err(e) => {
                warn!(error = %e, "failed to encode snapshot");
                None
            }
        }
    });

    Sse::new(stream.boxed()).keep_alive(KeepAlive::default())
}

// Pickers

/// Start the first load of a screen that has never loaded.
fn ensure_loaded<S: ListSource<Criteria = String>>(picker: &Picker<S>) {
    if picker.state() == LoadingState::Idle {
        debug!("first visit, loading");
        picker.load();
    }
}

fn picker_response<S: ListSource<Criteria = String>>(picker: &Picker<S>) -> PickerResponse<S::Row> {
    PickerResponse {
        query: picker.query(),
        snapshot: picker.snapshot(),
    }
}

fn update_query<S: ListSource<Criteria = String>>(picker: &Picker<S>, req: &QueryRequest) {
    if req.immediate {
        picker.apply_query(&req.query);
    } else {
        picker.set_query(&req.query);
    }
}

/// City list, filtered by the current query.
async fn get_cities(State(state): State<AppState>) -> Json<PickerResponse<String>> {
    ensure_loaded(&state.cities);
    Json(picker_response(&state.cities))
}

/// Reload the city list.
async fn load_cities(State(state): State<AppState>) -> Json<PickerResponse<String>> {
    state.cities.load();
    Json(picker_response(&state.cities))
}

async fn set_city_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Json<PickerResponse<String>> {
    update_query(&state.cities, &req);
    Json(picker_response(&state.cities))
}

async fn city_events(State(state): State<AppState>) -> EventStream {
    ensure_loaded(&state.cities);
    snapshot_events(state.cities.subscribe())
}

/// Stations of one city, filtered by the current query.
async fn get_stations(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<PickerResponse<StationItem>> {
    let picker = state.station_picker(&city).await;
    ensure_loaded(&picker);
    Json(picker_response(&picker))
}

async fn load_stations(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<PickerResponse<StationItem>> {
    let picker = state.station_picker(&city).await;
    picker.load();
    Json(picker_response(&picker))
}

async fn set_station_query(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Json(req): Json<QueryRequest>,
) -> Json<PickerResponse<StationItem>> {
    let picker = state.station_picker(&city).await;
    update_query(&picker, &req);
    Json(picker_response(&picker))
}

async fn station_events(State(state): State<AppState>, Path(city): Path<String>) -> EventStream {
    let picker = state.station_picker(&city).await;
    ensure_loaded(&picker);
    snapshot_events(picker.subscribe())
}

// Search results

fn segment_query(params: &RouteParams) -> Result<SegmentQuery, AppError> {
    let route = params.selection();
    if !route.can_search() {
        return Err(AppError::BadRequest {
            message: "both from and to station codes are required".to_string(),
        });
    }

    let date = params.date().map_err(|e| AppError::BadRequest {
        message: format!("Invalid date: {e}"),
    })?;

    Ok(SegmentQuery::new(
        route.from.code,
        route.to.code,
        date.unwrap_or_else(today_utc),
    ))
}

fn segments_response(
    query: &SegmentQuery,
    criteria: FilterCriteria,
    snapshot: Snapshot<CarrierRow>,
) -> Json<SegmentsResponse<CarrierRow>> {
    Json(SegmentsResponse {
        search: SearchInfo::from(query),
        criteria,
        snapshot,
    })
}

/// Search results for a route, loading them on first visit.
async fn get_segments(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<SegmentsResponse<CarrierRow>>, AppError> {
    let query = segment_query(&params)?;
    let list = state.carrier_list(query.clone()).await;
    if list.state() == LoadingState::Idle {
        list.load();
    }
    Ok(segments_response(&query, list.criteria(), list.snapshot()))
}

async fn load_segments(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<SegmentsResponse<CarrierRow>>, AppError> {
    let query = segment_query(&params)?;
    let list = state.carrier_list(query.clone()).await;
    list.load();
    Ok(segments_response(&query, list.criteria(), list.snapshot()))
}

/// Replace the filter on a route's results. Never refetches.
///
/// The form needs at least one departure interval and a transfer choice.
async fn filter_segments(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<SegmentsResponse<CarrierRow>>, AppError> {
    let query = segment_query(&params)?;
    if !criteria.can_apply() {
        return Err(AppError::BadRequest {
            message: "Choose a departure time and whether to show transfers".to_string(),
        });
    }
    let list = state.carrier_list(query.clone()).await;
    list.apply_filter(criteria);
    Ok(segments_response(&query, list.criteria(), list.snapshot()))
}

/// Drop the filter so every result is listed again.
async fn reset_segment_filter(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<SegmentsResponse<CarrierRow>>, AppError> {
    let query = segment_query(&params)?;
    let list = state.carrier_list(query.clone()).await;
    list.apply_filter(FilterCriteria::default());
    Ok(segments_response(&query, list.criteria(), list.snapshot()))
}

async fn filter_options() -> Json<FilterOptionsResponse> {
    Json(FilterOptionsResponse::default())
}

async fn segment_events(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<EventStream, AppError> {
    let query = segment_query(&params)?;
    let list = state.carrier_list(query).await;
    if list.state() == LoadingState::Idle {
        list.load();
    }
    Ok(snapshot_events(list.subscribe()))
}

// Carrier info

/// One carrier's profile. Waits for the load to settle.
async fn get_carrier(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CarrierDetails>, AppError> {
    let controller = CarrierInfoController::new(Arc::clone(&state.api), code);
    controller.load().wait().await;

    match controller.state() {
        LoadingState::Loaded => controller.details().map(Json).ok_or_else(|| AppError::Internal {
            message: "carrier loaded without details".to_string(),
        }),
        LoadingState::NoConnectivity => Err(AppError::Unavailable {
            message: "Нет подключения к интернету".to_string(),
        }),
        LoadingState::Error(message) if message == NO_CARRIER_CODE => {
            Err(AppError::BadRequest { message })
        }
        LoadingState::Error(message) | LoadingState::Empty(message) => {
            Err(AppError::BadGateway { message })
        }
        LoadingState::Idle | LoadingState::Loading => Err(AppError::Internal {
            message: "carrier load did not settle".to_string(),
        }),
    }
}

// Stories

async fn get_stories(State(state): State<AppState>) -> Json<StoriesResponse> {
    Json(StoriesResponse {
        stories: state.stories.previews(),
    })
}

async fn mark_story_viewed(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    if state.stories.mark_viewed(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            message: format!("Story {id} not found"),
        })
    }
}

fn story_page_view(store: &StoriesStore, cursor: StoryCursor) -> Option<StoryPageView> {
    let story = store.stories().get(cursor.story)?;
    Some(StoryPageView {
        story_id: story.id,
        page: cursor.page,
        page_count: story.pages.len(),
        content: cursor.current(store)?.clone(),
    })
}

fn story_cursor(store: &StoriesStore, id: u32, page: usize) -> Result<StoryCursor, AppError> {
    StoryCursor::at(store, id, page).ok_or_else(|| AppError::NotFound {
        message: format!("Story {id} has no page {page}"),
    })
}

async fn get_story_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(u32, usize)>,
) -> Result<Json<StoryPageView>, AppError> {
    let cursor = story_cursor(&state.stories, id, page)?;
    story_page_view(&state.stories, cursor)
        .map(Json)
        .ok_or_else(|| AppError::Internal {
            message: format!("Story {id} page {page} vanished"),
        })
}

fn story_step(store: &StoriesStore, mut cursor: StoryCursor, forward: bool) -> StoryStepResponse {
    let moved = if forward {
        cursor.next(store)
    } else {
        cursor.prev(store)
    };
    let current = match moved {
        CursorMove::Finished => None,
        CursorMove::Page | CursorMove::Story | CursorMove::Start => story_page_view(store, cursor),
    };
    StoryStepResponse { moved, current }
}

/// Step forward in the viewer. Leaving a story marks it viewed.
async fn next_story_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(u32, usize)>,
) -> Result<Json<StoryStepResponse>, AppError> {
    let cursor = story_cursor(&state.stories, id, page)?;
    Ok(Json(story_step(&state.stories, cursor, true)))
}

async fn prev_story_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(u32, usize)>,
) -> Result<Json<StoryStepResponse>, AppError> {
    let cursor = story_cursor(&state.stories, id, page)?;
    Ok(Json(story_step(&state.stories, cursor, false)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(from: &str, to: &str, date: Option<&str>) -> RouteParams {
        RouteParams {
            from: from.to_string(),
            to: to.to_string(),
            from_title: None,
            to_title: None,
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn segment_query_trims_codes() {
        let query = segment_query(&params(" s1 ", "s2", Some("2026-01-14"))).unwrap();
        assert_eq!(query.from, "s1");
        assert_eq!(query.to, "s2");
        assert_eq!(query.date_param(), "2026-01-14");
    }

    #[test]
    fn segment_query_defaults_to_today() {
        let query = segment_query(&params("s1", "s2", None)).unwrap();
        assert_eq!(query.date, today_utc());
    }

    #[test]
    fn segment_query_rejects_missing_codes() {
        assert!(matches!(
            segment_query(&params("s1", " ", None)),
            Err(AppError::BadRequest { .. })
        ));
        assert!(matches!(
            segment_query(&params("s1", "s2", Some("tomorrow"))),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (AppError::BadRequest { message: "x".into() }, StatusCode::BAD_REQUEST),
            (AppError::NotFound { message: "x".into() }, StatusCode::NOT_FOUND),
            (AppError::Unavailable { message: "x".into() }, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::BadGateway { message: "x".into() }, StatusCode::BAD_GATEWAY),
            (AppError::Internal { message: "x".into() }, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn story_step_forward_marks_viewed_on_leaving() {
        let store = StoriesStore::new();

        let step = story_step(&store, StoryCursor::at(&store, 1, 0).unwrap(), true);
        assert_eq!(step.moved, CursorMove::Page);
        assert_eq!(step.current.as_ref().map(|v| v.page), Some(1));
        assert!(!store.is_viewed(1));

        let step = story_step(&store, StoryCursor::at(&store, 1, 1).unwrap(), true);
        assert_eq!(step.moved, CursorMove::Story);
        assert_eq!(step.current.as_ref().map(|v| v.story_id), Some(2));
        assert!(store.is_viewed(1));
    }

    #[test]
    fn story_step_past_last_page_finishes() {
        let store = StoriesStore::new();
        let step = story_step(&store, StoryCursor::at(&store, 9, 1).unwrap(), true);
        assert_eq!(step.moved, CursorMove::Finished);
        assert!(step.current.is_none());
        assert!(store.is_viewed(9));
    }

    #[test]
    fn story_step_back_from_start_stays() {
        let store = StoriesStore::new();
        let step = story_step(&store, StoryCursor::at(&store, 1, 0).unwrap(), false);
        assert_eq!(step.moved, CursorMove::Start);
        assert_eq!(step.current.map(|v| (v.story_id, v.page)), Some((1, 0)));
    }
}
