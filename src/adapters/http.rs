use crate::domain::model::{
    ErrorResponse, LineRequest, LineResponse, Page, StationRequest, StationResponse,
};
use crate::domain::services::{LineService, StationService};
use crate::utils::error::SubwayError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub lines: LineService,
    pub stations: StationService,
}

type ApiResult<T> = std::result::Result<T, SubwayError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines", get(list_lines).post(create_line))
        .route("/lines/page", get(list_lines_page))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", get(get_station).delete(delete_station))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for SubwayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("❌ Request failed: {} (severity: {:?})", self, self.severity());
        } else {
            tracing::warn!("⚠️ Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.category().as_str().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// 框架預設對格式錯誤的 JSON 回 422，統一改為 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| SubwayError::validation(rejection.body_text()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn create_line(
    State(state): State<AppState>,
    payload: Result<Json<LineRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let line = state.lines.create(request).await?;
    let location = format!("/lines/{}", line.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(line)))
}

async fn list_lines(State(state): State<AppState>) -> ApiResult<Json<Vec<LineResponse>>> {
    Ok(Json(state.lines.list().await?))
}

/// Query string of `GET /lines/page`. Parameters other than `page` and
/// `size` are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

async fn list_lines_page(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<LineResponse>>> {
    let Query(params) =
        params.map_err(|rejection| SubwayError::validation(rejection.body_text()))?;
    let request = state.lines.pagination().resolve(params.page, params.size)?;
    Ok(Json(state.lines.list_page(request).await?))
}

async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<LineResponse>> {
    Ok(Json(state.lines.get(id).await?))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<LineRequest>, JsonRejection>,
) -> ApiResult<Json<LineResponse>> {
    // 不存在的路線一律回 404，即使請求內容無法解析
    state.lines.ensure_exists(id).await?;
    let request = json_body(payload)?;
    Ok(Json(state.lines.update(id, request).await?))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.lines.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_station(
    State(state): State<AppState>,
    payload: Result<Json<StationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let station = state.stations.create(request.name).await?;
    let location = format!("/stations/{}", station.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(station)))
}

async fn list_stations(State(state): State<AppState>) -> ApiResult<Json<Vec<StationResponse>>> {
    Ok(Json(state.stations.list().await?))
}

async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<StationResponse>> {
    Ok(Json(state.stations.get(id).await?))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.stations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
