use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::export::{self, export_filename, ExportFormat};
use crate::funnel::{aggregate_flow, FlowParams};
use crate::models::{ApiResponse, FlowGraph, TabularResult};
use crate::projections::{flow_payload, FlowRequest, PendingAction, Projector, QueryRequest};
use crate::series::{build_categorical, build_series};
use crate::source::EventStore;

/// Shared, read-only service state
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    store: Option<Arc<EventStore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let store = match &config.event_store {
            Some(c) => Some(Arc::new(EventStore::from_config(c)?)),
            None => None,
        };
        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/charts/line", post(line_chart))
        .route("/charts/categorical", post(categorical_chart))
        .route("/funnel", post(funnel))
        .route("/export", post(export_rows))
        .route("/query", post(handle_query))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    concat!("chartflow-api v", env!("CARGO_PKG_VERSION"))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "event_store": state.store.is_some(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LineRequest {
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub include_trend: bool,
}

#[derive(Debug, Deserialize)]
pub struct RowsRequest {
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub format: ExportFormat,
}

fn respond(request_id: &str, message: &str, data: Option<Value>) -> Json<ApiResponse> {
    let response = match data {
        Some(data) => ApiResponse::success(message, data),
        None => ApiResponse::empty(format!("{}: nothing to render", message)),
    };
    Json(response.with_request_id(request_id))
}

/// Line series for a query result
async fn line_chart(
    State(state): State<AppState>,
    Json(input): Json<LineRequest>,
) -> Json<ApiResponse> {
    let request_id = Uuid::new_v4().to_string();
    let result = TabularResult::from_records(&input.rows);
    let options = state.config().charts.series_options(input.include_trend);
    let set = build_series(&result, &options);

    tracing::info!(
        request_id = %request_id,
        rows = result.row_count(),
        series = set.as_ref().map(|s| s.series.len()).unwrap_or(0),
        "line chart"
    );
    respond(&request_id, "line chart", set.map(|s| serde_json::json!(s)))
}

/// Bar / pie data for a query result
async fn categorical_chart(
    State(state): State<AppState>,
    Json(input): Json<RowsRequest>,
) -> Json<ApiResponse> {
    let request_id = Uuid::new_v4().to_string();
    let result = TabularResult::from_records(&input.rows);
    let set = build_categorical(&result, &state.config().charts.unknown_label);

    tracing::info!(
        request_id = %request_id,
        rows = result.row_count(),
        "categorical chart"
    );
    respond(&request_id, "categorical chart", set.map(|s| serde_json::json!(s)))
}

/// Load events for `params` from the event store and aggregate them
async fn load_and_aggregate(state: &AppState, params: FlowParams) -> Result<FlowGraph, AppError> {
    let store = state.store.clone().ok_or(AppError::NoEventStore)?;
    tokio::task::spawn_blocking(move || {
        let events = store.load_events(&params.window)?;
        Ok::<_, AppError>(aggregate_flow(&events, &params))
    })
    .await?
}

/// Session flow funnel rooted at an anchor path
async fn funnel(
    State(state): State<AppState>,
    Json(input): Json<FlowRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    let request_id = Uuid::new_v4().to_string();
    let params = input.resolve(&state.config().funnel, Utc::now())?;

    let graph = match &input.events {
        Some(events) => aggregate_flow(events, &params),
        None => load_and_aggregate(&state, params.clone()).await?,
    };

    tracing::info!(
        request_id = %request_id,
        anchor = %params.anchor,
        sessions = graph.sessions,
        edges = graph.edges.len(),
        "funnel"
    );
    Ok(respond(&request_id, "funnel", flow_payload(&graph)))
}

/// Download a query result as CSV or JSON
async fn export_rows(Json(input): Json<ExportRequest>) -> Result<Response, AppError> {
    let result = TabularResult::from_records(&input.rows);
    if result.is_empty() {
        return Err(AppError::InvalidRequest(
            "result has no rows to export".to_string(),
        ));
    }

    let body = export::render(&result, input.format)?;
    let filename = export_filename(input.format, Utc::now().date_naive());
    tracing::info!(rows = result.row_count(), file = %filename, "export");

    Ok((
        [
            (header::CONTENT_TYPE, input.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// Handle chart queries for any view
async fn handle_query(
    State(state): State<AppState>,
    Json(query): Json<QueryRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    let request_id = Uuid::new_v4().to_string();
    let projection = Projector::new(state.config()).project(&query, Utc::now())?;

    let data = match projection.pending {
        Some(PendingAction::LoadFlow(params)) => {
            tracing::debug!(request_id = %request_id, anchor = %params.anchor, "loading events for funnel");
            let graph = load_and_aggregate(&state, params).await?;
            flow_payload(&graph)
        }
        None => projection.data,
    };

    let view = serde_json::to_value(projection.view)?;
    let message = format!("{} view", view.as_str().unwrap_or("chart"));
    tracing::info!(request_id = %request_id, view = %message, "query");
    Ok(respond(&request_id, &message, data))
}
