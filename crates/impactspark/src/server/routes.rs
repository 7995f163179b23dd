//! HTTP routes: the dashboard page, the view API and result downloads.
//!
//! - `GET /` serves the single-page dashboard
//! - `POST /api/views/{name}` runs a view on a JSON body
//! - `GET /api/results/{id}[/export]` reads or downloads a stored result set

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ClientError, ViewError};
use crate::formatters::{export_filename, export_publications};
use crate::models::ExportFormat;
use crate::views::{DashboardView, ViewContext};

/// The dashboard page.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// View info for the view list.
#[derive(Debug, Serialize)]
pub struct ViewInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    format: Option<String>,
}

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub views: Vec<Box<dyn DashboardView>>,
    pub ctx: ViewContext,
}

/// Create the HTTP router.
pub fn create_router(views: Vec<Box<dyn DashboardView>>, ctx: ViewContext) -> Router {
    // Start background cleanup task
    Arc::clone(&ctx.results).start_cleanup_task();

    let state = Arc::new(HttpState { views, ctx });

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/api/views", get(handle_views_list))
        .route("/api/views/{name}", post(handle_view_post))
        .route("/api/results/{id}", get(handle_result_get))
        .route("/api/results/{id}/export", get(handle_result_export))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP status for a failed view.
#[must_use]
pub fn status_for(error: &ViewError) -> StatusCode {
    match error {
        ViewError::Validation { .. } | ViewError::Serialization(_) | ViewError::NoResults(_) => {
            StatusCode::BAD_REQUEST
        }
        ViewError::NotFound(_) | ViewError::Client(ClientError::NotFound { .. }) => StatusCode::NOT_FOUND,
        ViewError::Client(ClientError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
        ViewError::Client(_) => StatusCode::BAD_GATEWAY,
        ViewError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ViewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &ViewError) -> Response {
    let status = status_for(error);
    let mut response = (
        status,
        Json(serde_json::json!({
            "error": error.to_user_message(),
            "status": status.as_u16()
        })),
    )
        .into_response();

    if let ViewError::Client(ClientError::RateLimited { retry_after }) = error {
        if let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "impactspark",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let result_sets = state.ctx.results.count().await;
    Json(serde_json::json!({
        "status": "ready",
        "service": "impactspark",
        "version": env!("CARGO_PKG_VERSION"),
        "resultSets": result_sets,
        "views": state.views.len()
    }))
}

async fn handle_views_list(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let views: Vec<ViewInfo> = state
        .views
        .iter()
        .map(|v| ViewInfo {
            name: v.name().to_string(),
            description: v.description().to_string(),
            input_schema: v.input_schema(),
        })
        .collect();
    Json(serde_json::json!({ "views": views }))
}

/// Run a view. JSON-format output is embedded as a value, everything else as a string.
async fn handle_view_post(
    State(state): State<Arc<HttpState>>,
    Path(name): Path<String>,
    Json(input): Json<serde_json::Value>,
) -> Response {
    let Some(view) = state.views.iter().find(|v| v.name() == name) else {
        return error_response(&ViewError::not_found(format!("view '{name}'")));
    };

    let wants_json = input.get("responseFormat").and_then(|v| v.as_str()) == Some("json");
    tracing::info!(view = %name, "Executing view");

    match view.execute(&state.ctx, input).await {
        Ok(content) => {
            let content = if wants_json {
                serde_json::from_str(&content).unwrap_or(serde_json::Value::String(content))
            } else {
                serde_json::Value::String(content)
            };
            Json(serde_json::json!({ "view": name, "content": content })).into_response()
        }
        Err(e) => {
            tracing::warn!(view = %name, error = %e, "View execution failed");
            error_response(&e)
        }
    }
}

async fn handle_result_get(State(state): State<Arc<HttpState>>, Path(id): Path<String>) -> Response {
    match state.ctx.results.require(&id).await {
        Ok(set) => Json(serde_json::json!({
            "id": set.id,
            "query": set.query().await,
            "count": set.len().await,
            "publications": set.publications().await
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn handle_result_export(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(raw) => match ExportFormat::parse(raw) {
            Some(format) => format,
            None => {
                return error_response(&ViewError::validation(
                    "format",
                    format!("unsupported export format '{raw}' (csv, ris, bibtex, endnote)"),
                ));
            }
        },
    };

    let set = match state.ctx.results.require(&id).await {
        Ok(set) => set,
        Err(e) => return error_response(&e),
    };

    let body = export_publications(&set.publications().await, format);
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(format.mime_type()));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", export_filename(format))) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    tracing::info!(result_id = %id, format = ?format, "Result set downloaded");
    (StatusCode::OK, headers, body).into_response()
}
