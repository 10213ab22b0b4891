//! Server - HTTP front end for the travel map.
//!
//! Fixed routes, one storage call per handler:
//!
//! ```text
//! GET  /                 HTML page with the unique-visit total
//! GET  /visits           JSON array of every visit record
//! GET  /uniquevisits     JSON {"Count": N}
//! POST /visits/:country  increment, return the updated record
//! GET  /static/*         assets for the map front end
//! ```
//!
//! Handlers catch storage and render errors at the boundary, log them, and
//! answer with a bare status code: 400 for save/unique-total failures, 500
//! for listing and template failures.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use minijinja::context;
use serde::Serialize;
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::store::{VisitRecord, VisitStore};
use crate::{INDEX_TEMPLATE_PATH, STATIC_DIR};

/// Name the index template is registered under.
const INDEX_TEMPLATE: &str = "index.html";

// =============================================================================
// Errors
// =============================================================================

/// Failures building the HTTP front end.
///
/// These happen at startup only and are fatal; render failures at request
/// time stay inside the handlers.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The index template could not be read from disk.
    #[error("server: load index template {path}: {source}")]
    TemplateLoad {
        /// Path that failed to load.
        path: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The index template did not parse.
    #[error("server: parse index template: {0}")]
    TemplateParse(#[from] minijinja::Error),
}

// =============================================================================
// State & Router
// =============================================================================

/// Shared state handed to every handler: one store, one template set.
#[derive(Clone)]
struct AppState {
    store: Arc<dyn VisitStore>,
    templates: Arc<minijinja::Environment<'static>>,
}

/// Build the router serving the travel map against the provided store.
///
/// Loads and parses the index template up front so a missing or broken
/// template fails the process at startup instead of on the first request.
///
/// # Errors
/// Returns [`ServerError`] if the index template cannot be loaded or parsed.
pub fn router(store: Arc<dyn VisitStore>) -> Result<Router, ServerError> {
    let source =
        std::fs::read_to_string(INDEX_TEMPLATE_PATH).map_err(|source| ServerError::TemplateLoad {
            path: INDEX_TEMPLATE_PATH,
            source,
        })?;

    let mut templates = minijinja::Environment::new();
    templates.add_template_owned(INDEX_TEMPLATE, source)?;

    let state = AppState {
        store,
        templates: Arc::new(templates),
    };

    Ok(Router::new()
        .route("/", get(index))
        .route("/visits", get(visits))
        .route("/uniquevisits", get(unique_visits))
        .route("/visits/:country", post(visit_country))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state))
}

// =============================================================================
// Handlers
// =============================================================================

/// JSON body for GET /uniquevisits.
#[derive(Debug, Serialize)]
struct UniqueVisits {
    #[serde(rename = "Count")]
    count: u64,
}

async fn index(State(state): State<AppState>) -> Response {
    let total = match state.store.unique_total().await {
        Ok(total) => total,
        Err(err) => {
            error!("unique total: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let rendered = state
        .templates
        .get_template(INDEX_TEMPLATE)
        .and_then(|tpl| tpl.render(context! { total_countries => total }));
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("render index template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn visits(State(state): State<AppState>) -> Response {
    match state.store.results().await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            error!("visit results: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn unique_visits(State(state): State<AppState>) -> Response {
    match state.store.unique_total().await {
        Ok(count) => Json(UniqueVisits { count }).into_response(),
        Err(err) => {
            error!("unique total: {err}");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

async fn visit_country(State(state): State<AppState>, Path(country): Path<String>) -> Response {
    match state.store.save(&country).await {
        Ok(visits) => {
            info!("New visit to {country} with visit count {visits}");
            Json(VisitRecord { country, visits }).into_response()
        }
        Err(err) => {
            error!("save country '{country}': {err}");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
