//! # Call Log
//!
//! Every API call leaves one row in the `logs` table.
//!
//! - Route name, `success` for 2xx/3xx, `error` otherwise
//! - Execution time in seconds
//! - Method, path and user agent (capped at 255 chars)
//! - Query parameters, if any, as JSON in `extra_json`
//! - `DISABLE_DB_LOGGING=1` turns the table off, tracing still sees every call
//! - A failed insert is only warned about, the response goes out untouched
use std::{sync::Arc, time::Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, Uri, header::USER_AGENT},
    middleware::Next,
    response::Response,
};
use rusqlite::params;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::{database::Catalog, error::AppError, state::AppState};

const USER_AGENT_LIMIT: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub function_name: String,
    pub status: &'static str,
    pub message: Option<String>,
    pub execution_time: Option<f64>,
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub user_agent: Option<String>,
    pub extra: Option<Value>,
}

impl Catalog {
    pub fn write_log(&self, entry: &LogEntry) -> Result<(), AppError> {
        let extra = entry.extra.as_ref().map(Value::to_string);

        self.lock()?.execute(
            "INSERT INTO logs (function_name, status, message, execution_time, http_method, path, user_agent, extra_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.function_name,
                entry.status,
                entry.message,
                entry.execution_time,
                entry.http_method,
                entry.path,
                entry.user_agent,
                extra,
            ],
        )?;

        Ok(())
    }

    pub fn count_logs(&self) -> Result<i64, AppError> {
        Ok(self
            .lock()?
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?)
    }
}

pub fn route_name(method: &Method, route: &str) -> String {
    let name = match (method.as_str(), route) {
        ("GET", "/") => "home",
        ("GET", "/api/books") => "list_books",
        ("POST", "/api/books") => "add_book",
        ("GET", "/api/reviews") => "get_reviews",
        ("POST", "/api/reviews") => "add_review",
        ("DELETE", "/api/reviews/{id}") => "delete_review",
        _ => return format!("{method} {route}"),
    };

    name.to_string()
}

/// `{"query": {...}}` from the query string, `None` without one.
pub fn query_extra(uri: &Uri) -> Option<Value> {
    let query = uri.query().filter(|query| !query.is_empty())?;

    let params: Map<String, Value> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), Value::String(value.to_string()))
        })
        .collect();

    Some(json!({ "query": params }))
}

pub fn status_label(status: u16) -> &'static str {
    if (200..400).contains(&status) {
        "success"
    } else {
        "error"
    }
}

pub async fn log_call(
    State(state): State<Arc<AppState>>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = matched_path.as_ref().map_or(path.as_str(), MatchedPath::as_str);
    let function_name = route_name(&method, route);
    let extra = query_extra(request.uri());

    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|agent| agent.chars().take(USER_AGENT_LIMIT).collect::<String>());

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status();
    info!("{function_name} {method} {path} -> {status} in {elapsed:.4}s");

    if state.config.db_logging {
        let entry = LogEntry {
            function_name,
            status: status_label(status.as_u16()),
            message: (!status.is_success() && !status.is_redirection())
                .then(|| status.to_string()),
            execution_time: Some(elapsed),
            http_method: Some(method.to_string()),
            path: Some(path),
            user_agent,
            extra,
        };

        if let Err(e) = state.catalog.write_log(&entry) {
            warn!("[LOGGING ERROR] {e}");
        }
    }

    response
}
