//! HTTP route handlers for the order-key service.
//!
//! Every body is JSON. Absent bounds may be sent as `null`, omitted, or as
//! the empty string.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::batch::{KeyRewrite, append_back, prepend_front};
use crate::compare::{sort_by_key, sort_by_priority_then_key};
use crate::config::ServiceConfig;
use crate::midpoint::midpoint;
use crate::record::Record;
use crate::types::OrderKey;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    fn check_batch(&self, requested: usize) -> Result<(), ApiError> {
        let max = self.config.max_batch_size;
        if requested > max {
            return Err(ApiError::BatchTooLarge { requested, max });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct MidpointRequest {
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MidpointResponse {
    pub key: OrderKey,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub count: usize,
    /// Existing keys of the partition, ascending.
    #[serde(default)]
    pub existing: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppendResponse {
    pub keys: Vec<OrderKey>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewriteBody {
    pub from: OrderKey,
    pub to: OrderKey,
}

impl From<KeyRewrite> for RewriteBody {
    fn from(rewrite: KeyRewrite) -> Self {
        Self {
            from: rewrite.from,
            to: rewrite.to,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrependResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<RewriteBody>,
    pub keys: Vec<OrderKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRequest {
    pub records: Vec<Record>,
    #[serde(default)]
    pub by_priority: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SortResponse {
    pub records: Vec<Record>,
}

fn parse_bound(value: Option<&str>) -> Result<Option<OrderKey>, ApiError> {
    Ok(OrderKey::parse_optional(value.unwrap_or_default())?)
}

fn parse_keys(values: &[String]) -> Result<Vec<OrderKey>, ApiError> {
    values
        .iter()
        .map(|value| OrderKey::new(value.as_str()).map_err(ApiError::from))
        .collect()
}

/// Handle POST /v1/midpoint
pub async fn handle_midpoint(
    Json(request): Json<MidpointRequest>,
) -> Result<Json<MidpointResponse>, ApiError> {
    let prev = parse_bound(request.prev.as_deref())?;
    let next = parse_bound(request.next.as_deref())?;
    let key = midpoint(prev.as_ref(), next.as_ref())?;
    Ok(Json(MidpointResponse { key }))
}

/// Handle POST /v1/append
pub async fn handle_append(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<AppendResponse>, ApiError> {
    state.check_batch(request.count)?;
    let existing = parse_keys(&request.existing)?;
    let keys = append_back(request.count, &existing)?;
    tracing::debug!(count = keys.len(), "appended keys");
    Ok(Json(AppendResponse { keys }))
}

/// Handle POST /v1/prepend
pub async fn handle_prepend(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<PrependResponse>, ApiError> {
    state.check_batch(request.count)?;
    let existing = parse_keys(&request.existing)?;
    let prepended = prepend_front(request.count, &existing)?;
    tracing::debug!(
        count = prepended.new_keys.len(),
        rewrote = prepended.rewritten.is_some(),
        "prepended keys"
    );
    Ok(Json(PrependResponse {
        rewritten: prepended.rewritten.map(RewriteBody::from),
        keys: prepended.new_keys,
    }))
}

/// Handle POST /v1/sort
pub async fn handle_sort(
    Json(mut request): Json<SortRequest>,
) -> Result<Json<SortResponse>, ApiError> {
    if request.by_priority {
        sort_by_priority_then_key(&mut request.records)?;
    } else {
        sort_by_key(&mut request.records)?;
    }
    Ok(Json(SortResponse {
        records: request.records,
    }))
}

/// Handle GET /-/healthy
pub async fn handle_healthy() -> &'static str {
    "OK"
}
