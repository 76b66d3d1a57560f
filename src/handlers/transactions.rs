use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    appstate::AppState,
    middleware::request_tracing::RequestTraceData,
    model::{
        amount::Amount,
        error::ApiError,
        summary::SummaryPeriod,
        transaction::{Transaction, TransactionId, TransactionInput},
    },
};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub period: SummaryPeriod,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

// Ids that are not integers cannot name a transaction, so the path itself
// does not exist.
fn parse_id(raw_id: &str) -> Result<TransactionId, ApiError> {
    raw_id
        .parse::<TransactionId>()
        .map_err(|_| ApiError::PathNotFound(format!("/transactions/{}", raw_id)))
}

pub async fn list_transactions(
    State(app_state): State<Arc<AppState>>,
    Extension(request_trace_data): Extension<RequestTraceData>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = app_state.get_service().list_all()?;
    info!(
        "[{}] list_transactions returned {}",
        request_trace_data.get_id(),
        transactions.len()
    );

    Ok(Json(transactions))
}

pub async fn create_transaction(
    State(app_state): State<Arc<AppState>>,
    Extension(request_trace_data): Extension<RequestTraceData>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(input) = body?;
    info!(
        "[{}] create_transaction called with {:?}",
        request_trace_data.get_id(),
        input
    );

    let transaction = app_state.get_service().create(input)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Extension(request_trace_data): Extension<RequestTraceData>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let Json(patch) = body?;
    info!(
        "[{}] update_transaction {} called with {:?}",
        request_trace_data.get_id(),
        raw_id,
        patch
    );

    let id = parse_id(&raw_id)?;
    let transaction = app_state.get_service().update(id, patch, Utc::now())?;

    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Extension(request_trace_data): Extension<RequestTraceData>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!(
        "[{}] delete_transaction {}",
        request_trace_data.get_id(),
        raw_id
    );

    let id = parse_id(&raw_id)?;
    app_state.get_service().delete(id)?;

    Ok(Json(MessageResponse {
        message: String::from("Transaction deleted successfully"),
    }))
}

pub async fn transactions_by_range(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
    Extension(request_trace_data): Extension<RequestTraceData>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    info!(
        "[{}] transactions_by_range {:?}",
        request_trace_data.get_id(),
        query
    );

    let transactions = app_state
        .get_service()
        .list_by_range(query.start.as_deref(), query.end.as_deref())?;

    Ok(Json(transactions))
}

pub async fn summary(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
    Extension(request_trace_data): Extension<RequestTraceData>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let period = SummaryPeriod::from_query(query.period.as_deref());
    info!(
        "[{}] summary for {:?} (requested {:?})",
        request_trace_data.get_id(),
        period,
        query.period
    );

    let (window, summary) = app_state.get_service().summarize(period, Utc::now())?;

    Ok(Json(SummaryResponse {
        period,
        start: window.start,
        end: window.end,
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        balance: summary.balance,
    }))
}
