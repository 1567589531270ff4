//! API Routes
//!
//! Request dispatch for the patient API:
//!
//! - `/` - welcome message, any method
//! - `/api/insert-multiple` - POST a batch of patients
//! - `/api/query` - GET runs a SELECT from `?sql=`, POST runs an INSERT
//!   from `{"sql": ...}`
//!
//! Anything else is 404. Statements are always validated before they reach
//! the executor.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::Value;

use crate::database::{
    DbError, DbResult, PatientBatch, PatientRecord, StatementExecutor, INSERT_PATIENT,
};
use crate::observability::{log_failure, Event, Logger};
use crate::validator::{
    check_statement, AllowedStatementSet, LexicalClassifier, RejectReason, StatementClassifier,
    ValidationResult,
};

use super::cors::cors_middleware;
use super::errors::{ApiError, ApiResult};
use super::response::MessageResponse;

// ==================
// Shared State
// ==================

/// Collaborators injected into every handler
pub struct AppState {
    pub executor: Arc<dyn StatementExecutor>,
    pub classifier: Arc<dyn StatementClassifier>,
}

impl AppState {
    /// State using the lexical classifier
    pub fn new(executor: Arc<dyn StatementExecutor>) -> Self {
        Self::with_classifier(executor, Arc::new(LexicalClassifier::new()))
    }

    pub fn with_classifier(
        executor: Arc<dyn StatementExecutor>,
        classifier: Arc<dyn StatementClassifier>,
    ) -> Self {
        Self {
            executor,
            classifier,
        }
    }
}

/// Per-method validation rules for `/api/query`
struct QueryRule {
    method: &'static str,
    allowed: AllowedStatementSet,
    missing: ApiError,
    disallowed: ApiError,
}

impl QueryRule {
    fn read() -> Self {
        Self {
            method: "GET",
            allowed: AllowedStatementSet::READ,
            missing: ApiError::MissingSqlParam,
            disallowed: ApiError::SelectOnly,
        }
    }

    fn write() -> Self {
        Self {
            method: "POST",
            allowed: AllowedStatementSet::WRITE,
            missing: ApiError::MissingSqlField,
            disallowed: ApiError::InsertOnly,
        }
    }

    /// Returns the statement when it may run, or the 400 to send back
    fn admit<'a>(
        self,
        classifier: &dyn StatementClassifier,
        sql: Option<&'a str>,
    ) -> ApiResult<&'a str> {
        match (check_statement(sql, &self.allowed, classifier), sql) {
            (ValidationResult::Accepted, Some(sql)) => Ok(sql),
            (ValidationResult::Accepted, None) => Err(self.missing),
            (ValidationResult::Rejected(reason), _) => {
                let reason_text = reason.to_string();
                Logger::warn(
                    Event::RequestRejected.as_str(),
                    &[
                        ("method", self.method),
                        ("reason", reason_text.as_str()),
                        ("sql", sql.unwrap_or("")),
                    ],
                );
                Err(match reason {
                    RejectReason::QueryMissing => self.missing,
                    RejectReason::KindNotAllowed | RejectReason::DisallowedKeyword(_) => {
                        self.disallowed
                    }
                })
            }
        }
    }
}

// ==================
// Router
// ==================

/// Create the API router
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(welcome_handler))
        .route("/api/insert-multiple", any(insert_multiple_handler))
        .route("/api/query", any(query_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

/// Log the engine detail and collapse it to a 500
fn execution_failed(operation: &str, statement: &str, err: DbError) -> ApiError {
    let detail = err.to_string();
    log_failure(
        Event::ExecutionFailed,
        &[
            ("error", detail.as_str()),
            ("operation", operation),
            ("sql", statement),
        ],
    );
    ApiError::from(err)
}

/// Buffered body, or the error to answer with when it could not be read
fn request_body(body: Result<Bytes, BytesRejection>) -> ApiResult<Bytes> {
    body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
        _ => ApiError::InvalidDataFormat,
    })
}

async fn insert_patient(executor: &dyn StatementExecutor, entry: &Value) -> DbResult<()> {
    let record = PatientRecord::from_entry(entry)?;
    executor.execute(INSERT_PATIENT, &record.insert_params()).await?;
    Ok(())
}

// ==================
// Handlers
// ==================

async fn welcome_handler() -> Json<MessageResponse> {
    Json(MessageResponse::welcome())
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

async fn insert_multiple_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<MessageResponse>> {
    if method != Method::POST {
        return Err(ApiError::NotFound);
    }

    let body = request_body(body)?;
    let batch: PatientBatch =
        serde_json::from_slice(&body).map_err(|_| ApiError::InvalidDataFormat)?;

    // Sequential on purpose: a failure must follow every earlier success.
    for (index, entry) in batch.patients.iter().enumerate() {
        if let Err(err) = insert_patient(state.executor.as_ref(), entry).await {
            // Earlier rows stay committed; there is no batch transaction.
            let operation = format!("insert-multiple[{}]", index);
            return Err(execution_failed(&operation, INSERT_PATIENT, err));
        }
    }

    let count = batch.patients.len().to_string();
    Logger::info(Event::BatchInsertComplete.as_str(), &[("count", count.as_str())]);

    Ok(Json(MessageResponse::patients_inserted()))
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    match method {
        Method::GET => run_read_query(&state, params.get("sql").map(String::as_str)).await,
        Method::POST => run_write_query(&state, &request_body(body)?).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

async fn run_read_query(state: &AppState, sql: Option<&str>) -> ApiResult<Response> {
    let sql = QueryRule::read().admit(state.classifier.as_ref(), sql)?;

    let rows = state
        .executor
        .execute(sql, &[])
        .await
        .map_err(|e| execution_failed("query", sql, e))?;

    let count = rows.len().to_string();
    Logger::info(Event::QueryExecuted.as_str(), &[("rows", count.as_str())]);

    Ok(Json(rows).into_response())
}

async fn run_write_query(state: &AppState, body: &[u8]) -> ApiResult<Response> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidDataFormat)?;
    let sql = payload.get("sql").and_then(Value::as_str);

    let sql = QueryRule::write().admit(state.classifier.as_ref(), sql)?;

    state
        .executor
        .execute(sql, &[])
        .await
        .map_err(|e| execution_failed("query", sql, e))?;

    Logger::info(Event::WriteExecuted.as_str(), &[]);

    Ok(Json(MessageResponse::query_executed()).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryExecutor;

    fn classifier() -> LexicalClassifier {
        LexicalClassifier::new()
    }

    #[test]
    fn test_read_rule_admits_select() {
        let sql = QueryRule::read()
            .admit(&classifier(), Some("SELECT * FROM patient"))
            .unwrap();
        assert_eq!(sql, "SELECT * FROM patient");
    }

    #[test]
    fn test_read_rule_errors() {
        assert!(matches!(
            QueryRule::read().admit(&classifier(), None),
            Err(ApiError::MissingSqlParam)
        ));
        assert!(matches!(
            QueryRule::read().admit(&classifier(), Some("DROP TABLE patient")),
            Err(ApiError::SelectOnly)
        ));
    }

    #[test]
    fn test_write_rule_errors() {
        assert!(matches!(
            QueryRule::write().admit(&classifier(), Some("  ")),
            Err(ApiError::MissingSqlField)
        ));
        assert!(matches!(
            QueryRule::write().admit(&classifier(), Some("UPDATE patient SET name='x'")),
            Err(ApiError::InsertOnly)
        ));
        assert!(matches!(
            QueryRule::write().admit(&classifier(), Some("INSERT INTO patient SELECT 1; DROP TABLE patient")),
            Err(ApiError::InsertOnly)
        ));
    }

    #[test]
    fn test_router_builds() {
        let state = Arc::new(AppState::new(Arc::new(MemoryExecutor::new())));
        let _router = api_routes(state);
    }
}
