use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use studyspace_occupancy::{
    ApiError, NodeStatus, OCCUPANCY_PATH, OccupancyReport, ReportAck, STATUS_PATH,
};
use tracing::{debug, info};

use crate::store::ReadingStore;

/// Body of the index route.
pub const RUNNING_MESSAGE: &str = "Study Space Scanner API is running";

/// Returned when the report body is not a non-empty JSON object.
pub const INVALID_JSON_MESSAGE: &str = "Invalid or missing JSON";

/// Returned when a report lacks a seat count.
pub const MISSING_SEATS_MESSAGE: &str = "free_seats and total_seats required";

/// Builds the collector router over `store`.
pub fn router(store: Arc<ReadingStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(OCCUPANCY_PATH, post(occupancy_handler))
        .route(STATUS_PATH, get(status_handler))
        .with_state(store)
}

async fn index_handler() -> &'static str {
    RUNNING_MESSAGE
}

async fn occupancy_handler(
    State(store): State<Arc<ReadingStore>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(report) = parse_report(payload) else {
        return bad_request(INVALID_JSON_MESSAGE);
    };

    let (Some(free_seats), Some(total_seats)) = (report.free_seats, report.total_seats) else {
        return bad_request(MISSING_SEATS_MESSAGE);
    };

    let node_id = report.node_id_or_unknown();
    let stored = store.record(node_id, free_seats, total_seats);

    info!(
        "[{}] Node {}: {}/{} seats free",
        stored.timestamp, node_id, free_seats, total_seats
    );

    (StatusCode::OK, Json(ReportAck::ok(node_id))).into_response()
}

fn parse_report(payload: Result<Json<Value>, JsonRejection>) -> Option<OccupancyReport> {
    let body = match payload {
        Ok(Json(Value::Object(body))) if !body.is_empty() => body,
        Ok(Json(other)) => {
            debug!("rejected occupancy report: {}", other);
            return None;
        }
        Err(rejection) => {
            debug!("rejected occupancy report: {}", rejection.body_text());
            return None;
        }
    };

    match serde_json::from_value(Value::Object(body)) {
        Ok(report) => Some(report),
        Err(e) => {
            debug!("rejected occupancy report: {}", e);
            None
        }
    }
}

async fn status_handler(State(store): State<Arc<ReadingStore>>) -> Json<Vec<NodeStatus>> {
    Json(store.snapshot())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message))).into_response()
}
