use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::service::{AnalyticsError, AnalyticsService};
use super::views::PeriodQuery;
use crate::feedback::{FeedbackRepository, FeedbackSubmission, RepositoryError};

type SharedService<R> = Arc<AnalyticsService<R>>;

/// Router builder exposing ingestion, metrics and insight endpoints.
pub fn analytics_router<R>(service: SharedService<R>) -> Router
where
    R: FeedbackRepository + 'static,
{
    Router::new()
        .route("/api/v1/feedback", post(submit_handler::<R>))
        .route("/api/v1/analytics/metrics", get(metrics_handler::<R>))
        .route("/api/v1/insights/overview", get(overview_handler::<R>))
        .route("/api/v1/insights/nps", get(nps_handler::<R>))
        .route("/api/v1/insights/csat", get(csat_handler::<R>))
        .route("/api/v1/insights/ces", get(ces_handler::<R>))
        .route("/api/v1/insights/drivers", get(drivers_handler::<R>))
        .route("/api/v1/insights/topics", get(topics_handler::<R>))
        .route("/api/v1/insights/segments", get(segments_handler::<R>))
        .route(
            "/api/v1/insights/action-plans",
            get(action_plans_handler::<R>),
        )
        .with_state(service)
}

pub(crate) fn error_body(message: &str, details: Option<Value>) -> Value {
    let mut body = json!({
        "status": "error",
        "message": message,
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    body
}

fn invalid_input(details: Value) -> Response {
    let body = error_body("invalid input data", Some(details));
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        match self {
            AnalyticsError::NoData => {
                let body = error_body(&self.to_string(), None);
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AnalyticsError::Validation(err) => {
                warn!(error = %err, "feedback rejected");
                invalid_input(json!(err.violations))
            }
            AnalyticsError::Repository(RepositoryError::Conflict) => {
                let body = error_body("feedback already exists", None);
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AnalyticsError::Repository(err) => {
                error!(error = %err, "feedback repository failure");
                let body = error_body("an internal server error occurred", None);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

fn respond<T: Serialize>(result: Result<T, AnalyticsError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn period(query: Result<Query<PeriodQuery>, QueryRejection>) -> Result<PeriodQuery, Response> {
    match query {
        Ok(Query(period)) => Ok(period),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "invalid period query");
            Err(invalid_input(json!([rejection.body_text()])))
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<SharedService<R>>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Response
where
    R: FeedbackRepository + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed feedback payload");
            return invalid_input(json!([rejection.body_text()]));
        }
    };

    respond(service.submit(submission).await)
}

pub(crate) async fn metrics_handler<R>(
    State(service): State<SharedService<R>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response
where
    R: FeedbackRepository + 'static,
{
    match period(query) {
        Ok(period) => respond(service.metrics(&period.range())),
        Err(response) => response,
    }
}

macro_rules! insight_handler {
    ($name:ident, $method:ident) => {
        pub(crate) async fn $name<R>(
            State(service): State<SharedService<R>>,
            query: Result<Query<PeriodQuery>, QueryRejection>,
        ) -> Response
        where
            R: FeedbackRepository + 'static,
        {
            match period(query) {
                Ok(period) => respond(service.$method(&period.range()).await),
                Err(response) => response,
            }
        }
    };
}

insight_handler!(overview_handler, overview);
insight_handler!(nps_handler, nps);
insight_handler!(csat_handler, csat);
insight_handler!(ces_handler, ces);
insight_handler!(drivers_handler, drivers);
insight_handler!(topics_handler, topics);
insight_handler!(segments_handler, segments);
insight_handler!(action_plans_handler, action_plans);
