use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::gateway::BookingGateway;
use super::quote::{DistanceResolver, QuoteError};
use super::service::{BookingRequest, BookingService, BookingServiceError, QuoteRequest};

/// Router builder exposing instant-quote and booking endpoints.
pub fn booking_router<D, G>(service: Arc<BookingService<D, G>>) -> Router
where
    D: DistanceResolver + Send + Sync + 'static,
    G: BookingGateway + 'static,
{
    Router::new()
        .route("/api/v1/quotes", post(quote_handler::<D, G>))
        .route("/api/v1/bookings", post(booking_handler::<D, G>))
        .with_state(service)
}

pub(crate) async fn quote_handler<D, G>(
    State(service): State<Arc<BookingService<D, G>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    D: DistanceResolver + Send + Sync + 'static,
    G: BookingGateway + 'static,
{
    match service.instant_quote(&request) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn booking_handler<D, G>(
    State(service): State<Arc<BookingService<D, G>>>,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    D: DistanceResolver + Send + Sync + 'static,
    G: BookingGateway + 'static,
{
    match service.book(request) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: BookingServiceError) -> Response {
    let status = match &error {
        BookingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingServiceError::Quote(QuoteError::Distance(_)) => StatusCode::BAD_GATEWAY,
        BookingServiceError::Quote(QuoteError::Pricing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        BookingServiceError::Submission(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
