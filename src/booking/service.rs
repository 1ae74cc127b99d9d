use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    BookingDraft, BookingId, BookingInput, ContactDetails, PropertyParameters, QuoteResult,
    ScheduleChoice, ServiceKind,
};
use super::gateway::{BookingGateway, NotificationSink, SubmissionError};
use super::quote::{DistanceResolver, QuoteError, QuoteRequestAdapter};
use super::validation::{validate_all, FieldError};

/// Instant-quote payload accepted at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service: ServiceKind,
    pub property: PropertyParameters,
    pub postcode: String,
}

/// Finalized booking payload accepted at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub contact: ContactDetails,
    pub service: ServiceKind,
    pub property: PropertyParameters,
    pub schedule: ScheduleChoice,
}

/// Response view for an accepted booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    pub booking_id: BookingId,
    pub quote: QuoteResult,
}

/// Service composing the distance resolver, quote engine, booking gateway,
/// and notification sinks behind one facade.
pub struct BookingService<D, G> {
    adapter: QuoteRequestAdapter<D>,
    gateway: Arc<G>,
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl<D, G> BookingService<D, G>
where
    D: DistanceResolver + 'static,
    G: BookingGateway + 'static,
{
    pub fn new(
        adapter: QuoteRequestAdapter<D>,
        gateway: Arc<G>,
        sinks: Vec<Arc<dyn NotificationSink>>,
    ) -> Self {
        Self {
            adapter,
            gateway,
            sinks,
        }
    }

    /// Compute an instant quote for a prospective customer.
    pub fn instant_quote(&self, request: &QuoteRequest) -> Result<QuoteResult, BookingServiceError> {
        let quote = self
            .adapter
            .quote(request.service, &request.property, &request.postcode)?;
        Ok(quote)
    }

    /// Accept a finalized booking: re-validate the complete input set, price
    /// it fresh, hand it to the gateway, then fan out notifications without
    /// blocking the success response.
    pub fn book(&self, request: BookingRequest) -> Result<BookingView, BookingServiceError> {
        self.book_as_of(request, Local::now().date_naive())
    }

    /// `book` with an explicit validation anchor date, for deterministic
    /// booking-window checks.
    pub fn book_as_of(
        &self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<BookingView, BookingServiceError> {
        let draft = draft_from_request(&request);
        let errors = validate_all(&draft, today);
        if !errors.is_empty() {
            return Err(BookingServiceError::Validation(errors));
        }

        let quote = self
            .adapter
            .quote(request.service, &request.property, &request.contact.postcode)?;

        let input = BookingInput {
            contact: request.contact,
            service: request.service,
            property: request.property,
            schedule: request.schedule,
            quote: quote.clone(),
        };

        let confirmation = self.gateway.submit(&input)?;

        info!(
            booking_id = %confirmation.booking_id.0,
            service = input.service.slug(),
            total_cost = input.quote.total_cost,
            outside_service_area = input.quote.outside_service_area,
            "booking accepted"
        );

        for sink in &self.sinks {
            if let Err(err) = sink.booking_confirmed(&input, &confirmation.booking_id) {
                warn!(
                    sink = sink.name(),
                    booking_id = %confirmation.booking_id.0,
                    error = %err,
                    "notification sink failed; booking remains accepted"
                );
            }
        }

        Ok(BookingView {
            booking_id: confirmation.booking_id,
            quote,
        })
    }
}

fn draft_from_request(request: &BookingRequest) -> BookingDraft {
    BookingDraft {
        name: Some(request.contact.name.clone()),
        email: Some(request.contact.email.clone()),
        phone: Some(request.contact.phone.clone()),
        address: Some(request.contact.address.clone()),
        postcode: Some(request.contact.postcode.clone()),
        service: Some(request.service),
        property_type: Some(request.property.property_type),
        property_size: request.property.property_size,
        room_count: request.property.room_count,
        square_meters: request.property.square_meters,
        stain_removal: request.property.stain_removal,
        date: Some(request.schedule.date),
        time_slot: Some(request.schedule.time_slot),
    }
}

fn summarize_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error raised by the booking service facade.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error("booking input failed validation: {}", summarize_errors(.0))]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
