use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use super::domain::{BookingConfirmation, BookingId, BookingInput};

/// Persistence boundary for finalized bookings. At-most-once from the
/// wizard's perspective; retries are user-initiated.
pub trait BookingGateway: Send + Sync {
    fn submit(&self, input: &BookingInput) -> Result<BookingConfirmation, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("booking backend rejected the submission: {0}")]
    Rejected(String),
    #[error("booking backend unavailable: {0}")]
    Unavailable(String),
}

/// Downstream side effects fed after a booking lands (confirmation email,
/// operator alert, record export). Sink failures never block or fail the
/// user-visible submission success.
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;
    fn booking_confirmed(
        &self,
        input: &BookingInput,
        booking_id: &BookingId,
    ) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Gateway keeping accepted bookings in memory and assigning sequential
/// booking ids. Backs the local service binary and tests.
#[derive(Debug, Default)]
pub struct InMemoryBookingLedger {
    sequence: AtomicU64,
    accepted: Mutex<Vec<BookingInput>>,
}

impl InMemoryBookingLedger {
    pub fn accepted(&self) -> Vec<BookingInput> {
        self.accepted
            .lock()
            .map(|bookings| bookings.clone())
            .unwrap_or_default()
    }
}

impl BookingGateway for InMemoryBookingLedger {
    fn submit(&self, input: &BookingInput) -> Result<BookingConfirmation, SubmissionError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.accepted
            .lock()
            .map_err(|_| SubmissionError::Unavailable("booking ledger poisoned".to_string()))?
            .push(input.clone());

        Ok(BookingConfirmation {
            booking_id: BookingId(format!("bk-{id:06}")),
        })
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    booking_id: &'a str,
    appointment_date: String,
    time_slot: &'static str,
    service: &'static str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    postcode: &'a str,
    room_count: Option<u32>,
    square_meters: Option<f64>,
    stain_removal: bool,
    distance_miles: f64,
    service_cost: f64,
    travel_cost: f64,
    total_cost: f64,
    outside_service_area: bool,
}

/// Append-only CSV export of accepted bookings, one flat row per record.
#[derive(Debug, Clone)]
pub struct CsvBookingExport {
    path: PathBuf,
}

impl CsvBookingExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NotificationSink for CsvBookingExport {
    fn name(&self) -> &'static str {
        "csv_export"
    }

    fn booking_confirmed(
        &self,
        input: &BookingInput,
        booking_id: &BookingId,
    ) -> Result<(), NotificationError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        let write_header = file
            .metadata()
            .map(|meta| meta.len() == 0)
            .unwrap_or(false);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        writer
            .serialize(ExportRow {
                booking_id: &booking_id.0,
                appointment_date: input.schedule.date.format("%Y-%m-%d").to_string(),
                time_slot: input.schedule.time_slot.label(),
                service: input.service.slug(),
                name: &input.contact.name,
                email: &input.contact.email,
                phone: &input.contact.phone,
                postcode: &input.contact.postcode,
                room_count: input.property.room_count,
                square_meters: input.property.square_meters,
                stain_removal: input.property.stain_removal,
                distance_miles: input.quote.distance_miles,
                service_cost: input.quote.service_cost,
                travel_cost: input.quote.travel_cost,
                total_cost: input.quote.total_cost,
                outside_service_area: input.quote.outside_service_area,
            })
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        writer
            .flush()
            .map_err(|err| NotificationError::Transport(err.to_string()))
    }
}
