//! Instant quote engine and booking wizard core.
//!
//! The pricing calculation is pure; the wizard is an explicit finite state
//! machine producing effects that the host executes against the distance
//! resolver and booking gateway boundaries.

pub mod domain;
pub mod gateway;
pub mod pricing;
pub mod quote;
pub mod router;
pub mod service;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    BookingConfirmation, BookingDraft, BookingId, BookingInput, ContactDetails, CostBreakdown,
    PricingBasis, PropertyParameters, PropertySize, PropertyType, QuoteResult, ScheduleChoice,
    ServiceKind, TimeSlot,
};
pub use gateway::{
    BookingGateway, CsvBookingExport, InMemoryBookingLedger, NotificationError, NotificationSink,
    SubmissionError,
};
pub use pricing::{PricingConfig, PricingConfigError, PricingError, QuoteEngine};
pub use quote::{DistanceError, DistanceResolver, OutwardCodeTable, QuoteError, QuoteRequestAdapter};
pub use router::booking_router;
pub use service::{BookingRequest, BookingService, BookingServiceError, BookingView, QuoteRequest};
pub use validation::{
    latest_bookable_date, validate_all, validate_step, BookingStep, FieldError, FieldErrorKind,
    FieldId,
};
pub use wizard::{
    BookingWizard, QuoteTicket, SubmissionTicket, WizardEffect, WizardError, WizardFailure,
};
