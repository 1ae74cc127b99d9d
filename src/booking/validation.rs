use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{BookingDraft, PricingBasis};

/// Ordered wizard steps. `Submitted` is not a step; the wizard tracks the
/// terminal confirmation separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Contact,
    ServiceDetails,
    QuoteReview,
    Scheduling,
    Confirm,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        BookingStep::Contact,
        BookingStep::ServiceDetails,
        BookingStep::QuoteReview,
        BookingStep::Scheduling,
        BookingStep::Confirm,
    ];

    pub const fn index(self) -> usize {
        match self {
            BookingStep::Contact => 0,
            BookingStep::ServiceDetails => 1,
            BookingStep::QuoteReview => 2,
            BookingStep::Scheduling => 3,
            BookingStep::Confirm => 4,
        }
    }

    pub const fn next(self) -> Option<BookingStep> {
        match self {
            BookingStep::Contact => Some(BookingStep::ServiceDetails),
            BookingStep::ServiceDetails => Some(BookingStep::QuoteReview),
            BookingStep::QuoteReview => Some(BookingStep::Scheduling),
            BookingStep::Scheduling => Some(BookingStep::Confirm),
            BookingStep::Confirm => None,
        }
    }

    pub const fn prev(self) -> Option<BookingStep> {
        match self {
            BookingStep::Contact => None,
            BookingStep::ServiceDetails => Some(BookingStep::Contact),
            BookingStep::QuoteReview => Some(BookingStep::ServiceDetails),
            BookingStep::Scheduling => Some(BookingStep::QuoteReview),
            BookingStep::Confirm => Some(BookingStep::Scheduling),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BookingStep::Contact => "contact",
            BookingStep::ServiceDetails => "service_details",
            BookingStep::QuoteReview => "quote_review",
            BookingStep::Scheduling => "scheduling",
            BookingStep::Confirm => "confirm",
        }
    }
}

/// Fields the validators can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Name,
    Email,
    Phone,
    Address,
    Postcode,
    Service,
    RoomCount,
    SquareMeters,
    Date,
    TimeSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    Malformed,
    OutOfRange,
}

/// User-correctable constraint violation; blocks forward navigation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldId,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn missing(field: FieldId, message: &str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Missing,
            message: message.to_string(),
        }
    }

    fn malformed(field: FieldId, message: &str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Malformed,
            message: message.to_string(),
        }
    }

    fn out_of_range(field: FieldId, message: &str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::OutOfRange,
            message: message.to_string(),
        }
    }
}

/// How far ahead a booking may be scheduled.
pub const BOOKING_WINDOW_MONTHS: u32 = 3;

pub fn latest_bookable_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(BOOKING_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Validate the fields belonging to a single step. A step never inspects
/// fields owned by a later step; required-ness within the service step is
/// conditioned on the selected kind's pricing basis.
pub fn validate_step(step: BookingStep, draft: &BookingDraft, today: NaiveDate) -> Vec<FieldError> {
    match step {
        BookingStep::Contact => validate_contact(draft),
        BookingStep::ServiceDetails => validate_service_details(draft),
        // The quote itself is owned by the wizard; there are no draft fields
        // to check on the review step.
        BookingStep::QuoteReview => Vec::new(),
        BookingStep::Scheduling => validate_scheduling(draft, today),
        BookingStep::Confirm => validate_all(draft, today),
    }
}

/// Union of every step's constraints; run before submission to guard against
/// stale state introduced by back-navigation edits.
pub fn validate_all(draft: &BookingDraft, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = validate_contact(draft);
    errors.extend(validate_service_details(draft));
    errors.extend(validate_scheduling(draft, today));
    errors
}

fn validate_contact(draft: &BookingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match draft.name.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::missing(FieldId::Name, "name is required")),
        Some(_) => {}
    }

    match draft.email.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::missing(FieldId::Email, "email is required")),
        Some(email) if !is_plausible_email(email) => errors.push(FieldError::malformed(
            FieldId::Email,
            "email must look like name@example.com",
        )),
        Some(_) => {}
    }

    match draft.phone.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::missing(FieldId::Phone, "phone is required")),
        Some(phone) if !is_plausible_phone(phone) => errors.push(FieldError::malformed(
            FieldId::Phone,
            "phone must contain at least 7 digits",
        )),
        Some(_) => {}
    }

    match draft.address.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::missing(FieldId::Address, "address is required"))
        }
        Some(_) => {}
    }

    match draft.postcode.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::missing(
            FieldId::Postcode,
            "postcode is required",
        )),
        Some(postcode) if !is_plausible_postcode(postcode) => errors.push(FieldError::malformed(
            FieldId::Postcode,
            "postcode does not look like a UK postcode",
        )),
        Some(_) => {}
    }

    errors
}

fn validate_service_details(draft: &BookingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let Some(service) = draft.service else {
        errors.push(FieldError::missing(
            FieldId::Service,
            "a service must be selected",
        ));
        return errors;
    };

    match service.pricing_basis() {
        PricingBasis::PerRoom => match draft.room_count {
            None => errors.push(FieldError::missing(
                FieldId::RoomCount,
                "room count is required for this service",
            )),
            Some(0) => errors.push(FieldError::out_of_range(
                FieldId::RoomCount,
                "room count must be at least 1",
            )),
            Some(_) => {}
        },
        PricingBasis::PerArea => match draft.square_meters {
            None => errors.push(FieldError::missing(
                FieldId::SquareMeters,
                "square meterage is required for this service",
            )),
            Some(area) if !area.is_finite() || area <= 0.0 => errors.push(
                FieldError::out_of_range(FieldId::SquareMeters, "square meterage must be positive"),
            ),
            Some(_) => {}
        },
        PricingBasis::Flat => {}
    }

    errors
}

fn validate_scheduling(draft: &BookingDraft, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match draft.date {
        None => errors.push(FieldError::missing(
            FieldId::Date,
            "an appointment date is required",
        )),
        Some(date) if date < today => errors.push(FieldError::out_of_range(
            FieldId::Date,
            "the appointment date has already passed",
        )),
        Some(date) if date > latest_bookable_date(today) => errors.push(FieldError::out_of_range(
            FieldId::Date,
            "appointments can be booked at most three months ahead",
        )),
        Some(_) => {}
    }

    if draft.time_slot.is_none() {
        errors.push(FieldError::missing(
            FieldId::TimeSlot,
            "a time preference is required",
        ));
    }

    errors
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn is_plausible_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    let acceptable = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    digits >= 7 && acceptable
}

/// Loose UK postcode shape: outward + inward segments, 5-8 alphanumerics,
/// inward ending digit-letter-letter. Geocoding accuracy belongs to the
/// distance resolver, not the form.
fn is_plausible_postcode(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !(5..=8).contains(&compact.len()) || !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let inward = &compact[compact.len() - 3..];
    let mut chars = inward.chars();
    let digit = chars.next().is_some_and(|c| c.is_ascii_digit());
    let letters = chars.all(|c| c.is_ascii_alphabetic());
    let outward_starts_alpha = compact.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    digit && letters && outward_starts_alpha
}
