use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDate};

use crate::booking::domain::{
    BookingConfirmation, BookingDraft, BookingId, BookingInput, ContactDetails,
    PropertyParameters, PropertyType, ScheduleChoice, ServiceKind, TimeSlot,
};
use crate::booking::gateway::{
    BookingGateway, NotificationError, NotificationSink, SubmissionError,
};
use crate::booking::pricing::{PricingConfig, QuoteEngine};
use crate::booking::quote::{DistanceError, DistanceResolver, QuoteRequestAdapter};
use crate::booking::service::{BookingRequest, BookingService, QuoteRequest};
use crate::booking::wizard::{BookingWizard, WizardEffect};

// Anchored to the real clock because the service-level `book` path
// validates against the current date.
pub(super) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(super) fn appointment_date() -> NaiveDate {
    today() + Duration::days(14)
}

pub(super) fn pricing_config() -> PricingConfig {
    PricingConfig::standard()
}

pub(super) fn engine() -> QuoteEngine {
    QuoteEngine::new(pricing_config())
}

pub(super) fn room_params(rooms: u32) -> PropertyParameters {
    PropertyParameters {
        property_type: PropertyType::House,
        property_size: None,
        room_count: Some(rooms),
        square_meters: None,
        stain_removal: false,
    }
}

pub(super) fn area_params(square_meters: f64) -> PropertyParameters {
    PropertyParameters {
        property_type: PropertyType::Commercial,
        property_size: None,
        room_count: None,
        square_meters: Some(square_meters),
        stain_removal: false,
    }
}

pub(super) fn flat_params() -> PropertyParameters {
    PropertyParameters {
        property_type: PropertyType::House,
        property_size: None,
        room_count: None,
        square_meters: None,
        stain_removal: false,
    }
}

pub(super) fn contact() -> ContactDetails {
    ContactDetails {
        name: "Jamie Fletcher".to_string(),
        email: "jamie.fletcher@example.com".to_string(),
        phone: "07700 900123".to_string(),
        address: "12 Orchard Way, Norwich".to_string(),
        postcode: "NR2 1AB".to_string(),
    }
}

/// Draft with every field filled in, ready for full validation.
pub(super) fn completed_draft() -> BookingDraft {
    let contact = contact();
    BookingDraft {
        name: Some(contact.name),
        email: Some(contact.email),
        phone: Some(contact.phone),
        address: Some(contact.address),
        postcode: Some(contact.postcode),
        service: Some(ServiceKind::CarpetCleaning),
        property_type: Some(PropertyType::House),
        property_size: None,
        room_count: Some(3),
        square_meters: None,
        stain_removal: false,
        date: Some(appointment_date()),
        time_slot: Some(TimeSlot::Morning),
    }
}

pub(super) fn quote_request() -> QuoteRequest {
    QuoteRequest {
        service: ServiceKind::CarpetCleaning,
        property: room_params(3),
        postcode: "NR2 1AB".to_string(),
    }
}

pub(super) fn booking_request() -> BookingRequest {
    BookingRequest {
        contact: contact(),
        service: ServiceKind::CarpetCleaning,
        property: room_params(3),
        schedule: ScheduleChoice {
            date: appointment_date(),
            time_slot: TimeSlot::Morning,
        },
    }
}

/// Resolver returning the same mileage for every postcode.
pub(super) struct StaticResolver(pub(super) f64);

impl DistanceResolver for StaticResolver {
    fn resolve_distance_miles(&self, _postcode: &str) -> Result<f64, DistanceError> {
        Ok(self.0)
    }
}

/// Resolver that always fails, standing in for a geocoding outage.
pub(super) struct FailingResolver;

impl DistanceResolver for FailingResolver {
    fn resolve_distance_miles(&self, postcode: &str) -> Result<f64, DistanceError> {
        Err(DistanceError::Unresolved {
            postcode: postcode.to_string(),
            reason: "lookup backend offline".to_string(),
        })
    }
}

#[derive(Default)]
pub(super) struct MemoryGateway {
    pub(super) accepted: Mutex<Vec<BookingInput>>,
}

impl BookingGateway for MemoryGateway {
    fn submit(&self, input: &BookingInput) -> Result<BookingConfirmation, SubmissionError> {
        let mut accepted = self.accepted.lock().expect("gateway mutex poisoned");
        accepted.push(input.clone());
        Ok(BookingConfirmation {
            booking_id: BookingId(format!("bk-{:06}", accepted.len())),
        })
    }
}

pub(super) struct UnavailableGateway;

impl BookingGateway for UnavailableGateway {
    fn submit(&self, _input: &BookingInput) -> Result<BookingConfirmation, SubmissionError> {
        Err(SubmissionError::Unavailable("backend timeout".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingSink {
    pub(super) confirmed: Mutex<Vec<BookingId>>,
}

impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn booking_confirmed(
        &self,
        _input: &BookingInput,
        booking_id: &BookingId,
    ) -> Result<(), NotificationError> {
        self.confirmed
            .lock()
            .expect("sink mutex poisoned")
            .push(booking_id.clone());
        Ok(())
    }
}

pub(super) struct FailingSink;

impl NotificationSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn booking_confirmed(
        &self,
        _input: &BookingInput,
        _booking_id: &BookingId,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp refused".to_string()))
    }
}

pub(super) fn adapter(distance: f64) -> QuoteRequestAdapter<StaticResolver> {
    QuoteRequestAdapter::new(Arc::new(StaticResolver(distance)), engine())
}

pub(super) fn booking_service(
    distance: f64,
) -> (BookingService<StaticResolver, MemoryGateway>, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::default());
    let service = BookingService::new(adapter(distance), gateway.clone(), Vec::new());
    (service, gateway)
}

/// Run any quote effect against the adapter and feed the outcome back,
/// mirroring what a host driver does after each transition.
pub(super) fn drive_quote(
    wizard: &mut BookingWizard,
    effect: Option<WizardEffect>,
    adapter: &QuoteRequestAdapter<StaticResolver>,
) {
    if let Some(WizardEffect::RecalculateQuote(ticket)) = effect {
        let draft = wizard.draft().clone();
        let outcome = adapter.quote(
            draft.service.expect("service selected"),
            &draft.property_parameters().expect("property complete"),
            draft.postcode.as_deref().expect("postcode entered"),
        );
        wizard.apply_quote_outcome(ticket, outcome);
    }
}

/// Walk a fresh wizard to the quote review step with a resolved quote.
pub(super) fn wizard_at_quote_review(
    adapter: &QuoteRequestAdapter<StaticResolver>,
) -> BookingWizard {
    let mut wizard = BookingWizard::anchored_to(today());
    populate_contact(&mut wizard);
    let effect = wizard.next().expect("contact step passes");
    assert!(effect.is_none());

    populate_service(&mut wizard);
    let effect = wizard.next().expect("service step passes");
    drive_quote(&mut wizard, effect, adapter);
    wizard
}

pub(super) fn populate_contact(wizard: &mut BookingWizard) {
    let contact = contact();
    wizard
        .edit(|draft| {
            draft.name = Some(contact.name);
            draft.email = Some(contact.email);
            draft.phone = Some(contact.phone);
            draft.address = Some(contact.address);
            draft.postcode = Some(contact.postcode);
        })
        .expect("contact edit applies");
}

pub(super) fn populate_service(wizard: &mut BookingWizard) {
    wizard
        .edit(|draft| {
            draft.service = Some(ServiceKind::CarpetCleaning);
            draft.property_type = Some(PropertyType::House);
            draft.room_count = Some(3);
        })
        .expect("service edit applies");
}

pub(super) fn populate_schedule(wizard: &mut BookingWizard) {
    wizard
        .edit(|draft| {
            draft.date = Some(appointment_date());
            draft.time_slot = Some(TimeSlot::Morning);
        })
        .expect("schedule edit applies");
}
