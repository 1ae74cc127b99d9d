use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the booking gateway once a submission lands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

/// Closed set of services the business quotes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    CarpetCleaning,
    UpholsteryCleaning,
    CommercialCleaning,
    RugCleaning,
    LeatherCleaning,
    MattressCleaningSingle,
    MattressCleaningDouble,
    MattressCleaningKing,
    StainRemoval,
    CarValeting,
}

/// Which size parameter drives the base price for a service kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingBasis {
    PerRoom,
    PerArea,
    Flat,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 10] = [
        ServiceKind::CarpetCleaning,
        ServiceKind::UpholsteryCleaning,
        ServiceKind::CommercialCleaning,
        ServiceKind::RugCleaning,
        ServiceKind::LeatherCleaning,
        ServiceKind::MattressCleaningSingle,
        ServiceKind::MattressCleaningDouble,
        ServiceKind::MattressCleaningKing,
        ServiceKind::StainRemoval,
        ServiceKind::CarValeting,
    ];

    pub const fn pricing_basis(self) -> PricingBasis {
        match self {
            ServiceKind::CarpetCleaning | ServiceKind::UpholsteryCleaning => PricingBasis::PerRoom,
            ServiceKind::CommercialCleaning => PricingBasis::PerArea,
            ServiceKind::RugCleaning
            | ServiceKind::LeatherCleaning
            | ServiceKind::MattressCleaningSingle
            | ServiceKind::MattressCleaningDouble
            | ServiceKind::MattressCleaningKing
            | ServiceKind::StainRemoval
            | ServiceKind::CarValeting => PricingBasis::Flat,
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            ServiceKind::CarpetCleaning => "carpet_cleaning",
            ServiceKind::UpholsteryCleaning => "upholstery_cleaning",
            ServiceKind::CommercialCleaning => "commercial_cleaning",
            ServiceKind::RugCleaning => "rug_cleaning",
            ServiceKind::LeatherCleaning => "leather_cleaning",
            ServiceKind::MattressCleaningSingle => "mattress_cleaning_single",
            ServiceKind::MattressCleaningDouble => "mattress_cleaning_double",
            ServiceKind::MattressCleaningKing => "mattress_cleaning_king",
            ServiceKind::StainRemoval => "stain_removal",
            ServiceKind::CarValeting => "car_valeting",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Flat,
    Office,
    Commercial,
    Other,
}

/// Advisory size bucket captured on the form; never feeds the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySize {
    OneBed,
    TwoBed,
    ThreeBed,
    FourBed,
    FiveBedPlus,
}

/// Property inputs consumed by the quote engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyParameters {
    pub property_type: PropertyType,
    pub property_size: Option<PropertySize>,
    pub room_count: Option<u32>,
    pub square_meters: Option<f64>,
    pub stain_removal: bool,
}

/// Customer identity and location; the postcode is the sole distance input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postcode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Flexible,
}

impl TimeSlot {
    pub const fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Flexible => "flexible",
        }
    }
}

/// Requested appointment; the date must fall inside the booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleChoice {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

/// Line items behind a quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_price: f64,
    pub add_on_fee: f64,
    pub travel_cost: f64,
}

/// Full computed cost breakdown for a booking input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub distance_miles: f64,
    pub service_cost: f64,
    pub travel_cost: f64,
    pub total_cost: f64,
    pub breakdown: CostBreakdown,
    /// Soft serviceability flag; the price above remains payable.
    pub outside_service_area: bool,
}

/// Mutable, incrementally populated wizard state. The wizard is the sole
/// owner until a snapshot is taken at submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub service: Option<ServiceKind>,
    pub property_type: Option<PropertyType>,
    pub property_size: Option<PropertySize>,
    pub room_count: Option<u32>,
    pub square_meters: Option<f64>,
    pub stain_removal: bool,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
}

impl BookingDraft {
    pub fn property_parameters(&self) -> Option<PropertyParameters> {
        Some(PropertyParameters {
            property_type: self.property_type?,
            property_size: self.property_size,
            room_count: self.room_count,
            square_meters: self.square_meters,
            stain_removal: self.stain_removal,
        })
    }

    pub fn contact_details(&self) -> Option<ContactDetails> {
        Some(ContactDetails {
            name: self.name.clone()?,
            email: self.email.clone()?,
            phone: self.phone.clone()?,
            address: self.address.clone()?,
            postcode: self.postcode.clone()?,
        })
    }

    pub fn schedule_choice(&self) -> Option<ScheduleChoice> {
        Some(ScheduleChoice {
            date: self.date?,
            time_slot: self.time_slot?,
        })
    }
}

/// Immutable snapshot handed to the booking gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingInput {
    pub contact: ContactDetails,
    pub service: ServiceKind,
    pub property: PropertyParameters,
    pub schedule: ScheduleChoice,
    pub quote: QuoteResult,
}

impl BookingInput {
    /// Build the submission snapshot from a completed draft. Returns `None`
    /// when a required field is still unset; callers validate first.
    pub fn from_draft(draft: &BookingDraft, quote: QuoteResult) -> Option<Self> {
        Some(BookingInput {
            contact: draft.contact_details()?,
            service: draft.service?,
            property: draft.property_parameters()?,
            schedule: draft.schedule_choice()?,
            quote,
        })
    }
}

/// Acknowledgement returned by the booking gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
}
