mod config;
mod rules;

pub use config::{PricingConfig, PricingConfigError};

use crate::booking::domain::{CostBreakdown, PropertyParameters, QuoteResult, ServiceKind};

/// Stateless calculator turning a validated selection plus a resolved
/// distance into a cost breakdown. Pure: identical inputs always produce
/// identical quotes.
pub struct QuoteEngine {
    config: PricingConfig,
}

impl QuoteEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Compute the full quote for a service selection.
    ///
    /// Rounding is applied independently at the service-cost, travel-cost,
    /// and total boundaries so each displayed line matches its own sum.
    /// Exceeding the maximum service radius never alters the price; it only
    /// sets the `outside_service_area` flag on the result.
    pub fn calculate(
        &self,
        service: ServiceKind,
        params: &PropertyParameters,
        distance_miles: f64,
    ) -> Result<QuoteResult, PricingError> {
        if !distance_miles.is_finite() || distance_miles < 0.0 {
            return Err(PricingError::InvalidDistance(distance_miles));
        }

        let base_price = rules::resolve_base_price(service, params, &self.config)?;

        // The stain-removal service already prices the treatment; the add-on
        // only applies on top of other services.
        let add_on_fee = if params.stain_removal && service != ServiceKind::StainRemoval {
            self.config.stain_removal_flat_rate
        } else {
            0.0
        };

        let service_cost = round2(base_price + add_on_fee);

        let billable_miles = distance_miles - self.config.free_radius_miles;
        let travel_cost = if billable_miles > 0.0 {
            round2(billable_miles * self.config.per_mile_rate)
        } else {
            0.0
        };

        let total_cost = round2(service_cost + travel_cost);

        Ok(QuoteResult {
            distance_miles,
            service_cost,
            travel_cost,
            total_cost,
            breakdown: CostBreakdown {
                base_price,
                add_on_fee,
                travel_cost,
            },
            outside_service_area: distance_miles > self.config.max_service_radius_miles,
        })
    }
}

/// Round half away from zero to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raised for malformed numeric input or rate-card gaps. Validated upstream
/// data never triggers these; they indicate a defect rather than a
/// user-facing condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("distance must be a non-negative, finite mileage (found {0})")]
    InvalidDistance(f64),
    #[error("square meterage must be a positive, finite number (found {0})")]
    InvalidArea(f64),
    #[error("no flat rate configured for service kind '{}'", .0.slug())]
    MissingFlatRate(ServiceKind),
}
