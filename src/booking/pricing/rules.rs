use crate::booking::domain::{PricingBasis, PropertyParameters, ServiceKind};

use super::config::PricingConfig;
use super::PricingError;

/// Resolve the pre-add-on base price for a service selection.
///
/// Room-priced kinds bill at least one room; area-priced kinds fall back to
/// the configured assumed area when no measurement was captured. Flat-priced
/// kinds read the rate card directly.
pub(crate) fn resolve_base_price(
    kind: ServiceKind,
    params: &PropertyParameters,
    config: &PricingConfig,
) -> Result<f64, PricingError> {
    match kind.pricing_basis() {
        PricingBasis::PerRoom => {
            let rooms = params.room_count.unwrap_or(1).max(1);
            Ok(config.per_room_rate * f64::from(rooms))
        }
        PricingBasis::PerArea => {
            let area = params
                .square_meters
                .unwrap_or(config.default_assumed_area_sqm);
            if !area.is_finite() || area <= 0.0 {
                return Err(PricingError::InvalidArea(area));
            }
            Ok(config.per_sqm_rate * area)
        }
        PricingBasis::Flat => config
            .flat_rate(kind)
            .ok_or(PricingError::MissingFlatRate(kind)),
    }
}
