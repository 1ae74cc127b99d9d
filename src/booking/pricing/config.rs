use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::booking::domain::{PricingBasis, ServiceKind};

/// Rate card driving the quote engine. Constructed and validated once at
/// startup; the engine itself never reads the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub per_room_rate: f64,
    pub per_sqm_rate: f64,
    pub flat_rate_by_service: BTreeMap<ServiceKind, f64>,
    pub stain_removal_flat_rate: f64,
    /// Assumed area when an area-priced quote arrives without a measurement.
    pub default_assumed_area_sqm: f64,
    pub free_radius_miles: f64,
    pub per_mile_rate: f64,
    pub max_service_radius_miles: f64,
}

impl PricingConfig {
    /// Production rate card; individual values may be overridden from the
    /// environment by `AppConfig::load`.
    pub fn standard() -> Self {
        let mut flat_rate_by_service = BTreeMap::new();
        flat_rate_by_service.insert(ServiceKind::RugCleaning, 30.0);
        flat_rate_by_service.insert(ServiceKind::LeatherCleaning, 80.0);
        flat_rate_by_service.insert(ServiceKind::MattressCleaningSingle, 25.0);
        flat_rate_by_service.insert(ServiceKind::MattressCleaningDouble, 35.0);
        flat_rate_by_service.insert(ServiceKind::MattressCleaningKing, 45.0);
        flat_rate_by_service.insert(ServiceKind::StainRemoval, 45.0);
        flat_rate_by_service.insert(ServiceKind::CarValeting, 60.0);

        Self {
            per_room_rate: 25.0,
            per_sqm_rate: 1.5,
            flat_rate_by_service,
            stain_removal_flat_rate: 15.0,
            default_assumed_area_sqm: 50.0,
            free_radius_miles: 20.0,
            per_mile_rate: 0.78,
            max_service_radius_miles: 100.0,
        }
    }

    pub fn flat_rate(&self, kind: ServiceKind) -> Option<f64> {
        self.flat_rate_by_service.get(&kind).copied()
    }

    /// Reject rate cards that could produce nonsensical quotes. Every
    /// flat-priced kind must carry a rate; all numbers must be positive and
    /// finite (the free radius may be zero).
    pub fn validate(&self) -> Result<(), PricingConfigError> {
        check_positive("per_room_rate", self.per_room_rate)?;
        check_positive("per_sqm_rate", self.per_sqm_rate)?;
        check_positive("stain_removal_flat_rate", self.stain_removal_flat_rate)?;
        check_positive("default_assumed_area_sqm", self.default_assumed_area_sqm)?;
        check_non_negative("free_radius_miles", self.free_radius_miles)?;
        check_positive("per_mile_rate", self.per_mile_rate)?;
        check_positive("max_service_radius_miles", self.max_service_radius_miles)?;

        for kind in ServiceKind::ALL {
            if kind.pricing_basis() == PricingBasis::Flat {
                match self.flat_rate(kind) {
                    Some(rate) => check_positive(kind.slug(), rate)?,
                    None => return Err(PricingConfigError::MissingFlatRate(kind)),
                }
            }
        }

        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), PricingConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingConfigError::InvalidRate { name, found: value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), PricingConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PricingConfigError::InvalidRate { name, found: value })
    }
}

/// Rate card defects detected at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingConfigError {
    #[error("pricing rate '{name}' must be a positive, finite number (found {found})")]
    InvalidRate { name: &'static str, found: f64 },
    #[error("no flat rate configured for service kind '{}'", .0.slug())]
    MissingFlatRate(ServiceKind),
}
