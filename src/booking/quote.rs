use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::domain::{PropertyParameters, QuoteResult, ServiceKind};
use super::pricing::{PricingError, QuoteEngine};

/// Distance lookup boundary. Failures always surface as quote errors; the
/// adapter never substitutes a default distance.
pub trait DistanceResolver: Send + Sync {
    fn resolve_distance_miles(&self, postcode: &str) -> Result<f64, DistanceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistanceError {
    #[error("postcode '{postcode}' could not be resolved: {reason}")]
    Unresolved { postcode: String, reason: String },
    #[error("distance service unavailable: {0}")]
    Unavailable(String),
}

/// Retriable failure while producing a quote. Distance failures are the
/// expected case; pricing failures indicate a defect or rate-card gap.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Distance(#[from] DistanceError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Thin boundary combining distance resolution with the pure engine.
pub struct QuoteRequestAdapter<D> {
    resolver: Arc<D>,
    engine: QuoteEngine,
}

impl<D> QuoteRequestAdapter<D>
where
    D: DistanceResolver,
{
    pub fn new(resolver: Arc<D>, engine: QuoteEngine) -> Self {
        Self { resolver, engine }
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    pub fn quote(
        &self,
        service: ServiceKind,
        params: &PropertyParameters,
        postcode: &str,
    ) -> Result<QuoteResult, QuoteError> {
        let distance_miles = self.resolver.resolve_distance_miles(postcode.trim())?;
        let quote = self.engine.calculate(service, params, distance_miles)?;

        debug!(
            service = service.slug(),
            distance_miles,
            total_cost = quote.total_cost,
            outside_service_area = quote.outside_service_area,
            "quote computed"
        );

        Ok(quote)
    }
}

#[derive(Debug, Deserialize)]
struct OutwardCodeRow {
    outward_code: String,
    distance_miles: f64,
}

/// Resolver backed by a CSV table of outward codes to road miles from the
/// depot (columns `outward_code,distance_miles`). Postcodes whose outward
/// segment is absent from the table fail with `DistanceError::Unresolved`.
#[derive(Debug, Default, Clone)]
pub struct OutwardCodeTable {
    distances: BTreeMap<String, f64>,
}

impl OutwardCodeTable {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DistanceError> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|err| DistanceError::Unavailable(err.to_string()))?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DistanceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut distances = BTreeMap::new();
        for row in csv_reader.deserialize::<OutwardCodeRow>() {
            let row = row.map_err(|err| DistanceError::Unavailable(err.to_string()))?;
            distances.insert(row.outward_code.to_ascii_uppercase(), row.distance_miles);
        }

        Ok(Self { distances })
    }

    pub fn insert(&mut self, outward_code: &str, distance_miles: f64) {
        self.distances
            .insert(outward_code.trim().to_ascii_uppercase(), distance_miles);
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Outward segment of a full postcode, e.g. `SW1A` from `SW1A 1AA`.
/// Table keys are ASCII alphanumerics; everything else is dropped, so
/// malformed input misses the table instead of erroring.
fn outward_segment(postcode: &str) -> String {
    let compact: String = postcode
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.len() > 3 {
        compact[..compact.len() - 3].to_string()
    } else {
        compact
    }
}

impl DistanceResolver for OutwardCodeTable {
    fn resolve_distance_miles(&self, postcode: &str) -> Result<f64, DistanceError> {
        let outward = outward_segment(postcode);
        self.distances
            .get(&outward)
            .copied()
            .ok_or_else(|| DistanceError::Unresolved {
                postcode: postcode.to_string(),
                reason: format!("outward code '{outward}' is not in the distance table"),
            })
    }
}
