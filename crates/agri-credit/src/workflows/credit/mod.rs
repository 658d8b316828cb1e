//! Credit risk scoring: yield baselines, disease impact, market prices, and the engine that
//! composes them into a [`RiskProfile`].

pub mod advisory;
pub mod engine;
pub mod impact;
pub mod lookup;
pub mod pricing;
pub mod profile;
pub mod router;
mod tables;

pub use advisory::{display_label, treatment_for};
pub use engine::{credit_score, recommendation_for, EngineInitError, FinancialEngine};
pub use impact::{canonical_disease, DiseaseImpactTable};
pub use lookup::{
    CropDefault, NationalAverage, RegionalAverage, YieldEstimate, YieldFallback,
    YieldLookupService, YieldQuery, YieldSource,
};
pub use pricing::MarketPriceTable;
pub use profile::{Recommendation, RiskProfile};
pub use router::{credit_router, RiskAssessmentRequest};
pub use tables::TableError;

/// Per-request rejection; the engine stays usable.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("land area must be a positive number of acres, got {value}")]
    InvalidLandArea { value: f64 },
    #[error("land area of {value} acres is too large to project revenue")]
    LandAreaOutOfRange { value: f64 },
}
