use super::lookup::YieldSource;
use serde::Serialize;
use std::fmt;

/// Loan decision derived from the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "Approve Loan")]
    ApproveLoan,
    #[serde(rename = "Reject / Require Insurance")]
    RejectOrRequireInsurance,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Recommendation::ApproveLoan => "Approve Loan",
            Recommendation::RejectOrRequireInsurance => "Reject / Require Insurance",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk report for one farm, ready for display.
///
/// Monetary fields are rounded to two decimals; `yield_loss_pct` is a display string while
/// `loss_fraction` keeps the raw value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub region: String,
    pub crop: String,
    pub disease_detected: String,
    pub disease_display: String,
    pub historical_yield_t_ha: f64,
    pub yield_source: YieldSource,
    pub land_area_hectares: f64,
    pub loss_fraction: f64,
    pub yield_loss_pct: String,
    pub market_price_per_quintal: f64,
    pub potential_revenue: f64,
    pub projected_revenue: f64,
    pub revenue_at_risk: f64,
    pub credit_score: u8,
    pub recommendation: Recommendation,
    pub treatment: String,
}

impl RiskProfile {
    pub fn is_approved(&self) -> bool {
        self.recommendation == Recommendation::ApproveLoan
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn format_loss_pct(loss_fraction: f64) -> String {
    format!("{:.1}%", loss_fraction * 100.0)
}
