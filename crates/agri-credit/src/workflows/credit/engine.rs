use super::advisory::{display_label, treatment_for};
use super::impact::{canonical_disease, DiseaseImpactTable};
use super::lookup::YieldLookupService;
use super::pricing::MarketPriceTable;
use super::profile::{format_loss_pct, round2, Recommendation, RiskProfile};
use super::tables::TableError;
use super::AssessmentError;
use crate::config::DataConfig;
use crate::workflows::yield_data::{title_case, LoadError, YieldDataset, YieldDatasetLoader};
use tracing::info;

pub const HECTARES_PER_ACRE: f64 = 0.404686;
/// Scores strictly above this approve the loan.
pub const APPROVAL_THRESHOLD: u8 = 70;
pub const MIN_CREDIT_SCORE: u8 = 20;
pub const MAX_CREDIT_SCORE: u8 = 100;
/// Score points lost per percentage point of expected yield loss.
pub const LOSS_PENALTY_PER_POINT: f64 = 1.2;

#[derive(Debug, thiserror::Error)]
pub enum EngineInitError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Owns the yield data and lookup tables; every scoring call is a read.
#[derive(Debug)]
pub struct FinancialEngine {
    lookup: YieldLookupService,
    impact: DiseaseImpactTable,
    prices: MarketPriceTable,
}

impl FinancialEngine {
    pub fn new(
        dataset: YieldDataset,
        impact: DiseaseImpactTable,
        prices: MarketPriceTable,
    ) -> Self {
        Self::with_lookup(YieldLookupService::new(dataset), impact, prices)
    }

    pub fn with_lookup(
        lookup: YieldLookupService,
        impact: DiseaseImpactTable,
        prices: MarketPriceTable,
    ) -> Self {
        Self {
            lookup,
            impact,
            prices,
        }
    }

    /// Load the yield export and any table overrides named by the configuration.
    pub fn from_config(config: &DataConfig) -> Result<Self, EngineInitError> {
        let dataset = YieldDatasetLoader::default().load_dir(&config.data_dir)?;

        let impact = match &config.disease_impact_path {
            Some(path) => DiseaseImpactTable::from_json_file(path)?,
            None => DiseaseImpactTable::standard(),
        };
        let prices = match &config.market_price_path {
            Some(path) => MarketPriceTable::from_json_file(path)?,
            None => MarketPriceTable::standard(),
        };

        info!(
            rows = dataset.records().len(),
            diseases = impact.entries().len(),
            crops = prices.entries().len(),
            "financial engine ready"
        );

        Ok(Self::new(dataset, impact, prices))
    }

    pub fn dataset(&self) -> &YieldDataset {
        self.lookup.dataset()
    }

    pub fn impact_table(&self) -> &DiseaseImpactTable {
        &self.impact
    }

    pub fn price_table(&self) -> &MarketPriceTable {
        &self.prices
    }

    pub fn historical_yield(&self, region: &str, crop: &str) -> f64 {
        self.lookup.historical_yield(region, crop)
    }

    pub fn loss_fraction(&self, disease_label: &str) -> f64 {
        self.impact.loss_fraction(disease_label)
    }

    /// Combine the yield baseline, market price and disease loss into a risk report.
    ///
    /// Unknown regions, crops and diseases degrade through fallbacks. A land area that is not
    /// a positive finite number, or so large that the revenue figures overflow, is rejected.
    pub fn calculate_risk_profile(
        &self,
        region: &str,
        crop: &str,
        disease_label: &str,
        land_area_acres: f64,
    ) -> Result<RiskProfile, AssessmentError> {
        if !land_area_acres.is_finite() || land_area_acres <= 0.0 {
            return Err(AssessmentError::InvalidLandArea {
                value: land_area_acres,
            });
        }

        let region = title_case(region);
        let crop = title_case(crop);

        let hectares = land_area_acres * HECTARES_PER_ACRE;
        let baseline = self.lookup.estimate(&region, &crop);
        let expected_production = baseline.value * hectares;

        let market_price = self.prices.price_per_quintal(&crop);
        let potential_revenue = expected_production * market_price;

        let loss_fraction = self.impact.loss_fraction(disease_label);
        let actual_revenue = potential_revenue * (1.0 - loss_fraction);
        let revenue_at_risk = potential_revenue - actual_revenue;

        let land_area_hectares = (hectares * 10_000.0).round() / 10_000.0;
        let potential_revenue = round2(potential_revenue);
        let projected_revenue = round2(actual_revenue);
        let revenue_at_risk = round2(revenue_at_risk);
        if [
            land_area_hectares,
            potential_revenue,
            projected_revenue,
            revenue_at_risk,
        ]
        .iter()
        .any(|value| !value.is_finite())
        {
            return Err(AssessmentError::LandAreaOutOfRange {
                value: land_area_acres,
            });
        }

        let credit_score = credit_score(loss_fraction);
        let disease = canonical_disease(disease_label);

        Ok(RiskProfile {
            region,
            crop,
            disease_detected: disease.to_string(),
            disease_display: display_label(disease_label.trim()),
            historical_yield_t_ha: round2(baseline.value),
            yield_source: baseline.source,
            land_area_hectares,
            loss_fraction,
            yield_loss_pct: format_loss_pct(loss_fraction),
            market_price_per_quintal: market_price,
            potential_revenue,
            projected_revenue,
            revenue_at_risk,
            credit_score,
            recommendation: recommendation_for(credit_score),
            treatment: treatment_for(disease).to_string(),
        })
    }
}

/// `100 - loss% * 1.2`, rounded half-to-even and clamped to `[20, 100]`.
pub fn credit_score(loss_fraction: f64) -> u8 {
    let raw = (100.0 - loss_fraction * 100.0 * LOSS_PENALTY_PER_POINT).round_ties_even();
    raw.clamp(f64::from(MIN_CREDIT_SCORE), f64::from(MAX_CREDIT_SCORE)) as u8
}

pub fn recommendation_for(credit_score: u8) -> Recommendation {
    if credit_score > APPROVAL_THRESHOLD {
        Recommendation::ApproveLoan
    } else {
        Recommendation::RejectOrRequireInsurance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::credit::YieldSource;
    use std::io::Cursor;

    fn engine() -> FinancialEngine {
        let csv = "State_Name,District_Name,Crop_Year,Season,Crop,Area,Production,Yield\n\
Maharashtra,Pune,2015,Kharif,Maize,1000,2500,2.5\n\
Maharashtra,Nashik,2015,Kharif,Maize,1000,3500,3.5\n\
Punjab,Ludhiana,2015,Rabi,Wheat,1000,4800,4.8\n\
Punjab,Amritsar,2015,Kharif,Rice,1000,4100,4.1\n";
        let dataset = YieldDatasetLoader::default()
            .parse_reader(Cursor::new(csv))
            .expect("fixture parses");
        FinancialEngine::new(
            dataset,
            DiseaseImpactTable::standard(),
            MarketPriceTable::standard(),
        )
    }

    #[test]
    fn northern_leaf_blight_scenario() {
        let profile = engine()
            .calculate_risk_profile("Maharashtra", "Maize", "Corn___Northern_Leaf_Blight", 5.0)
            .expect("profile builds");

        assert_eq!(profile.disease_detected, "Northern_Leaf_Blight");
        assert_eq!(profile.disease_display, "Corn - Northern Leaf Blight");
        assert_eq!(profile.loss_fraction, 0.35);
        assert_eq!(profile.yield_loss_pct, "35.0%");
        assert_eq!(profile.credit_score, 58);
        assert_eq!(
            profile.recommendation,
            Recommendation::RejectOrRequireInsurance
        );
        assert_eq!(profile.historical_yield_t_ha, 3.0);
        assert_eq!(profile.yield_source, YieldSource::Regional);
        assert_eq!(profile.land_area_hectares, 2.0234);

        let hectares = 5.0 * HECTARES_PER_ACRE;
        let potential = 3.0 * hectares * 2100.0;
        let actual = potential * (1.0 - 0.35);
        assert_eq!(profile.potential_revenue, round2(potential));
        assert_eq!(profile.projected_revenue, round2(actual));
        assert_eq!(profile.revenue_at_risk, round2(potential - actual));
    }

    #[test]
    fn healthy_crop_is_approved_with_full_score() {
        let profile = engine()
            .calculate_risk_profile("Punjab", "Wheat", "Healthy", 2.0)
            .expect("profile builds");

        assert_eq!(profile.credit_score, 100);
        assert!(profile.is_approved());
        assert_eq!(profile.revenue_at_risk, 0.0);
        assert_eq!(profile.projected_revenue, profile.potential_revenue);
        assert!(profile.treatment.starts_with("Crop is healthy"));
    }

    #[test]
    fn rejects_non_positive_land_area() {
        let engine = engine();
        for land in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = engine
                .calculate_risk_profile("Punjab", "Wheat", "Healthy", land)
                .expect_err("land area rejected");
            assert!(matches!(err, AssessmentError::InvalidLandArea { .. }));
        }
    }

    #[test]
    fn oversized_land_area_is_rejected_instead_of_overflowing() {
        let engine = engine();
        for land in [1e305, f64::MAX] {
            let err = engine
                .calculate_risk_profile("Punjab", "Rice", "Rice___Bacterial_spot", land)
                .expect_err("revenue would overflow");
            assert!(matches!(err, AssessmentError::LandAreaOutOfRange { .. }));
        }

        let profile = engine
            .calculate_risk_profile("Punjab", "Rice", "Rice___Bacterial_spot", 1e12)
            .expect("large but representable farm");
        assert!(profile.potential_revenue.is_finite());
        assert!(profile.revenue_at_risk.is_finite());
    }

    #[test]
    fn lower_case_inputs_are_normalized_before_pricing() {
        let profile = engine()
            .calculate_risk_profile("maharashtra", "maize", "Healthy", 1.0)
            .expect("profile builds");

        assert_eq!(profile.region, "Maharashtra");
        assert_eq!(profile.crop, "Maize");
        assert_eq!(profile.market_price_per_quintal, 2100.0);
        assert_eq!(profile.yield_source, YieldSource::Regional);
    }

    #[test]
    fn unknown_inputs_degrade_instead_of_failing() {
        let profile = engine()
            .calculate_risk_profile("Atlantis", "Quinoa", "Mystery_spots", 1.0)
            .expect("profile builds");

        assert_eq!(profile.historical_yield_t_ha, 5.0);
        assert_eq!(profile.yield_source, YieldSource::Default);
        assert_eq!(profile.market_price_per_quintal, 2000.0);
        assert_eq!(profile.loss_fraction, 0.10);
        assert_eq!(profile.credit_score, 88);
        assert!(profile.is_approved());
    }

    #[test]
    fn score_is_bounded_and_monotone() {
        let mut previous = MAX_CREDIT_SCORE;
        for step in 0..=100 {
            let loss = f64::from(step) / 100.0;
            let score = credit_score(loss);
            assert!((MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score));
            assert!(score <= previous, "score rose at loss {loss}");
            previous = score;
        }
        assert_eq!(credit_score(0.0), 100);
        assert_eq!(credit_score(0.6), 28);
        assert_eq!(credit_score(1.0), 20);
    }

    #[test]
    fn approval_threshold_is_exclusive() {
        assert_eq!(recommendation_for(71), Recommendation::ApproveLoan);
        assert_eq!(recommendation_for(70), Recommendation::RejectOrRequireInsurance);
    }

    #[test]
    fn identical_requests_produce_identical_profiles() {
        let engine = engine();
        let first = engine
            .calculate_risk_profile("Punjab", "Rice", "Rice___Leaf_scorch", 3.5)
            .expect("profile builds");
        let second = engine
            .calculate_risk_profile("Punjab", "Rice", "Rice___Leaf_scorch", 3.5)
            .expect("profile builds");
        assert_eq!(first, second);
    }
}
