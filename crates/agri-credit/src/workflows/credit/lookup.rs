use crate::workflows::yield_data::{contains_ignore_case, title_case, YieldDataset, YieldRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Yield returned for a crop no tier could place, in tons per hectare.
pub const DEFAULT_YIELD_T_HA: f64 = 5.0;

/// Normalized region/crop pair used by every fallback tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldQuery {
    pub region: String,
    pub crop: String,
}

impl YieldQuery {
    pub fn new(region: &str, crop: &str) -> Self {
        Self {
            region: title_case(region),
            crop: title_case(crop),
        }
    }

    fn matches_crop(&self, record: &YieldRecord) -> bool {
        !record.crop.is_empty() && contains_ignore_case(&record.crop, &self.crop)
    }

    fn matches_region(&self, record: &YieldRecord) -> bool {
        !record.region.is_empty() && contains_ignore_case(&record.region, &self.region)
    }
}

/// Which tier produced a yield baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldSource {
    Regional,
    National,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldEstimate {
    pub value: f64,
    pub source: YieldSource,
}

/// One step of the yield fallback chain.
pub trait YieldFallback: Send + Sync {
    fn source(&self) -> YieldSource;

    fn estimate(&self, query: &YieldQuery, dataset: &YieldDataset) -> Option<f64>;
}

/// Mean over rows matching both region and crop.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionalAverage;

impl YieldFallback for RegionalAverage {
    fn source(&self) -> YieldSource {
        YieldSource::Regional
    }

    fn estimate(&self, query: &YieldQuery, dataset: &YieldDataset) -> Option<f64> {
        mean(
            dataset
                .records()
                .iter()
                .filter(|record| query.matches_region(record) && query.matches_crop(record)),
        )
    }
}

/// Mean over every row for the crop, ignoring region.
#[derive(Debug, Clone, Copy, Default)]
pub struct NationalAverage;

impl YieldFallback for NationalAverage {
    fn source(&self) -> YieldSource {
        YieldSource::National
    }

    fn estimate(&self, query: &YieldQuery, dataset: &YieldDataset) -> Option<f64> {
        mean(
            dataset
                .records()
                .iter()
                .filter(|record| query.matches_crop(record)),
        )
    }
}

/// Agronomic rule-of-thumb yields for crops absent from the data.
#[derive(Debug, Clone)]
pub struct CropDefault {
    defaults: BTreeMap<String, f64>,
    fallback: f64,
}

impl CropDefault {
    pub fn standard() -> Self {
        let defaults = [("Rice", 4.0), ("Wheat", 3.5), ("Maize", 3.0)]
            .into_iter()
            .map(|(crop, value)| (crop.to_string(), value))
            .collect();
        Self::new(defaults, DEFAULT_YIELD_T_HA)
    }

    pub fn new(defaults: BTreeMap<String, f64>, fallback: f64) -> Self {
        Self { defaults, fallback }
    }
}

impl YieldFallback for CropDefault {
    fn source(&self) -> YieldSource {
        YieldSource::Default
    }

    fn estimate(&self, query: &YieldQuery, _dataset: &YieldDataset) -> Option<f64> {
        Some(
            self.defaults
                .get(&query.crop)
                .copied()
                .unwrap_or(self.fallback),
        )
    }
}

fn mean<'a>(records: impl Iterator<Item = &'a YieldRecord>) -> Option<f64> {
    let (sum, count) = records.fold((0.0, 0usize), |(sum, count), record| {
        (sum + record.yield_value, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// Best-effort historical yield over a loaded dataset, walking an ordered fallback chain.
pub struct YieldLookupService {
    dataset: YieldDataset,
    chain: Vec<Box<dyn YieldFallback>>,
}

impl YieldLookupService {
    /// Regional mean, then national mean, then the crop default table.
    pub fn new(dataset: YieldDataset) -> Self {
        Self::with_chain(
            dataset,
            vec![
                Box::new(RegionalAverage),
                Box::new(NationalAverage),
                Box::new(CropDefault::standard()),
            ],
        )
    }

    pub fn with_chain(dataset: YieldDataset, chain: Vec<Box<dyn YieldFallback>>) -> Self {
        Self { dataset, chain }
    }

    pub fn dataset(&self) -> &YieldDataset {
        &self.dataset
    }

    pub fn estimate(&self, region: &str, crop: &str) -> YieldEstimate {
        let query = YieldQuery::new(region, crop);
        for tier in &self.chain {
            if let Some(value) = tier.estimate(&query, &self.dataset) {
                debug!(region = %query.region, crop = %query.crop, source = ?tier.source(), value, "yield baseline resolved");
                return YieldEstimate {
                    value,
                    source: tier.source(),
                };
            }
        }

        YieldEstimate {
            value: DEFAULT_YIELD_T_HA,
            source: YieldSource::Default,
        }
    }

    /// Historical average yield in tons per hectare. Never fails.
    pub fn historical_yield(&self, region: &str, crop: &str) -> f64 {
        self.estimate(region, crop).value
    }
}

impl std::fmt::Debug for YieldLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YieldLookupService")
            .field("rows", &self.dataset.records().len())
            .field(
                "chain",
                &self.chain.iter().map(|tier| tier.source()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::yield_data::YieldDatasetLoader;
    use std::io::Cursor;

    fn dataset() -> YieldDataset {
        let csv = "State_Name,Crop,Yield\n\
Maharashtra,Maize,2.0\n\
Maharashtra,Maize,3.0\n\
Punjab,Maize,4.0\n\
Punjab,Wheat,5.0\n\
Karnataka,Rice,,\n";
        YieldDatasetLoader::default()
            .parse_reader(Cursor::new(csv))
            .expect("fixture parses")
    }

    #[test]
    fn regional_rows_are_averaged_first() {
        let service = YieldLookupService::new(dataset());
        let estimate = service.estimate(" maharashtra ", "MAIZE");
        assert_eq!(estimate.value, 2.5);
        assert_eq!(estimate.source, YieldSource::Regional);
    }

    #[test]
    fn missing_region_falls_back_to_national_mean() {
        let service = YieldLookupService::new(dataset());
        let estimate = service.estimate("Kerala", "Maize");
        assert_eq!(estimate.value, 3.0);
        assert_eq!(estimate.source, YieldSource::National);
    }

    #[test]
    fn region_without_the_crop_uses_national_mean() {
        let service = YieldLookupService::new(dataset());
        assert_eq!(service.historical_yield("Maharashtra", "Wheat"), 5.0);
    }

    #[test]
    fn unknown_crops_use_the_default_table() {
        let service = YieldLookupService::new(dataset());
        // rice rows carried no numeric yield, so the crop is absent
        let rice = service.estimate("Karnataka", "Rice");
        assert_eq!(rice.value, 4.0);
        assert_eq!(rice.source, YieldSource::Default);
        assert_eq!(service.historical_yield("Nowhere", "Dragonfruit"), 5.0);
    }

    #[test]
    fn region_matching_is_substring_based() {
        let service = YieldLookupService::new(dataset());
        let estimate = service.estimate("Punj", "Maize");
        assert_eq!(estimate.value, 4.0);
        assert_eq!(estimate.source, YieldSource::Regional);
    }

    #[test]
    fn empty_chain_still_answers() {
        let service = YieldLookupService::with_chain(dataset(), Vec::new());
        let estimate = service.estimate("Punjab", "Wheat");
        assert_eq!(estimate.value, DEFAULT_YIELD_T_HA);
        assert_eq!(estimate.source, YieldSource::Default);
    }

    #[test]
    fn tiers_are_independently_testable() {
        let data = dataset();
        let query = YieldQuery::new("Kerala", "Maize");
        assert_eq!(RegionalAverage.estimate(&query, &data), None);
        assert_eq!(NationalAverage.estimate(&query, &data), Some(3.0));
        assert_eq!(CropDefault::standard().estimate(&query, &data), Some(3.0));
    }
}
