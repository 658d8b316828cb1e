use super::tables::{read_json, TableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Price applied to crops missing from the table, per quintal.
pub const DEFAULT_PRICE_PER_QUINTAL: f64 = 2000.0;

/// Estimated market prices (INR per quintal) keyed by crop name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPriceTable {
    #[serde(default = "default_price")]
    default_price: f64,
    prices: BTreeMap<String, f64>,
}

fn default_price() -> f64 {
    DEFAULT_PRICE_PER_QUINTAL
}

impl MarketPriceTable {
    pub fn standard() -> Self {
        const PRICES: &[(&str, f64)] = &[
            ("Rice", 2200.0),
            ("Maize", 2100.0),
            ("Potato", 1500.0),
            ("Tomato", 3000.0),
            ("Wheat", 2300.0),
            ("Cotton", 6000.0),
        ];

        Self {
            default_price: DEFAULT_PRICE_PER_QUINTAL,
            prices: PRICES
                .iter()
                .map(|(crop, price)| (crop.to_string(), *price))
                .collect(),
        }
    }

    pub fn new(prices: BTreeMap<String, f64>, default_price: f64) -> Result<Self, TableError> {
        Self {
            default_price,
            prices,
        }
        .validated()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        read_json::<Self>(path.as_ref())?.validated()
    }

    fn validated(self) -> Result<Self, TableError> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if !valid(self.default_price) {
            return Err(TableError::InvalidPrice {
                crop: "<default>".to_string(),
                value: self.default_price,
            });
        }
        match self.prices.iter().find(|(_, price)| !valid(**price)) {
            Some((crop, price)) => Err(TableError::InvalidPrice {
                crop: crop.clone(),
                value: *price,
            }),
            None => Ok(self),
        }
    }

    pub fn price_per_quintal(&self, crop: &str) -> f64 {
        self.prices.get(crop).copied().unwrap_or(self.default_price)
    }

    pub fn default_price(&self) -> f64 {
        self.default_price
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.prices
    }
}

impl Default for MarketPriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_crops_use_table_price() {
        let table = MarketPriceTable::standard();
        assert_eq!(table.price_per_quintal("Maize"), 2100.0);
        assert_eq!(table.price_per_quintal("Cotton"), 6000.0);
    }

    #[test]
    fn unknown_crops_use_default_price() {
        let table = MarketPriceTable::standard();
        assert_eq!(table.price_per_quintal("Millet"), DEFAULT_PRICE_PER_QUINTAL);
    }

    #[test]
    fn rejects_negative_prices() {
        let mut prices = BTreeMap::new();
        prices.insert("Rice".to_string(), -5.0);
        assert!(matches!(
            MarketPriceTable::new(prices, 2000.0),
            Err(TableError::InvalidPrice { .. })
        ));
    }
}
