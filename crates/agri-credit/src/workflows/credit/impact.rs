use super::tables::{read_json, TableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Loss assumed for a disease the table does not know.
pub const DEFAULT_LOSS_FRACTION: f64 = 0.10;

const LABEL_SEPARATOR: &str = "___";

/// Agronomic yield-loss estimates keyed by canonical disease identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseImpactTable {
    #[serde(default = "default_loss")]
    default_loss: f64,
    losses: BTreeMap<String, f64>,
}

fn default_loss() -> f64 {
    DEFAULT_LOSS_FRACTION
}

impl DiseaseImpactTable {
    pub fn standard() -> Self {
        const LOSSES: &[(&str, f64)] = &[
            ("Healthy", 0.0),
            ("Early_blight", 0.20),
            ("Late_blight", 0.40),
            ("Leaf_mold", 0.15),
            ("Septoria_leaf_spot", 0.15),
            ("Spider_mites", 0.10),
            ("Target_Spot", 0.25),
            ("Mosaic_virus", 0.50),
            ("Yellow_Leaf_Curl_Virus", 0.60),
            ("Bacterial_spot", 0.30),
            ("Common_rust", 0.25),
            ("Northern_Leaf_Blight", 0.35),
            ("Black_rot", 0.30),
            ("Esca_(Black_Measles)", 0.40),
            ("Leaf_scorch", 0.20),
        ];

        Self {
            default_loss: DEFAULT_LOSS_FRACTION,
            losses: LOSSES
                .iter()
                .map(|(disease, loss)| (disease.to_string(), *loss))
                .collect(),
        }
    }

    pub fn new(losses: BTreeMap<String, f64>, default_loss: f64) -> Result<Self, TableError> {
        Self {
            default_loss,
            losses,
        }
        .validated()
    }

    /// Read a replacement table such as `{"default_loss": 0.1, "losses": {"Late_blight": 0.4}}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        read_json::<Self>(path.as_ref())?.validated()
    }

    fn validated(self) -> Result<Self, TableError> {
        let in_range = |value: f64| (0.0..=1.0).contains(&value);
        if !in_range(self.default_loss) {
            return Err(TableError::InvalidLoss {
                disease: "<default>".to_string(),
                value: self.default_loss,
            });
        }
        if let Some((disease, value)) = self.losses.iter().find(|(_, value)| !in_range(**value)) {
            return Err(TableError::InvalidLoss {
                disease: disease.clone(),
                value: *value,
            });
        }
        Ok(self)
    }

    /// Fractional yield loss for a classifier label such as `Corn___Northern_Leaf_Blight`.
    ///
    /// Anything naming "healthy" carries no loss; identifiers missing from the table fall
    /// back to the default loss.
    pub fn loss_fraction(&self, disease_label: &str) -> f64 {
        let disease = canonical_disease(disease_label);
        if disease.to_lowercase().contains("healthy") {
            return 0.0;
        }
        self.losses
            .get(disease)
            .copied()
            .unwrap_or(self.default_loss)
    }

    pub fn default_loss(&self) -> f64 {
        self.default_loss
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.losses
    }
}

impl Default for DiseaseImpactTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Disease identifier after the last `___` of a compound label, or the whole label.
pub fn canonical_disease(disease_label: &str) -> &str {
    disease_label
        .rsplit(LABEL_SEPARATOR)
        .next()
        .unwrap_or(disease_label)
        .trim()
}
