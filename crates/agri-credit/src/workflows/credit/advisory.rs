const TREATMENTS: &[(&str, &str)] = &[
    (
        "blight",
        "Apply fungicides containing mancozeb or chlorothalonil. Improve air circulation.",
    ),
    (
        "mildew",
        "Use sulfur-based sprays or neem oil. Remove infected leaves immediately.",
    ),
    (
        "rust",
        "Apply copper-based fungicides. Rotate crops to prevent recurrence.",
    ),
    (
        "spot",
        "Avoid overhead watering. Use copper soap or certified organic fungicides.",
    ),
    (
        "mite",
        "Spray water to knock them off. Introduce predatory mites or use neem oil.",
    ),
    (
        "healthy",
        "Crop is healthy! Continue standard irrigation and monitoring.",
    ),
];

pub const DEFAULT_TREATMENT: &str = "Consult a local agronomist for specific chemical controls.";

/// Field guidance for a disease identifier, matched by keyword in table order.
pub fn treatment_for(disease: &str) -> &'static str {
    let disease = disease.to_lowercase();
    TREATMENTS
        .iter()
        .find(|(keyword, _)| disease.contains(keyword))
        .map(|(_, advice)| *advice)
        .unwrap_or(DEFAULT_TREATMENT)
}

/// Human-readable form of a classifier label: `Tomato___Early_blight` -> `Tomato - Early blight`.
pub fn display_label(label: &str) -> String {
    label.replace("___", " - ").replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(treatment_for("Northern_Leaf_Blight").contains("mancozeb"));
        assert!(treatment_for("Common_rust").contains("copper-based"));
        assert!(treatment_for("Spider_mites Two-spotted_spider_mite").contains("copper soap"));
        assert!(treatment_for("healthy").starts_with("Crop is healthy"));
    }

    #[test]
    fn unknown_diseases_get_default_guidance() {
        assert_eq!(treatment_for("Mosaic_virus"), DEFAULT_TREATMENT);
    }

    #[test]
    fn display_label_expands_separators() {
        assert_eq!(display_label("Tomato___Early_blight"), "Tomato - Early blight");
        assert_eq!(display_label("Healthy"), "Healthy");
    }
}
