use agri_credit::config::{AppConfig, DataConfig};
use agri_credit::error::AppError;
use agri_credit::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Configuration for one-shot CLI commands. Starts telemetry the same way `serve` does and
/// lets the CLI directory take precedence over the environment.
pub(crate) fn cli_config(data_dir: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    config.data = with_data_dir(config.data, data_dir);
    Ok(config)
}

fn with_data_dir(mut data: DataConfig, data_dir: Option<PathBuf>) -> DataConfig {
    if let Some(dir) = data_dir {
        data.data_dir = dir;
    }
    data
}

pub(crate) fn parse_land_area(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as acres ({err})"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("land area must be positive, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_data_dir_overrides_the_environment() {
        let data = DataConfig {
            disease_impact_path: Some(PathBuf::from("impact.json")),
            ..DataConfig::default()
        };

        let overridden = with_data_dir(data.clone(), Some(PathBuf::from("/srv/yields")));
        assert_eq!(overridden.data_dir, PathBuf::from("/srv/yields"));
        assert_eq!(
            overridden.disease_impact_path,
            Some(PathBuf::from("impact.json"))
        );

        let untouched = with_data_dir(data.clone(), None);
        assert_eq!(untouched.data_dir, data.data_dir);
    }

    #[test]
    fn land_area_parser_accepts_positive_acres() {
        assert_eq!(parse_land_area(" 5 "), Ok(5.0));
        assert_eq!(parse_land_area("2.5"), Ok(2.5));
    }

    #[test]
    fn land_area_parser_rejects_bad_values() {
        assert!(parse_land_area("0").is_err());
        assert!(parse_land_area("-1").is_err());
        assert!(parse_land_area("five").is_err());
        assert!(parse_land_area("inf").is_err());
    }
}
