use crate::infra::{cli_config, parse_land_area};
use agri_credit::error::AppError;
use agri_credit::workflows::credit::{EngineInitError, FinancialEngine, RiskProfile};
use agri_credit::workflows::yield_data::{YieldDataset, YieldDatasetLoader};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// State or province the farm is in
    #[arg(long)]
    pub(crate) region: String,
    /// Crop under cultivation
    #[arg(long)]
    pub(crate) crop: String,
    /// Disease label from the vision model, e.g. Corn___Northern_Leaf_Blight
    #[arg(long, default_value = "Healthy")]
    pub(crate) disease: String,
    /// Cultivated land in acres
    #[arg(long, value_parser = parse_land_area)]
    pub(crate) land_acres: f64,
    /// Override the directory holding the yield CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the profile as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DatasetArgs {
    /// Override the directory holding the yield CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        region,
        crop,
        disease,
        land_acres,
        data_dir,
        json,
    } = args;

    let config = cli_config(data_dir)?;
    let engine = FinancialEngine::from_config(&config.data)?;
    let profile = engine.calculate_risk_profile(&region, &crop, &disease, land_acres)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!(
            "{}",
            render_risk_profile(&profile, land_acres, Local::now().date_naive())
        );
    }

    Ok(())
}

pub(crate) fn run_dataset_summary(args: DatasetArgs) -> Result<(), AppError> {
    let config = cli_config(args.data_dir)?;
    let dataset = YieldDatasetLoader::default()
        .load_dir(&config.data.data_dir)
        .map_err(EngineInitError::from)?;
    print!("{}", render_dataset_summary(&dataset));
    Ok(())
}

fn render_risk_profile(profile: &RiskProfile, land_acres: f64, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Risk profile: {} (assessed {})\n",
        profile.recommendation, today
    ));
    out.push_str(&format!(
        "Farm: {} {} on {} acres ({} ha)\n",
        profile.region, profile.crop, land_acres, profile.land_area_hectares
    ));

    out.push_str("\nKey metrics\n");
    out.push_str(&format!("- Credit score: {}\n", profile.credit_score));
    out.push_str(&format!("- Yield loss risk: {}\n", profile.yield_loss_pct));
    out.push_str(&format!(
        "- Projected revenue: INR {:.2}\n",
        profile.projected_revenue
    ));
    out.push_str(&format!(
        "- Revenue at risk: INR {:.2}\n",
        profile.revenue_at_risk
    ));

    out.push_str("\nDetails\n");
    out.push_str(&format!(
        "- Condition: {} ({})\n",
        profile.disease_display, profile.disease_detected
    ));
    out.push_str(&format!(
        "- Historical yield: {} t/ha ({:?} baseline)\n",
        profile.historical_yield_t_ha, profile.yield_source
    ));
    out.push_str(&format!(
        "- Market price: INR {:.2} per quintal\n",
        profile.market_price_per_quintal
    ));
    out.push_str(&format!("- Treatment: {}\n", profile.treatment));

    if !profile.is_approved() {
        out.push_str("\nHigh risk detected. Mandatory crop insurance recommended.\n");
    }
    out
}

fn render_dataset_summary(dataset: &YieldDataset) -> String {
    let mut out = String::new();
    match dataset.source() {
        Some(path) => out.push_str(&format!("Yield dataset: {}\n", path.display())),
        None => out.push_str("Yield dataset: <in memory>\n"),
    }
    out.push_str(&format!(
        "Rows: {} loaded, {} skipped\n",
        dataset.records().len(),
        dataset.skipped_rows()
    ));
    out.push_str(&format!("Columns: {}\n", dataset.columns().join(", ")));

    out.push_str("\nColumn mapping\n");
    for column in dataset.schema().columns() {
        out.push_str(&format!(
            "- {} <- {} (column {})\n",
            column.role,
            column.header,
            column.index + 1
        ));
    }

    if !dataset.schema().ambiguities().is_empty() {
        out.push_str("\nIgnored candidates\n");
        for ambiguity in dataset.schema().ambiguities() {
            out.push_str(&format!(
                "- {}: kept {}, ignored {}\n",
                ambiguity.role, ambiguity.chosen, ambiguity.ignored
            ));
        }
    }
    out
}
