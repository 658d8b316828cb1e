use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::engine::FinancialEngine;
use super::impact::DiseaseImpactTable;
use super::pricing::MarketPriceTable;

/// Scoring request as submitted by a loan officer's console.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskAssessmentRequest {
    pub region: String,
    pub crop: String,
    #[serde(default = "healthy_label")]
    pub disease: String,
    pub land_area_acres: f64,
}

fn healthy_label() -> String {
    "Healthy".to_string()
}

#[derive(Debug, Serialize)]
struct TablesView<'a> {
    disease_impact: &'a DiseaseImpactTable,
    market_prices: &'a MarketPriceTable,
}

/// Router builder exposing risk scoring over HTTP.
pub fn credit_router(engine: Arc<FinancialEngine>) -> Router {
    Router::new()
        .route("/api/v1/credit/risk-profile", post(risk_profile_handler))
        .route("/api/v1/credit/tables", get(tables_handler))
        .with_state(engine)
}

pub(crate) async fn risk_profile_handler(
    State(engine): State<Arc<FinancialEngine>>,
    axum::Json(request): axum::Json<RiskAssessmentRequest>,
) -> Response {
    match engine.calculate_risk_profile(
        &request.region,
        &request.crop,
        &request.disease,
        request.land_area_acres,
    ) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn tables_handler(State(engine): State<Arc<FinancialEngine>>) -> Response {
    let view = TablesView {
        disease_impact: engine.impact_table(),
        market_prices: engine.price_table(),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}
