use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use bestrate_common::Currency;
use bestrate_fx::ConversionRequest;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Raw query string of `/best-conversion`. Every field is validated by hand so
/// that all rejections share one response shape.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionQuery {
    #[serde(alias = "origin_crypto")]
    pub origin_currency: Option<String>,
    #[serde(alias = "destination_crypto")]
    pub destination_currency: Option<String>,
    pub amount: Option<String>,
}

// Field names are the public wire contract of this endpoint.
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "moneda_destino")]
    pub destination: Currency,
    #[serde(rename = "moneda_intermediaria")]
    pub intermediary: Option<Currency>,
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/best-conversion", get(best_conversion))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn best_conversion(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConversionQuery>, QueryRejection>,
) -> ApiResult<Json<ConversionResponse>> {
    let Query(query) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let request = parse_request(query, &state)?;
    let resolution = state.engine.best_conversion(&request).await?;

    let Some(amount) = resolution.amount() else {
        return Err(ApiError::NoPath {
            origin: request.origin,
            destination: request.destination,
        });
    };

    Ok(Json(ConversionResponse {
        amount,
        intermediary: resolution.intermediary().cloned(),
        destination: request.destination,
    }))
}

async fn healthz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "strategy": state.engine.strategy(),
    }))
}

fn parse_request(query: ConversionQuery, state: &AppState) -> ApiResult<ConversionRequest> {
    let origin = supported_currency(query.origin_currency, "origin_currency", state)?;
    let destination = supported_currency(query.destination_currency, "destination_currency", state)?;
    if origin == destination {
        return Err(ApiError::Validation(
            "origin_currency and destination_currency must differ".to_string(),
        ));
    }

    let raw = query
        .amount
        .ok_or_else(|| ApiError::Validation("amount is required".to_string()))?;
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation(format!("amount must be a number, got '{}'", raw)))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation(format!(
            "amount must be greater than 0, got '{}'",
            raw
        )));
    }

    Ok(ConversionRequest::new(origin, destination, amount))
}

fn supported_currency(
    value: Option<String>,
    field: &str,
    state: &AppState,
) -> ApiResult<Currency> {
    let code = value.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))?;
    let currency = Currency::new(code);
    if state.is_supported(&currency) {
        return Ok(currency);
    }

    let allowed: Vec<&str> = state.supported_currencies.iter().map(Currency::code).collect();
    Err(ApiError::Validation(format!(
        "{} must be one of {}, got '{}'",
        field,
        allowed.join(", "),
        currency
    )))
}
