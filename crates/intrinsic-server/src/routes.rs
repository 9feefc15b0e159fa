//! HTTP API routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::IntoResponse,
    routing::{get, post},
};
use intrinsic_engine::DEFAULT_TIME_PERIOD;
use intrinsic_traits::{DcfParameters, DcfValuation, PricePoint, Ticker};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ApiError, LookupStatus},
    state::AppState,
};

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Prices and history
        .route("/price/:ticker", get(price))
        .route("/historicalPrice/:ticker", post(historical_price))
        .route("/pastfcf/:ticker", get(past_fcf))
        .route("/cagr/:ticker/:name", get(cagr))
        // Cost of capital
        .route("/capm/:ticker", get(capm))
        .route("/wacc/:ticker/:capm", get(wacc))
        // Valuation
        .route("/basefcf/:ticker", get(base_fcf))
        .route("/eps/:ticker", get(eps))
        .route("/dcf/:ticker", post(dcf))
        .with_state(state)
}

fn parse_ticker(raw: &str, lookup: LookupStatus) -> Result<Ticker, ApiError> {
    Ticker::new(raw).map_err(|e| ApiError::from_valuation(&e, lookup))
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "intrinsic",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ Prices ============

/// `GET /price/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    /// Latest close.
    pub currentprice: f64,
}

async fn price(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<PriceResponse> {
    let Path(raw) = path?;
    let lookup = LookupStatus::NotFound;
    let ticker = parse_ticker(&raw, lookup)?;
    let currentprice = state
        .valuator
        .price(&ticker)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    info!(ticker = %ticker, currentprice, "price");
    Ok(Json(PriceResponse { currentprice }))
}

/// `POST /historicalPrice/{ticker}` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRequest {
    /// Calendar dates, `YYYY-MM-DD`.
    pub dates: Vec<String>,
}

/// `POST /historicalPrice/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceSeriesResponse {
    /// Upper-cased ticker.
    pub ticker: String,
    /// Matched closes in request order.
    pub points: Vec<PricePoint>,
}

async fn historical_price(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<PriceRequest>, JsonRejection>,
) -> ApiResult<PriceSeriesResponse> {
    let Path(raw) = path?;
    let Json(request) = body?;
    let lookup = LookupStatus::NotFound;
    let ticker = parse_ticker(&raw, lookup)?;

    let points = state
        .valuator
        .historical_prices(&ticker, &request.dates)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    if points.is_empty() {
        return Err(ApiError::not_found("No price data found"));
    }

    info!(ticker = %ticker, points = points.len(), "historical prices");
    Ok(Json(PriceSeriesResponse {
        ticker: ticker.to_string(),
        points,
    }))
}

/// `GET /pastfcf/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PastFcfResponse {
    /// Free cash flow, most recent first.
    pub pastfcf: Vec<f64>,
}

async fn past_fcf(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<PastFcfResponse> {
    let Path(raw) = path?;
    let lookup = LookupStatus::NotFound;
    let ticker = parse_ticker(&raw, lookup)?;
    let pastfcf = state
        .valuator
        .past_fcf(&ticker)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    Ok(Json(PastFcfResponse { pastfcf }))
}

/// `GET /cagr/{ticker}/{name}` query.
#[derive(Debug, Deserialize)]
pub struct CagrQuery {
    /// Number of most recent years to span.
    #[serde(default = "default_time_period")]
    pub time_period: usize,
}

const fn default_time_period() -> usize {
    DEFAULT_TIME_PERIOD
}

/// `GET /cagr/{ticker}/{name}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CagrResponse {
    /// Growth rate with 3 decimals.
    pub cagr: String,
    /// Most recent free cash flow of the series.
    pub latest_fcf: i64,
}

async fn cagr(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<CagrQuery>, QueryRejection>,
) -> ApiResult<CagrResponse> {
    let Path((raw, name)) = path?;
    let Query(query) = query?;
    let lookup = LookupStatus::NotFound;
    let ticker = parse_ticker(&raw, lookup)?;

    let result = state
        .valuator
        .cagr(&ticker, &name, query.time_period)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    info!(ticker = %ticker, cagr = result.cagr, "cagr");
    Ok(Json(CagrResponse {
        cagr: result.formatted(),
        latest_fcf: result.latest_fcf,
    }))
}

// ============ Cost of Capital ============

/// `GET /capm/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CapmResponse {
    /// Expected return on equity.
    pub capm: f64,
}

async fn capm(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<CapmResponse> {
    let Path(raw) = path?;
    let lookup = LookupStatus::BadRequest;
    let ticker = parse_ticker(&raw, lookup)?;
    let capm = state
        .valuator
        .capm(&ticker)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    info!(ticker = %ticker, capm, "capm");
    Ok(Json(CapmResponse { capm }))
}

/// `GET /wacc/{ticker}/{capm}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct WaccResponse {
    /// Weighted average cost of capital.
    pub wacc: f64,
}

async fn wacc(
    State(state): State<AppState>,
    path: Result<Path<(String, f64)>, PathRejection>,
) -> ApiResult<WaccResponse> {
    let Path((raw, capm)) = path?;
    let lookup = LookupStatus::BadRequest;
    let ticker = parse_ticker(&raw, lookup)?;
    let wacc = state
        .valuator
        .wacc(&ticker, capm)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    info!(ticker = %ticker, wacc, "wacc");
    Ok(Json(WaccResponse { wacc }))
}

// ============ Valuation ============

/// `GET /basefcf/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseFcfResponse {
    /// Starting free cash flow.
    pub basefcf: f64,
}

async fn base_fcf(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<BaseFcfResponse> {
    let Path(raw) = path?;
    let lookup = LookupStatus::BadRequest;
    let ticker = parse_ticker(&raw, lookup)?;
    let basefcf = state
        .valuator
        .base_fcf(&ticker)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    Ok(Json(BaseFcfResponse { basefcf }))
}

/// `GET /eps/{ticker}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct EpsResponse {
    /// Diluted earnings per share.
    pub eps: f64,
}

async fn eps(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<EpsResponse> {
    let Path(raw) = path?;
    let lookup = LookupStatus::BadRequest;
    let ticker = parse_ticker(&raw, lookup)?;
    let eps = state
        .valuator
        .eps(&ticker)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    Ok(Json(EpsResponse { eps }))
}

/// `POST /dcf/{ticker}` query.
#[derive(Debug, Default, Deserialize)]
pub struct DcfQuery {
    /// Include the 30% margin-of-safety value.
    #[serde(default)]
    pub margin_of_safety: bool,
}

async fn dcf(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<DcfQuery>, QueryRejection>,
    body: Result<Json<DcfParameters>, JsonRejection>,
) -> ApiResult<DcfValuation> {
    let Path(raw) = path?;
    let Query(query) = query?;
    let Json(params) = body?;
    let lookup = LookupStatus::BadRequest;
    let ticker = parse_ticker(&raw, lookup)?;

    let valuation = state
        .valuator
        .dcf(&ticker, &params, query.margin_of_safety)
        .await
        .map_err(|e| ApiError::from_valuation(&e, lookup))?;
    info!(ticker = %ticker, base_case = valuation.base_case, "dcf");
    Ok(Json(valuation))
}
