//! Router tests over the fixture provider.

use std::sync::Arc;

use approx::assert_relative_eq;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use intrinsic_fmp::FmpClient;
use intrinsic_macrotrends::MacrotrendsClient;
use intrinsic_server::{AppState, ServiceConfig, app, build_router};
use intrinsic_traits::{
    FixtureCompany, FixtureProvider, LineItem, PricePoint, StatementKind, StatementTable, Ticker,
};
use serde_json::Value;
use tower::ServiceExt;

fn acme() -> FixtureCompany {
    FixtureCompany {
        prices: vec![
            PricePoint::new("2024-01-02", 100.0),
            PricePoint::new("2024-01-03", 102.0),
            PricePoint::new("2024-01-04", 101.0),
        ],
        balance_sheet: StatementTable::new(StatementKind::BalanceSheet).with_period(
            "2024-12-31",
            [
                (LineItem::TotalDebt, Some(200.0)),
                (LineItem::CashAndCashEquivalents, Some(50.0)),
            ],
        ),
        income_statement: StatementTable::new(StatementKind::IncomeStatement).with_period(
            "2024-12-31",
            [
                (LineItem::InterestExpense, Some(10.0)),
                (LineItem::TaxProvision, Some(21.0)),
                (LineItem::PretaxIncome, Some(100.0)),
                (LineItem::DilutedEps, Some(3.25)),
            ],
        ),
        cash_flow: StatementTable::new(StatementKind::CashFlow)
            .with_period("2024-12-31", [(LineItem::FreeCashFlow, Some(30.0))])
            .with_period("2023-12-31", [(LineItem::FreeCashFlow, Some(20.0))])
            .with_period("2022-12-31", [(LineItem::FreeCashFlow, Some(10.0))]),
        market_cap: Some(800.0),
        shares_outstanding: Some(10.0),
        beta: Some(1.2),
        fcf_history: vec![121, 110, 100],
    }
}

/// ACME is complete; THIN reports no interest expense, no FCF row and a
/// single year of scraped history.
fn test_app() -> axum::Router {
    let thin = FixtureCompany {
        income_statement: StatementTable::new(StatementKind::IncomeStatement).with_period(
            "2024-12-31",
            [
                (LineItem::TaxProvision, Some(21.0)),
                (LineItem::PretaxIncome, Some(100.0)),
            ],
        ),
        cash_flow: StatementTable::new(StatementKind::CashFlow),
        fcf_history: vec![42],
        ..acme()
    };
    let provider = Arc::new(
        FixtureProvider::new()
            .with_company(Ticker::new("ACME").unwrap(), acme())
            .with_company(Ticker::new("THIN").unwrap(), thin)
            .with_treasury_yield(4.0),
    );
    build_router(AppState::new(provider.clone(), provider))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "intrinsic");
}

#[tokio::test]
async fn test_price() {
    let (status, json) = get("/price/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentprice"], 101.0);
}

#[tokio::test]
async fn test_price_unknown_ticker_is_404() {
    let (status, json) = get("/price/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().starts_with("Data not found"));
}

#[tokio::test]
async fn test_invalid_ticker_is_400() {
    let (status, _) = get("/capm/AC%20ME").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_historical_price_keeps_request_order() {
    let (status, json) = post(
        "/historicalPrice/acme",
        r#"{"dates": ["2024-01-04", "2024-01-06", "2024-01-02"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ticker"], "ACME");
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["date"], "2024-01-04");
    assert_eq!(points[1]["date"], "2024-01-02");
    assert_eq!(points[1]["price"], 100.0);
}

#[tokio::test]
async fn test_historical_price_no_match_is_404() {
    let (status, json) = post("/historicalPrice/acme", r#"{"dates": ["1999-01-01"]}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], "No price data found");
}

#[tokio::test]
async fn test_historical_price_bad_body_is_422() {
    let (status, _) = post("/historicalPrice/acme", r#"{"when": 1}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_past_fcf() {
    let (status, json) = get("/pastfcf/ACME").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pastfcf"], serde_json::json!([30.0, 20.0, 10.0]));

    let (status, _) = get("/pastfcf/THIN").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cagr() {
    let (status, json) = get("/cagr/ACME/acme?time_period=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cagr"], "0.066");
    assert_eq!(json["latest_fcf"], 121);

    let (status, _) = get("/cagr/ACME/acme?time_period=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get("/cagr/THIN/thin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().contains("Not enough data"));
}

#[tokio::test]
async fn test_capm_and_wacc() {
    let (status, json) = get("/capm/ACME").await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(json["capm"].as_f64().unwrap(), 0.106, epsilon = 1e-12);

    let (status, json) = get("/wacc/ACME/0.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(json["wacc"].as_f64().unwrap(), 0.088);
}

#[tokio::test]
async fn test_wacc_missing_field_is_400() {
    let (status, json) = get("/wacc/THIN/0.1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["detail"],
        "Data not found: InterestExpense not found in income statement"
    );
}

#[tokio::test]
async fn test_wacc_non_numeric_capm_is_422() {
    let (status, _) = get("/wacc/ACME/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_base_fcf_and_eps() {
    let (status, json) = get("/basefcf/ACME").await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(json["basefcf"].as_f64().unwrap(), 20.0);

    let (status, json) = get("/basefcf/THIN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("No data available"));

    let (status, json) = get("/eps/ACME").await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(json["eps"].as_f64().unwrap(), 3.25);
}

const DCF_BODY: &str = r#"{
    "base_fcf": 100.0,
    "growth_rate": 0.05,
    "perpetual_growth_rate": 0.02,
    "discount_rate": 0.08,
    "years": 5
}"#;

#[tokio::test]
async fn test_dcf() {
    let (status, json) = post("/dcf/ACME", DCF_BODY).await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(json["base_case"].as_f64().unwrap(), 178.65, epsilon = 1e-9);
    assert!(json.get("thirty_percent_margin_of_safety").is_none());

    let (status, json) = post("/dcf/ACME?margin_of_safety=true", DCF_BODY).await;
    assert_eq!(status, StatusCode::OK);
    let base = json["base_case"].as_f64().unwrap();
    assert_eq!(
        json["thirty_percent_margin_of_safety"].as_f64().unwrap(),
        base * 0.7
    );
}

#[tokio::test]
async fn test_dcf_rate_relationship_is_400() {
    let body = DCF_BODY.replace("\"perpetual_growth_rate\": 0.02", "\"perpetual_growth_rate\": 0.08");
    let (status, json) = post("/dcf/ACME", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().starts_with("Invalid rates"));
}

#[tokio::test]
async fn test_dcf_years_out_of_range_is_400() {
    let body = DCF_BODY.replace("\"years\": 5", "\"years\": 5000");
    let (status, json) = post("/dcf/ACME", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("years"));
}

#[tokio::test]
async fn test_dcf_long_horizon_is_a_number() {
    let body = r#"{"base_fcf": 100, "growth_rate": 0.2, "perpetual_growth_rate": 0.02,
                   "discount_rate": 0.1, "years": 100}"#;
    let (status, json) = post("/dcf/ACME", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["base_case"].as_f64().is_some_and(f64::is_finite));
}

/// Live clients pointed at a port nothing listens on.
fn unreachable_app() -> axum::Router {
    let fmp = FmpClient::new("SUPERSECRETKEY123").with_base_url("http://127.0.0.1:1");
    let macrotrends = MacrotrendsClient::new().with_base_url("http://127.0.0.1:1");
    build_router(AppState::new(Arc::new(fmp), Arc::new(macrotrends)))
}

#[tokio::test]
async fn test_transport_failure_does_not_leak_api_key() {
    let response = unreachable_app()
        .oneshot(Request::builder().uri("/price/TSLA").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Internal Error"), "{body}");
    assert!(!body.contains("SUPERSECRETKEY123"), "{body}");
    assert!(!body.contains("apikey"), "{body}");
}

#[tokio::test]
async fn test_cagr_name_must_be_slug() {
    let response = unreachable_app()
        .oneshot(
            Request::builder()
                .uri("/cagr/TSLA/tesla%3Fx=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_preflight() {
    let router = app(
        AppState::new(
            Arc::new(FixtureProvider::new()),
            Arc::new(FixtureProvider::new()),
        ),
        &ServiceConfig::default(),
    )
    .unwrap();

    let response = router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/price/ACME")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}
