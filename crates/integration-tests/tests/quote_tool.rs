//! Integration tests for the DTF quote tool endpoint.
//!
//! Drives `POST /app/dtf-tool` through the full router: shop extraction,
//! form parsing with defaults, the pricing engine, and the JSON contract.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use dtf_reseller_admin::routes;
use dtf_reseller_admin::state::AppState;
use dtf_reseller_integration_tests::{SHOP_HEADER, TEST_SHOP, test_config};

fn app() -> axum::Router {
    routes::app(AppState::new(test_config("http://127.0.0.1:1")))
}

async fn post_form(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/app/dtf-tool")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(SHOP_HEADER, TEST_SHOP)
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn test_calculate_worked_example() {
    let (status, json) = post_form(
        app(),
        "intent=calculate&width=10&height=8&quantity=50&productCost=2.86&pressCost=1.75&markup=50",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["type"], "calculate");

    let results = &json["results"];
    assert_eq!(results["area"], "80.00");
    assert_eq!(results["totalArea"], "4000.00");
    assert_eq!(results["imprintCost"], "2000.00");
    assert_eq!(results["totalProductCost"], "143.00");
    assert_eq!(results["totalPressCost"], "87.50");
    assert_eq!(results["totalCost"], "2230.50");
    assert_eq!(results["unitCost"], "44.61");
    assert_eq!(results["retailUnit"], "66.92");
    assert_eq!(results["retailTotal"], "3345.75");
    assert_eq!(results["totalProfit"], "1115.25");
}

#[tokio::test]
async fn test_calculate_applies_cost_defaults() {
    // productCost, pressCost, and markup omitted: 2.86 / 1.75 / 50
    let (status, json) =
        post_form(app(), "intent=calculate&width=10&height=8&quantity=50").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"]["totalCost"], "2230.50");
    assert_eq!(json["results"]["retailUnit"], "66.92");
}

#[tokio::test]
async fn test_calculate_rejects_missing_dimensions() {
    // Absent width defaults to zero and fails validation
    let (status, json) = post_form(app(), "intent=calculate&height=8&quantity=50").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "calculate");
    assert!(json["error"].as_str().expect("error message").contains("width"));
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_calculate_rejects_zero_quantity() {
    let (_, json) = post_form(app(), "intent=calculate&width=10&height=8&quantity=0").await;

    assert_eq!(json["type"], "calculate");
    assert!(json["error"].as_str().expect("error message").contains("quantity"));
}

#[tokio::test]
async fn test_calculate_rejects_non_numeric_input() {
    let (_, json) =
        post_form(app(), "intent=calculate&width=abc&height=8&quantity=50").await;

    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_calculate_rejects_oversized_dimensions() {
    // Large enough that the area computation would overflow Decimal;
    // the contract is an error payload, never a dropped connection
    let big = "70000000000000000000000000000";
    let (status, json) = post_form(
        app(),
        &format!("intent=calculate&width={big}&height={big}&quantity=50"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "calculate");
    assert!(
        json["error"]
            .as_str()
            .expect("error message")
            .contains("too large")
    );
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_calculate_rejects_non_numeric_cost() {
    // Decimal does not accept exponent notation; the field is present,
    // so it must error rather than fall back to the 2.86 default
    let (_, json) = post_form(
        app(),
        "intent=calculate&width=10&height=8&quantity=50&productCost=1e2",
    )
    .await;

    assert_eq!(json["type"], "calculate");
    assert!(
        json["error"]
            .as_str()
            .expect("error message")
            .contains("product cost")
    );
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_calculate_is_deterministic() {
    let body = "intent=calculate&width=3.5&height=4.25&quantity=12&markup=35";
    let (_, first) = post_form(app(), body).await;
    let (_, second) = post_form(app(), body).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_intent() {
    let (status, json) = post_form(app(), "intent=frobnicate").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "Invalid action");
}

#[tokio::test]
async fn test_missing_shop_header_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/app/dtf-tool")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("intent=calculate&width=10&height=8&quantity=50"))
        .expect("request");

    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_quote_requires_connected_dropbox() {
    let (status, json) = post_form(
        app(),
        "intent=save_quote&quoteName=Test&quoteData=%7B%22totalCost%22%3A%222230.50%22%7D",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "save_quote");
    assert!(
        json["error"]
            .as_str()
            .expect("error message")
            .contains("Connect Dropbox")
    );
}

#[tokio::test]
async fn test_save_quote_rejects_bad_quote_data() {
    let (_, json) = post_form(app(), "intent=save_quote&quoteData=not-json").await;

    assert_eq!(json["type"], "save_quote");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");

    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
