//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use api::routes::tickets::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{
    FallbackState, InMemoryExchangeRates, InMemoryFlightCatalog, InMemoryLoyaltyProgram,
    PurchaseCoordinator, ServiceError,
};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    catalog: InMemoryFlightCatalog,
    exchange: InMemoryExchangeRates,
    loyalty: InMemoryLoyaltyProgram,
}

fn setup() -> TestApp {
    let catalog = InMemoryFlightCatalog::new();
    let exchange = InMemoryExchangeRates::new(5.5);
    let loyalty = InMemoryLoyaltyProgram::new();

    let coordinator = PurchaseCoordinator::new(
        catalog.clone(),
        exchange.clone(),
        loyalty.clone(),
        Arc::new(FallbackState::new()),
    );
    let state = Arc::new(AppState { coordinator });
    let router = api::create_app(state, get_metrics_handle());

    TestApp {
        router,
        catalog,
        exchange,
        loyalty,
    }
}

fn buy_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/buyTicket")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"status": "healthy", "service": "IMDTravel"})
    );
}

#[tokio::test]
async fn test_buy_ticket_success() {
    let app = setup();

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "2025-01-15",
            "user": "test_user"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["transaction_id"], "TX-0001");
    assert_eq!(json["value_in_dollars"], 450.0);
    assert_eq!(json["value_in_reais"], 2475.0);
    assert_eq!(json["bonus_credited"], 450);
    assert_eq!(app.loyalty.balance("test_user"), 450);
}

#[tokio::test]
async fn test_invalid_day_is_bad_request() {
    let app = setup();

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "15/01/2025",
            "user": "test_user"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(app.catalog.lookup_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup();

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({"flight": "AA100"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert!(json["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_exchange_failure_is_bad_gateway() {
    let app = setup();
    app.exchange
        .set_fail_on_rate(Some(ServiceError::server_error("Exchange service is down")));

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "2025-01-15",
            "user": "test_user",
            "ft": false
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = read_json(response).await;
    assert_eq!(json["error"], "upstream_error");
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .contains("Exchange service is down")
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_sell_is_gateway_timeout() {
    let app = setup();
    app.catalog.set_sell_delay(Duration::from_secs(3));

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "2025-01-15",
            "user": "test_user",
            "ft": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = read_json(response).await;
    assert_eq!(json["error"], "deadline_exceeded");
    assert_eq!(app.loyalty.call_count(), 0);
}

#[tokio::test]
async fn test_fault_tolerant_loyalty_failure_reports_zero_bonus() {
    let app = setup();
    app.loyalty
        .set_fail_on_credit(Some(ServiceError::server_error("cooldown")));

    let response = app
        .router
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "2025-01-15",
            "user": "test_user",
            "ft": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["bonus_credited"], 0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .router
        .clone()
        .oneshot(buy_request(serde_json::json!({
            "flight": "AA100",
            "day": "2025-01-15",
            "user": "test_user"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("purchase_sagas_total"));
}
