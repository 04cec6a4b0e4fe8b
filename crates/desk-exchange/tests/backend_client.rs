//! 백엔드 프록시 클라이언트 HTTP 통합 테스트.

use desk_core::{BackendConfig, OrderRequest, OrderStatus, OrderType, Side, Symbol};
use desk_exchange::{AccountBackend, BackendClient, ExchangeError};
use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use serde_json::json;

fn client(server: &Server) -> BackendClient {
    let config = BackendConfig {
        enabled: true,
        base_url: server.url(),
        ..Default::default()
    };
    BackendClient::new(&config).unwrap()
}

fn limit_buy() -> OrderRequest {
    OrderRequest {
        symbol: Symbol::new("BTC", "USDT"),
        side: Side::Buy,
        order_type: OrderType::Limit,
        amount: dec!(0.1),
        price: Some(dec!(30000)),
        stop_price: None,
        total: dec!(3000),
    }
}

#[tokio::test]
async fn account_combines_balances_and_positions() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/balance")
        .with_status(200)
        .with_body(r#"[{"asset":"USDT","free":"1500.5","locked":"0"}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/positions")
        .with_status(200)
        .with_body(
            json!([{
                "symbol": "BTC/USDT",
                "amount": "0.25",
                "avgPrice": "40000",
                "currentPrice": "42000",
                "value": "10500",
                "pnl": "500",
                "pnlPercentage": "5"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let account = client(&server).get_account().await.unwrap();
    assert_eq!(account.available("usdt"), dec!(1500.5));
    assert_eq!(account.position_amount("BTC"), dec!(0.25));
}

#[tokio::test]
async fn place_order_posts_request_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/orders")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "symbol": "BTC/USDT",
            "side": "buy",
            "type": "limit",
            "amount": "0.1",
            "price": "30000"
        })))
        .with_status(201)
        .with_body(
            json!({
                "id": "42",
                "request": {
                    "symbol": "BTC/USDT",
                    "side": "buy",
                    "type": "limit",
                    "amount": "0.1",
                    "price": "30000",
                    "total": "3000"
                },
                "status": "open",
                "placedAt": "2024-01-01T00:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let placed = client(&server).place_order(&limit_buy()).await.unwrap();
    mock.assert_async().await;
    assert_eq!(placed.id, "42");
    assert_eq!(placed.status, OrderStatus::Open);
}

#[tokio::test]
async fn rejected_order_surfaces_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/orders")
        .with_status(422)
        .with_body(r#"{"error":"market closed"}"#)
        .create_async()
        .await;

    let err = client(&server).place_order(&limit_buy()).await.unwrap_err();
    match err {
        ExchangeError::OrderRejected(message) => assert_eq!(message, "market closed"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn cancel_accepts_empty_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/orders/42")
        .with_status(204)
        .create_async()
        .await;

    client(&server).cancel_order("42").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn cancel_unknown_order() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/orders/404")
        .with_status(404)
        .with_body(r#"{"message":"no such order"}"#)
        .create_async()
        .await;

    let err = client(&server).cancel_order("404").await.unwrap_err();
    assert!(matches!(err, ExchangeError::OrderNotFound(_)));
}

#[tokio::test]
async fn market_data_by_symbol() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/market/ETHUSDT")
        .with_status(200)
        .with_body(r#"{"symbol":"ETH/USDT","price":"2250.75"}"#)
        .create_async()
        .await;

    let ticker = client(&server)
        .get_market_data(&Symbol::new("ETH", "USDT"))
        .await
        .unwrap();
    assert_eq!(ticker.price, dec!(2250.75));
}

#[tokio::test]
async fn notifications_and_withdrawals() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/notifications")
        .with_status(200)
        .with_body(
            r#"[{"id":"n1","title":"Filled","message":"order filled","type":"success",
                 "read":false,"timestamp":"2024-01-01T00:00:00Z"}]"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/withdrawals")
        .with_status(200)
        .with_body(
            r#"[{"id":"w1","asset":"BTC","amount":"0.5","fee":"0.0005","address":"bc1q",
                 "network":"BTC","status":"completed","txId":"abc",
                 "timestamp":"2024-01-01T00:00:00Z"}]"#,
        )
        .create_async()
        .await;

    let backend = client(&server);
    let notifications = backend.get_notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(!notifications[0].read);

    let withdrawals = backend.get_withdrawals().await.unwrap();
    assert_eq!(withdrawals[0].net_amount(), dec!(0.4995));
}

#[tokio::test]
async fn unauthorized_profile() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/profile")
        .with_status(401)
        .with_body("login required")
        .create_async()
        .await;

    let err = client(&server).get_profile().await.unwrap_err();
    assert!(err.is_auth_error());
}
