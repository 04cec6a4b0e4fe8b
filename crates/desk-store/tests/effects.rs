//! 이펙트 통합 테스트 (모의 백엔드 + 가짜 시장).

mod common;

use common::{btc, depth, eth, harness, stats, FakeMarket};
use desk_core::{OrderDraft, OrderRequest, OrderStatus, OrderType, Side};
use desk_exchange::AccountBackend;
use desk_risk::{FormField, OrderRejection};
use desk_store::{PanelContent, PanelState, StoreError};
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;

fn limit_buy(amount: &str, price: &str) -> OrderDraft {
    OrderDraft::new(btc(), Side::Buy, OrderType::Limit)
        .with_amount(amount)
        .with_price(price)
}

#[tokio::test]
async fn test_limit_buy_is_placed_and_announced() {
    let (effects, _, _) = harness(FakeMarket::new());

    let placed = effects.place_order(limit_buy("0.1", "40000")).await.unwrap();
    assert_eq!(placed.status, OrderStatus::Open);
    assert_eq!(placed.request.total, dec!(4000));

    let state = effects.store().snapshot().await;
    assert_eq!(state.trading.orders.len(), 1);
    assert_eq!(state.trading.open_orders().count(), 1);
    assert!(state.trading.order_form.draft.amount.is_empty());
    assert!(!state.trading.order_form.submitting);
    assert_eq!(state.notifications.items[0].title, "Order placed");
    assert_eq!(state.notifications.unread_count, 1);
    // 지정가 매수 금액은 묶이고 잔고가 다시 조회됩니다.
    assert_eq!(state.user.available("USDT"), dec!(6000));
}

#[tokio::test]
async fn test_invalid_amount_never_reaches_backend() {
    let (effects, _, backend) = harness(FakeMarket::new());

    let err = effects.place_order(limit_buy("abc", "40000")).await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected(OrderRejection::InvalidAmount)));

    let state = effects.store().snapshot().await;
    assert_eq!(
        state.trading.order_form.field_error,
        Some((FormField::Amount, "invalid amount".to_string()))
    );
    assert!(state.trading.orders.is_empty());
    assert!(state.notifications.items.is_empty());

    let balances = backend.get_balances().await.unwrap();
    let usdt = balances.iter().find(|b| b.asset == "USDT").unwrap();
    assert_eq!(usdt.locked, dec!(0));
}

#[tokio::test]
async fn test_buy_over_available_balance_is_rejected() {
    let (effects, _, _) = harness(FakeMarket::new());

    let err = effects.place_order(limit_buy("1", "42000")).await.unwrap_err();
    match err {
        StoreError::Rejected(OrderRejection::InsufficientBalance {
            required,
            available,
        }) => {
            assert_eq!(required, dec!(42000));
            assert_eq!(available, dec!(10000));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_sell_over_position_is_rejected() {
    let (effects, _, _) = harness(FakeMarket::new());
    let draft = OrderDraft::new(btc(), Side::Sell, OrderType::Limit)
        .with_amount("1")
        .with_price("50000");

    let err = effects.place_order(draft).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Rejected(OrderRejection::InsufficientAssetBalance { .. })
    ));
}

#[tokio::test]
async fn test_market_buy_falls_back_to_ticker_price() {
    let (effects, market, backend) = harness(FakeMarket::new().with_price(btc(), dec!(42000)));
    let draft = OrderDraft::new(btc(), Side::Buy, OrderType::Market).with_amount("0.1");

    let placed = effects.place_order(draft).await.unwrap();
    assert_eq!(placed.status, OrderStatus::Filled);
    assert_eq!(placed.request.total, dec!(4200));
    assert_eq!(market.price_calls.load(Ordering::SeqCst), 1);

    let positions = backend.get_positions().await.unwrap();
    let position = positions.iter().find(|p| p.symbol == btc()).unwrap();
    assert_eq!(position.amount, dec!(0.6));

    let usdt = effects.store().select(|s| s.user.available("USDT")).await;
    assert_eq!(usdt, dec!(5800));
}

#[tokio::test]
async fn test_market_order_without_reference_price_is_rejected() {
    let (effects, _, _) = harness(FakeMarket::new());
    let draft = OrderDraft::new(btc(), Side::Sell, OrderType::Market).with_amount("0.1");

    let err = effects.place_order(draft).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Rejected(OrderRejection::MarketPriceUnavailable)
    ));
    let field = effects
        .store()
        .select(|s| s.trading.order_form.field_error.as_ref().map(|(f, _)| *f))
        .await;
    assert_eq!(field, Some(FormField::Price));
}

#[tokio::test]
async fn test_backend_failure_sets_banner_and_notification() {
    let (effects, _, backend) = harness(FakeMarket::new().with_price(btc(), dec!(42000)));
    effects.fetch_balances().await.unwrap();
    effects.fetch_positions().await.unwrap();

    // 스토어가 모르는 사이에 잔고가 줄어든 상황
    let spend = OrderRequest {
        symbol: btc(),
        side: Side::Buy,
        order_type: OrderType::Market,
        amount: dec!(0.2),
        price: None,
        stop_price: None,
        total: dec!(9000),
    };
    backend.place_order(&spend).await.unwrap();

    let draft = OrderDraft::new(btc(), Side::Buy, OrderType::Market).with_amount("0.1");
    let err = effects.place_order(draft).await.unwrap_err();
    assert!(matches!(err, StoreError::Exchange(_)));

    let state = effects.store().snapshot().await;
    assert_eq!(
        state.trading.order_form.submit_error.as_deref(),
        Some("Order rejected: insufficient balance")
    );
    assert!(!state.trading.order_form.submitting);
    assert_eq!(state.notifications.items[0].title, "Order failed");
    assert!(state.trading.orders.is_empty());
}

#[tokio::test]
async fn test_cancel_order_releases_locked_quote() {
    let (effects, _, _) = harness(FakeMarket::new());
    let placed = effects.place_order(limit_buy("0.1", "40000")).await.unwrap();

    effects.cancel_order(&placed.id).await.unwrap();

    let state = effects.store().snapshot().await;
    assert_eq!(state.trading.orders[0].status, OrderStatus::Cancelled);
    assert_eq!(state.trading.open_orders().count(), 0);
    assert_eq!(state.user.available("USDT"), dec!(10000));

    assert!(effects.cancel_order(&placed.id).await.is_err());
}

#[tokio::test]
async fn test_open_panel_loads_notifications() {
    let (effects, _, _) = harness(FakeMarket::new());

    effects.open_notification_panel().await.unwrap();
    let state = effects.store().snapshot().await;
    assert_eq!(state.notifications.panel, PanelState::Open(PanelContent::Loaded));
    assert_eq!(state.notifications.items.len(), 2);
    assert_eq!(state.notifications.unread_count, 2);

    let store = effects.store();
    let first_id = state.notifications.items[0].id.clone();
    store
        .dispatch(desk_store::Action::MarkNotificationRead(first_id))
        .await;
    assert_eq!(store.select(|s| s.notifications.unread_count).await, 1);

    store.dispatch(desk_store::Action::MarkAllNotificationsRead).await;
    store.dispatch(desk_store::Action::CloseNotificationPanel).await;
    let state = store.snapshot().await;
    assert_eq!(state.notifications.unread_count, 0);
    assert_eq!(state.notifications.panel, PanelState::Closed);
    assert_eq!(state.notifications.items.len(), 2);
}

#[tokio::test]
async fn test_notification_changes_survive_next_poll() {
    let (effects, _, _) = harness(FakeMarket::new());
    let store = effects.store();

    effects.place_order(limit_buy("0.1", "40000")).await.unwrap();
    effects.fetch_notifications().await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.notifications.items.len(), 3);
    assert_eq!(state.notifications.items[0].title, "Order placed");
    assert_eq!(state.notifications.unread_count, 3);

    store.dispatch(desk_store::Action::MarkAllNotificationsRead).await;
    effects.fetch_notifications().await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.notifications.unread_count, 0);
    assert!(state.notifications.items.iter().all(|n| n.read));

    let deleted = state.notifications.items[1].id.clone();
    store
        .dispatch(desk_store::Action::DeleteNotification(deleted.clone()))
        .await;
    effects.fetch_notifications().await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.notifications.items.len(), 2);
    assert!(state.notifications.items.iter().all(|n| n.id != deleted));
    assert_eq!(state.notifications.unread_count, 0);
}

#[tokio::test]
async fn test_news_without_provider_is_unavailable() {
    let (effects, _, _) = harness(FakeMarket::new());
    let err = effects.fetch_news(None).await.unwrap_err();
    assert!(matches!(err, StoreError::NewsUnavailable));
}

#[tokio::test]
async fn test_bootstrap_loads_dashboard() {
    let market = FakeMarket::new()
        .with_depth(depth("44990", "45010"))
        .with_stats(stats(btc(), dec!(45000), dec!(3.2)))
        .with_stats(stats(eth(), dec!(2300), dec!(-1.5)));
    let (effects, market, _) = harness(market);

    effects.bootstrap().await;

    let state = effects.store().snapshot().await;
    assert!(state.user.profile.data.is_some());
    assert_eq!(state.withdrawals.list.data.as_ref().map(Vec::len), Some(3));
    assert_eq!(state.notifications.unread_count, 2);
    assert!(state.trading.order_book.data.is_some());
    assert_eq!(market.depth_calls.load(Ordering::SeqCst), 1);

    let pulse = state.market.pulse.data.as_ref().unwrap();
    assert_eq!(pulse.top_gainers(1)[0].symbol, btc());

    // 포지션은 마켓 펄스 가격으로 평가됩니다.
    let btc_position = state
        .trading
        .positions()
        .iter()
        .find(|p| p.symbol == btc())
        .unwrap();
    assert_eq!(btc_position.pnl, dec!(1500));
    let eth_position = state
        .trading
        .positions()
        .iter()
        .find(|p| p.symbol == eth())
        .unwrap();
    assert_eq!(eth_position.pnl, dec!(300));

    assert_eq!(state.reference_price(&btc()), Some(dec!(45000)));
}
