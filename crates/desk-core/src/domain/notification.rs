//! 알림 타입.

use crate::domain::order::PlacedOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 알림 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// 알림 패널 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// 고유 ID
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// 읽음 여부
    #[serde(default)]
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// 읽지 않은 새 알림을 생성합니다.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            timestamp: Utc::now(),
        }
    }

    /// 주문 접수 알림.
    pub fn order_placed(order: &PlacedOrder) -> Self {
        let request = &order.request;
        let price = request
            .price
            .map(|p| format!(" @ {}", p))
            .unwrap_or_default();
        Self::new(
            NotificationKind::Success,
            "Order placed",
            format!(
                "{} {} {} {}{} (#{})",
                request.side, request.order_type, request.amount, request.symbol, price, order.id
            ),
        )
    }

    /// 주문 실패 알림.
    pub fn order_failed(reason: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, "Order failed", reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderRequest, OrderStatus, OrderType, Side};
    use crate::types::Symbol;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(NotificationKind::Info, "Welcome", "hello");
        assert!(!n.read);
        assert!(!n.id.is_empty());
    }

    #[test]
    fn test_order_placed_message() {
        let order = PlacedOrder {
            id: "42".to_string(),
            request: OrderRequest {
                symbol: Symbol::new("BTC", "USDT"),
                side: Side::Buy,
                order_type: OrderType::Limit,
                amount: dec!(0.1),
                price: Some(dec!(30000)),
                stop_price: None,
                total: dec!(3000),
            },
            status: OrderStatus::Open,
            placed_at: Utc::now(),
        };
        let n = Notification::order_placed(&order);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.message, "BUY LIMIT 0.1 BTC/USDT @ 30000 (#42)");
    }

    #[test]
    fn test_wire_format_uses_type_field() {
        let json = r#"{"id":"n1","title":"Deposit","message":"ok","type":"success","timestamp":"2024-01-01T00:00:00Z"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert!(!n.read);
    }
}
