//! 주문 타입.
//!
//! - `OrderDraft` - 주문 입력 폼의 원시 값 (문자열 그대로)
//! - `OrderRequest` - 검증을 통과한 주문 요청
//! - `PlacedOrder` - 백엔드가 접수한 주문

use crate::types::{parse_positive, Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 주문 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(format!("Invalid side: {}", s)),
        }
    }
}

/// 주문 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 지정가
    Limit,
    /// 시장가
    Market,
    /// 스톱 (스톱 가격 도달 시 지정가로 발동)
    Stop,
}

impl OrderType {
    /// 지정 가격이 필요한 유형인지 확인합니다.
    pub fn requires_price(&self) -> bool {
        !matches!(self, OrderType::Market)
    }

    /// 스톱 가격이 필요한 유형인지 확인합니다.
    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::Stop)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Stop => write!(f, "STOP"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "limit" => Ok(OrderType::Limit),
            "market" => Ok(OrderType::Market),
            "stop" => Ok(OrderType::Stop),
            _ => Err(format!("Invalid order type: {}", s)),
        }
    }
}

/// 주문 입력 폼 상태.
///
/// 수량과 가격은 사용자가 입력한 문자열 그대로 보관하고, 검증 단계에서 파싱합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub amount: String,
    pub price: String,
    pub stop_price: String,
}

impl OrderDraft {
    /// 빈 입력값으로 새 초안을 생성합니다.
    pub fn new(symbol: Symbol, side: Side, order_type: OrderType) -> Self {
        Self {
            symbol,
            side,
            order_type,
            amount: String::new(),
            price: String::new(),
            stop_price: String::new(),
        }
    }

    /// 수량 입력값을 설정합니다.
    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    /// 가격 입력값을 설정합니다.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    /// 스톱 가격 입력값을 설정합니다.
    pub fn with_stop_price(mut self, stop_price: impl Into<String>) -> Self {
        self.stop_price = stop_price.into();
        self
    }

    /// 폼에 표시할 예상 총액 (수량 × 가격).
    ///
    /// 시장가 주문은 `market_price`를 사용합니다. 어느 값이든 파싱되지 않으면 `None`.
    pub fn estimated_total(&self, market_price: Option<Price>) -> Option<Decimal> {
        let amount = parse_positive(&self.amount)?;
        let price = if self.order_type.requires_price() {
            parse_positive(&self.price)?
        } else {
            market_price?
        };
        Some(amount * price)
    }
}

/// 검증을 통과한 주문 요청.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub amount: Quantity,
    /// 지정가/스톱 주문의 가격 (시장가는 `None`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// 스톱 주문의 발동 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Price>,
    /// 수량 × 유효 가격
    pub total: Decimal,
}

/// 접수된 주문의 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 접수 대기
    Pending,
    /// 미체결
    Open,
    /// 체결
    Filled,
    /// 취소
    Cancelled,
    /// 거부
    Rejected,
}

impl OrderStatus {
    /// 더 이상 바뀌지 않는 상태인지 확인합니다.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// 백엔드가 접수한 주문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    /// 백엔드 주문 ID
    pub id: String,
    pub request: OrderRequest,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn btc() -> Symbol {
        Symbol::new("BTC", "USDT")
    }

    #[test]
    fn test_order_type_requirements() {
        assert!(OrderType::Limit.requires_price());
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Stop.requires_price());
        assert!(OrderType::Stop.requires_stop_price());
        assert!(!OrderType::Limit.requires_stop_price());
    }

    #[test]
    fn test_estimated_total() {
        let draft = OrderDraft::new(btc(), Side::Buy, OrderType::Limit)
            .with_amount("0.5")
            .with_price("40000");
        assert_eq!(draft.estimated_total(None), Some(dec!(20000)));

        let market = OrderDraft::new(btc(), Side::Buy, OrderType::Market).with_amount("2");
        assert_eq!(market.estimated_total(Some(dec!(100))), Some(dec!(200)));
        assert_eq!(market.estimated_total(None), None);
    }

    #[test]
    fn test_order_request_wire_format() {
        let request = OrderRequest {
            symbol: btc(),
            side: Side::Sell,
            order_type: OrderType::Market,
            amount: dec!(1),
            price: None,
            stop_price: None,
            total: dec!(50000),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "market");
        assert_eq!(json["side"], "sell");
        assert!(json.get("price").is_none());
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("BUY".parse::<Side>().unwrap(), Side::Buy);
        assert!("hold".parse::<Side>().is_err());
    }
}
