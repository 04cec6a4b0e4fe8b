//! 호가창 집계.
//!
//! 거래소가 돌려준 `[가격, 수량]` 문자열 배열을 누적 수량이 붙은 행으로 변환합니다.
//! 매 폴링마다 전체를 다시 계산하며, 증분 업데이트는 하지 않습니다.
//!
//! - 매수 호가는 가격 내림차순, 매도 호가는 가격 오름차순으로 들어온다고 가정합니다
//!   (최우선 호가가 항상 첫 행).
//! - 한쪽 면 안에서 `cumulative_total`은 감소하지 않습니다.

use crate::error::{DeskError, DeskResult};
use crate::types::{parse_decimal, DecimalExt, Percentage, Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 거래소 원본 호가 데이터.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDepth {
    #[serde(default)]
    pub last_update_id: Option<u64>,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

/// 집계된 호가 한 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookLevel {
    pub price: Price,
    pub quantity: Quantity,
    /// 최우선 호가부터 이 행까지의 수량 합
    pub cumulative_total: Quantity,
    /// 가격 × 수량
    pub value: Decimal,
}

/// 최우선 매수/매도 호가 차이.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    pub absolute: Decimal,
    /// 최우선 매도가 대비 비율 (%)
    pub percentage: Percentage,
}

impl Spread {
    /// 최우선 매수가와 매도가로 스프레드를 계산합니다.
    pub fn between(best_bid: Price, best_ask: Price) -> Self {
        let absolute = best_ask - best_bid;
        Self {
            absolute,
            percentage: absolute.percent_of(best_ask),
        }
    }
}

/// 뎁스 차트의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthPoint {
    pub price: Price,
    pub cumulative: Quantity,
}

/// 뎁스 차트 데이터. 양쪽 모두 가격 오름차순입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChart {
    pub bids: Vec<DepthPoint>,
    pub asks: Vec<DepthPoint>,
}

/// 한 번의 폴링 결과로 만든 호가창 스냅샷.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
    /// 양쪽 면 전체에서 가장 큰 누적 수량
    pub max_cumulative: Quantity,
    pub last_update_id: Option<u64>,
    pub fetched_at: DateTime<Utc>,
}

/// 한쪽 면의 원본 호가를 누적 수량 행으로 변환합니다.
pub fn aggregate_side(levels: &[[String; 2]]) -> DeskResult<Vec<OrderBookLevel>> {
    let mut running = Decimal::ZERO;
    levels
        .iter()
        .map(|[price, quantity]| {
            let price = parse_level_field(price, "price")?;
            let quantity = parse_level_field(quantity, "quantity")?;
            running = running
                .checked_add(quantity)
                .ok_or_else(|| overflow("누적 수량", quantity))?;
            let value = price
                .checked_mul(quantity)
                .ok_or_else(|| overflow("가격 × 수량", quantity))?;
            Ok(OrderBookLevel {
                price,
                quantity,
                cumulative_total: running,
                value,
            })
        })
        .collect()
}

fn overflow(what: &str, quantity: Decimal) -> DeskError {
    DeskError::Parse(format!("호가 {} 값이 범위를 넘음 (수량 {})", what, quantity))
}

fn parse_level_field(raw: &str, field: &str) -> DeskResult<Decimal> {
    let value = parse_decimal(raw)
        .ok_or_else(|| DeskError::Parse(format!("호가 {} 값이 숫자가 아님: {:?}", field, raw)))?;
    if value.is_sign_negative() {
        return Err(DeskError::Parse(format!("호가 {} 값이 음수: {}", field, raw)));
    }
    Ok(value)
}

impl OrderBookSnapshot {
    /// 원본 호가로 스냅샷을 만듭니다.
    pub fn from_raw(symbol: Symbol, raw: &RawDepth) -> DeskResult<Self> {
        let bids = aggregate_side(&raw.bids)?;
        let asks = aggregate_side(&raw.asks)?;
        let side_max = |levels: &[OrderBookLevel]| {
            levels
                .last()
                .map(|l| l.cumulative_total)
                .unwrap_or(Decimal::ZERO)
        };
        let max_cumulative = side_max(&bids).max(side_max(&asks));

        Ok(Self {
            symbol,
            bids,
            asks,
            max_cumulative,
            last_update_id: raw.last_update_id,
            fetched_at: Utc::now(),
        })
    }

    /// 최우선 매수가.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    /// 최우선 매도가.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }

    /// 스프레드. 한쪽 면이라도 비어 있으면 `None`.
    pub fn spread(&self) -> Option<Spread> {
        Some(Spread::between(self.best_bid()?, self.best_ask()?))
    }

    /// 중간 가격.
    pub fn mid_price(&self) -> Option<Price> {
        Some(self.best_bid()?.checked_add(self.best_ask()?)? / Decimal::TWO)
    }

    /// 행의 막대 너비 비율 (0..=1).
    pub fn width_ratio(&self, level: &OrderBookLevel) -> Decimal {
        if self.max_cumulative.is_zero() {
            return Decimal::ZERO;
        }
        level.cumulative_total / self.max_cumulative
    }

    /// 뎁스 차트 시리즈를 만듭니다.
    ///
    /// 매수 쪽은 최우선 호가에서 바깥으로 누적한 값을 가격 오름차순으로 뒤집습니다.
    pub fn depth_chart(&self) -> DepthChart {
        let point = |l: &OrderBookLevel| DepthPoint {
            price: l.price,
            cumulative: l.cumulative_total,
        };
        DepthChart {
            bids: self.bids.iter().rev().map(point).collect(),
            asks: self.asks.iter().map(point).collect(),
        }
    }

    /// 양쪽 면이 모두 비었는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn levels(rows: &[(&str, &str)]) -> Vec<[String; 2]> {
        rows.iter()
            .map(|(p, q)| [p.to_string(), q.to_string()])
            .collect()
    }

    fn sample() -> OrderBookSnapshot {
        let raw = RawDepth {
            last_update_id: Some(42),
            bids: levels(&[("100", "1.5"), ("99.5", "2"), ("99", "0.5")]),
            asks: levels(&[("101", "1"), ("101.5", "3")]),
        };
        OrderBookSnapshot::from_raw(Symbol::new("BTC", "USDT"), &raw).unwrap()
    }

    #[test]
    fn test_cumulative_totals() {
        let book = sample();
        let bid_totals: Vec<_> = book.bids.iter().map(|l| l.cumulative_total).collect();
        assert_eq!(bid_totals, vec![dec!(1.5), dec!(3.5), dec!(4)]);

        let ask_totals: Vec<_> = book.asks.iter().map(|l| l.cumulative_total).collect();
        assert_eq!(ask_totals, vec![dec!(1), dec!(4)]);
        assert_eq!(book.bids[1].value, dec!(199));
        assert_eq!(book.max_cumulative, dec!(4));
    }

    #[test]
    fn test_spread_matches_reference_values() {
        let spread = Spread::between(dec!(100), dec!(101));
        assert_eq!(spread.absolute, dec!(1));
        assert_eq!(spread.percentage.round_display(2), dec!(0.99));

        let book = sample();
        assert_eq!(book.spread(), Some(spread));
        assert_eq!(book.mid_price(), Some(dec!(100.5)));
    }

    #[test]
    fn test_width_ratio() {
        let book = sample();
        assert_eq!(book.width_ratio(&book.bids[2]), dec!(1));
        assert_eq!(book.width_ratio(&book.asks[0]), dec!(0.25));
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBookSnapshot::from_raw(Symbol::new("BTC", "USDT"), &RawDepth::default()).unwrap();
        assert!(book.is_empty());
        assert_eq!(book.spread(), None);
        assert_eq!(book.max_cumulative, Decimal::ZERO);
        assert!(book.depth_chart().bids.is_empty());
    }

    #[test]
    fn test_one_sided_book_has_no_spread() {
        let raw = RawDepth {
            last_update_id: None,
            bids: levels(&[("10", "1")]),
            asks: vec![],
        };
        let book = OrderBookSnapshot::from_raw(Symbol::new("ETH", "USDT"), &raw).unwrap();
        assert_eq!(book.spread(), None);
        assert_eq!(book.width_ratio(&book.bids[0]), dec!(1));
    }

    #[test]
    fn test_depth_chart_orders_bids_ascending() {
        let chart = sample().depth_chart();
        let bid_prices: Vec<_> = chart.bids.iter().map(|p| p.price).collect();
        assert_eq!(bid_prices, vec![dec!(99), dec!(99.5), dec!(100)]);
        assert_eq!(chart.bids[0].cumulative, dec!(4));
        assert_eq!(chart.asks[1].cumulative, dec!(4));
    }

    #[test]
    fn test_malformed_level_is_rejected() {
        let raw = RawDepth {
            last_update_id: None,
            bids: levels(&[("100", "abc")]),
            asks: vec![],
        };
        let err = OrderBookSnapshot::from_raw(Symbol::new("BTC", "USDT"), &raw).unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));

        let negative = levels(&[("100", "-1")]);
        assert!(aggregate_side(&negative).is_err());
    }

    #[test]
    fn test_mid_price_out_of_range_is_none() {
        let raw = RawDepth {
            last_update_id: None,
            bids: levels(&[("79228162514264337593543950335", "0")]),
            asks: levels(&[("79228162514264337593543950335", "0")]),
        };
        let book = OrderBookSnapshot::from_raw(Symbol::new("BTC", "USDT"), &raw).unwrap();
        assert_eq!(book.mid_price(), None);
    }

    #[test]
    fn test_raw_depth_from_exchange_json() {
        let json = r#"{"lastUpdateId":1027024,"bids":[["4.00000000","431.00000000"]],"asks":[["4.00000200","12.00000000"]]}"#;
        let raw: RawDepth = serde_json::from_str(json).unwrap();
        assert_eq!(raw.last_update_id, Some(1027024));
        assert_eq!(raw.bids[0][1], "431.00000000");
    }
}
