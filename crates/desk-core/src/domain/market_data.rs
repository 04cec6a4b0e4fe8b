//! 시장 데이터 타입.
//!
//! - `TickerPrice` - 최근 체결가
//! - `Stats24h` - 24시간 통계
//! - `Kline` - 캔들스틱
//! - `MarketPulse` - 관심 종목 24시간 통계 묶음

use crate::types::{Interval, Percentage, Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 최근 체결가.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerPrice {
    pub symbol: Symbol,
    pub price: Price,
}

/// 24시간 통계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats24h {
    pub symbol: Symbol,
    /// 24시간 가격 변동
    pub price_change: Decimal,
    /// 24시간 변동률 (%)
    pub price_change_percent: Percentage,
    /// 가중 평균가
    pub weighted_avg_price: Price,
    pub last_price: Price,
    pub open_price: Price,
    pub high_price: Price,
    pub low_price: Price,
    /// 거래량 (기준 자산)
    pub volume: Quantity,
    /// 거래대금 (호가 자산)
    pub quote_volume: Decimal,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    /// 체결 건수
    pub trade_count: u64,
}

impl Stats24h {
    /// 24시간 고저 범위.
    pub fn range(&self) -> Decimal {
        self.high_price - self.low_price
    }
}

/// 캔들스틱.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kline {
    pub symbol: Symbol,
    pub interval: Interval,
    pub open_time: DateTime<Utc>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
    pub close_time: DateTime<Utc>,
    pub quote_volume: Decimal,
    pub trade_count: u64,
}

impl Kline {
    /// 양봉 여부.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 몸통 크기.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }
}

/// 관심 종목 24시간 통계 묶음.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPulse {
    pub stats: Vec<Stats24h>,
}

impl MarketPulse {
    /// 새 묶음을 생성합니다.
    pub fn new(stats: Vec<Stats24h>) -> Self {
        Self { stats }
    }

    /// 변동률 상위 `n`개 (상승 종목만).
    pub fn top_gainers(&self, n: usize) -> Vec<&Stats24h> {
        let mut gainers: Vec<_> = self
            .stats
            .iter()
            .filter(|s| s.price_change_percent > Decimal::ZERO)
            .collect();
        gainers.sort_by(|a, b| b.price_change_percent.cmp(&a.price_change_percent));
        gainers.truncate(n);
        gainers
    }

    /// 변동률 하위 `n`개 (하락 종목만).
    pub fn top_losers(&self, n: usize) -> Vec<&Stats24h> {
        let mut losers: Vec<_> = self
            .stats
            .iter()
            .filter(|s| s.price_change_percent < Decimal::ZERO)
            .collect();
        losers.sort_by(|a, b| a.price_change_percent.cmp(&b.price_change_percent));
        losers.truncate(n);
        losers
    }

    /// 특정 심볼의 통계.
    pub fn get(&self, symbol: &Symbol) -> Option<&Stats24h> {
        self.stats.iter().find(|s| &s.symbol == symbol)
    }
}
