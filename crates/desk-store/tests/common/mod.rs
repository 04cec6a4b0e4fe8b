//! 통합 테스트용 가짜 시장 데이터 제공자.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use desk_core::{AccountConfig, Interval, Kline, RawDepth, Stats24h, Symbol, TickerPrice};
use desk_exchange::{ExchangeError, ExchangeResult, MarketDataProvider, MockBackend};
use desk_store::{AppState, Effects, EffectsConfig, Store};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn btc() -> Symbol {
    Symbol::new("BTC", "USDT")
}

pub fn eth() -> Symbol {
    Symbol::new("ETH", "USDT")
}

pub fn depth(best_bid: &str, best_ask: &str) -> RawDepth {
    RawDepth {
        last_update_id: Some(1),
        bids: vec![[best_bid.to_string(), "1".to_string()]],
        asks: vec![[best_ask.to_string(), "1".to_string()]],
    }
}

pub fn stats(symbol: Symbol, last: Decimal, change_percent: Decimal) -> Stats24h {
    let now = Utc::now();
    Stats24h {
        symbol,
        price_change: Decimal::ZERO,
        price_change_percent: change_percent,
        weighted_avg_price: last,
        last_price: last,
        open_price: last,
        high_price: last,
        low_price: last,
        volume: Decimal::ONE,
        quote_volume: last,
        open_time: now - chrono::Duration::hours(24),
        close_time: now,
        trade_count: 1,
    }
}

pub fn kline(symbol: Symbol, interval: Interval) -> Kline {
    let now = Utc::now();
    Kline {
        symbol,
        interval,
        open_time: now - chrono::Duration::hours(1),
        open: Decimal::ONE,
        high: Decimal::TWO,
        low: Decimal::ONE,
        close: Decimal::TWO,
        volume: Decimal::ONE,
        close_time: now,
        quote_volume: Decimal::TWO,
        trade_count: 1,
    }
}

/// 응답 지연을 호출마다 지정할 수 있는 시장 데이터 제공자.
#[derive(Default)]
pub struct FakeMarket {
    /// 다음 `get_depth` 호출들이 돌려줄 (지연, 호가)
    scripted_depth: Mutex<VecDeque<(Duration, RawDepth)>>,
    default_depth: Mutex<Option<RawDepth>>,
    prices: Mutex<HashMap<Symbol, Decimal>>,
    stats: Mutex<HashMap<Symbol, Stats24h>>,
    /// `get_klines` 응답 지연
    kline_delay: Mutex<Duration>,
    pub depth_calls: AtomicUsize,
    pub price_calls: AtomicUsize,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(self, raw: RawDepth) -> Self {
        *self.default_depth.lock().unwrap() = Some(raw);
        self
    }

    pub fn with_price(self, symbol: Symbol, price: Decimal) -> Self {
        self.prices.lock().unwrap().insert(symbol, price);
        self
    }

    pub fn with_stats(self, stats: Stats24h) -> Self {
        self.stats.lock().unwrap().insert(stats.symbol.clone(), stats);
        self
    }

    pub fn with_kline_delay(self, delay: Duration) -> Self {
        *self.kline_delay.lock().unwrap() = delay;
        self
    }

    pub fn script_depth(&self, delay: Duration, raw: RawDepth) {
        self.scripted_depth.lock().unwrap().push_back((delay, raw));
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get_price(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        let price = self.prices.lock().unwrap().get(symbol).copied();
        price
            .map(|price| TickerPrice {
                symbol: symbol.clone(),
                price,
            })
            .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_prices(&self) -> ExchangeResult<Vec<TickerPrice>> {
        let prices = self.prices.lock().unwrap().clone();
        Ok(prices
            .into_iter()
            .map(|(symbol, price)| TickerPrice { symbol, price })
            .collect())
    }

    async fn get_depth(&self, symbol: &Symbol, _limit: u32) -> ExchangeResult<RawDepth> {
        self.depth_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted_depth.lock().unwrap().pop_front();
        match scripted {
            Some((delay, raw)) => {
                tokio::time::sleep(delay).await;
                Ok(raw)
            }
            None => self
                .default_depth
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn get_24h_stats(&self, symbol: &Symbol) -> ExchangeResult<Stats24h> {
        self.stats
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        _limit: u32,
    ) -> ExchangeResult<Vec<Kline>> {
        let delay = *self.kline_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        Ok(vec![kline(symbol.clone(), interval)])
    }
}

/// 모의 계좌와 가짜 시장으로 이펙트를 구성합니다.
pub fn harness(market: FakeMarket) -> (Effects, Arc<FakeMarket>, MockBackend) {
    let market = Arc::new(market);
    let backend = MockBackend::from_config(&AccountConfig::default());
    let store = Arc::new(Store::new(AppState::new(btc(), vec![])));
    let config = EffectsConfig {
        watch_list: vec![btc(), eth()],
        ..Default::default()
    };
    let effects = Effects::new(store, market.clone(), Arc::new(backend.clone()), config);
    (effects, market, backend)
}
