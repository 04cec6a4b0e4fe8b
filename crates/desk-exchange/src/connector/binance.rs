//! Binance 공개 REST 커넥터.
//!
//! 인증이 필요 없는 시장 데이터 엔드포인트만 사용합니다.
//! - `/api/v3/ticker/price`
//! - `/api/v3/depth`
//! - `/api/v3/ticker/24hr`
//! - `/api/v3/klines`

use crate::traits::{ExchangeResult, MarketDataProvider};
use crate::ExchangeError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use desk_core::{
    parse_decimal, Interval, Kline, MarketDataConfig, RawDepth, Stats24h, Symbol, TickerPrice,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error};

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct BinanceTickerPrice {
    symbol: String,
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker24h {
    symbol: String,
    price_change: String,
    price_change_percent: String,
    weighted_avg_price: String,
    last_price: String,
    open_price: String,
    high_price: String,
    low_price: String,
    volume: String,
    quote_volume: String,
    open_time: i64,
    close_time: i64,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    u64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i32,
    msg: String,
}

// ============================================================================
// Binance 클라이언트
// ============================================================================

/// Binance 공개 시장 데이터 클라이언트.
pub struct BinanceClient {
    base_url: String,
    client: Client,
}

impl BinanceClient {
    /// 새 Binance 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(config: &MarketDataConfig) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self {
            base_url: config.rest_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// 파라미터에서 쿼리 문자열 생성.
    fn build_query(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 공개 API 요청.
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ExchangeResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let query = Self::build_query(params);

        let full_url = if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, query)
        };

        debug!("GET {}", full_url);

        let response = self.client.get(&full_url).send().await?;

        self.handle_response(response).await
    }

    /// API 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::ParseError(e.to_string())
            })
        } else if let Ok(error) = serde_json::from_str::<BinanceError>(&body) {
            Err(Self::map_error_code(error.code, &error.msg))
        } else {
            Err(ExchangeError::from_status(status.as_u16(), body))
        }
    }

    /// Binance 에러 코드를 ExchangeError로 매핑.
    fn map_error_code(code: i32, msg: &str) -> ExchangeError {
        match code {
            -1000 => ExchangeError::Unknown(msg.to_string()),
            -1001 => ExchangeError::NetworkError(msg.to_string()),
            -1003 => ExchangeError::RateLimited,
            -1121 => ExchangeError::SymbolNotFound(msg.to_string()),
            _ => ExchangeError::ApiError {
                code,
                message: msg.to_string(),
            },
        }
    }

    /// Binance 심볼 형식을 내부 Symbol로 변환.
    fn to_symbol(binance_symbol: &str) -> ExchangeResult<Symbol> {
        Symbol::parse(binance_symbol)
            .ok_or_else(|| ExchangeError::SymbolNotFound(binance_symbol.to_string()))
    }

    /// 문자열에서 Decimal 파싱.
    fn decimal(field: &str, value: &str) -> ExchangeResult<Decimal> {
        parse_decimal(value)
            .ok_or_else(|| ExchangeError::ParseError(format!("{}: {:?}", field, value)))
    }

    fn timestamp(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
    }

    fn convert_stats(symbol: Symbol, t: BinanceTicker24h) -> ExchangeResult<Stats24h> {
        Ok(Stats24h {
            symbol,
            price_change: Self::decimal("priceChange", &t.price_change)?,
            price_change_percent: Self::decimal("priceChangePercent", &t.price_change_percent)?,
            weighted_avg_price: Self::decimal("weightedAvgPrice", &t.weighted_avg_price)?,
            last_price: Self::decimal("lastPrice", &t.last_price)?,
            open_price: Self::decimal("openPrice", &t.open_price)?,
            high_price: Self::decimal("highPrice", &t.high_price)?,
            low_price: Self::decimal("lowPrice", &t.low_price)?,
            volume: Self::decimal("volume", &t.volume)?,
            quote_volume: Self::decimal("quoteVolume", &t.quote_volume)?,
            open_time: Self::timestamp(t.open_time),
            close_time: Self::timestamp(t.close_time),
            trade_count: t.count,
        })
    }
}

#[async_trait]
impl MarketDataProvider for BinanceClient {
    fn name(&self) -> &str {
        "Binance"
    }

    async fn get_price(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice> {
        let resp: BinanceTickerPrice = self
            .public_get(
                "/api/v3/ticker/price",
                &[("symbol", symbol.to_exchange_string())],
            )
            .await?;

        Ok(TickerPrice {
            symbol: symbol.clone(),
            price: Self::decimal("price", &resp.price)?,
        })
    }

    async fn get_prices(&self) -> ExchangeResult<Vec<TickerPrice>> {
        let resp: Vec<BinanceTickerPrice> = self.public_get("/api/v3/ticker/price", &[]).await?;

        // 호가 자산을 알 수 없는 거래쌍은 건너뜁니다.
        Ok(resp
            .into_iter()
            .filter_map(|t| {
                let symbol = Self::to_symbol(&t.symbol).ok()?;
                let price = parse_decimal(&t.price)?;
                Some(TickerPrice { symbol, price })
            })
            .collect())
    }

    async fn get_depth(&self, symbol: &Symbol, limit: u32) -> ExchangeResult<RawDepth> {
        self.public_get(
            "/api/v3/depth",
            &[
                ("symbol", symbol.to_exchange_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn get_24h_stats(&self, symbol: &Symbol) -> ExchangeResult<Stats24h> {
        let resp: BinanceTicker24h = self
            .public_get(
                "/api/v3/ticker/24hr",
                &[("symbol", symbol.to_exchange_string())],
            )
            .await?;

        Self::convert_stats(symbol.clone(), resp)
    }

    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u32,
    ) -> ExchangeResult<Vec<Kline>> {
        let resp: Vec<BinanceKline> = self
            .public_get(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_exchange_string()),
                    ("interval", interval.as_exchange_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        resp.into_iter()
            .map(|k| {
                Ok(Kline {
                    symbol: symbol.clone(),
                    interval,
                    open_time: Self::timestamp(k.0),
                    open: Self::decimal("open", &k.1)?,
                    high: Self::decimal("high", &k.2)?,
                    low: Self::decimal("low", &k.3)?,
                    close: Self::decimal("close", &k.4)?,
                    volume: Self::decimal("volume", &k.5)?,
                    close_time: Self::timestamp(k.6),
                    quote_volume: Self::decimal("quoteVolume", &k.7)?,
                    trade_count: k.8,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_conversion() {
        let symbol = BinanceClient::to_symbol("BTCUSDT").unwrap();
        assert_eq!(symbol, Symbol::new("BTC", "USDT"));

        let symbol = BinanceClient::to_symbol("ETHBTC").unwrap();
        assert_eq!(symbol.to_string(), "ETH/BTC");

        assert!(BinanceClient::to_symbol("XYZ").is_err());
    }

    #[test]
    fn test_error_code_mapping() {
        assert!(matches!(
            BinanceClient::map_error_code(-1003, "too many"),
            ExchangeError::RateLimited
        ));
        assert!(matches!(
            BinanceClient::map_error_code(-1121, "Invalid symbol."),
            ExchangeError::SymbolNotFound(_)
        ));
        assert!(matches!(
            BinanceClient::map_error_code(-9999, "?"),
            ExchangeError::ApiError { code: -9999, .. }
        ));
    }

    #[test]
    fn test_build_query() {
        let query = BinanceClient::build_query(&[
            ("symbol", "BTCUSDT".to_string()),
            ("limit", "20".to_string()),
        ]);
        assert_eq!(query, "symbol=BTCUSDT&limit=20");
    }
}
