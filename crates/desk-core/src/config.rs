//! 설정 관리.
//!
//! TOML 파일을 읽고 `DESK__` 접두사 환경 변수로 덮어씁니다.
//! 모든 섹션은 기본값을 가지므로 일부만 적힌 파일도 허용됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 공개 시장 데이터 API 설정
    pub market_data: MarketDataConfig,
    /// 인증이 필요한 백엔드 프록시 설정
    pub backend: BackendConfig,
    /// 뉴스 피드 설정
    pub news: NewsConfig,
    /// 폴링 주기 설정
    pub polling: PollingConfig,
    /// 백엔드가 없을 때 사용하는 모의 계좌
    pub account: AccountConfig,
    /// 차트 위젯 기본값
    pub chart: ChartConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 파일명/줄 번호 출력 여부
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            with_file: false,
        }
    }
}

/// 공개 시장 데이터 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// REST API 기본 URL
    pub rest_base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 호가창 조회 기본 깊이
    pub depth_limit: u32,
    /// 기본 거래쌍
    pub default_symbol: String,
    /// 마켓 펄스에 표시할 거래쌍 목록
    pub watch_list: Vec<String>,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            rest_base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
            depth_limit: 20,
            default_symbol: "BTC/USDT".to_string(),
            watch_list: vec![
                "BTC/USDT".to_string(),
                "ETH/USDT".to_string(),
                "BNB/USDT".to_string(),
                "SOL/USDT".to_string(),
                "XRP/USDT".to_string(),
            ],
        }
    }
}

impl MarketDataConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 백엔드 프록시 설정.
///
/// 백엔드 서버는 이 저장소에 포함되지 않습니다. `enabled = false`이면
/// 모의 계좌(`AccountConfig`)를 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// 백엔드 사용 여부
    pub enabled: bool,
    /// 기본 URL (`/api/...` 경로가 붙습니다)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 뉴스 피드 설정.
///
/// `Debug` 구현은 `api_key`를 마스킹합니다.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// 뉴스 API 기본 URL
    pub base_url: String,
    /// API 키 (`X-Api-Key` 헤더로 전송)
    pub api_key: Option<String>,
    /// 기본 검색어
    pub query: String,
    /// 한 번에 가져올 기사 수
    pub page_size: u32,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            api_key: None,
            query: "cryptocurrency".to_string(),
            page_size: 10,
        }
    }
}

impl fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("query", &self.query)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// 폴링 주기 설정 (초).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// 실시간 호가창
    pub order_book_secs: u64,
    /// 뎁스 차트
    pub depth_chart_secs: u64,
    /// 마켓 펄스 (24시간 통계)
    pub market_pulse_secs: u64,
    /// 알림 패널
    pub notifications_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            order_book_secs: 3,
            depth_chart_secs: 5,
            market_pulse_secs: 10,
            notifications_secs: 10,
        }
    }
}

impl PollingConfig {
    /// 호가창 폴링 주기
    pub fn order_book(&self) -> Duration {
        Duration::from_secs(self.order_book_secs.max(1))
    }

    /// 뎁스 차트 폴링 주기
    pub fn depth_chart(&self) -> Duration {
        Duration::from_secs(self.depth_chart_secs.max(1))
    }

    /// 마켓 펄스 폴링 주기
    pub fn market_pulse(&self) -> Duration {
        Duration::from_secs(self.market_pulse_secs.max(1))
    }

    /// 알림 폴링 주기
    pub fn notifications(&self) -> Duration {
        Duration::from_secs(self.notifications_secs.max(1))
    }
}

/// 모의 계좌 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// 자산별 사용 가능 잔고
    pub balances: HashMap<String, Decimal>,
    /// 보유 포지션
    pub positions: Vec<PositionSeed>,
}

/// 모의 포지션 한 건.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PositionSeed {
    /// 거래쌍 (예: "BTC/USDT")
    pub symbol: String,
    /// 보유 수량
    pub amount: Decimal,
    /// 평균 매입가
    pub avg_price: Decimal,
}

impl Default for AccountConfig {
    fn default() -> Self {
        let balances = HashMap::from([
            ("USDT".to_string(), dec!(10000)),
            ("BTC".to_string(), dec!(0.5)),
            ("ETH".to_string(), dec!(3)),
        ]);
        Self {
            balances,
            positions: vec![
                PositionSeed {
                    symbol: "BTC/USDT".to_string(),
                    amount: dec!(0.5),
                    avg_price: dec!(42000),
                },
                PositionSeed {
                    symbol: "ETH/USDT".to_string(),
                    amount: dec!(3),
                    avg_price: dec!(2200),
                },
            ],
        }
    }
}

/// 차트 위젯 기본값.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// 캔들 간격 (예: "1h")
    pub interval: String,
    /// 테마 ("light" 또는 "dark")
    pub theme: String,
    /// 기본 보조지표
    pub studies: Vec<String>,
    /// 로캘
    pub locale: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            interval: "1h".to_string(),
            theme: "dark".to_string(),
            studies: vec![
                "MASimple@tv-basicstudies".to_string(),
                "RSI@tv-basicstudies".to_string(),
            ],
            locale: "en".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("DESK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_defaults_within_refresh_window() {
        let polling = PollingConfig::default();
        assert_eq!(polling.order_book(), Duration::from_secs(3));
        assert_eq!(polling.market_pulse(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let polling = PollingConfig {
            order_book_secs: 0,
            ..Default::default()
        };
        assert_eq!(polling.order_book(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml_like(
            r#"
            [polling]
            order_book_secs = 7

            [account.balances]
            USDT = 500
            "#,
        );

        assert_eq!(config.polling.order_book_secs, 7);
        assert_eq!(config.polling.depth_chart_secs, 5);
        let usdt = config
            .account
            .balances
            .iter()
            .find(|(asset, _)| asset.eq_ignore_ascii_case("USDT"))
            .map(|(_, amount)| *amount);
        assert_eq!(usdt, Some(dec!(500)));
        assert_eq!(config.market_data.depth_limit, 20);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.market_data.default_symbol, "BTC/USDT");
        assert!(!config.backend.enabled);
    }

    #[test]
    fn test_news_api_key_is_masked_in_debug() {
        let news = NewsConfig {
            api_key: Some("secret-news-key".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", news);
        assert!(!rendered.contains("secret-news-key"));
        assert!(rendered.contains("REDACTED"));
    }

    fn toml_like(source: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
