//! 임베드 차트 위젯 설정.
//!
//! 위젯은 스크립트 태그(`WIDGET_SCRIPT_URL`)를 삽입한 뒤 전역 생성자에
//! 설정 객체를 넘겨 만듭니다. 이 모듈은 그 설정 객체를 타입으로 표현합니다.

use crate::config::ChartConfig;
use crate::types::{Interval, Symbol};
use serde::{Deserialize, Serialize};

/// 위젯 스크립트 주소.
pub const WIDGET_SCRIPT_URL: &str = "https://s3.tradingview.com/tv.js";

/// 위젯 전역 생성자 이름.
pub const WIDGET_CONSTRUCTOR: &str = "TradingView.widget";

/// 화면 테마.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// 반대 테마.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

/// 차트 위젯 생성자 설정.
///
/// 필드 이름은 위젯이 기대하는 그대로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWidgetConfig {
    /// `EXCHANGE:PAIR` 형식 심볼
    pub symbol: String,
    /// 위젯 간격 표기 (예: "60", "D")
    pub interval: String,
    pub theme: Theme,
    /// 캔들 스타일 ("1" = 캔들)
    pub style: String,
    pub locale: String,
    pub timezone: String,
    pub studies: Vec<String>,
    pub container_id: String,
    pub autosize: bool,
    pub allow_symbol_change: bool,
    pub hide_side_toolbar: bool,
}

impl ChartWidgetConfig {
    /// 기본 옵션으로 설정을 만듭니다.
    pub fn new(symbol: &Symbol, interval: Interval) -> Self {
        Self {
            symbol: format!("BINANCE:{}", symbol.to_exchange_string()),
            interval: interval.as_chart_str().to_string(),
            theme: Theme::default(),
            style: "1".to_string(),
            locale: "en".to_string(),
            timezone: "Etc/UTC".to_string(),
            studies: Vec::new(),
            container_id: "tradingview_chart".to_string(),
            autosize: true,
            allow_symbol_change: true,
            hide_side_toolbar: false,
        }
    }

    /// 설정 파일의 기본값(테마, 보조지표, 로캘)을 적용합니다.
    pub fn from_defaults(symbol: &Symbol, defaults: &ChartConfig) -> Self {
        let interval = defaults.interval.parse().unwrap_or(Interval::H1);
        let mut config = Self::new(symbol, interval)
            .with_theme(defaults.theme.parse().unwrap_or_default())
            .with_studies(defaults.studies.iter().cloned());
        config.locale = defaults.locale.clone();
        config
    }

    /// 테마를 설정합니다.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// 보조지표를 설정합니다.
    pub fn with_studies(mut self, studies: impl IntoIterator<Item = String>) -> Self {
        self.studies = studies.into_iter().collect();
        self
    }

    /// 위젯을 넣을 DOM 컨테이너 ID를 설정합니다.
    pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    /// 생성자 호출 스니펫 (`new TradingView.widget({...});`).
    pub fn constructor_snippet(&self) -> Result<String, serde_json::Error> {
        let body = serde_json::to_string_pretty(self)?;
        Ok(format!("new {}({});", WIDGET_CONSTRUCTOR, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_config_fields() {
        let config = ChartWidgetConfig::new(&Symbol::new("ETH", "USDT"), Interval::H4)
            .with_theme(Theme::Light)
            .with_container("chart");

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["symbol"], "BINANCE:ETHUSDT");
        assert_eq!(json["interval"], "240");
        assert_eq!(json["theme"], "light");
        assert_eq!(json["container_id"], "chart");
    }

    #[test]
    fn test_from_defaults_falls_back_on_bad_values() {
        let defaults = ChartConfig {
            interval: "7x".to_string(),
            theme: "neon".to_string(),
            studies: vec!["RSI@tv-basicstudies".to_string()],
            locale: "ko".to_string(),
        };
        let config = ChartWidgetConfig::from_defaults(&Symbol::new("BTC", "USDT"), &defaults);
        assert_eq!(config.interval, "60");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.studies.len(), 1);
        assert_eq!(config.locale, "ko");
    }

    #[test]
    fn test_constructor_snippet() {
        let snippet = ChartWidgetConfig::new(&Symbol::new("BTC", "USDT"), Interval::D1)
            .constructor_snippet()
            .unwrap();
        assert!(snippet.starts_with("new TradingView.widget({"));
        assert!(snippet.ends_with("});"));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    }
}
