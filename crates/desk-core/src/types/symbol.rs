//! 거래쌍 심볼.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 거래소 심볼에서 호가 자산을 떼어낼 때 확인하는 접미사 (긴 것부터).
const KNOWN_QUOTES: [&str; 8] = ["FDUSD", "USDT", "USDC", "BUSD", "TUSD", "BTC", "ETH", "BNB"];

/// 기준 자산과 호가 자산으로 이루어진 거래쌍.
///
/// 표준 표기는 `BASE/QUOTE`이며 직렬화도 이 문자열 형식을 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    /// 기준 자산 (예: BTC)
    pub base: String,
    /// 호가 자산 (예: USDT)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// `BTC/USDT`, `BTC-USDT`, `btcusdt` 형식을 모두 받아 파싱합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((base, quote)) = s.split_once(['/', '-', '_']) {
            if base.is_empty() || quote.is_empty() {
                return None;
            }
            return Some(Self::new(base, quote));
        }

        let upper = s.to_uppercase();
        KNOWN_QUOTES.iter().find_map(|quote| {
            upper
                .strip_suffix(quote)
                .filter(|base| !base.is_empty())
                .map(|base| Self::new(base, *quote))
        })
    }

    /// 거래소 REST 형식 (`BTCUSDT`).
    pub fn to_exchange_string(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid symbol: {}", s))
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parse_formats() {
        assert_eq!(Symbol::parse("btc/usdt"), Some(Symbol::new("BTC", "USDT")));
        assert_eq!(Symbol::parse("ETH-BTC"), Some(Symbol::new("ETH", "BTC")));
        assert_eq!(Symbol::parse("SOLUSDT"), Some(Symbol::new("SOL", "USDT")));
        assert_eq!(Symbol::parse("USDT"), None);
        assert_eq!(Symbol::parse("/USDT"), None);
    }

    #[test]
    fn test_exchange_format() {
        let symbol = Symbol::new("bnb", "fdusd");
        assert_eq!(symbol.to_exchange_string(), "BNBFDUSD");
        assert_eq!(symbol.to_string(), "BNB/FDUSD");
    }

    #[test]
    fn test_serde_as_string() {
        let symbol = Symbol::new("BTC", "USDT");
        let json = serde_json::to_string(&symbol).unwrap();
        assert_eq!(json, "\"BTC/USDT\"");

        let back: Symbol = serde_json::from_str("\"ETHUSDT\"").unwrap();
        assert_eq!(back, Symbol::new("ETH", "USDT"));
    }
}
