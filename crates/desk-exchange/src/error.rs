//! 외부 연동 에러 타입.

use desk_core::DeskError;
use thiserror::Error;

/// 거래소/백엔드/뉴스 API 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 인증/권한 에러
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// API 에러 코드
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 주문을 찾을 수 없음
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// 주문 거부됨
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 알 수 없는 에러
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ExchangeError {
    /// 다음 폴링 주기에 다시 시도해도 되는 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::NetworkError(_) | ExchangeError::RateLimited | ExchangeError::Timeout(_)
        )
    }

    /// 인증 에러인지 확인.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ExchangeError::Unauthorized(_))
    }

    /// HTTP 상태 코드로 에러를 만듭니다.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ExchangeError::Unauthorized(body),
            418 | 429 => ExchangeError::RateLimited,
            _ => ExchangeError::ApiError {
                code: status as i32,
                message: body,
            },
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ExchangeError::NetworkError(err.to_string())
        } else if err.is_decode() {
            ExchangeError::ParseError(err.to_string())
        } else {
            ExchangeError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

impl From<DeskError> for ExchangeError {
    fn from(err: DeskError) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

impl From<ExchangeError> for DeskError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::RateLimited => DeskError::RateLimit(err.to_string()),
            ExchangeError::NetworkError(_) | ExchangeError::Timeout(_) => {
                DeskError::Network(err.to_string())
            }
            ExchangeError::ParseError(msg) => DeskError::Parse(msg),
            ExchangeError::SymbolNotFound(symbol) => DeskError::NotFound(symbol),
            other => DeskError::MarketData(other.to_string()),
        }
    }
}
