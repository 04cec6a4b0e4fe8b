//! 트레이딩 데스크의 에러 타입.
//!
//! 이 모듈은 데스크 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 데스크 에러.
#[derive(Debug, Error)]
pub enum DeskError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 시장 데이터 제공자 에러
    #[error("시장 데이터 에러: {0}")]
    MarketData(String),

    /// 백엔드 프록시 에러
    #[error("백엔드 에러: {0}")]
    Backend(String),

    /// 주문 검증 실패
    #[error("주문 검증 실패: {0}")]
    Validation(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 데스크 작업을 위한 Result 타입.
pub type DeskResult<T> = Result<T, DeskError>;

impl DeskError {
    /// 다음 폴링 주기에 다시 시도해 볼 만한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeskError::Network(_) | DeskError::RateLimit(_) | DeskError::MarketData(_)
        )
    }

    /// 전역 에러 슬롯에 올려야 하는 에러인지 확인합니다.
    pub fn is_critical(&self) -> bool {
        matches!(self, DeskError::Config(_) | DeskError::Internal(_))
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for DeskError {
    fn from(err: config::ConfigError) -> Self {
        DeskError::Config(err.to_string())
    }
}
