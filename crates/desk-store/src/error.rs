//! 스토어 에러 타입.

use desk_exchange::ExchangeError;
use desk_risk::OrderRejection;
use thiserror::Error;

/// 이펙트 실행 중 발생하는 에러.
///
/// 에러는 해당 슬라이스의 에러 슬롯에도 기록되므로, 호출자는 로그만 남기면 됩니다.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 주문 입력 검증 실패
    #[error(transparent)]
    Rejected(#[from] OrderRejection),

    /// 외부 API 호출 실패
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// 뉴스 API 키가 설정되지 않음
    #[error("news feed not configured")]
    NewsUnavailable,
}

impl StoreError {
    /// 다음 폴링 주기에 다시 시도해도 되는 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Exchange(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// 스토어 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;
