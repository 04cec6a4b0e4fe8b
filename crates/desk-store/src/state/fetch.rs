//! 원격 데이터 슬롯.

use crate::sequence::RequestSeq;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 조회 결과와 로딩/에러 상태를 함께 보관합니다.
///
/// 응답은 `applied_seq`보다 큰 순번일 때만 반영되므로 늦게 도착한
/// 오래된 응답이 새 데이터를 덮어쓰지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchState<T> {
    pub data: Option<T>,
    /// 마지막 실패 메시지 (성공하면 지워짐)
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    issued_seq: RequestSeq,
    applied_seq: RequestSeq,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            issued_seq: 0,
            applied_seq: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// 요청 시작을 기록합니다.
    pub fn begin(&mut self, seq: RequestSeq) {
        self.issued_seq = self.issued_seq.max(seq);
    }

    /// 응답을 반영합니다. 오래된 응답이면 `false`.
    ///
    /// 실패해도 기존 데이터는 유지합니다.
    pub fn apply(&mut self, seq: RequestSeq, result: Result<T, String>) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.issued_seq = self.issued_seq.max(seq);
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// 응답을 기다리는 요청이 있는지 확인합니다.
    pub fn is_loading(&self) -> bool {
        self.applied_seq < self.issued_seq
    }

    /// 마지막으로 반영한 순번.
    pub fn applied_seq(&self) -> RequestSeq {
        self.applied_seq
    }

    /// 데이터를 비웁니다. 이후 도착하는 진행 중 응답도 버립니다.
    pub fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.updated_at = None;
        self.applied_seq = self.issued_seq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_response_wins() {
        let mut slot = FetchState::<u32>::default();
        slot.begin(1);
        slot.begin(2);
        assert!(slot.is_loading());

        assert!(slot.apply(2, Ok(20)));
        assert!(!slot.apply(1, Ok(10)));
        assert_eq!(slot.data, Some(20));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_error_keeps_previous_data() {
        let mut slot = FetchState::default();
        slot.apply(1, Ok("book"));
        slot.apply(2, Err("timeout".to_string()));
        assert_eq!(slot.data, Some("book"));
        assert_eq!(slot.error.as_deref(), Some("timeout"));

        slot.apply(3, Ok("fresh"));
        assert!(slot.error.is_none());
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut slot = FetchState::<u32>::default();
        slot.begin(4);
        slot.reset();
        assert!(!slot.apply(4, Ok(1)));
        assert!(slot.data.is_none());
    }
}
