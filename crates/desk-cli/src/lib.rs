//! 트레이딩 데스크 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 호가창, 마켓 펄스, 캔들 조회
//! - 주문 입력 검증과 모의 주문
//! - 차트 위젯 설정 출력
//! - 폴링 대시보드 (`watch`)

pub mod commands;
