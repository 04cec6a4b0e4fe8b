//! # Desk Core
//!
//! 트레이딩 데스크의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 데스크 전반에서 사용되는 기본 타입을 제공합니다:
//! - 주문 초안, 포지션, 체결 기록
//! - 호가창 집계 (누적 수량, 스프레드, 뎁스 차트)
//! - 시세/24시간 통계/캔들스틱 데이터 구조체
//! - 알림, 출금 내역, 사용자 프로필
//! - 차트 위젯 설정
//! - 설정 관리 및 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
