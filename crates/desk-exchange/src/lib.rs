//! 시장 데이터, 백엔드 프록시 및 뉴스 연결.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `MarketDataProvider` trait: 시세, 호가, 24시간 통계, 캔들 조회
//! - Binance 공개 REST 커넥터
//! - `AccountBackend` trait: 잔고, 포지션, 주문, 알림, 출금, 프로필
//! - 백엔드 프록시 HTTP 클라이언트와 모의 백엔드
//! - 뉴스 피드 클라이언트

pub mod connector;
pub mod error;
pub mod simulated;
pub mod traits;

pub use connector::{BackendClient, BinanceClient, NewsClient};
pub use error::*;
pub use simulated::MockBackend;
pub use traits::*;
