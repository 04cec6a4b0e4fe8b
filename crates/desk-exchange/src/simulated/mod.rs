//! 백엔드 서버 없이 데스크를 실행하기 위한 모의 백엔드.
//!
//! 설정의 모의 계좌(`AccountConfig`)로 잔고와 포지션을 채우고, 주문 제출과
//! 취소를 메모리 안에서 처리합니다.
//!
//! # 예제
//!
//! ```ignore
//! use desk_exchange::simulated::MockBackend;
//!
//! let backend = MockBackend::from_config(&config.account)
//!     .with_price(Symbol::new("BTC", "USDT"), dec!(43000));
//!
//! let account = backend.get_account().await?;
//! ```

mod backend;

pub use backend::MockBackend;
