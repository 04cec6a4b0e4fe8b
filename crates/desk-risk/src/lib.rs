//! 주문 입력 검증.
//!
//! 주문 폼의 입력값을 계좌 잔고와 보유 포지션에 대해 검증합니다.
//! 검증은 순수 함수이며, 주문 제출은 검증을 통과한 뒤에만 이루어집니다.
//!
//! # 예제
//!
//! ```rust
//! use desk_core::{AccountSnapshot, Balance, OrderDraft, OrderType, Side, Symbol};
//! use desk_risk::validate_order;
//! use rust_decimal::Decimal;
//!
//! let account = AccountSnapshot::new(vec![Balance::free("USDT", Decimal::from(1000))], vec![]);
//! let draft = OrderDraft::new(Symbol::new("BTC", "USDT"), Side::Buy, OrderType::Limit)
//!     .with_amount("0.01")
//!     .with_price("30000");
//!
//! let order = validate_order(&draft, &account, None).unwrap();
//! assert_eq!(order.total, Decimal::from(300));
//! ```

pub mod validator;

pub use validator::{validate_order, FormField, OrderRejection, OrderValidation};
