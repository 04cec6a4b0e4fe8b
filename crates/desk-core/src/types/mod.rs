//! 데스크 전반에서 사용되는 공통 타입.

mod decimal;
mod interval;
mod symbol;

pub use decimal::*;
pub use interval::*;
pub use symbol::*;
