//! 데스크 도메인 모델.

mod account;
mod chart;
mod depth;
mod market_data;
mod news;
mod notification;
mod order;
mod position;
mod withdrawal;

pub use account::*;
pub use chart::*;
pub use depth::*;
pub use market_data::*;
pub use news::*;
pub use notification::*;
pub use order::*;
pub use position::*;
pub use withdrawal::*;
