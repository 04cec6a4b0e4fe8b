//! 외부 서비스 커넥터.

pub mod backend;
pub mod binance;
pub mod news;

pub use backend::BackendClient;
pub use binance::BinanceClient;
pub use news::NewsClient;
