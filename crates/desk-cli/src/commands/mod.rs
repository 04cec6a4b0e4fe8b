//! CLI 명령어 구현 모듈.

pub mod account;
pub mod chart;
pub mod context;
pub mod market;
pub mod news;
pub mod order;
pub mod settings;
pub mod watch;
