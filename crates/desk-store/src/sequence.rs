//! 요청 순번.
//!
//! 같은 채널의 요청이 겹치면 늦게 도착한 오래된 응답이 새 상태를 덮어쓸 수 있습니다.
//! 채널마다 단조 증가하는 순번을 붙이고, 리듀서는 이미 반영한 순번보다
//! 크지 않은 결과를 버립니다.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// 요청 순번. 0은 "아직 없음"을 뜻합니다.
pub type RequestSeq = u64;

/// 독립적으로 순번을 매기는 조회 채널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchChannel {
    Profile,
    Balances,
    Positions,
    OrderBook,
    DepthChart,
    MarketPulse,
    Klines,
    News,
    Notifications,
    Withdrawals,
}

impl FetchChannel {
    /// 전체 채널 목록.
    pub const ALL: [FetchChannel; 10] = [
        FetchChannel::Profile,
        FetchChannel::Balances,
        FetchChannel::Positions,
        FetchChannel::OrderBook,
        FetchChannel::DepthChart,
        FetchChannel::MarketPulse,
        FetchChannel::Klines,
        FetchChannel::News,
        FetchChannel::Notifications,
        FetchChannel::Withdrawals,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// 로그용 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchChannel::Profile => "profile",
            FetchChannel::Balances => "balances",
            FetchChannel::Positions => "positions",
            FetchChannel::OrderBook => "order_book",
            FetchChannel::DepthChart => "depth_chart",
            FetchChannel::MarketPulse => "market_pulse",
            FetchChannel::Klines => "klines",
            FetchChannel::News => "news",
            FetchChannel::Notifications => "notifications",
            FetchChannel::Withdrawals => "withdrawals",
        }
    }
}

impl std::fmt::Display for FetchChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 채널별 순번 발급기.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    counters: [AtomicU64; FetchChannel::ALL.len()],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 채널의 다음 순번을 발급합니다. 첫 순번은 1입니다.
    pub fn next(&self, channel: FetchChannel) -> RequestSeq {
        self.counters[channel.index()].fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 마지막으로 발급한 순번.
    pub fn current(&self, channel: FetchChannel) -> RequestSeq {
        self.counters[channel.index()].load(Ordering::Relaxed)
    }
}
