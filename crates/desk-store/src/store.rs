//! 상태 저장소.
//!
//! 상태는 `RwLock` 하나로 보호되며 변경은 `dispatch`로만 일어납니다.
//! 상태가 바뀔 때마다 구독자에게 `StateChange`를 브로드캐스트합니다.

use crate::action::Action;
use crate::sequence::{FetchChannel, RequestSeq, RequestSequencer};
use crate::state::AppState;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use tracing::trace;

/// 변경 이벤트 채널 버퍼 크기.
const EVENT_CAPACITY: usize = 256;

/// 상태 변경 알림.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// 변경 후 상태 버전 (1부터 증가)
    pub version: u64,
    /// 변경을 일으킨 액션 이름
    pub action: &'static str,
}

/// 애플리케이션 상태 저장소.
pub struct Store {
    state: RwLock<AppState>,
    version: AtomicU64,
    sequencer: RequestSequencer,
    events: broadcast::Sender<StateChange>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(initial),
            version: AtomicU64::new(0),
            sequencer: RequestSequencer::new(),
            events,
        }
    }

    /// 액션을 적용합니다. 상태가 바뀌었으면 `true`.
    pub async fn dispatch(&self, action: Action) -> bool {
        let mut state = self.state.write().await;
        if !state.reduce(&action) {
            trace!(action = action.name(), "Action ignored");
            return false;
        }

        // 이벤트 순서가 상태 변경 순서와 같도록 락을 쥔 채로 보냅니다.
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(action = action.name(), version, "State changed");
        let _ = self.events.send(StateChange {
            version,
            action: action.name(),
        });
        true
    }

    /// 조회 순번을 발급하고 요청 시작을 기록합니다.
    pub async fn begin_fetch(&self, channel: FetchChannel) -> RequestSeq {
        let seq = self.sequencer.next(channel);
        self.dispatch(Action::FetchStarted { channel, seq }).await;
        seq
    }

    /// 상태 일부를 읽습니다.
    pub async fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    /// 현재 상태 전체의 복사본.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// 상태 변경 이벤트 구독.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.events.subscribe()
    }

    /// 현재 상태 버전.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_core::Symbol;

    fn store() -> Store {
        Store::new(AppState::new(Symbol::new("BTC", "USDT"), vec![]))
    }

    #[tokio::test]
    async fn test_dispatch_notifies_subscribers() {
        let store = store();
        let mut events = store.subscribe();

        assert!(store.dispatch(Action::ToggleSidebar).await);
        let change = events.recv().await.unwrap();
        assert_eq!(change.version, 1);
        assert_eq!(change.action, "toggle_sidebar");

        let open = store.select(|s| s.layout.sidebar_open).await;
        assert!(!open);
    }

    #[tokio::test]
    async fn test_noop_action_does_not_bump_version() {
        let store = store();
        assert!(!store.dispatch(Action::ClearFatal).await);
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn test_begin_fetch_marks_loading() {
        let store = store();
        let seq = store.begin_fetch(FetchChannel::OrderBook).await;
        assert_eq!(seq, 1);
        assert!(store.select(|s| s.trading.order_book.is_loading()).await);
    }
}
