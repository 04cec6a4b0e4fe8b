//! 대시보드 상태 저장소, 이펙트 및 폴링.
//!
//! 이 crate는 다음을 제공합니다:
//! - 슬라이스별 리듀서로 구성된 `AppState`와 단일 `Store`
//! - 외부 호출 결과를 액션으로 바꾸는 `Effects`
//! - 요청 순번 기반의 오래된 응답 무시
//! - 취소 가능한 주기적 폴러
//!
//! # 예제
//!
//! ```rust,ignore
//! use desk_store::{AppState, Effects, EffectsConfig, Pollers, Store};
//!
//! let store = Arc::new(Store::new(AppState::from_config(&config)));
//! let effects = Effects::new(store.clone(), market, backend, EffectsConfig::from_config(&config));
//! effects.bootstrap().await;
//!
//! let shutdown = CancellationToken::new();
//! let pollers = Pollers::start(effects, &config.polling, &shutdown);
//! ```

pub mod action;
pub mod effects;
pub mod error;
pub mod polling;
pub mod sequence;
pub mod state;
pub mod store;

// 주요 타입 재내보내기
pub use action::{Action, FetchResult};
pub use effects::{Effects, EffectsConfig};
pub use error::{StoreError, StoreResult};
pub use polling::{Poller, Pollers};
pub use sequence::{FetchChannel, RequestSeq, RequestSequencer};
pub use state::*;
pub use store::{StateChange, Store};
