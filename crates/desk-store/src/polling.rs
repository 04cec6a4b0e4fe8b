//! 주기적 폴링.
//!
//! 각 폴러는 별도 태스크에서 `interval`로 작업을 반복하며, 취소 토큰이 취소되면
//! 진행 중인 요청을 버리고 즉시 종료합니다. 첫 실행은 시작 직후에 일어납니다.

use crate::effects::Effects;
use crate::error::StoreResult;
use desk_core::{poll_span, PollingConfig};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// 하나의 폴링 태스크.
pub struct Poller {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// 폴러를 시작합니다.
    ///
    /// `parent`가 취소되면 이 폴러도 함께 멈춥니다.
    pub fn spawn<F, Fut>(
        name: &'static str,
        period: Duration,
        parent: &CancellationToken,
        task: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<()>> + Send + 'static,
    {
        let token = parent.child_token();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            info!(poller = name, period_secs = period.as_secs_f64(), "Poller started");
            let mut ticker = interval(period);
            // 느린 응답 뒤에 밀린 틱을 몰아서 실행하지 않습니다.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = cancelled.cancelled() => {
                                debug!(poller = name, "In-flight poll dropped");
                                break;
                            }
                            result = task() => {
                                if let Err(e) = result {
                                    if e.is_retryable() {
                                        warn!(poller = name, error = %e, "Poll failed, retrying next tick");
                                    } else {
                                        error!(poller = name, error = %e, "Poll failed");
                                    }
                                }
                            }
                        }
                    }
                }
            }
            info!(poller = name, "Poller stopped");
        }
        .instrument(poll_span!(name)));

        Self {
            name,
            token,
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 종료를 요청합니다. 태스크가 끝날 때까지 기다리지는 않습니다.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 종료를 요청하고 태스크가 끝날 때까지 기다립니다.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            error!(poller = self.name, error = %e, "Poller task panicked");
        }
    }
}

/// 대시보드 화면의 폴러 묶음.
pub struct Pollers {
    pollers: Vec<Poller>,
}

impl Pollers {
    /// 호가창, 뎁스 차트, 마켓 펄스, 알림 폴러를 시작합니다.
    pub fn start(effects: Effects, config: &PollingConfig, shutdown: &CancellationToken) -> Self {
        let order_book = effects.clone();
        let depth_chart = effects.clone();
        let market_pulse = effects.clone();
        let notifications = effects;

        let pollers = vec![
            Poller::spawn("order_book", config.order_book(), shutdown, move || {
                let effects = order_book.clone();
                async move { effects.fetch_order_book().await }
            }),
            Poller::spawn("depth_chart", config.depth_chart(), shutdown, move || {
                let effects = depth_chart.clone();
                async move { effects.fetch_depth_chart().await }
            }),
            Poller::spawn("market_pulse", config.market_pulse(), shutdown, move || {
                let effects = market_pulse.clone();
                async move { effects.fetch_market_pulse().await }
            }),
            Poller::spawn("notifications", config.notifications(), shutdown, move || {
                let effects = notifications.clone();
                async move { effects.fetch_notifications().await }
            }),
        ];

        Self { pollers }
    }

    /// 실행 중인 폴러 이름.
    pub fn names(&self) -> Vec<&'static str> {
        self.pollers.iter().map(Poller::name).collect()
    }

    /// 이름이 같은 폴러 하나를 멈춥니다. 없으면 `false`.
    pub async fn stop_one(&mut self, name: &str) -> bool {
        match self.pollers.iter().position(|p| p.name == name) {
            Some(index) => {
                self.pollers.swap_remove(index).stop().await;
                true
            }
            None => false,
        }
    }

    /// 모든 폴러를 멈추고 종료를 기다립니다.
    pub async fn shutdown(self) {
        for poller in self.pollers {
            poller.stop().await;
        }
    }
}
