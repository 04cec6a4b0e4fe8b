//! 이펙트 (비동기 액션 처리기).
//!
//! 네트워크 호출을 수행하고 결과를 액션으로 디스패치합니다. 모든 조회는
//! 먼저 순번을 발급받고, 응답에 그 순번을 붙여 보내므로 늦게 도착한 응답은
//! 리듀서에서 버려집니다.

use crate::action::{Action, FetchResult};
use crate::error::{StoreError, StoreResult};
use crate::sequence::FetchChannel;
use crate::store::Store;
use desk_core::{
    AppConfig, Interval, Notification, OrderDraft, OrderType, PlacedOrder, Symbol,
};
use desk_exchange::{AccountBackend, ExchangeResult, MarketDataProvider, NewsProvider};
use desk_risk::validate_order;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 이펙트 동작 설정.
#[derive(Debug, Clone)]
pub struct EffectsConfig {
    /// 호가창 조회 깊이
    pub depth_limit: u32,
    /// 마켓 펄스 거래쌍
    pub watch_list: Vec<Symbol>,
    /// 캔들 조회 개수
    pub kline_limit: u32,
    /// 뉴스 기사 수
    pub news_limit: u32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            depth_limit: 20,
            watch_list: Vec::new(),
            kline_limit: 100,
            news_limit: 10,
        }
    }
}

impl EffectsConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            depth_limit: config.market_data.depth_limit,
            watch_list: config
                .market_data
                .watch_list
                .iter()
                .filter_map(|s| Symbol::parse(s))
                .collect(),
            news_limit: config.news.page_size,
            ..Default::default()
        }
    }
}

/// 스토어와 외부 연동을 묶은 이펙트 실행기.
#[derive(Clone)]
pub struct Effects {
    store: Arc<Store>,
    market: Arc<dyn MarketDataProvider>,
    backend: Arc<dyn AccountBackend>,
    news: Option<Arc<dyn NewsProvider>>,
    config: EffectsConfig,
}

impl Effects {
    pub fn new(
        store: Arc<Store>,
        market: Arc<dyn MarketDataProvider>,
        backend: Arc<dyn AccountBackend>,
        config: EffectsConfig,
    ) -> Self {
        Self {
            store,
            market,
            backend,
            news: None,
            config,
        }
    }

    /// 뉴스 제공자를 설정합니다.
    pub fn with_news(mut self, news: Arc<dyn NewsProvider>) -> Self {
        self.news = Some(news);
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// 결과를 액션으로 디스패치하고 에러를 호출자에게도 돌려줍니다.
    async fn finish<T, F>(&self, result: ExchangeResult<T>, to_action: F) -> StoreResult<()>
    where
        F: FnOnce(FetchResult<T>) -> Action,
    {
        match result {
            Ok(data) => {
                self.store.dispatch(to_action(Ok(data))).await;
                Ok(())
            }
            Err(e) => {
                self.store.dispatch(to_action(Err(e.to_string()))).await;
                Err(e.into())
            }
        }
    }

    // === 시장 데이터 ===

    /// 선택된 거래쌍의 호가창을 새로 가져옵니다.
    pub async fn fetch_order_book(&self) -> StoreResult<()> {
        let symbol = self.store.select(|s| s.trading.selected.clone()).await;
        let seq = self.store.begin_fetch(FetchChannel::OrderBook).await;
        let result = self
            .market
            .get_order_book(&symbol, self.config.depth_limit)
            .await;
        self.finish(result, |result| Action::OrderBookFetched { seq, result })
            .await
    }

    /// 선택된 거래쌍의 뎁스 차트를 새로 가져옵니다.
    pub async fn fetch_depth_chart(&self) -> StoreResult<()> {
        let symbol = self.store.select(|s| s.trading.selected.clone()).await;
        let seq = self.store.begin_fetch(FetchChannel::DepthChart).await;
        let result = self
            .market
            .get_order_book(&symbol, self.config.depth_limit)
            .await
            .map(|book| book.depth_chart());
        self.finish(result, |result| Action::DepthChartFetched {
            seq,
            symbol,
            result,
        })
        .await
    }

    /// 관심 거래쌍의 24시간 통계를 가져옵니다.
    pub async fn fetch_market_pulse(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::MarketPulse).await;
        let result = self.market.get_market_pulse(&self.config.watch_list).await;
        self.finish(result, |result| Action::MarketPulseFetched { seq, result })
            .await
    }

    /// 선택된 거래쌍의 캔들을 가져옵니다.
    pub async fn fetch_klines(&self, interval: Interval) -> StoreResult<()> {
        let symbol = self.store.select(|s| s.trading.selected.clone()).await;
        let seq = self.store.begin_fetch(FetchChannel::Klines).await;
        let result = self
            .market
            .get_klines(&symbol, interval, self.config.kline_limit)
            .await;
        self.finish(result, |result| Action::KlinesFetched {
            seq,
            symbol,
            result,
        })
        .await
    }

    /// 최신 뉴스를 가져옵니다.
    pub async fn fetch_news(&self, category: Option<&str>) -> StoreResult<()> {
        let news = self.news.as_ref().ok_or(StoreError::NewsUnavailable)?;
        let seq = self.store.begin_fetch(FetchChannel::News).await;
        let result = news.latest(category, self.config.news_limit).await;
        self.finish(result, |result| Action::NewsFetched { seq, result })
            .await
    }

    /// 거래쌍을 바꾸고 호가창을 바로 다시 가져옵니다.
    pub async fn select_pair(&self, symbol: Symbol) -> StoreResult<()> {
        if self.store.dispatch(Action::SelectPair(symbol)).await {
            self.fetch_order_book().await?;
        }
        Ok(())
    }

    // === 계좌 ===

    pub async fn fetch_profile(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::Profile).await;
        let result = self.backend.get_profile().await;
        self.finish(result, |result| Action::ProfileFetched { seq, result })
            .await
    }

    pub async fn fetch_balances(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::Balances).await;
        let result = self.backend.get_balances().await;
        self.finish(result, |result| Action::BalancesFetched { seq, result })
            .await
    }

    /// 포지션을 가져와 마켓 펄스의 최근가로 다시 평가합니다.
    pub async fn fetch_positions(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::Positions).await;
        let result = self.backend.get_positions().await;
        let result = match result {
            Ok(mut positions) => {
                self.store
                    .select(|s| {
                        for position in &mut positions {
                            if let Some(price) = s.market.last_price(&position.symbol) {
                                position.revalue(price);
                            }
                        }
                    })
                    .await;
                Ok(positions)
            }
            Err(e) => Err(e),
        };
        self.finish(result, |result| Action::PositionsFetched { seq, result })
            .await
    }

    pub async fn fetch_withdrawals(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::Withdrawals).await;
        let result = self.backend.get_withdrawals().await;
        self.finish(result, |result| Action::WithdrawalsFetched { seq, result })
            .await
    }

    // === 알림 ===

    pub async fn fetch_notifications(&self) -> StoreResult<()> {
        let seq = self.store.begin_fetch(FetchChannel::Notifications).await;
        let result = self.backend.get_notifications().await;
        self.finish(result, |result| Action::NotificationsFetched { seq, result })
            .await
    }

    /// 알림 패널을 엽니다. 닫혀 있었다면 목록을 새로 가져옵니다.
    pub async fn open_notification_panel(&self) -> StoreResult<()> {
        if self.store.dispatch(Action::OpenNotificationPanel).await {
            self.fetch_notifications().await?;
        }
        Ok(())
    }

    // === 주문 ===

    /// 주문 초안을 검증하고 통과하면 백엔드에 제출합니다.
    ///
    /// 검증 실패는 폼 필드 에러로, 제출 실패는 배너 메시지와 알림으로 기록됩니다.
    pub async fn place_order(&self, draft: OrderDraft) -> StoreResult<PlacedOrder> {
        self.store
            .dispatch(Action::UpdateOrderDraft(draft.clone()))
            .await;

        let account_loaded = self
            .store
            .select(|s| s.user.balances.data.is_some() && s.trading.positions.data.is_some())
            .await;
        if !account_loaded {
            let (balances, positions) =
                tokio::join!(self.fetch_balances(), self.fetch_positions());
            for err in [balances.err(), positions.err()].into_iter().flatten() {
                warn!(error = %err, "Account refresh before order failed");
            }
        }

        let (account, mut market_price) = self
            .store
            .select(|s| (s.account_snapshot(), s.reference_price(&draft.symbol)))
            .await;
        if draft.order_type == OrderType::Market && market_price.is_none() {
            market_price = match self.market.get_price(&draft.symbol).await {
                Ok(ticker) => Some(ticker.price),
                Err(e) => {
                    warn!(symbol = %draft.symbol, error = %e, "Reference price unavailable");
                    None
                }
            };
        }

        let request = match validate_order(&draft, &account, market_price) {
            Ok(request) => request,
            Err(rejection) => {
                self.store
                    .dispatch(Action::OrderRejected {
                        field: rejection.field(),
                        reason: rejection.to_string(),
                    })
                    .await;
                return Err(rejection.into());
            }
        };

        self.store.dispatch(Action::OrderSubmitting).await;
        debug!(symbol = %request.symbol, side = %request.side, total = %request.total, "Submitting order");

        match self.backend.place_order(&request).await {
            Ok(placed) => {
                info!(order_id = %placed.id, symbol = %request.symbol, "Order accepted");
                self.store.dispatch(Action::OrderPlaced(placed.clone())).await;
                self.store
                    .dispatch(Action::NotificationReceived(Notification::order_placed(
                        &placed,
                    )))
                    .await;
                self.refresh_account().await;
                Ok(placed)
            }
            Err(e) => {
                warn!(symbol = %request.symbol, error = %e, "Order submission failed");
                self.store.dispatch(Action::OrderFailed(e.to_string())).await;
                self.store
                    .dispatch(Action::NotificationReceived(Notification::order_failed(
                        e.to_string(),
                    )))
                    .await;
                Err(e.into())
            }
        }
    }

    /// 주문을 취소합니다.
    pub async fn cancel_order(&self, order_id: &str) -> StoreResult<()> {
        self.backend.cancel_order(order_id).await?;
        self.store
            .dispatch(Action::OrderCancelled(order_id.to_string()))
            .await;
        self.refresh_account().await;
        Ok(())
    }

    async fn refresh_account(&self) {
        let (balances, positions) = tokio::join!(self.fetch_balances(), self.fetch_positions());
        for err in [balances.err(), positions.err()].into_iter().flatten() {
            warn!(error = %err, "Account refresh failed");
        }
    }

    /// 첫 화면에 필요한 데이터를 동시에 가져옵니다.
    ///
    /// 개별 실패는 각 슬라이스의 에러로 남기고 로그만 기록합니다.
    pub async fn bootstrap(&self) {
        let results = tokio::join!(
            self.fetch_profile(),
            self.fetch_balances(),
            self.fetch_market_pulse(),
            self.fetch_withdrawals(),
            self.fetch_notifications(),
            self.fetch_order_book(),
        );
        // 포지션 평가에 마켓 펄스 가격이 필요하므로 따로 가져옵니다.
        let positions = self.fetch_positions().await;

        let failures = [
            ("profile", results.0),
            ("balances", results.1),
            ("market_pulse", results.2),
            ("withdrawals", results.3),
            ("notifications", results.4),
            ("order_book", results.5),
            ("positions", positions),
        ];
        for (channel, result) in failures {
            if let Err(e) = result {
                warn!(channel, error = %e, "Initial fetch failed");
            }
        }
    }
}
