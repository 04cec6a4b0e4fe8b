//! 외부 연동 trait 정의.

use async_trait::async_trait;
use desk_core::{
    AccountSnapshot, Balance, Interval, Kline, MarketPulse, NewsArticle, Notification,
    OrderBookSnapshot, OrderRequest, PlacedOrder, Position, RawDepth, Stats24h, Symbol,
    TickerPrice, UserProfile, Withdrawal,
};

use crate::ExchangeError;

/// 외부 연동 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 공개 시장 데이터 조회 인터페이스.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 제공자 이름 반환.
    fn name(&self) -> &str;

    /// 최근 체결가 조회.
    async fn get_price(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice>;

    /// 전체 거래쌍의 최근 체결가 조회.
    async fn get_prices(&self) -> ExchangeResult<Vec<TickerPrice>>;

    /// 원본 호가 데이터 조회.
    async fn get_depth(&self, symbol: &Symbol, limit: u32) -> ExchangeResult<RawDepth>;

    /// 호가를 조회해 누적 수량이 붙은 호가창으로 집계합니다.
    async fn get_order_book(&self, symbol: &Symbol, limit: u32) -> ExchangeResult<OrderBookSnapshot> {
        let raw = self.get_depth(symbol, limit).await?;
        Ok(OrderBookSnapshot::from_raw(symbol.clone(), &raw)?)
    }

    /// 24시간 통계 조회.
    async fn get_24h_stats(&self, symbol: &Symbol) -> ExchangeResult<Stats24h>;

    /// 여러 거래쌍의 24시간 통계를 동시에 조회합니다.
    ///
    /// 하나라도 실패하면 전체가 실패합니다.
    async fn get_market_pulse(&self, symbols: &[Symbol]) -> ExchangeResult<MarketPulse> {
        let stats =
            futures::future::try_join_all(symbols.iter().map(|s| self.get_24h_stats(s))).await?;
        Ok(MarketPulse::new(stats))
    }

    /// 캔들스틱 조회.
    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u32,
    ) -> ExchangeResult<Vec<Kline>>;
}

/// 인증이 필요한 계좌/주문 작업을 대행하는 백엔드 인터페이스.
///
/// 실제 서버는 이 저장소 밖에 있으며, 여기서는 계약만 정의합니다.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// 백엔드 이름 반환.
    fn name(&self) -> &str;

    // === 계좌 ===

    /// 자산별 잔고 조회.
    async fn get_balances(&self) -> ExchangeResult<Vec<Balance>>;

    /// 보유 포지션 조회.
    async fn get_positions(&self) -> ExchangeResult<Vec<Position>>;

    /// 주문 검증용 계좌 스냅샷 (잔고 + 포지션).
    async fn get_account(&self) -> ExchangeResult<AccountSnapshot> {
        let (balances, positions) =
            futures::future::try_join(self.get_balances(), self.get_positions()).await?;
        Ok(AccountSnapshot::new(balances, positions))
    }

    // === 주문 ===

    /// 검증된 주문 제출.
    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<PlacedOrder>;

    /// 주문 취소.
    async fn cancel_order(&self, order_id: &str) -> ExchangeResult<()>;

    // === 조회 ===

    /// 심볼별 시장 데이터 조회.
    async fn get_market_data(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice>;

    /// 알림 목록 조회 (최신순).
    async fn get_notifications(&self) -> ExchangeResult<Vec<Notification>>;

    /// 출금 내역 조회.
    async fn get_withdrawals(&self) -> ExchangeResult<Vec<Withdrawal>>;

    /// 사용자 프로필 조회.
    async fn get_profile(&self) -> ExchangeResult<UserProfile>;
}

/// 뉴스 피드 인터페이스.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// 최신 기사 조회.
    ///
    /// `category`가 없으면 설정된 기본 검색어를 사용합니다.
    async fn latest(&self, category: Option<&str>, limit: u32) -> ExchangeResult<Vec<NewsArticle>>;
}
