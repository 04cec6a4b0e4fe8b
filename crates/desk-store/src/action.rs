//! 스토어 액션.
//!
//! 리듀서는 액션만 보고 상태를 바꿉니다. 네트워크 호출은 `effects`가 수행한 뒤
//! 결과를 `*Fetched` 액션으로 디스패치합니다.

use crate::sequence::{FetchChannel, RequestSeq};
use crate::state::TradingPair;
use desk_core::{
    Balance, DepthChart, Kline, MarketPulse, NewsArticle, Notification, OrderBookSnapshot,
    OrderDraft, PlacedOrder, Position, Symbol, Theme, UserProfile, Withdrawal, WithdrawalFilter,
};
use desk_risk::FormField;

/// 조회 결과. 에러는 화면에 표시할 메시지로 보관합니다.
pub type FetchResult<T> = Result<T, String>;

/// 상태 변경 요청.
#[derive(Debug, Clone)]
pub enum Action {
    // === 공통 ===
    /// 조회 요청 시작
    FetchStarted { channel: FetchChannel, seq: RequestSeq },
    /// 치명적 에러 표시
    Fatal(String),
    ClearFatal,

    // === 사용자 ===
    ProfileFetched { seq: RequestSeq, result: FetchResult<UserProfile> },
    BalancesFetched { seq: RequestSeq, result: FetchResult<Vec<Balance>> },

    // === 알림 패널 ===
    OpenNotificationPanel,
    CloseNotificationPanel,
    NotificationsFetched { seq: RequestSeq, result: FetchResult<Vec<Notification>> },
    NotificationReceived(Notification),
    MarkNotificationRead(String),
    MarkAllNotificationsRead,
    DeleteNotification(String),

    // === 레이아웃 ===
    ToggleSidebar,
    SetSidebarOpen(bool),
    SetTheme(Theme),
    ToggleTheme,
    ViewportResized(u32),
    RouteChangeStarted(String),
    RouteChangeFinished,

    // === 트레이딩 ===
    SetTradingPairs(Vec<TradingPair>),
    SelectPair(Symbol),
    OrderBookFetched { seq: RequestSeq, result: FetchResult<OrderBookSnapshot> },
    DepthChartFetched { seq: RequestSeq, symbol: Symbol, result: FetchResult<DepthChart> },
    PositionsFetched { seq: RequestSeq, result: FetchResult<Vec<Position>> },
    UpdateOrderDraft(OrderDraft),
    /// 주문 입력 검증 실패
    OrderRejected { field: FormField, reason: String },
    OrderSubmitting,
    OrderPlaced(PlacedOrder),
    OrderFailed(String),
    OrderCancelled(String),

    // === 출금 ===
    WithdrawalsFetched { seq: RequestSeq, result: FetchResult<Vec<Withdrawal>> },
    SetWithdrawalFilter(WithdrawalFilter),

    // === 시장 ===
    MarketPulseFetched { seq: RequestSeq, result: FetchResult<MarketPulse> },
    KlinesFetched { seq: RequestSeq, symbol: Symbol, result: FetchResult<Vec<Kline>> },
    NewsFetched { seq: RequestSeq, result: FetchResult<Vec<NewsArticle>> },
}

impl Action {
    /// 로그와 변경 이벤트에 쓰는 이름.
    pub fn name(&self) -> &'static str {
        match self {
            Action::FetchStarted { .. } => "fetch_started",
            Action::Fatal(_) => "fatal",
            Action::ClearFatal => "clear_fatal",
            Action::ProfileFetched { .. } => "profile_fetched",
            Action::BalancesFetched { .. } => "balances_fetched",
            Action::OpenNotificationPanel => "open_notification_panel",
            Action::CloseNotificationPanel => "close_notification_panel",
            Action::NotificationsFetched { .. } => "notifications_fetched",
            Action::NotificationReceived(_) => "notification_received",
            Action::MarkNotificationRead(_) => "mark_notification_read",
            Action::MarkAllNotificationsRead => "mark_all_notifications_read",
            Action::DeleteNotification(_) => "delete_notification",
            Action::ToggleSidebar => "toggle_sidebar",
            Action::SetSidebarOpen(_) => "set_sidebar_open",
            Action::SetTheme(_) => "set_theme",
            Action::ToggleTheme => "toggle_theme",
            Action::ViewportResized(_) => "viewport_resized",
            Action::RouteChangeStarted(_) => "route_change_started",
            Action::RouteChangeFinished => "route_change_finished",
            Action::SetTradingPairs(_) => "set_trading_pairs",
            Action::SelectPair(_) => "select_pair",
            Action::OrderBookFetched { .. } => "order_book_fetched",
            Action::DepthChartFetched { .. } => "depth_chart_fetched",
            Action::PositionsFetched { .. } => "positions_fetched",
            Action::UpdateOrderDraft(_) => "update_order_draft",
            Action::OrderRejected { .. } => "order_rejected",
            Action::OrderSubmitting => "order_submitting",
            Action::OrderPlaced(_) => "order_placed",
            Action::OrderFailed(_) => "order_failed",
            Action::OrderCancelled(_) => "order_cancelled",
            Action::WithdrawalsFetched { .. } => "withdrawals_fetched",
            Action::SetWithdrawalFilter(_) => "set_withdrawal_filter",
            Action::MarketPulseFetched { .. } => "market_pulse_fetched",
            Action::KlinesFetched { .. } => "klines_fetched",
            Action::NewsFetched { .. } => "news_fetched",
        }
    }
}
