//! 애플리케이션 상태.
//!
//! 슬라이스마다 자기 리듀서를 가지며, `AppState::reduce`가 모든 슬라이스에
//! 액션을 전달합니다. 리듀서는 I/O 없이 상태만 바꿉니다.

mod fetch;
mod layout;
mod market;
mod notifications;
mod trading;
mod user;
mod withdrawals;

pub use fetch::FetchState;
pub use layout::{Breakpoint, LayoutState, DESKTOP_MIN_WIDTH, TABLET_MIN_WIDTH};
pub use market::MarketState;
pub use notifications::{NotificationsState, PanelContent, PanelState};
pub use trading::{OrderFormState, TradingPair, TradingState};
pub use user::UserState;
pub use withdrawals::WithdrawalsState;

use crate::action::Action;
use desk_core::{AccountSnapshot, AppConfig, ChartWidgetConfig, Price, Symbol, Theme};
use tracing::warn;

/// 전체 상태 트리.
#[derive(Debug, Clone)]
pub struct AppState {
    pub user: UserState,
    pub notifications: NotificationsState,
    pub layout: LayoutState,
    pub trading: TradingState,
    pub withdrawals: WithdrawalsState,
    pub market: MarketState,
    /// 치명적 에러 (하나만 보관)
    pub fatal_error: Option<String>,
}

impl AppState {
    /// 기본 거래쌍으로 초기 상태를 만듭니다.
    pub fn new(selected: Symbol, pairs: Vec<TradingPair>) -> Self {
        Self {
            user: UserState::default(),
            notifications: NotificationsState::default(),
            layout: LayoutState::default(),
            market: MarketState::for_pair(selected.clone()),
            trading: TradingState::new(selected, pairs),
            withdrawals: WithdrawalsState::default(),
            fatal_error: None,
        }
    }

    /// 설정의 기본 거래쌍, 관심 목록, 차트 테마로 초기 상태를 만듭니다.
    ///
    /// 해석할 수 없는 심볼은 건너뜁니다.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut pairs: Vec<TradingPair> = config
            .market_data
            .watch_list
            .iter()
            .filter_map(|s| {
                let symbol = Symbol::parse(s);
                if symbol.is_none() {
                    warn!(symbol = %s, "Ignoring unknown symbol in watch list");
                }
                symbol
            })
            .map(TradingPair::from)
            .collect();

        let selected = Symbol::parse(&config.market_data.default_symbol)
            .or_else(|| pairs.first().map(|p| p.symbol.clone()))
            .unwrap_or_else(|| Symbol::new("BTC", "USDT"));
        if !pairs.iter().any(|p| p.symbol == selected) {
            pairs.insert(0, TradingPair::from(selected.clone()));
        }

        let mut state = Self::new(selected, pairs);
        state.layout.theme = config.chart.theme.parse().unwrap_or(Theme::Dark);
        state
    }

    /// 액션을 모든 슬라이스에 적용합니다. 상태가 바뀌었으면 `true`.
    pub fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::Fatal(message) => {
                self.fatal_error = Some(message.clone());
                return true;
            }
            Action::ClearFatal => return self.fatal_error.take().is_some(),
            _ => {}
        }

        // 모든 슬라이스가 액션을 보도록 단락 평가를 피합니다.
        let mut changed = self.user.reduce(action);
        changed |= self.notifications.reduce(action);
        changed |= self.layout.reduce(action);
        changed |= self.trading.reduce(action);
        changed |= self.withdrawals.reduce(action);
        changed |= self.market.reduce(action);
        changed
    }

    // === 셀렉터 ===

    /// 주문 검증용 계좌 스냅샷.
    pub fn account_snapshot(&self) -> AccountSnapshot {
        AccountSnapshot::new(
            self.user.balances.data.clone().unwrap_or_default(),
            self.trading.positions().to_vec(),
        )
    }

    /// 시장가 주문에 쓸 참조 가격.
    ///
    /// 마켓 펄스의 최근 체결가를 먼저 쓰고, 없으면 선택된 거래쌍 호가의 중간 가격을 씁니다.
    pub fn reference_price(&self, symbol: &Symbol) -> Option<Price> {
        self.market.last_price(symbol).or_else(|| {
            self.trading
                .order_book
                .data
                .as_ref()
                .filter(|book| &book.symbol == symbol)
                .and_then(|book| book.mid_price())
        })
    }

    /// 현재 거래쌍과 테마로 차트 위젯 설정을 만듭니다.
    pub fn chart_widget(&self, config: &AppConfig) -> ChartWidgetConfig {
        ChartWidgetConfig::from_defaults(&self.trading.selected, &config.chart)
            .with_theme(self.layout.theme)
    }
}
