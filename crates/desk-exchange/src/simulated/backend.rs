//! 메모리 기반 모의 백엔드.

use crate::traits::{AccountBackend, ExchangeResult};
use crate::ExchangeError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use desk_core::{
    AccountConfig, Balance, Notification, NotificationKind, OrderRequest, OrderStatus, OrderType,
    PlacedOrder, Position, Price, Side, Symbol, TickerPrice, UserProfile, Withdrawal,
    WithdrawalStatus,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 내부 계좌 상태.
#[derive(Debug, Clone, Default)]
struct AccountState {
    /// 자산별 잔고 (키는 대문자)
    balances: HashMap<String, Balance>,
    /// 심볼별 포지션
    positions: HashMap<Symbol, Position>,
    /// 접수된 주문
    orders: HashMap<String, PlacedOrder>,
    /// 심볼별 참조 가격
    prices: HashMap<Symbol, Price>,
    notifications: Vec<Notification>,
    withdrawals: Vec<Withdrawal>,
}

impl AccountState {
    fn update_balance(&mut self, asset: &str, free_delta: Decimal, locked_delta: Decimal) {
        let asset = asset.to_uppercase();
        let balance = self
            .balances
            .entry(asset.clone())
            .or_insert_with(|| Balance::free(asset, Decimal::ZERO));

        balance.free += free_delta;
        balance.locked += locked_delta;
    }

    /// 자산의 사용 가능 잔고.
    fn free(&self, asset: &str) -> Decimal {
        self.balances
            .get(&asset.to_uppercase())
            .map(|b| b.free)
            .unwrap_or(Decimal::ZERO)
    }

    /// 미체결 매도 주문에 묶이지 않은 포지션 수량.
    fn unreserved_position(&self, symbol: &Symbol) -> Decimal {
        let held = self
            .positions
            .get(symbol)
            .map(|p| p.amount)
            .unwrap_or(Decimal::ZERO);
        let reserved: Decimal = self
            .orders
            .values()
            .filter(|o| {
                o.status == OrderStatus::Open
                    && o.request.side == Side::Sell
                    && &o.request.symbol == symbol
            })
            .map(|o| o.request.amount)
            .sum();
        held - reserved
    }

    /// 체결된 수량만큼 포지션을 늘리거나 줄입니다.
    fn apply_fill(&mut self, symbol: &Symbol, side: Side, amount: Decimal, price: Price) {
        let current = self.prices.get(symbol).copied().unwrap_or(price);
        match side {
            Side::Buy => {
                let position = self
                    .positions
                    .entry(symbol.clone())
                    .or_insert_with(|| Position::new(symbol.clone(), Decimal::ZERO, price, price));
                let cost = position.cost_basis() + amount * price;
                position.amount += amount;
                position.avg_price = cost / position.amount;
                position.revalue(current);
            }
            Side::Sell => {
                if let Some(position) = self.positions.get_mut(symbol) {
                    position.amount -= amount;
                    position.revalue(current);
                    if position.amount <= Decimal::ZERO {
                        self.positions.remove(symbol);
                    }
                }
            }
        }
    }
}

/// 모의 백엔드.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<RwLock<AccountState>>,
    profile: UserProfile,
}

impl MockBackend {
    /// 비어 있는 모의 백엔드를 생성합니다.
    pub fn new() -> Self {
        Self::with_state(AccountState::default())
    }

    fn with_state(state: AccountState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            profile: UserProfile {
                id: "demo".to_string(),
                display_name: "Demo Trader".to_string(),
                email: "demo@example.com".to_string(),
                verification_level: 1,
                created_at: Utc::now() - Duration::days(30),
            },
        }
    }

    /// 모의 계좌 설정으로 잔고, 포지션, 샘플 알림과 출금 내역을 채웁니다.
    ///
    /// 해석할 수 없는 심볼의 포지션은 건너뜁니다.
    pub fn from_config(config: &AccountConfig) -> Self {
        let mut state = AccountState::default();

        for (asset, amount) in &config.balances {
            state.update_balance(asset, *amount, Decimal::ZERO);
        }

        for seed in &config.positions {
            let Some(symbol) = Symbol::parse(&seed.symbol) else {
                debug!(symbol = %seed.symbol, "Skipping position seed with unknown symbol");
                continue;
            };
            state.prices.insert(symbol.clone(), seed.avg_price);
            state.positions.insert(
                symbol.clone(),
                Position::new(symbol, seed.amount, seed.avg_price, seed.avg_price),
            );
        }

        state.notifications = sample_notifications();
        state.withdrawals = sample_withdrawals();

        Self::with_state(state)
    }

    /// 심볼의 참조 가격을 설정합니다. 보유 포지션도 다시 평가합니다.
    pub fn with_price(self, symbol: Symbol, price: Price) -> Self {
        if let Ok(mut state) = self.state.try_write() {
            if let Some(position) = state.positions.get_mut(&symbol) {
                position.revalue(price);
            }
            state.prices.insert(symbol, price);
        }
        self
    }

    /// 실행 중 참조 가격을 갱신합니다.
    pub async fn set_price(&self, symbol: Symbol, price: Price) {
        let mut state = self.state.write().await;
        if let Some(position) = state.positions.get_mut(&symbol) {
            position.revalue(price);
        }
        state.prices.insert(symbol, price);
    }

    /// 알림을 추가합니다 (최신순 유지).
    pub async fn push_notification(&self, notification: Notification) {
        self.state.write().await.notifications.insert(0, notification);
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_balances(&self) -> ExchangeResult<Vec<Balance>> {
        let state = self.state.read().await;
        let mut balances: Vec<Balance> = state.balances.values().cloned().collect();
        balances.sort_by(|a, b| a.asset.cmp(&b.asset));
        Ok(balances)
    }

    async fn get_positions(&self) -> ExchangeResult<Vec<Position>> {
        let state = self.state.read().await;
        let mut positions: Vec<Position> = state.positions.values().cloned().collect();
        positions.sort_by(|a, b| a.symbol.to_string().cmp(&b.symbol.to_string()));
        Ok(positions)
    }

    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<PlacedOrder> {
        let mut state = self.state.write().await;
        let symbol = &request.symbol;

        match request.side {
            Side::Buy if request.total > state.free(&symbol.quote) => {
                return Err(ExchangeError::OrderRejected("insufficient balance".to_string()));
            }
            Side::Sell if request.amount > state.unreserved_position(symbol) => {
                return Err(ExchangeError::OrderRejected(
                    "insufficient asset balance".to_string(),
                ));
            }
            _ => {}
        }

        let status = match (request.order_type, request.side) {
            (OrderType::Market, Side::Buy) => {
                let price = request.total / request.amount;
                state.update_balance(&symbol.quote, -request.total, Decimal::ZERO);
                state.update_balance(&symbol.base, request.amount, Decimal::ZERO);
                state.apply_fill(symbol, Side::Buy, request.amount, price);
                OrderStatus::Filled
            }
            (OrderType::Market, Side::Sell) => {
                let price = request.total / request.amount;
                state.update_balance(&symbol.quote, request.total, Decimal::ZERO);
                state.update_balance(&symbol.base, -request.amount, Decimal::ZERO);
                state.apply_fill(symbol, Side::Sell, request.amount, price);
                OrderStatus::Filled
            }
            (_, Side::Buy) => {
                // 지정가/스톱 매수는 호가 자산을 묶어 둡니다.
                state.update_balance(&symbol.quote, -request.total, request.total);
                OrderStatus::Open
            }
            // 지정가/스톱 매도는 포지션 수량을 예약만 합니다.
            (_, Side::Sell) => OrderStatus::Open,
        };

        let placed = PlacedOrder {
            id: uuid::Uuid::new_v4().to_string(),
            request: request.clone(),
            status,
            placed_at: Utc::now(),
        };
        state.orders.insert(placed.id.clone(), placed.clone());

        info!(
            order_id = %placed.id,
            symbol = %symbol,
            side = %request.side,
            status = ?status,
            "Mock order accepted"
        );

        Ok(placed)
    }

    async fn cancel_order(&self, order_id: &str) -> ExchangeResult<()> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| ExchangeError::OrderNotFound(order_id.to_string()))?;

        if order.status.is_final() {
            return Err(ExchangeError::OrderRejected(format!(
                "order {} is already {:?}",
                order_id, order.status
            )));
        }

        if order.request.side == Side::Buy {
            let total = order.request.total;
            state.update_balance(&order.request.symbol.quote, total, -total);
        }

        if let Some(stored) = state.orders.get_mut(order_id) {
            stored.status = OrderStatus::Cancelled;
        }
        info!(order_id, "Mock order cancelled");
        Ok(())
    }

    async fn get_market_data(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice> {
        let state = self.state.read().await;
        state
            .prices
            .get(symbol)
            .map(|price| TickerPrice {
                symbol: symbol.clone(),
                price: *price,
            })
            .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_notifications(&self) -> ExchangeResult<Vec<Notification>> {
        Ok(self.state.read().await.notifications.clone())
    }

    async fn get_withdrawals(&self) -> ExchangeResult<Vec<Withdrawal>> {
        Ok(self.state.read().await.withdrawals.clone())
    }

    async fn get_profile(&self) -> ExchangeResult<UserProfile> {
        Ok(self.profile.clone())
    }
}

fn sample_notifications() -> Vec<Notification> {
    let mut welcome = Notification::new(
        NotificationKind::Info,
        "Welcome",
        "Demo account ready. Orders are simulated.",
    );
    welcome.timestamp = Utc::now() - Duration::hours(2);

    let mut maintenance = Notification::new(
        NotificationKind::Warning,
        "Scheduled maintenance",
        "Withdrawals on ERC20 may be delayed tonight.",
    );
    maintenance.timestamp = Utc::now() - Duration::minutes(30);

    vec![maintenance, welcome]
}

fn sample_withdrawals() -> Vec<Withdrawal> {
    let now = Utc::now();
    vec![
        Withdrawal {
            id: "wd-1003".to_string(),
            asset: "USDT".to_string(),
            amount: Decimal::new(25000, 2),
            fee: Decimal::ONE,
            address: "0x8f3c...a21d".to_string(),
            network: "ERC20".to_string(),
            status: WithdrawalStatus::Pending,
            tx_id: None,
            timestamp: now - Duration::hours(1),
        },
        Withdrawal {
            id: "wd-1002".to_string(),
            asset: "BTC".to_string(),
            amount: Decimal::new(5, 2),
            fee: Decimal::new(2, 4),
            address: "bc1q...9xk2".to_string(),
            network: "BTC".to_string(),
            status: WithdrawalStatus::Completed,
            tx_id: Some("3b1f...e7a0".to_string()),
            timestamp: now - Duration::days(2),
        },
        Withdrawal {
            id: "wd-1001".to_string(),
            asset: "USDT".to_string(),
            amount: Decimal::new(100000, 2),
            fee: Decimal::ONE,
            address: "TX9a...Q4m1".to_string(),
            network: "TRC20".to_string(),
            status: WithdrawalStatus::Completed,
            tx_id: Some("c0de...42ab".to_string()),
            timestamp: now - Duration::days(7),
        },
    ]
}
