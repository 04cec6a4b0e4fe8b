//! 트레이딩 슬라이스 (거래쌍, 호가창, 뎁스 차트, 포지션, 주문 폼).

use crate::action::Action;
use crate::sequence::FetchChannel;
use crate::state::fetch::FetchState;
use desk_core::{
    DepthChart, OrderBookSnapshot, OrderDraft, OrderStatus, OrderType, PlacedOrder,
    PortfolioSummary, Position, Side, Symbol,
};
use desk_risk::FormField;

/// 선택 가능한 거래쌍.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradingPair {
    pub symbol: Symbol,
    pub base: String,
    pub quote: String,
}

impl From<Symbol> for TradingPair {
    fn from(symbol: Symbol) -> Self {
        Self {
            base: symbol.base.clone(),
            quote: symbol.quote.clone(),
            symbol,
        }
    }
}

/// 주문 폼 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormState {
    pub draft: OrderDraft,
    /// 인라인 검증 에러
    pub field_error: Option<(FormField, String)>,
    /// 제출 실패 배너 메시지
    pub submit_error: Option<String>,
    pub submitting: bool,
}

impl OrderFormState {
    fn new(symbol: Symbol) -> Self {
        Self {
            draft: OrderDraft::new(symbol, Side::Buy, OrderType::Limit),
            field_error: None,
            submit_error: None,
            submitting: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TradingState {
    pub pairs: Vec<TradingPair>,
    pub selected: Symbol,
    pub order_book: FetchState<OrderBookSnapshot>,
    pub depth_chart: FetchState<DepthChart>,
    pub positions: FetchState<Vec<Position>>,
    /// 이번 세션에 제출한 주문 (최신순)
    pub orders: Vec<PlacedOrder>,
    pub order_form: OrderFormState,
}

impl TradingState {
    pub fn new(selected: Symbol, pairs: Vec<TradingPair>) -> Self {
        Self {
            pairs,
            order_form: OrderFormState::new(selected.clone()),
            selected,
            order_book: FetchState::default(),
            depth_chart: FetchState::default(),
            positions: FetchState::default(),
            orders: Vec::new(),
        }
    }

    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::FetchStarted { channel, seq } => match channel {
                FetchChannel::OrderBook => {
                    self.order_book.begin(*seq);
                    true
                }
                FetchChannel::DepthChart => {
                    self.depth_chart.begin(*seq);
                    true
                }
                FetchChannel::Positions => {
                    self.positions.begin(*seq);
                    true
                }
                _ => false,
            },
            Action::SetTradingPairs(pairs) => {
                self.pairs = pairs.clone();
                true
            }
            Action::SelectPair(symbol) => {
                if &self.selected == symbol {
                    return false;
                }
                self.selected = symbol.clone();
                // 이전 거래쌍의 호가와 진행 중 응답은 버립니다.
                self.order_book.reset();
                self.depth_chart.reset();
                self.order_form = OrderFormState {
                    draft: OrderDraft::new(
                        symbol.clone(),
                        self.order_form.draft.side,
                        self.order_form.draft.order_type,
                    ),
                    ..OrderFormState::new(symbol.clone())
                };
                true
            }
            Action::OrderBookFetched { seq, result } => {
                if let Ok(book) = result {
                    if book.symbol != self.selected {
                        return false;
                    }
                }
                self.order_book.apply(*seq, result.clone())
            }
            Action::DepthChartFetched {
                seq,
                symbol,
                result,
            } => {
                if symbol != &self.selected {
                    return false;
                }
                self.depth_chart.apply(*seq, result.clone())
            }
            Action::PositionsFetched { seq, result } => self.positions.apply(*seq, result.clone()),
            Action::UpdateOrderDraft(draft) => {
                self.order_form.draft = draft.clone();
                self.order_form.field_error = None;
                self.order_form.submit_error = None;
                true
            }
            Action::OrderRejected { field, reason } => {
                self.order_form.field_error = Some((*field, reason.clone()));
                self.order_form.submitting = false;
                true
            }
            Action::OrderSubmitting => {
                self.order_form.field_error = None;
                self.order_form.submit_error = None;
                self.order_form.submitting = true;
                true
            }
            Action::OrderPlaced(order) => {
                self.orders.insert(0, order.clone());
                // 제출이 끝나면 수량만 비웁니다.
                self.order_form.draft.amount.clear();
                self.order_form.submitting = false;
                true
            }
            Action::OrderFailed(message) => {
                self.order_form.submit_error = Some(message.clone());
                self.order_form.submitting = false;
                true
            }
            Action::OrderCancelled(id) => match self.orders.iter_mut().find(|o| &o.id == id) {
                Some(order) => {
                    order.status = OrderStatus::Cancelled;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// 보유 포지션 (아직 조회 전이면 빈 목록).
    pub fn positions(&self) -> &[Position] {
        self.positions.data.as_deref().unwrap_or(&[])
    }

    pub fn portfolio(&self) -> PortfolioSummary {
        PortfolioSummary::from_positions(self.positions())
    }

    /// 미체결 주문.
    pub fn open_orders(&self) -> impl Iterator<Item = &PlacedOrder> {
        self.orders.iter().filter(|o| !o.status.is_final())
    }
}
