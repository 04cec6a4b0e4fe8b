//! 주문 검증과 제출 명령.

use anyhow::{anyhow, Result};
use desk_core::{OrderDraft, OrderType, PlacedOrder, Price, Side};
use desk_exchange::MarketDataProvider;
use desk_risk::{validate_order, OrderValidation};
use desk_store::StoreError;
use tracing::{info, warn};

use super::context::DeskContext;

/// 주문 입력값 (폼 필드 문자열 그대로).
#[derive(Debug, Clone)]
pub struct OrderArgs {
    pub symbol: Option<String>,
    pub side: String,
    pub order_type: String,
    pub amount: String,
    pub price: Option<String>,
    pub stop_price: Option<String>,
}

impl OrderArgs {
    fn to_draft(&self, ctx: &DeskContext) -> Result<OrderDraft> {
        let symbol = ctx.symbol(self.symbol.as_deref())?;
        let side: Side = self.side.parse().map_err(|e: String| anyhow!(e))?;
        let order_type: OrderType = self.order_type.parse().map_err(|e: String| anyhow!(e))?;

        let mut draft = OrderDraft::new(symbol, side, order_type).with_amount(&self.amount);
        if let Some(price) = &self.price {
            draft = draft.with_price(price);
        }
        if let Some(stop_price) = &self.stop_price {
            draft = draft.with_stop_price(stop_price);
        }
        Ok(draft)
    }
}

/// 주문을 제출하지 않고 검증 결과만 출력합니다.
///
/// 시장가 주문은 `market_price`가 없으면 최근 체결가를 조회해 사용합니다.
pub async fn validate(ctx: &DeskContext, args: OrderArgs, market_price: Option<Price>) -> Result<()> {
    let draft = args.to_draft(ctx)?;
    let account = ctx.backend.get_account().await?;

    let market_price = match market_price {
        Some(price) => Some(price),
        None if draft.order_type == OrderType::Market => {
            match ctx.market.get_price(&draft.symbol).await {
                Ok(ticker) => Some(ticker.price),
                Err(e) => {
                    warn!(symbol = %draft.symbol, error = %e, "Could not fetch market price");
                    None
                }
            }
        }
        None => None,
    };

    let result = validate_order(&draft, &account, market_price);
    let validation = OrderValidation::from(&result);
    println!("{}", format_validation(&validation));
    if let Ok(request) = &result {
        println!("total: {} {}", request.total, request.symbol.quote);
    }
    Ok(())
}

/// 주문을 검증한 뒤 제출합니다.
pub async fn place(ctx: &DeskContext, args: OrderArgs) -> Result<()> {
    let draft = args.to_draft(ctx)?;
    let effects = ctx.effects();

    match effects.place_order(draft).await {
        Ok(placed) => {
            info!(order_id = %placed.id, "Order placed");
            println!("{}", format_placed(&placed));
            Ok(())
        }
        Err(StoreError::Rejected(rejection)) => {
            println!(
                "{}",
                format_validation(&OrderValidation::invalid(&rejection))
            );
            Err(rejection.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// 주문을 취소합니다.
///
/// 모의 계좌로는 이전 실행에서 낸 주문을 찾을 수 없으므로 바로 실패합니다.
pub async fn cancel(ctx: &DeskContext, order_id: &str) -> Result<()> {
    ctx.require_backend("cancel")?;
    ctx.effects().cancel_order(order_id).await?;
    println!("Order {} cancelled", order_id);
    Ok(())
}

pub fn format_validation(validation: &OrderValidation) -> String {
    if validation.is_valid {
        return "✓ valid".to_string();
    }
    let field = validation
        .field
        .map(|f| format!(" [{:?}]", f))
        .unwrap_or_default();
    format!(
        "✗ {}{}",
        validation.reason.as_deref().unwrap_or("invalid order"),
        field
    )
}

pub fn format_placed(order: &PlacedOrder) -> String {
    let request = &order.request;
    let mut output = format!(
        "#{} {:?}\n  {} {} {} {}",
        order.id, order.status, request.side, request.order_type, request.amount, request.symbol
    );
    if let Some(price) = request.price {
        output.push_str(&format!(" @ {}", price));
    }
    if let Some(stop) = request.stop_price {
        output.push_str(&format!(" (stop {})", stop));
    }
    output.push_str(&format!("\n  total {} {}", request.total, request.symbol.quote));
    output
}
