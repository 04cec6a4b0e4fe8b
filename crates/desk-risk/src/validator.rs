//! 주문 검증 규칙.
//!
//! 규칙은 아래 순서로 확인하며 처음 실패한 규칙의 사유 하나만 돌려줍니다.
//! 1. 수량은 양수
//! 2. 시장가가 아니면 가격은 양수
//! 3. 스톱 주문이면 스톱 가격은 양수
//! 4. 매수: 수량 × 유효 가격 ≤ 호가 자산 사용 가능 잔고
//! 5. 매도: 수량 ≤ 기준 자산 보유 포지션 수량

use desk_core::{parse_positive, AccountSnapshot, OrderDraft, OrderRequest, Price, Side};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// 검증 실패 사유.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRejection {
    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid price")]
    InvalidPrice,

    #[error("invalid stop price")]
    InvalidStopPrice,

    /// 시장가 주문인데 참조할 시장가가 없음
    #[error("market price unavailable")]
    MarketPriceUnavailable,

    #[error("insufficient balance")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("insufficient asset balance")]
    InsufficientAssetBalance { requested: Decimal, held: Decimal },
}

/// 에러를 표시할 폼 입력 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Price,
    StopPrice,
}

impl OrderRejection {
    /// 사유를 인라인으로 표시할 필드.
    pub fn field(&self) -> FormField {
        match self {
            OrderRejection::InvalidAmount
            | OrderRejection::InsufficientBalance { .. }
            | OrderRejection::InsufficientAssetBalance { .. } => FormField::Amount,
            OrderRejection::InvalidPrice | OrderRejection::MarketPriceUnavailable => {
                FormField::Price
            }
            OrderRejection::InvalidStopPrice => FormField::StopPrice,
        }
    }
}

/// 주문 초안을 검증하고 주문 요청을 만듭니다.
///
/// # Arguments
/// * `draft` - 주문 폼 입력값
/// * `account` - 현재 잔고와 포지션
/// * `market_price` - 시장가 주문의 유효 가격으로 쓸 최근 체결가
pub fn validate_order(
    draft: &OrderDraft,
    account: &AccountSnapshot,
    market_price: Option<Price>,
) -> Result<OrderRequest, OrderRejection> {
    let result = check(draft, account, market_price);
    if let Err(ref rejection) = result {
        debug!(
            symbol = %draft.symbol,
            side = %draft.side,
            order_type = %draft.order_type,
            reason = %rejection,
            "Order draft rejected"
        );
    }
    result
}

fn check(
    draft: &OrderDraft,
    account: &AccountSnapshot,
    market_price: Option<Price>,
) -> Result<OrderRequest, OrderRejection> {
    let amount = parse_positive(&draft.amount).ok_or(OrderRejection::InvalidAmount)?;

    let price = if draft.order_type.requires_price() {
        Some(parse_positive(&draft.price).ok_or(OrderRejection::InvalidPrice)?)
    } else {
        None
    };

    let stop_price = if draft.order_type.requires_stop_price() {
        Some(parse_positive(&draft.stop_price).ok_or(OrderRejection::InvalidStopPrice)?)
    } else {
        None
    };

    let effective_price = price
        .or(market_price.filter(|p| *p > Decimal::ZERO))
        .ok_or(OrderRejection::MarketPriceUnavailable)?;
    // 곱이 Decimal 범위를 넘으면 어떤 잔고로도 감당할 수 없는 주문
    let total = amount.checked_mul(effective_price);

    let total = match draft.side {
        Side::Buy => {
            let available = account.available(&draft.symbol.quote);
            match total {
                Some(total) if total <= available => total,
                _ => {
                    return Err(OrderRejection::InsufficientBalance {
                        required: total.unwrap_or(Decimal::MAX),
                        available,
                    });
                }
            }
        }
        Side::Sell => {
            let held = account.position_amount(&draft.symbol.base);
            if amount > held {
                return Err(OrderRejection::InsufficientAssetBalance {
                    requested: amount,
                    held,
                });
            }
            total.ok_or(OrderRejection::InvalidAmount)?
        }
    };

    Ok(OrderRequest {
        symbol: draft.symbol.clone(),
        side: draft.side,
        order_type: draft.order_type,
        amount,
        price,
        stop_price,
        total,
    })
}

/// 화면 표시용 검증 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderValidation {
    /// 검증 통과 여부
    pub is_valid: bool,
    /// 실패 사유 (통과 시 `None`)
    pub reason: Option<String>,
    /// 사유를 표시할 필드
    pub field: Option<FormField>,
}

impl OrderValidation {
    /// 통과 결과.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            field: None,
        }
    }

    /// 실패 결과.
    pub fn invalid(rejection: &OrderRejection) -> Self {
        Self {
            is_valid: false,
            reason: Some(rejection.to_string()),
            field: Some(rejection.field()),
        }
    }
}

impl From<&Result<OrderRequest, OrderRejection>> for OrderValidation {
    fn from(result: &Result<OrderRequest, OrderRejection>) -> Self {
        match result {
            Ok(_) => Self::valid(),
            Err(rejection) => Self::invalid(rejection),
        }
    }
}
