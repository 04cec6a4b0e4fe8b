//! 금융 계산용 Decimal 유틸리티.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 가격 타입.
pub type Price = Decimal;

/// 수량 타입.
pub type Quantity = Decimal;

/// 퍼센트 타입 (1.5 = 1.5%).
pub type Percentage = Decimal;

/// 폼/API 문자열을 Decimal로 파싱합니다.
///
/// 앞뒤 공백은 무시하며 지수 표기(`1e-3`)도 허용합니다.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// 문자열을 양수 Decimal로 파싱합니다. 0 이하이거나 숫자가 아니면 `None`.
pub fn parse_positive(input: &str) -> Option<Decimal> {
    parse_decimal(input).filter(|value| *value > Decimal::ZERO)
}

/// Decimal 연산 확장 트레이트.
pub trait DecimalExt {
    /// `self / whole * 100`. `whole`이 0이면 0을 반환합니다.
    fn percent_of(&self, whole: Decimal) -> Percentage;

    /// 표시용 소수점 자릿수로 반올림합니다.
    fn round_display(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn percent_of(&self, whole: Decimal) -> Percentage {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        // 범위를 넘는 비율은 표시할 의미가 없으므로 0으로 둡니다.
        self.checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    fn round_display(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}
