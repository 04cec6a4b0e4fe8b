//! 계좌 잔고와 사용자 프로필.

use crate::domain::position::Position;
use crate::types::{Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 자산 잔고.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// 자산 (예: "USDT")
    pub asset: String,
    /// 사용 가능 잔고
    pub free: Decimal,
    /// 주문에 묶인 잔고
    #[serde(default)]
    pub locked: Decimal,
}

impl Balance {
    /// 사용 가능 잔고만 있는 잔고를 생성합니다.
    pub fn free(asset: impl Into<String>, free: Decimal) -> Self {
        Self {
            asset: asset.into().to_uppercase(),
            free,
            locked: Decimal::ZERO,
        }
    }

    /// 총 잔고.
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// 주문 검증에 쓰는 계좌 스냅샷.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// 자산 → 잔고 (키는 대문자)
    pub balances: HashMap<String, Balance>,
    pub positions: Vec<Position>,
}

impl AccountSnapshot {
    /// 잔고 목록과 포지션으로 스냅샷을 만듭니다.
    pub fn new(balances: impl IntoIterator<Item = Balance>, positions: Vec<Position>) -> Self {
        let balances = balances
            .into_iter()
            .map(|b| (b.asset.to_uppercase(), b))
            .collect();
        Self {
            balances,
            positions,
        }
    }

    /// 자산의 사용 가능 잔고. 없으면 0.
    pub fn available(&self, asset: &str) -> Decimal {
        self.balances
            .get(&asset.to_uppercase())
            .map(|b| b.free)
            .unwrap_or(Decimal::ZERO)
    }

    /// 기준 자산으로 보유 중인 포지션 수량 합계.
    pub fn position_amount(&self, base_asset: &str) -> Quantity {
        self.positions
            .iter()
            .filter(|p| p.symbol.base.eq_ignore_ascii_case(base_asset))
            .map(|p| p.amount)
            .sum()
    }

    /// 심볼의 포지션.
    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.iter().find(|p| &p.symbol == symbol)
    }
}

/// 사용자 프로필.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// KYC 인증 단계 (0 = 미인증)
    #[serde(default)]
    pub verification_level: u8,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// 인증을 완료했는지 확인합니다.
    pub fn is_verified(&self) -> bool {
        self.verification_level > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_available_is_case_insensitive() {
        let account = AccountSnapshot::new(vec![Balance::free("usdt", dec!(150))], vec![]);
        assert_eq!(account.available("USDT"), dec!(150));
        assert_eq!(account.available("usdt"), dec!(150));
        assert_eq!(account.available("BTC"), Decimal::ZERO);
    }

    #[test]
    fn test_position_amount_sums_by_base_asset() {
        let positions = vec![
            Position::new(Symbol::new("BTC", "USDT"), dec!(0.3), dec!(1), dec!(1)),
            Position::new(Symbol::new("BTC", "FDUSD"), dec!(0.2), dec!(1), dec!(1)),
            Position::new(Symbol::new("ETH", "USDT"), dec!(4), dec!(1), dec!(1)),
        ];
        let account = AccountSnapshot::new(vec![], positions);
        assert_eq!(account.position_amount("BTC"), dec!(0.5));
        assert_eq!(account.position_amount("SOL"), Decimal::ZERO);
    }

    #[test]
    fn test_balance_total() {
        let balance = Balance {
            asset: "BTC".to_string(),
            free: dec!(1),
            locked: dec!(0.5),
        };
        assert_eq!(balance.total(), dec!(1.5));
    }
}
