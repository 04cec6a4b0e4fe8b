//! 보유 포지션과 포트폴리오 요약.

use crate::types::{DecimalExt, Percentage, Price, Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 심볼별 보유 포지션.
///
/// `value`, `pnl`, `pnl_percentage`는 수량·평균가·현재가에서 파생됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// 거래쌍
    pub symbol: Symbol,
    /// 보유 수량 (기준 자산 단위)
    pub amount: Quantity,
    /// 평균 매입가
    pub avg_price: Price,
    /// 현재 시장가
    pub current_price: Price,
    /// 평가 금액
    pub value: Decimal,
    /// 평가 손익
    pub pnl: Decimal,
    /// 평가 손익률 (%)
    pub pnl_percentage: Percentage,
}

impl Position {
    /// 새 포지션을 생성하고 파생 값을 계산합니다.
    pub fn new(symbol: Symbol, amount: Quantity, avg_price: Price, current_price: Price) -> Self {
        let mut position = Self {
            symbol,
            amount,
            avg_price,
            current_price,
            value: Decimal::ZERO,
            pnl: Decimal::ZERO,
            pnl_percentage: Decimal::ZERO,
        };
        position.revalue(current_price);
        position
    }

    /// 현재가를 갱신하고 평가 금액과 손익을 다시 계산합니다.
    pub fn revalue(&mut self, current_price: Price) {
        self.current_price = current_price;
        self.value = self.amount * current_price;
        self.pnl = self.value - self.cost_basis();
        self.pnl_percentage = self.pnl.percent_of(self.cost_basis());
    }

    /// 매입 원가.
    pub fn cost_basis(&self) -> Decimal {
        self.amount * self.avg_price
    }

    /// 손실 중인지 확인합니다.
    pub fn is_losing(&self) -> bool {
        self.pnl < Decimal::ZERO
    }
}

/// 포트폴리오 요약.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub position_count: usize,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_pnl: Decimal,
    pub pnl_percentage: Percentage,
}

impl PortfolioSummary {
    /// 포지션 목록으로 요약을 만듭니다.
    pub fn from_positions(positions: &[Position]) -> Self {
        let total_value: Decimal = positions.iter().map(|p| p.value).sum();
        let total_cost: Decimal = positions.iter().map(Position::cost_basis).sum();
        let total_pnl = total_value - total_cost;

        Self {
            position_count: positions.len(),
            total_value,
            total_cost,
            total_pnl,
            pnl_percentage: total_pnl.percent_of(total_cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_revalue() {
        let mut position = Position::new(Symbol::new("BTC", "USDT"), dec!(0.5), dec!(40000), dec!(40000));
        assert_eq!(position.pnl, Decimal::ZERO);

        position.revalue(dec!(44000));
        assert_eq!(position.value, dec!(22000));
        assert_eq!(position.pnl, dec!(2000));
        assert_eq!(position.pnl_percentage, dec!(10));

        position.revalue(dec!(36000));
        assert!(position.is_losing());
        assert_eq!(position.pnl_percentage, dec!(-10));
    }

    #[test]
    fn test_zero_cost_position_has_zero_percentage() {
        let position = Position::new(Symbol::new("AIR", "USDT"), dec!(100), Decimal::ZERO, dec!(1));
        assert_eq!(position.pnl, dec!(100));
        assert_eq!(position.pnl_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_portfolio_summary() {
        let positions = vec![
            Position::new(Symbol::new("BTC", "USDT"), dec!(1), dec!(100), dec!(110)),
            Position::new(Symbol::new("ETH", "USDT"), dec!(2), dec!(50), dec!(45)),
        ];
        let summary = PortfolioSummary::from_positions(&positions);

        assert_eq!(summary.position_count, 2);
        assert_eq!(summary.total_value, dec!(200));
        assert_eq!(summary.total_cost, dec!(200));
        assert_eq!(summary.total_pnl, Decimal::ZERO);
    }
}
