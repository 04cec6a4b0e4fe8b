//! 출금 내역.

use crate::types::Quantity;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 출금 처리 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::str::FromStr for WithdrawalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid withdrawal status: {}", s)),
        }
    }
}

/// 출금 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: String,
    /// 자산 (예: "BTC")
    pub asset: String,
    pub amount: Quantity,
    #[serde(default)]
    pub fee: Decimal,
    /// 받는 주소
    pub address: String,
    /// 전송 네트워크 (예: "ERC20")
    pub network: String,
    pub status: WithdrawalStatus,
    /// 온체인 트랜잭션 ID (전송 전에는 없음)
    #[serde(default)]
    pub tx_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Withdrawal {
    /// 수수료를 뺀 실수령액.
    pub fn net_amount(&self) -> Decimal {
        self.amount - self.fee
    }

    /// 더 이상 상태가 바뀌지 않는지 확인합니다.
    pub fn is_final(&self) -> bool {
        matches!(
            self.status,
            WithdrawalStatus::Completed | WithdrawalStatus::Failed
        )
    }
}

/// 출금 내역 화면의 필터.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalFilter {
    pub status: Option<WithdrawalStatus>,
    pub asset: Option<String>,
}

impl WithdrawalFilter {
    /// 필터 조건에 맞는지 확인합니다. 자산 비교는 대소문자를 구분하지 않습니다.
    pub fn matches(&self, withdrawal: &Withdrawal) -> bool {
        let status_ok = self.status.map_or(true, |s| s == withdrawal.status);
        let asset_ok = self
            .asset
            .as_deref()
            .map_or(true, |a| a.eq_ignore_ascii_case(&withdrawal.asset));
        status_ok && asset_ok
    }
}

/// 완료된 출금의 자산별 합계.
pub fn completed_totals_by_asset(withdrawals: &[Withdrawal]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for w in withdrawals
        .iter()
        .filter(|w| w.status == WithdrawalStatus::Completed)
    {
        *totals
            .entry(w.asset.to_uppercase())
            .or_insert(Decimal::ZERO) += w.amount;
    }
    totals
}
