//! 출금 내역 슬라이스.

use crate::action::Action;
use crate::sequence::FetchChannel;
use crate::state::fetch::FetchState;
use desk_core::{completed_totals_by_asset, Withdrawal, WithdrawalFilter};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct WithdrawalsState {
    pub list: FetchState<Vec<Withdrawal>>,
    pub filter: WithdrawalFilter,
}

impl WithdrawalsState {
    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::FetchStarted {
                channel: FetchChannel::Withdrawals,
                seq,
            } => {
                self.list.begin(*seq);
                true
            }
            Action::WithdrawalsFetched { seq, result } => self.list.apply(*seq, result.clone()),
            Action::SetWithdrawalFilter(filter) => {
                let changed = &self.filter != filter;
                self.filter = filter.clone();
                changed
            }
            _ => false,
        }
    }

    /// 필터를 통과한 출금 내역 (최신순).
    pub fn visible(&self) -> Vec<&Withdrawal> {
        let mut rows: Vec<&Withdrawal> = self
            .list
            .data
            .iter()
            .flatten()
            .filter(|w| self.filter.matches(w))
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows
    }

    /// 완료된 출금의 자산별 합계.
    pub fn totals(&self) -> BTreeMap<String, Decimal> {
        completed_totals_by_asset(self.list.data.as_deref().unwrap_or(&[]))
    }
}
