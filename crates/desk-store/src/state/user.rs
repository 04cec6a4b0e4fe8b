//! 사용자 슬라이스 (프로필, 잔고).

use crate::action::Action;
use crate::sequence::FetchChannel;
use crate::state::fetch::FetchState;
use desk_core::{Balance, UserProfile};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub profile: FetchState<UserProfile>,
    pub balances: FetchState<Vec<Balance>>,
}

impl UserState {
    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::FetchStarted {
                channel: FetchChannel::Profile,
                seq,
            } => {
                self.profile.begin(*seq);
                true
            }
            Action::FetchStarted {
                channel: FetchChannel::Balances,
                seq,
            } => {
                self.balances.begin(*seq);
                true
            }
            Action::ProfileFetched { seq, result } => self.profile.apply(*seq, result.clone()),
            Action::BalancesFetched { seq, result } => self.balances.apply(*seq, result.clone()),
            _ => false,
        }
    }

    /// 자산의 사용 가능 잔고.
    pub fn available(&self, asset: &str) -> Decimal {
        self.balances
            .data
            .iter()
            .flatten()
            .find(|b| b.asset.eq_ignore_ascii_case(asset))
            .map(|b| b.free)
            .unwrap_or(Decimal::ZERO)
    }
}
