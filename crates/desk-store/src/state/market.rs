//! 시장 슬라이스 (마켓 펄스, 캔들, 뉴스).

use crate::action::Action;
use crate::sequence::FetchChannel;
use crate::state::fetch::FetchState;
use desk_core::{Kline, MarketPulse, NewsArticle, Price, Symbol};

#[derive(Debug, Clone, Default)]
pub struct MarketState {
    pub pulse: FetchState<MarketPulse>,
    /// 선택된 거래쌍의 캔들
    pub klines: FetchState<Vec<Kline>>,
    pub news: FetchState<Vec<NewsArticle>>,
    /// 캔들을 받을 거래쌍
    chart_symbol: Option<Symbol>,
}

impl MarketState {
    /// 캔들을 받을 거래쌍을 정해 둔 상태를 만듭니다.
    pub fn for_pair(symbol: Symbol) -> Self {
        Self {
            chart_symbol: Some(symbol),
            ..Self::default()
        }
    }

    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::SelectPair(symbol) => {
                if self.chart_symbol.as_ref() == Some(symbol) {
                    return false;
                }
                self.chart_symbol = Some(symbol.clone());
                self.klines.reset();
                true
            }
            Action::FetchStarted { channel, seq } => {
                match channel {
                    FetchChannel::MarketPulse => self.pulse.begin(*seq),
                    FetchChannel::Klines => self.klines.begin(*seq),
                    FetchChannel::News => self.news.begin(*seq),
                    _ => return false,
                }
                true
            }
            Action::MarketPulseFetched { seq, result } => self.pulse.apply(*seq, result.clone()),
            Action::KlinesFetched {
                seq,
                symbol,
                result,
            } => {
                if self.chart_symbol.as_ref().is_some_and(|s| s != symbol) {
                    return false;
                }
                self.klines.apply(*seq, result.clone())
            }
            Action::NewsFetched { seq, result } => self.news.apply(*seq, result.clone()),
            _ => false,
        }
    }

    /// 마켓 펄스의 최근 체결가.
    pub fn last_price(&self, symbol: &Symbol) -> Option<Price> {
        self.pulse
            .data
            .as_ref()
            .and_then(|pulse| pulse.get(symbol))
            .map(|stats| stats.last_price)
    }
}
