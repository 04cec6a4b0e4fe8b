//! 시장 데이터 조회 명령.

use anyhow::Result;
use chrono::Local;
use desk_core::{
    DecimalExt, Interval, Kline, MarketPulse, OrderBookLevel, OrderBookSnapshot, Symbol,
};
use desk_exchange::MarketDataProvider;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::context::DeskContext;

/// 호가창 출력 옵션.
#[derive(Debug, Clone)]
pub struct OrderBookOptions {
    pub symbol: Option<String>,
    pub limit: u32,
    /// 누적 수량 막대의 최대 너비 (문자 수)
    pub bar_width: usize,
}

/// 호가창을 조회해 출력합니다.
pub async fn show_order_book(ctx: &DeskContext, options: OrderBookOptions) -> Result<()> {
    let symbol = ctx.symbol(options.symbol.as_deref())?;
    let book = ctx.market.get_order_book(&symbol, options.limit).await?;
    println!("{}", format_order_book(&book, options.bar_width));
    Ok(())
}

/// 관심 거래쌍의 24시간 통계를 출력합니다.
pub async fn show_pulse(ctx: &DeskContext, top: usize) -> Result<()> {
    let watch_list: Vec<Symbol> = ctx
        .config
        .market_data
        .watch_list
        .iter()
        .filter_map(|s| Symbol::parse(s))
        .collect();
    let pulse = ctx.market.get_market_pulse(&watch_list).await?;
    println!("{}", format_pulse(&pulse, top));
    Ok(())
}

/// 캔들을 출력합니다.
pub async fn show_klines(
    ctx: &DeskContext,
    symbol: Option<&str>,
    interval: Interval,
    limit: u32,
) -> Result<()> {
    let symbol = ctx.symbol(symbol)?;
    let klines = ctx.market.get_klines(&symbol, interval, limit).await?;
    println!("{}", format_klines(&symbol, interval, &klines));
    Ok(())
}

/// 누적 수량 막대.
fn depth_bar(ratio: Decimal, width: usize) -> String {
    let cells = (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    "█".repeat(cells)
}

fn format_level(book: &OrderBookSnapshot, level: &OrderBookLevel, bar_width: usize) -> String {
    format!(
        "{:>14} {:>14} {:>14}  {}\n",
        level.price,
        level.quantity,
        level.cumulative_total,
        depth_bar(book.width_ratio(level), bar_width)
    )
}

/// 호가창 테이블. 매도 호가를 위에 가격 내림차순으로 둡니다.
pub fn format_order_book(book: &OrderBookSnapshot, bar_width: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}  (update #{})\n",
        book.symbol,
        book.last_update_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "{:>14} {:>14} {:>14}\n",
        "PRICE", "AMOUNT", "TOTAL"
    ));
    output.push_str(&"-".repeat(44 + bar_width));
    output.push('\n');

    for level in book.asks.iter().rev() {
        output.push_str(&format_level(book, level, bar_width));
    }

    match (book.spread(), book.mid_price()) {
        (Some(spread), Some(mid)) => output.push_str(&format!(
            "  spread {} ({}%)  mid {}\n",
            spread.absolute,
            spread.percentage.round_display(3),
            mid
        )),
        _ => output.push_str("  spread -\n"),
    }

    for level in &book.bids {
        output.push_str(&format_level(book, level, bar_width));
    }

    output
}

/// 마켓 펄스 테이블과 상승/하락 상위 종목.
pub fn format_pulse(pulse: &MarketPulse, top: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<12} {:>14} {:>9} {:>14} {:>14} {:>18}\n",
        "SYMBOL", "LAST", "CHANGE%", "HIGH", "LOW", "QUOTE VOLUME"
    ));
    output.push_str(&"-".repeat(86));
    output.push('\n');

    for stats in &pulse.stats {
        output.push_str(&format!(
            "{:<12} {:>14} {:>9} {:>14} {:>14} {:>18}\n",
            stats.symbol.to_string(),
            stats.last_price,
            stats.price_change_percent.round_display(2),
            stats.high_price,
            stats.low_price,
            stats.quote_volume.round_display(0)
        ));
    }

    let gainers: Vec<String> = pulse
        .top_gainers(top)
        .iter()
        .map(|s| format!("{} +{}%", s.symbol, s.price_change_percent.round_display(2)))
        .collect();
    let losers: Vec<String> = pulse
        .top_losers(top)
        .iter()
        .map(|s| format!("{} {}%", s.symbol, s.price_change_percent.round_display(2)))
        .collect();

    output.push('\n');
    output.push_str(&format!("Top gainers: {}\n", join_or_dash(&gainers)));
    output.push_str(&format!("Top losers:  {}", join_or_dash(&losers)));
    output
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// 캔들 테이블.
pub fn format_klines(symbol: &Symbol, interval: Interval, klines: &[Kline]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} {}\n", symbol, interval.as_exchange_str()));
    output.push_str(&format!(
        "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14}\n",
        "OPEN TIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
    ));

    for kline in klines {
        let marker = if kline.is_bullish() { '▲' } else { '▼' };
        output.push_str(&format!(
            "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14} {}\n",
            kline
                .open_time
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            kline.open,
            kline.high,
            kline.low,
            kline.close,
            kline.volume,
            marker
        ));
    }

    output.push_str(&format!("Total: {} candles", klines.len()));
    output
}
