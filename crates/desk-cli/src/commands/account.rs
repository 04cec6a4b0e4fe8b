//! 계좌 조회 명령 (잔고, 포지션, 출금 내역).

use anyhow::{anyhow, Result};
use desk_core::{
    Balance, DecimalExt, PortfolioSummary, Position, Withdrawal, WithdrawalFilter, WithdrawalStatus,
};
use desk_store::Action;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use super::context::DeskContext;

/// 잔고와 포지션을 출력합니다.
///
/// 포지션은 마켓 펄스의 최근 체결가로 평가합니다.
pub async fn show_account(ctx: &DeskContext) -> Result<()> {
    let effects = ctx.effects();
    if let Err(e) = effects.fetch_market_pulse().await {
        warn!(error = %e, "Positions will use backend prices");
    }
    effects.fetch_balances().await?;
    effects.fetch_positions().await?;

    let (balances, positions, summary) = effects
        .store()
        .select(|s| {
            (
                s.user.balances.data.clone().unwrap_or_default(),
                s.trading.positions().to_vec(),
                s.trading.portfolio(),
            )
        })
        .await;

    println!("{}", format_balances(&balances));
    println!();
    println!("{}", format_positions(&positions, &summary));
    Ok(())
}

/// 출금 내역 필터 인자.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalArgs {
    pub status: Option<String>,
    pub asset: Option<String>,
}

impl WithdrawalArgs {
    fn to_filter(&self) -> Result<WithdrawalFilter> {
        let status = self
            .status
            .as_deref()
            .map(|s| s.parse::<WithdrawalStatus>().map_err(|e| anyhow!(e)))
            .transpose()?;
        Ok(WithdrawalFilter {
            status,
            asset: self.asset.clone(),
        })
    }
}

/// 필터에 맞는 출금 내역과 완료 합계를 출력합니다.
pub async fn show_withdrawals(ctx: &DeskContext, args: WithdrawalArgs) -> Result<()> {
    let filter = args.to_filter()?;
    let effects = ctx.effects();
    effects.fetch_withdrawals().await?;

    let store = effects.store();
    store.dispatch(Action::SetWithdrawalFilter(filter)).await;
    let (rows, totals) = store
        .select(|s| {
            let rows: Vec<Withdrawal> = s.withdrawals.visible().into_iter().cloned().collect();
            (rows, s.withdrawals.totals())
        })
        .await;

    println!("{}", format_withdrawals(&rows, &totals));
    Ok(())
}

pub fn format_balances(balances: &[Balance]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:>18} {:>18} {:>18}\n",
        "ASSET", "FREE", "LOCKED", "TOTAL"
    ));
    output.push_str(&"-".repeat(65));
    for balance in balances {
        output.push_str(&format!(
            "\n{:<8} {:>18} {:>18} {:>18}",
            balance.asset,
            balance.free,
            balance.locked,
            balance.total()
        ));
    }
    output
}

pub fn format_positions(positions: &[Position], summary: &PortfolioSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:>12} {:>12} {:>12} {:>14} {:>12} {:>8}\n",
        "SYMBOL", "AMOUNT", "AVG", "CURRENT", "VALUE", "PNL", "PNL%"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for p in positions {
        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>12} {:>14} {:>12} {:>8}\n",
            p.symbol.to_string(),
            p.amount,
            p.avg_price,
            p.current_price,
            p.value.round_display(2),
            signed(p.pnl.round_display(2)),
            signed(p.pnl_percentage.round_display(2))
        ));
    }

    output.push_str(&format!(
        "\n{} positions, value {}, pnl {} ({}%)",
        summary.position_count,
        summary.total_value.round_display(2),
        signed(summary.total_pnl.round_display(2)),
        signed(summary.pnl_percentage.round_display(2))
    ));
    output
}

pub fn format_withdrawals(rows: &[Withdrawal], totals: &BTreeMap<String, Decimal>) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<10} {:<20} {:<6} {:>14} {:>10} {:<8} {:<11}\n",
        "ID", "TIME", "ASSET", "AMOUNT", "FEE", "NETWORK", "STATUS"
    ));
    output.push_str(&"-".repeat(85));
    output.push('\n');

    for w in rows {
        output.push_str(&format!(
            "{:<10} {:<20} {:<6} {:>14} {:>10} {:<8} {:<11}\n",
            w.id,
            w.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            w.asset,
            w.amount,
            w.fee,
            w.network,
            format!("{:?}", w.status).to_lowercase()
        ));
    }

    output.push_str(&format!("\nTotal: {} withdrawals", rows.len()));
    if !totals.is_empty() {
        output.push_str("\n\nCompleted by asset:\n");
        for (asset, amount) in totals {
            output.push_str(&format!("  {}: {}\n", asset, amount));
        }
    }
    output
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
