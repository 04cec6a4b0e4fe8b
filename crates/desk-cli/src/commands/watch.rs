//! 폴링 대시보드 명령.
//!
//! 첫 화면 데이터를 불러온 뒤 폴러를 시작하고, 상태가 바뀔 때마다 한 줄 요약을
//! 출력합니다. Ctrl-C 또는 지정한 시간이 지나면 폴러를 정리하고 종료합니다.

use anyhow::Result;
use desk_core::DecimalExt;
use desk_store::{Action, AppState, Pollers};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::context::DeskContext;

/// 대시보드를 실행합니다.
pub async fn run_watch(
    ctx: &DeskContext,
    symbol: Option<&str>,
    duration: Option<Duration>,
) -> Result<()> {
    let symbol = ctx.symbol(symbol)?;
    let effects = ctx.effects();
    effects.store().dispatch(Action::SelectPair(symbol)).await;
    effects.bootstrap().await;

    let store = effects.store().clone();
    println!("{}", summary_line(&store.snapshot().await));

    let shutdown = CancellationToken::new();
    let mut events = store.subscribe();
    let pollers = Pollers::start(effects, &ctx.config.polling, &shutdown);
    info!(pollers = ?pollers.names(), "Dashboard running, press Ctrl-C to stop");

    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = &mut deadline => {
                info!("Watch duration elapsed");
                break;
            }
            event = events.recv() => match event {
                Ok(change) if is_display_change(change.action) => {
                    debug!(version = change.version, action = change.action, "State changed");
                    println!("{}", summary_line(&store.snapshot().await));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dashboard fell behind state changes");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    shutdown.cancel();
    pollers.shutdown().await;
    Ok(())
}

/// 요약 줄을 다시 그릴 액션인지 확인합니다.
fn is_display_change(action: &str) -> bool {
    matches!(
        action,
        "order_book_fetched"
            | "market_pulse_fetched"
            | "notifications_fetched"
            | "notification_received"
    )
}

/// 대시보드 한 줄 요약.
pub fn summary_line(state: &AppState) -> String {
    let selected = &state.trading.selected;
    let book = match state.trading.order_book.data.as_ref() {
        Some(book) => match (book.best_bid(), book.best_ask(), book.spread()) {
            (Some(bid), Some(ask), Some(spread)) => format!(
                "bid {} / ask {} (spread {}%)",
                bid,
                ask,
                spread.percentage.round_display(3)
            ),
            _ => "book one-sided".to_string(),
        },
        None => match &state.trading.order_book.error {
            Some(error) => format!("book error: {}", error),
            None => "book loading".to_string(),
        },
    };

    let change = state
        .market
        .pulse
        .data
        .as_ref()
        .and_then(|pulse| pulse.get(selected))
        .map(|stats| format!(" 24h {}%", stats.price_change_percent.round_display(2)))
        .unwrap_or_default();

    format!(
        "[{}] {} {}{} | 🔔 {}",
        state
            .trading
            .order_book
            .updated_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string()),
        selected,
        book,
        change,
        state.notifications.unread_count
    )
}
