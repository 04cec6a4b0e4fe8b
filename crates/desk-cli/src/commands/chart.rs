//! 차트 위젯 설정 출력 명령.

use anyhow::{anyhow, Result};
use desk_core::{Interval, Theme, WIDGET_SCRIPT_URL};
use desk_store::Action;

use super::context::DeskContext;

/// 차트 위젯 옵션.
#[derive(Debug, Clone, Default)]
pub struct ChartArgs {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub theme: Option<String>,
    pub container: Option<String>,
    /// 생성자 스니펫 대신 JSON만 출력
    pub json: bool,
}

/// 현재 거래쌍과 테마로 위젯 설정을 출력합니다.
pub async fn show_chart_config(ctx: &DeskContext, args: ChartArgs) -> Result<()> {
    let symbol = ctx.symbol(args.symbol.as_deref())?;
    let store = ctx.effects().store().clone();

    store.dispatch(Action::SelectPair(symbol)).await;
    if let Some(theme) = &args.theme {
        let theme: Theme = theme.parse().map_err(|e: String| anyhow!(e))?;
        store.dispatch(Action::SetTheme(theme)).await;
    }

    let mut widget = store.select(|s| s.chart_widget(&ctx.config)).await;
    if let Some(interval) = &args.interval {
        let interval: Interval = interval.parse().map_err(|e: String| anyhow!(e))?;
        widget.interval = interval.as_chart_str().to_string();
    }
    if let Some(container) = args.container {
        widget = widget.with_container(container);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&widget)?);
    } else {
        println!("<script src=\"{}\"></script>", WIDGET_SCRIPT_URL);
        println!("{}", widget.constructor_snippet()?);
    }
    Ok(())
}
