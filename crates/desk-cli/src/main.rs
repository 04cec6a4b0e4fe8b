//! 트레이딩 데스크 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # BTC/USDT 호가창 (누적 수량 막대 포함)
//! desk orderbook -s BTC/USDT -l 15
//!
//! # 관심 종목 24시간 통계
//! desk pulse
//!
//! # 주문 입력 검증만 수행
//! desk validate --side buy --type limit --amount 0.1 --price 42000
//!
//! # 폴링 대시보드
//! desk watch -s ETH/USDT
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use desk_core::{init_logging, AppConfig, Interval, LogConfig};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, error};

use desk_cli::commands::account::{show_account, show_withdrawals, WithdrawalArgs};
use desk_cli::commands::chart::{show_chart_config, ChartArgs};
use desk_cli::commands::context::DeskContext;
use desk_cli::commands::market::{show_klines, show_order_book, show_pulse, OrderBookOptions};
use desk_cli::commands::news::show_news;
use desk_cli::commands::order::{self, OrderArgs};
use desk_cli::commands::settings::show_config;
use desk_cli::commands::watch::run_watch;

#[derive(Parser)]
#[command(name = "desk")]
#[command(about = "Trading desk CLI - 호가창, 시세, 주문 검증, 폴링 대시보드", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 호가창 조회
    Orderbook {
        /// 거래쌍 (기본: 설정의 default_symbol)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 호가 깊이
        #[arg(short, long, default_value = "10")]
        limit: u32,

        /// 누적 수량 막대 너비
        #[arg(long, default_value = "30")]
        bar_width: usize,
    },

    /// 관심 종목 24시간 통계
    Pulse {
        /// 상승/하락 상위 종목 수
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// 캔들 조회
    Klines {
        #[arg(short, long)]
        symbol: Option<String>,

        /// 간격 (1m, 5m, 15m, 1h, 4h, 1d, 1w)
        #[arg(short, long, default_value = "1h")]
        interval: String,

        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// 주문 입력 검증 (제출하지 않음)
    Validate {
        #[command(flatten)]
        order: OrderOpts,

        /// 시장가 주문에 쓸 참조 가격 (없으면 최근 체결가 조회)
        #[arg(long)]
        market_price: Option<String>,
    },

    /// 주문 제출 (백엔드 비활성화 시 모의 계좌)
    Order {
        #[command(flatten)]
        order: OrderOpts,
    },

    /// 주문 취소
    ///
    /// 백엔드 프록시가 필요합니다. 모의 계좌의 주문은 한 번의 실행 안에서만 유지됩니다.
    Cancel {
        /// 주문 ID
        order_id: String,
    },

    /// 잔고와 포지션
    Account,

    /// 출금 내역
    Withdrawals {
        /// 상태 필터 (pending, processing, completed, failed)
        #[arg(long)]
        status: Option<String>,

        /// 자산 필터
        #[arg(short, long)]
        asset: Option<String>,
    },

    /// 차트 위젯 설정 출력
    ChartConfig {
        #[arg(short, long)]
        symbol: Option<String>,

        #[arg(short, long)]
        interval: Option<String>,

        /// 테마 (light, dark)
        #[arg(short, long)]
        theme: Option<String>,

        /// 위젯을 넣을 DOM 컨테이너 ID
        #[arg(long)]
        container: Option<String>,

        /// JSON만 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 최신 뉴스 (API 키 필요)
    News {
        /// 검색어 (기본: 설정의 query)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// 적용된 설정 출력 (비밀 값은 가림)
    Config,

    /// 폴링 대시보드 실행
    Watch {
        #[arg(short, long)]
        symbol: Option<String>,

        /// 실행 시간 (초, 없으면 Ctrl-C까지)
        #[arg(long)]
        duration: Option<u64>,
    },
}

/// 주문 입력 인자.
#[derive(clap::Args)]
struct OrderOpts {
    #[arg(short, long)]
    symbol: Option<String>,

    /// 주문 방향 (buy, sell)
    #[arg(long)]
    side: String,

    /// 주문 유형 (limit, market, stop)
    #[arg(long = "type", default_value = "limit")]
    order_type: String,

    /// 수량
    #[arg(short, long)]
    amount: String,

    /// 지정 가격
    #[arg(short, long)]
    price: Option<String>,

    /// 스톱 가격
    #[arg(long)]
    stop_price: Option<String>,
}

impl From<OrderOpts> for OrderArgs {
    fn from(opts: OrderOpts) -> Self {
        Self {
            symbol: opts.symbol,
            side: opts.side,
            order_type: opts.order_type,
            amount: opts.amount,
            price: opts.price,
            stop_price: opts.stop_price,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    init_logging(LogConfig::from(&config.logging).override_from_env())
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
    debug!(config = ?config, "Configuration loaded");

    let ctx = DeskContext::from_config(config)?;

    let result = run(&ctx, cli.command).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

async fn run(ctx: &DeskContext, command: Commands) -> Result<()> {
    match command {
        Commands::Orderbook {
            symbol,
            limit,
            bar_width,
        } => {
            show_order_book(
                ctx,
                OrderBookOptions {
                    symbol,
                    limit,
                    bar_width,
                },
            )
            .await
        }

        Commands::Pulse { top } => show_pulse(ctx, top).await,

        Commands::Klines {
            symbol,
            interval,
            limit,
        } => {
            let interval: Interval = interval.parse().map_err(|e: String| anyhow!(e))?;
            show_klines(ctx, symbol.as_deref(), interval, limit).await
        }

        Commands::Validate {
            order: opts,
            market_price,
        } => {
            let market_price = market_price
                .map(|p| {
                    p.parse::<Decimal>()
                        .map_err(|e| anyhow!("Invalid market price {}: {}", p, e))
                })
                .transpose()?;
            order::validate(ctx, opts.into(), market_price).await
        }

        Commands::Order { order: opts } => order::place(ctx, opts.into()).await,

        Commands::Cancel { order_id } => order::cancel(ctx, &order_id).await,

        Commands::Account => show_account(ctx).await,

        Commands::Withdrawals { status, asset } => {
            show_withdrawals(ctx, WithdrawalArgs { status, asset }).await
        }

        Commands::ChartConfig {
            symbol,
            interval,
            theme,
            container,
            json,
        } => {
            show_chart_config(
                ctx,
                ChartArgs {
                    symbol,
                    interval,
                    theme,
                    container,
                    json,
                },
            )
            .await
        }

        Commands::Config => show_config(&ctx.config),

        Commands::News { category } => show_news(ctx, category.as_deref()).await,

        Commands::Watch { symbol, duration } => {
            run_watch(ctx, symbol.as_deref(), duration.map(Duration::from_secs)).await
        }
    }
}
