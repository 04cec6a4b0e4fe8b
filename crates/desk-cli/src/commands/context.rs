//! 명령어 공통 실행 환경.

use anyhow::{anyhow, bail, Result};
use desk_core::{AppConfig, Symbol};
use desk_exchange::{AccountBackend, BackendClient, BinanceClient, MockBackend, NewsClient};
use desk_store::{AppState, Effects, EffectsConfig, Store};
use std::sync::Arc;
use tracing::info;

/// 설정과 외부 연동 클라이언트 묶음.
pub struct DeskContext {
    pub config: AppConfig,
    pub market: Arc<BinanceClient>,
    pub backend: Arc<dyn AccountBackend>,
    pub news: Option<Arc<NewsClient>>,
}

impl DeskContext {
    /// 설정으로 클라이언트를 만듭니다.
    ///
    /// 백엔드가 비활성화되어 있으면 설정의 모의 계좌를 사용합니다.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let market = Arc::new(BinanceClient::new(&config.market_data)?);

        let backend: Arc<dyn AccountBackend> = if config.backend.enabled {
            info!(base_url = %config.backend.base_url, "Using backend proxy");
            Arc::new(BackendClient::new(&config.backend)?)
        } else {
            info!("Backend disabled, using demo account");
            Arc::new(MockBackend::from_config(&config.account))
        };

        let news = match config.news.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                Some(Arc::new(NewsClient::new(config.news.clone())?))
            }
            _ => None,
        };

        Ok(Self {
            config,
            market,
            backend,
            news,
        })
    }

    /// 새 스토어에 연결된 이펙트 실행기.
    pub fn effects(&self) -> Effects {
        let store = Arc::new(Store::new(AppState::from_config(&self.config)));
        let effects = Effects::new(
            store,
            self.market.clone(),
            self.backend.clone(),
            EffectsConfig::from_config(&self.config),
        );
        match &self.news {
            Some(news) => effects.with_news(news.clone()),
            None => effects,
        }
    }

    /// 모의 계좌를 쓰는지 확인합니다.
    pub fn uses_demo_account(&self) -> bool {
        !self.config.backend.enabled
    }

    /// 이전 실행의 주문을 다루는 작업은 백엔드가 있어야 합니다.
    ///
    /// 모의 계좌의 주문은 한 프로세스 안에서만 유지됩니다.
    pub fn require_backend(&self, operation: &str) -> Result<()> {
        if self.uses_demo_account() {
            bail!(
                "{} needs the backend proxy: demo account orders live only for one process \
                 (set backend.enabled = true)",
                operation
            );
        }
        Ok(())
    }

    /// 인자로 받은 심볼, 없으면 설정의 기본 거래쌍.
    pub fn symbol(&self, arg: Option<&str>) -> Result<Symbol> {
        let raw = arg.unwrap_or(&self.config.market_data.default_symbol);
        Symbol::parse(raw).ok_or_else(|| anyhow!("Invalid symbol: {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_account_cannot_cancel_across_runs() {
        let ctx = DeskContext::from_config(AppConfig::default()).unwrap();
        assert!(ctx.uses_demo_account());

        let err = ctx.require_backend("cancel").unwrap_err();
        assert!(err.to_string().contains("only for one process"));
    }

    #[test]
    fn test_enabled_backend_allows_cancel() {
        let mut config = AppConfig::default();
        config.backend.enabled = true;
        let ctx = DeskContext::from_config(config).unwrap();
        assert!(ctx.require_backend("cancel").is_ok());
    }
}
