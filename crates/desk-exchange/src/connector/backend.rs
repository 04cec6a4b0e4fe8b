//! 백엔드 프록시 HTTP 클라이언트.
//!
//! 인증된 계좌/주문 작업은 `/api/...` 경로의 백엔드 서버가 대행합니다.
//!
//! | 작업 | 경로 |
//! |---|---|
//! | 잔고 | `GET /api/balance` |
//! | 포지션 | `GET /api/positions` |
//! | 주문 제출 | `POST /api/orders` |
//! | 주문 취소 | `DELETE /api/orders/{id}` |
//! | 시장 데이터 | `GET /api/market/{symbol}` |
//! | 알림 | `GET /api/notifications` |
//! | 출금 내역 | `GET /api/withdrawals` |
//! | 프로필 | `GET /api/profile` |

use crate::traits::{AccountBackend, ExchangeResult};
use crate::ExchangeError;
use async_trait::async_trait;
use desk_core::{
    BackendConfig, Balance, Notification, OrderRequest, PlacedOrder, Position, Symbol,
    TickerPrice, UserProfile, Withdrawal,
};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 백엔드 에러 응답.
#[derive(Debug, Deserialize)]
struct BackendError {
    #[serde(alias = "message")]
    error: String,
}

/// 백엔드 프록시 클라이언트.
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// 새 백엔드 클라이언트 생성.
    pub fn new(config: &BackendConfig) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ExchangeResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            // 본문 없는 성공 응답은 `null`로 취급합니다.
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            return Ok(serde_json::from_str(text)?);
        }

        let message = serde_json::from_str::<BackendError>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        warn!(status = status.as_u16(), %message, "Backend request failed");

        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ExchangeError::OrderRejected(message)
            }
            StatusCode::NOT_FOUND if path.starts_with("/api/orders/") => {
                ExchangeError::OrderNotFound(message)
            }
            _ => ExchangeError::from_status(status.as_u16(), message),
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> ExchangeResult<T> {
        self.request::<(), T>(Method::GET, path, None).await
    }
}

#[async_trait]
impl AccountBackend for BackendClient {
    fn name(&self) -> &str {
        "backend"
    }

    async fn get_balances(&self) -> ExchangeResult<Vec<Balance>> {
        self.get("/api/balance").await
    }

    async fn get_positions(&self) -> ExchangeResult<Vec<Position>> {
        self.get("/api/positions").await
    }

    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<PlacedOrder> {
        let placed: PlacedOrder = self
            .request(Method::POST, "/api/orders", Some(request))
            .await?;
        info!(order_id = %placed.id, symbol = %request.symbol, "Order placed");
        Ok(placed)
    }

    async fn cancel_order(&self, order_id: &str) -> ExchangeResult<()> {
        let path = format!("/api/orders/{}", order_id);
        let _: serde_json::Value = self.request::<(), _>(Method::DELETE, &path, None).await?;
        info!(order_id, "Order cancelled");
        Ok(())
    }

    async fn get_market_data(&self, symbol: &Symbol) -> ExchangeResult<TickerPrice> {
        self.get(&format!("/api/market/{}", symbol.to_exchange_string()))
            .await
    }

    async fn get_notifications(&self) -> ExchangeResult<Vec<Notification>> {
        self.get("/api/notifications").await
    }

    async fn get_withdrawals(&self) -> ExchangeResult<Vec<Withdrawal>> {
        self.get("/api/withdrawals").await
    }

    async fn get_profile(&self) -> ExchangeResult<UserProfile> {
        self.get("/api/profile").await
    }
}
