//! 뉴스 피드 커넥터.
//!
//! API 키는 `X-Api-Key` 헤더로만 전송하며 URL이나 로그에 남기지 않습니다.

use crate::traits::{ExchangeResult, NewsProvider};
use crate::ExchangeError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use desk_core::{NewsArticle, NewsConfig};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// API 키 헤더 이름.
pub const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: NewsApiSource,
    title: Option<String>,
    description: Option<String>,
    url: String,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiError {
    code: Option<String>,
    message: String,
}

/// 뉴스 API 클라이언트.
pub struct NewsClient {
    config: NewsConfig,
    client: Client,
}

impl NewsClient {
    /// 새 뉴스 클라이언트 생성.
    pub fn new(config: NewsConfig) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> ExchangeResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ExchangeError::Unauthorized("news API key not configured".to_string()))
    }
}

#[async_trait]
impl NewsProvider for NewsClient {
    async fn latest(&self, category: Option<&str>, limit: u32) -> ExchangeResult<Vec<NewsArticle>> {
        let api_key = self.api_key()?;
        let query = category.unwrap_or(&self.config.query);
        let page_size = if limit == 0 { self.config.page_size } else { limit };
        let url = format!("{}/everything", self.config.base_url.trim_end_matches('/'));

        debug!(query, page_size, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("q", query.to_string()),
                ("pageSize", page_size.to_string()),
                ("sortBy", "publishedAt".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<NewsApiError>(&body)
                .map(|e| format!("{}: {}", e.code.unwrap_or_default(), e.message))
                .unwrap_or(body);
            warn!(status = status.as_u16(), "News request failed");
            return Err(ExchangeError::from_status(status.as_u16(), message));
        }

        let parsed: NewsResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| {
                Some(NewsArticle {
                    title: a.title?,
                    source: a.source.name.unwrap_or_default(),
                    url: a.url,
                    published_at: a.published_at,
                    summary: a.description,
                })
            })
            .collect())
    }
}
