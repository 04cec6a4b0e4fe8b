//! 뉴스 피드 항목.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 뉴스 기사.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    /// 언론사 이름
    pub source: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
}
