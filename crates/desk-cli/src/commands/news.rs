//! 뉴스 피드 명령.

use anyhow::Result;
use chrono::Local;
use desk_core::NewsArticle;

use super::context::DeskContext;

/// 최신 기사를 출력합니다. API 키가 없으면 에러를 돌려줍니다.
pub async fn show_news(ctx: &DeskContext, category: Option<&str>) -> Result<()> {
    let effects = ctx.effects();
    effects.fetch_news(category).await?;
    let articles = effects
        .store()
        .select(|s| s.market.news.data.clone().unwrap_or_default())
        .await;
    println!("{}", format_articles(&articles));
    Ok(())
}

pub fn format_articles(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "No articles".to_string();
    }

    let mut output = String::new();
    for (i, article) in articles.iter().enumerate() {
        let published = article
            .published_at
            .map(|t| t.with_timezone(&Local).format("%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "--".to_string());
        output.push_str(&format!(
            "{:>2}. [{}] {} ({})\n    {}\n",
            i + 1,
            published,
            article.title,
            article.source,
            article.url
        ));
        if let Some(summary) = &article.summary {
            output.push_str(&format!("    {}\n", summary));
        }
    }
    output.trim_end().to_string()
}
