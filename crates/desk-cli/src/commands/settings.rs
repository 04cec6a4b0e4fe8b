//! 적용된 설정 출력 명령.

use anyhow::{Context, Result};
use desk_core::AppConfig;

/// 파일과 환경 변수를 합친 최종 설정을 TOML로 출력합니다.
pub fn show_config(config: &AppConfig) -> Result<()> {
    println!("{}", render_config(config)?);
    Ok(())
}

/// 비밀 값은 가린 채로 TOML 문자열을 만듭니다.
pub fn render_config(config: &AppConfig) -> Result<String> {
    let mut masked = config.clone();
    if masked.news.api_key.is_some() {
        masked.news.api_key = Some("***".to_string());
    }
    toml::to_string_pretty(&masked).context("Failed to serialize configuration")
}
