use anyhow::Result;
use redact_config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let coordinator = super::build_coordinator(config)?;
    redact_tui::run(coordinator).await
}
