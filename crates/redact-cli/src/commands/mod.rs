pub mod init;
pub mod run;
pub mod ui;

use anyhow::{Context, Result};
use redact_client::{DirectorySink, HttpService};
use redact_config::Config;
use redact_engine::Coordinator;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Load the config file and apply command-line overrides
pub fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &GlobalArgs) {
    if let Some(server) = &args.server {
        config.service.base_url = server.clone();
    }
    if let Some(timeout) = args.timeout {
        config.service.timeout_secs = timeout;
    }
    if let Some(dir) = &args.out_dir {
        config.output.dir = dir.clone();
    }
}

/// Wire the HTTP services and the output directory into a coordinator
pub fn build_coordinator(config: &Config) -> Result<Coordinator> {
    let service = HttpService::from_config(&config.service)?;
    let sink = DirectorySink::new(config.output.dir.clone());
    Ok(Coordinator::new(Arc::new(service), Arc::new(sink)).with_timeout(config.service.timeout()))
}
