use anyhow::Result;
use redact_config::Config;
use std::path::Path;

pub fn handle(path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    Config::default().save_to(&path)?;

    println!("✓ Created {}", path.display());
    println!("  Set [service] base_url to point at your redaction service");

    Ok(())
}
