use anyhow::{Context, Result};
use redact_config::Config;
use redact_core::{ArtifactFormat, Event, PiiCategory, RunState, UploadedFile, Workflow};
use std::io::{IsTerminal, Read};

use crate::cli::RunArgs;

pub async fn handle(args: RunArgs, config: &Config) -> Result<()> {
    let mut coordinator = super::build_coordinator(config)?;

    let text = match args.text.clone() {
        Some(text) => text,
        None if args.file.is_none() && !std::io::stdin().is_terminal() => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            text
        }
        None => String::new(),
    };
    coordinator.dispatch(Event::SourceTextChanged(text));

    if let Some(path) = &args.file {
        let file = UploadedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        coordinator.dispatch(Event::FileSelected(file));
    }

    for category in disabled_categories(&args) {
        coordinator.dispatch(Event::CategoryToggled(category));
    }

    let workflow = coordinator.run().await;
    print!("{}", report(workflow));
    if workflow.phase == RunState::Failed {
        match &workflow.last_error {
            Some(e) => anyhow::bail!("{}", e),
            None => anyhow::bail!("Run failed"),
        }
    }

    let formats: Vec<ArtifactFormat> = [
        (args.save_txt, ArtifactFormat::Text),
        (args.save_pdf, ArtifactFormat::Pdf),
    ]
    .into_iter()
    .filter_map(|(wanted, format)| wanted.then_some(format))
    .collect();

    if formats.is_empty() {
        return Ok(());
    }
    if !workflow.downloads_enabled {
        eprintln!("Nothing to save: redacted output is empty");
        return Ok(());
    }

    println!();
    for format in formats {
        let path = coordinator.download(format).await?;
        println!("✓ Saved {}", path.display());
    }

    Ok(())
}

/// Panes worth printing for a finished run. Extracted text is shown even when
/// redaction then failed.
fn report(workflow: &Workflow) -> String {
    let doc = &workflow.document;
    let mut out = String::new();
    if !doc.original_text.is_empty() {
        out.push_str(&format!("Original:\n{}\n\n", doc.original_text));
    }
    if workflow.phase != RunState::Succeeded {
        return out;
    }

    out.push_str(&format!("Redacted:\n{}\n\n", doc.redacted_text));
    if doc.audit_log.is_empty() {
        out.push_str("Log:\n  (nothing redacted)\n");
    } else {
        out.push_str(&format!("Log:\n{}\n", doc.log_text()));
    }
    out
}

fn disabled_categories(args: &RunArgs) -> Vec<PiiCategory> {
    [
        (args.no_emails, PiiCategory::Emails),
        (args.no_phones, PiiCategory::Phones),
        (args.no_names, PiiCategory::Names),
        (args.no_addresses, PiiCategory::Addresses),
    ]
    .into_iter()
    .filter_map(|(disabled, category)| disabled.then_some(category))
    .collect()
}
