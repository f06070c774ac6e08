use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Redact PII from pasted text or PDFs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for values normally read from the config file
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "REDACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the redaction services
    #[arg(long, global = true, env = "REDACT_SERVER")]
    pub server: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory downloads are saved into
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a document once and print the result
    Run(RunArgs),

    /// Open the interactive redaction workspace
    Ui,

    /// Write a default config file
    Init,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Text to redact (read from stdin when omitted and stdin is piped)
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// PDF to extract text from; takes precedence over pasted text
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Leave email addresses in place
    #[arg(long)]
    pub no_emails: bool,

    /// Leave phone numbers in place
    #[arg(long)]
    pub no_phones: bool,

    /// Leave names in place
    #[arg(long)]
    pub no_names: bool,

    /// Leave addresses in place
    #[arg(long)]
    pub no_addresses: bool,

    /// Save the result as redacted.txt
    #[arg(long)]
    pub save_txt: bool,

    /// Save the result as redacted.pdf
    #[arg(long)]
    pub save_pdf: bool,
}
