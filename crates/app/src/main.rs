use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::{Config, ReportFormat};

#[derive(Parser)]
#[command(name = "rentrec")]
#[command(about = "Reconcile M-Pesa credit alerts against a tenant roster")]
struct Cli {
    /// TOML config file. Defaults to ./rentrec.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File of SMS alerts, one per line
    #[arg(long, env = "RENTREC_SMS")]
    sms: Option<PathBuf>,

    /// Tenant roster CSV
    #[arg(long, env = "RENTREC_ROSTER")]
    roster: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<ReportFormat>,
}

impl Cli {
    fn resolve(self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(p) = self.sms {
            config.inputs.sms_path = p;
        }
        if let Some(p) = self.roster {
            config.inputs.roster_path = p;
        }
        if let Some(f) = self.format {
            config.report.format = f;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().resolve()?;
    let inputs = &config.inputs;

    let sms = File::open(&inputs.sms_path)
        .with_context(|| format!("Failed to open SMS file {}", inputs.sms_path.display()))?;
    let roster = File::open(&inputs.roster_path)
        .with_context(|| format!("Failed to open roster {}", inputs.roster_path.display()))?;

    let (tenants, results) =
        rentrec_import::import::reconcile_sources(BufReader::new(sms), roster)
            .context("Reconciliation failed")?;

    tracing::info!(
        "Reconciled {} payments against {} tenants",
        results.len(),
        tenants.len()
    );

    let out = match config.report.format {
        ReportFormat::Text => report::render_text(&results, &config.report.currency),
        ReportFormat::Json => report::render_json(&results)?,
    };
    print!("{out}");
    Ok(())
}
