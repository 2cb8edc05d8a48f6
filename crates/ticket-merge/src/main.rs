use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use ticket_core::{deduplicate, ClusterConfig, Deduplicator, LocaleDateParser, Record};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "ticket-merge",
    about = "Cluster duplicate support tickets and emit one merged record per cluster",
    version
)]
struct Cli {
    /// JSON array of records; `-` reads stdin.
    #[arg(long, short)]
    input: String,

    /// Where to write the JSON report; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, env = "TICKET_MERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Skip the record-count guard.
    #[arg(long)]
    no_guard: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClusterConfig> {
    let Some(path) = path else {
        return Ok(ClusterConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = ClusterConfig::from_toml(&raw)?;
    config.validate()?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

fn read_records(input: &str) -> Result<Vec<Record>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading records {input}"))?
    };
    serde_json::from_str(&raw).context("parsing records JSON")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = load_config(cli.config.as_ref())?;
    let records = read_records(&cli.input)?;
    info!(count = records.len(), "Read records");

    let report = if cli.no_guard {
        deduplicate(&records, &config, &LocaleDateParser)
    } else {
        Deduplicator::new(config).run(&records)?
    };

    let json = serde_json::to_string_pretty(&report)?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    info!(
        total = report.total_records,
        clusters = report.total_clusters,
        duplicates = report.duplicates_found,
        "Done"
    );
    Ok(())
}
