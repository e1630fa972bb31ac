use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use finsight::config::{Config, ConfigOverrides};
use finsight::insight::{generate_insights, ContextualInsight, GenerateOptions, RuleRegistry};
use finsight::instrument::{instrument_for_metric, InstrumentSpec};
use finsight::output::csv::{insights_to_csv, instruments_to_csv};
use finsight::output::json::render_json;
use finsight::output::table::{
    render_insights_table, render_instruments_table, render_registry_table,
};
use finsight::registry::{MetricId, MetricRegistry};
use finsight::snapshot::{build_eval_context, DataQualityReport, MetricSnapshot};
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "finsight", about = "Financial-health status and insight engine")]
struct Cli {
    /// Path to a metrics snapshot JSON file (flat map of metric id to value).
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
    /// Path to an optional data-quality report JSON file.
    #[arg(short, long)]
    quality: Option<PathBuf>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Per-metric tones for every registry metric present in the snapshot.
    Status,
    /// Generated insights, highest priority first.
    Insights {
        #[arg(long)]
        dedupe_categories: bool,
        #[arg(long, default_value_t = 0)]
        top: usize,
    },
    /// Full instrument records for every registry metric in the snapshot.
    Instruments {
        /// Snapshot computation time, RFC 3339, for freshness derivation.
        #[arg(long)]
        as_of: Option<String>,
        /// Previous snapshot JSON file used to derive deltas.
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
    /// Derive tone and explanation for a single metric value.
    Explain {
        #[arg(long)]
        metric: String,
        #[arg(long)]
        value: f64,
    },
    /// Print the active threshold registry.
    Registry,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        snapshot_path: cli
            .snapshot
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        quality_path: cli
            .quality
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        dedupe_categories: None,
    });

    if let Commands::Config { init, show } = &cli.command {
        if *init {
            Config::write_template(&config_path)?;
            println!("Wrote config template to {}", config_path.display());
        }
        if *show || !*init {
            println!("{}", render_json(&config)?);
        }
        return Ok(());
    }
    if let Commands::Serve { host, port } = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return finsight::server::run_server(config, addr).await;
    }

    let registry = MetricRegistry::with_defaults().with_overrides(&config.threshold_overrides());

    if let Commands::Registry = &cli.command {
        match cli.output {
            OutputFormat::Table => println!("{}", render_registry_table(&registry)),
            OutputFormat::Json => {
                let entries: Vec<_> = registry.iter().collect();
                println!("{}", render_json(&entries)?);
            }
            OutputFormat::Csv => {
                warn!("CSV output for registry not implemented, using JSON");
                let entries: Vec<_> = registry.iter().collect();
                println!("{}", render_json(&entries)?);
            }
        }
        return Ok(());
    }

    if let Commands::Explain { metric, value } = &cli.command {
        let metric = MetricId::from_str(metric)?;
        let spec = instrument_for_metric(&registry, &metric, *value, None, None, Utc::now())
            .ok_or_else(|| anyhow!("metric not in registry: {metric}"))?;
        print_instruments(std::slice::from_ref(&spec), cli.output)?;
        return Ok(());
    }

    let snapshot = load_snapshot(&config)?;
    let quality = load_quality(&config)?;

    match &cli.command {
        Commands::Status => {
            let specs = build_instruments(&registry, &snapshot, None, None);
            print_instruments(&specs, cli.output)?;
        }
        Commands::Insights {
            dedupe_categories,
            top,
        } => {
            let ctx = build_eval_context(&snapshot, quality.as_ref());
            let options = GenerateOptions {
                dedupe_categories: *dedupe_categories || config.engine.dedupe_categories,
            };
            let rules = RuleRegistry::with_defaults();
            let mut insights = generate_insights(&rules, &registry, &ctx, &options);
            let limit = if *top > 0 {
                *top
            } else {
                config.engine.max_insights
            };
            if limit > 0 {
                insights.truncate(limit);
            }
            print_insights(&insights, cli.output)?;
        }
        Commands::Instruments { as_of, baseline } => {
            let as_of = as_of
                .as_deref()
                .map(parse_timestamp)
                .transpose()?;
            let baseline = baseline
                .as_deref()
                .map(read_snapshot_file)
                .transpose()?;
            let specs = build_instruments(&registry, &snapshot, baseline.as_ref(), as_of);
            print_instruments(&specs, cli.output)?;
        }
        Commands::Explain { .. }
        | Commands::Registry
        | Commands::Config { .. }
        | Commands::Serve { .. } => unreachable!("handled before snapshot loading"),
    }

    Ok(())
}

fn load_snapshot(config: &Config) -> Result<MetricSnapshot> {
    let path = config.resolved_snapshot_path();
    if config.snapshot.path.trim().is_empty() {
        return Err(anyhow!(
            "no snapshot file given; pass --snapshot or set [snapshot] path in config"
        ));
    }
    read_snapshot_file(&path)
}

fn read_snapshot_file(path: &Path) -> Result<MetricSnapshot> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading snapshot: {}", path.display()))?;
    let snapshot: MetricSnapshot = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing snapshot JSON: {}", path.display()))?;
    Ok(snapshot)
}

fn load_quality(config: &Config) -> Result<Option<DataQualityReport>> {
    let Some(path) = config.resolved_quality_path() else {
        return Ok(None);
    };
    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed reading data-quality report: {}", path.display()))?;
    let report: DataQualityReport = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing data-quality JSON: {}", path.display()))?;
    Ok(Some(report))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("invalid --as-of timestamp {raw}: {e}"))
}

fn build_instruments(
    registry: &MetricRegistry,
    snapshot: &MetricSnapshot,
    baseline: Option<&MetricSnapshot>,
    as_of: Option<DateTime<Utc>>,
) -> Vec<InstrumentSpec> {
    let now = Utc::now();
    let mut specs = Vec::new();
    for metric in MetricId::ALL {
        let key = metric.to_string();
        if !snapshot.contains(&key) {
            continue;
        }
        let base = baseline
            .filter(|b| b.contains(&key))
            .map(|b| b.numeric(&key));
        if let Some(spec) =
            instrument_for_metric(registry, &metric, snapshot.numeric(&key), base, as_of, now)
        {
            specs.push(spec);
        }
    }
    specs
}

fn print_insights(insights: &[ContextualInsight], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_insights_table(insights)),
        OutputFormat::Json => println!("{}", render_json(insights)?),
        OutputFormat::Csv => println!("{}", insights_to_csv(insights)?),
    }
    Ok(())
}

fn print_instruments(specs: &[InstrumentSpec], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_instruments_table(specs)),
        OutputFormat::Json => println!("{}", render_json(specs)?),
        OutputFormat::Csv => println!("{}", instruments_to_csv(specs)?),
    }
    Ok(())
}
