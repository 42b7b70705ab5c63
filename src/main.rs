use anyhow::{Context, anyhow};
use api_client::EastmoneyClient;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{ResolverKind, Settings, load_config};
use engine::ScreeningPipeline;
use events::{JsonSink, ResultEnvelope, ResultSink, SuccessEnvelope, TIMESTAMP_FORMAT};
use indicatif::{ProgressBar, ProgressStyle};
use screener::create_resolver;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// The main entry point for the ETF screener.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; provider overrides may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The guard must outlive the run so buffered file logs are flushed.
    let logging = init_tracing(cli.log_file.as_deref());

    match cli.command {
        Commands::Screen(args) => {
            let envelope = match &logging {
                Ok(_) => run_screen(&args).await,
                Err(e) => ResultEnvelope::error_now(format!("Logging setup failed: {:#}", e)),
            };
            write_envelope(&envelope, &args)
        }
        Commands::Score(args) => {
            if let Err(e) = &logging {
                return Err(anyhow!("Logging setup failed: {:#}", e));
            }
            handle_score(args).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Screens exchange-traded funds by liquidity and recent performance, then
/// scores each candidate with a Sharpe-ratio variant.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full screening pipeline and emit the result envelope.
    Screen(ScreenArgs),
    /// Score a single symbol and print the full risk breakdown.
    Score(ScoreArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Parser)]
struct ScreenArgs {
    /// Path to the TOML configuration file (defaults to ./config.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the envelope to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format. Error envelopes are always JSON.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Emit single-line JSON.
    #[arg(long)]
    compact: bool,

    /// Override `ranking.max_candidates`.
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Override `pipeline.concurrency`.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Override `exchange.resolver`.
    #[arg(long, value_enum)]
    resolver: Option<ResolverKind>,

    /// Show a progress bar on stderr while candidates are scored.
    #[arg(long)]
    progress: bool,
}

#[derive(Parser)]
struct ScoreArgs {
    /// The raw ETF code, e.g. "510300".
    #[arg(long)]
    symbol: String,

    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the stderr subscriber, plus a non-blocking file layer when asked.
///
/// `RUST_LOG` overrides the default `info` level.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?
        .to_string_lossy()
        .into_owned();

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(Some(guard))
}

// ==============================================================================
// Screen Command Logic
// ==============================================================================

/// Runs the pipeline. Setup failures become an error envelope too.
async fn run_screen(args: &ScreenArgs) -> ResultEnvelope {
    match build_screen_pipeline(args) {
        Ok(pipeline) => pipeline.run().await,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Screening setup failed.");
            ResultEnvelope::error_now(format!("{:#}", e))
        }
    }
}

fn build_screen_pipeline(args: &ScreenArgs) -> anyhow::Result<ScreeningPipeline> {
    let mut settings =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(max_candidates) = args.max_candidates {
        settings.ranking.max_candidates = max_candidates;
    }
    if let Some(concurrency) = args.concurrency {
        settings.pipeline.concurrency = concurrency;
    }
    if let Some(resolver) = args.resolver {
        settings.exchange.resolver = resolver;
    }
    settings.validate().context("Invalid command-line override")?;

    let mut pipeline = build_pipeline(&settings)?;
    if args.progress {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} candidates scored")?
                .progress_chars("#>-"),
        );
        pipeline = pipeline.with_progress(progress_bar);
    }

    Ok(pipeline)
}

fn build_pipeline(settings: &Settings) -> anyhow::Result<ScreeningPipeline> {
    let provider = Arc::new(
        EastmoneyClient::new(&settings.provider).context("Failed to build market data client")?,
    );
    let resolver = create_resolver(&settings.exchange);
    Ok(ScreeningPipeline::new(provider, resolver, settings))
}

fn write_envelope(envelope: &ResultEnvelope, args: &ScreenArgs) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    match (args.format, envelope) {
        (OutputFormat::Table, ResultEnvelope::Success(success)) => {
            writeln!(writer, "{}", render_table(success))?;
            writeln!(
                writer,
                "{} candidates scored at {}",
                success.count,
                success.timestamp.format(TIMESTAMP_FORMAT)
            )?;
            writer.flush()?;
        }
        _ => JsonSink::new(writer, !args.compact).deliver(envelope)?,
    }

    Ok(())
}

fn render_table(success: &SuccessEnvelope) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#", "Symbol", "Name", "Price", "Change %", "Turnover (10k)", "Sharpe",
        ]);

    for (rank, score) in success.data.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&score.symbol),
            Cell::new(&score.name),
            Cell::new(score.last_price).set_alignment(CellAlignment::Right),
            Cell::new(score.change_percent).set_alignment(CellAlignment::Right),
            Cell::new(score.turnover_amount.round_dp(2)).set_alignment(CellAlignment::Right),
            Cell::new(score.sharpe).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

// ==============================================================================
// Score Command Logic
// ==============================================================================

async fn handle_score(args: ScoreArgs) -> anyhow::Result<()> {
    let settings = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let pipeline = build_pipeline(&settings)?;

    let (qualified, report) = pipeline
        .inspect(&args.symbol)
        .await
        .with_context(|| format!("Failed to score {}", args.symbol))?;

    let output = serde_json::json!({
        "symbol": qualified.to_string(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
