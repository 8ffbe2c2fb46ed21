//! Command-line entry point for `mania-bot`.
//!
//! Sets up logging, loads the bot configuration, and runs the Discord session
//! alongside the liveness endpoint until ctrl-c.

use std::path::PathBuf;

use clap::Parser;
use mania_bot::base::{config::Config, types::Void};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Discord bot that answers `m!<word>` triggers and posts panel texts on button presses.
///
/// Settings are read from the config file, then `MANIA_BOT_*` variables
/// (e.g. `MANIA_BOT_COOLDOWN_SECS`), then the bare `TOKEN` and `PORT`
/// variables that hosting platforms inject.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file.
    ///
    /// Defaults to `.hidden/config.toml` when that file exists; otherwise
    /// only the environment is used.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log more: `-v` for debug (cooldown and lookup decisions), `-vv` for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    init_tracing(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;

    mania_bot::start(config).await
}

/// Installs stdout logging at the requested verbosity plus an OTLP span exporter.
///
/// The exporter honors the standard `OTEL_EXPORTER_OTLP_*` variables.
fn init_tracing(verbose: u8) -> Void {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let stdout = tracing_subscriber::fmt::layer().with_target(false).with_span_events(FmtSpan::NONE);

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = SdkTracerProvider::builder().with_batch_exporter(exporter).build().tracer("mania-bot");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry().with(otel).with(LevelFilter::from_level(level)).with(stdout).init();

    Ok(())
}
