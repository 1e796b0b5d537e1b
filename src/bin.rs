//! Binary entry point for `mention-bot`.
//!
//! This module provides the command-line interface for mention-bot with options
//! for configuration file paths and logging verbosity. It initializes the
//! necessary components and either starts the service or posts an alert.

use clap::{Parser, Subcommand};
use mention_bot::{
    base::{
        config::Config,
        types::{AttachmentField, Void},
    },
    interaction::alert::{self, DEFAULT_PRETEXT, DEFAULT_TEXT},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Mention-bot – answers @-mentions in Slack.
///
/// Configuration can come from `config.toml`, a `.env` file, or environment
/// variables prefixed with `MENTION_BOT_`.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP.
    #[arg(long)]
    otlp: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for @-mentions and reply to them (the default).
    Run,
    /// Post a single alert attachment and exit.
    Alert {
        /// Channel to post to; defaults to `slack_alert_channel_id`.
        #[arg(long)]
        channel: Option<String>,
        /// Text shown above the attachment.
        #[arg(long, default_value = DEFAULT_PRETEXT)]
        pretext: String,
        /// Attachment body.
        #[arg(long, default_value = DEFAULT_TEXT)]
        text: String,
        /// Attachment field as `title=value`; may be repeated.
        #[arg(short, long = "field", value_parser = alert::parse_field)]
        fields: Vec<AttachmentField>,
    },
}

/// Main entry point for the mention-bot binary.
///
/// Sets up logging based on verbosity, loads configuration, and runs the command.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Pick up a local `.env`, if any.

    let _ = dotenvy::dotenv();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("mention-bot");
        Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => mention_bot::start(config).await,
        Command::Alert { channel, pretext, text, fields } => mention_bot::alert(config, channel, pretext, text, fields).await,
    }
}
