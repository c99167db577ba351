//! quizgen REST API server
//!
//! After starting:
//! - Upload a document: `curl -F 'file=@notes.pdf;type=application/pdf' http://localhost:5137/upload`
//! - Fetch questions: `curl http://localhost:5137/questions`
//! - Stream events: `curl -N http://localhost:5137/events`
//! - Swagger UI: http://localhost:5137/swagger-ui

use clap::Parser;
use quizgen::{Config, QuizPipeline, shutdown_signal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate multiple-choice quizzes from uploaded documents")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.api.bind_address)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Path to the question generator executable (overrides generator.path)
    #[arg(short, long)]
    generator: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG takes precedence over the default filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quizgen=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.server.api.bind_address = bind;
    }
    if let Some(generator) = args.generator {
        config.generator.path = Some(generator);
    }

    let pipeline = Arc::new(QuizPipeline::new(config).await?);

    tracing::info!(
        address = %pipeline.config().server.api.bind_address,
        swagger_ui = pipeline.config().server.api.swagger_ui,
        "Starting quizgen server"
    );

    quizgen::api::start_api_server(pipeline, shutdown_signal()).await?;
    Ok(())
}
