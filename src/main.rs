use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kortix_chat::cli::{parse_args, run_cli_command};
use kortix_chat::config::ApiConfig;

/// Log to stderr so replies on stdout stay clean. `RUST_LOG` overrides the filter.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kortix_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());
    let config = ApiConfig::from_env();
    tracing::debug!(?config, ?command, "Parsed command line");

    run_cli_command(command, config).await
}
