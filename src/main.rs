//! Absolute Handshake Server
//!
//! Serves the Absolute Handshake page against a Supabase project or an
//! in-process store.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use handshake::backend::{BackendProvider, MemoryStore, SupabaseProvider};
use handshake::config::{generate_default_config, Config, LoggingConfig};
use handshake::ui::components::dashboard::is_valid_timestamp_format;
use handshake::web::{serve, AppState, WebConfig};

#[derive(Parser)]
#[command(name = "absolute-handshake")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sign up, log in and record handshake messages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Config file (default: search standard locations)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Which backend to talk to
        #[arg(short, long, value_enum, default_value = "supabase")]
        backend: BackendKind,
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a default config file
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Hosted Supabase project
    Supabase,
    /// In-process store, lost on exit
    Memory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            backend,
            host,
            port,
        } => {
            let mut config = match config {
                Some(path) => Config::load_with_env(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => Config::load_default(),
            };
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            init_logging(&config.logging);
            run_server(config, backend).await
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config, backend: BackendKind) -> anyhow::Result<()> {
    tracing::info!("Starting Absolute Handshake v{}", env!("CARGO_PKG_VERSION"));

    let provider: Arc<dyn BackendProvider> = match backend {
        BackendKind::Supabase => {
            if config.supabase.anon_key.is_empty() {
                tracing::warn!("No Supabase anon key configured (set SUPABASE_ANON_KEY)");
            }
            tracing::info!("Supabase project: {}", config.supabase.url);
            Arc::new(
                SupabaseProvider::new(config.supabase.client_config())
                    .context("building Supabase client")?,
            )
        }
        BackendKind::Memory => {
            tracing::info!("Using in-memory backend; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    if !is_valid_timestamp_format(&config.view.timestamp_format) {
        tracing::warn!(
            format = %config.view.timestamp_format,
            "Invalid timestamp format, falling back to the default"
        );
    }

    let state = Arc::new(AppState::new(provider, WebConfig::from_config(&config)));
    serve(state).await?;

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "handshake={level},absolute_handshake={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
