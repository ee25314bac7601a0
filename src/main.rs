use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carehub_api_rest::{Dispatcher, ServerConfig, config::host_from_env_value, resolve_port};
use carehub_core::{
    CoreConfig, DocumentStore, Repositories,
    config::{data_dir_from_env_value, seed_flag_from_env_value},
    seed_defaults,
};

#[derive(Parser)]
#[command(name = "carehub")]
#[command(about = "CareHub clinic REST API server")]
struct Cli {
    /// Port to listen on (default 8080; invalid values fall back to the default)
    port: Option<String>,

    /// Address to bind
    #[arg(long, env = "CAREHUB_HOST")]
    host: Option<String>,
}

/// Main entry point for the CareHub server
///
/// Resolves configuration, opens the document store, optionally seeds it, and serves the REST
/// API until Ctrl-C or SIGTERM. The store is closed once the server has stopped.
///
/// # Environment Variables
/// - `CAREHUB_HOST`: Address to bind (default: "0.0.0.0")
/// - `CAREHUB_DATA_DIR`: Directory for JSON collections (default: in-memory store)
/// - `CAREHUB_SEED`: Seed default users and sample records into empty collections
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the data directory cannot be created,
/// - seeding fails, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carehub_run=info".parse()?)
                .add_directive("carehub_api_rest=info".parse()?)
                .add_directive("carehub_api_shared=info".parse()?)
                .add_directive("carehub_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let server_cfg = ServerConfig::new(
        host_from_env_value(cli.host),
        resolve_port(cli.port.as_deref()),
    );
    let core_cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("CAREHUB_DATA_DIR").ok()),
        seed_flag_from_env_value(std::env::var("CAREHUB_SEED").ok())?,
    )?;

    let store = Arc::new(DocumentStore::open(&core_cfg)?);
    let repos = Repositories::open(store.clone());

    if core_cfg.seed_defaults() {
        let report = seed_defaults(&repos)?;
        tracing::info!(
            users = report.users,
            doctors = report.doctors,
            patients = report.patients,
            "++ Seeding complete"
        );
    }

    let served = carehub_api_rest::serve(&server_cfg, Arc::new(Dispatcher::new(repos))).await;

    store.close();
    served
}
