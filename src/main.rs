//! abs-exporter - web form for exporting Audiobookshelf metadata and covers
//!
//! Serves the HTML form at `/` and JSON endpoints under `/api`.
//! `--report <library>` prints a folder-name match report instead.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use abs_exporter::catalog::Catalog;
use abs_exporter::cli::CliOptions;
use abs_exporter::config::Config;
use abs_exporter::services::{MatchReport, annotate_items};
use abs_exporter::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliOptions::from_args()?;

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port_override {
        config.port = port;
    }
    if let Some(match_check) = cli.match_check_override {
        config.match_check = match_check;
    }
    let config = Arc::new(config);

    // Logs go to stderr so report mode keeps stdout clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abs_exporter=debug,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::info!(
        csv_db_path = %config.csv_db_path.display(),
        media_root = %config.media_root.display(),
        match_check = config.match_check,
        "Configuration loaded"
    );
    for csv in [config.libraries_csv(), config.library_items_csv()] {
        if !csv.is_file() {
            tracing::warn!(path = %csv.display(), "CSV file not found; lists will be empty");
        }
    }

    if let Some(library) = cli.report_library {
        return print_report(&config, &library).await;
    }

    let app = build_app(AppState::new(config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    if let Some(host) = &config.host {
        tracing::info!("Web form: http://{}:{}/", host, config.port);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print one JSON line per item with its match result, then the bucket counts
async fn print_report(config: &Config, library: &str) -> anyhow::Result<()> {
    let catalog = Catalog::new(config.csv_db_path.clone());
    let name = library.to_string();
    let items = catalog
        .read(move |c| match c.libraries().id_by_name(&name)? {
            Some(id) => c.items().list_by_library(&id).map(Some),
            None => Ok(None),
        })
        .await
        .with_context(|| format!("Failed to read the catalog in {}", catalog.csv_dir().display()))?;

    let Some(items) = items else {
        bail!("Library '{}' not found", library);
    };

    let items = annotate_items(items, true);
    for item in &items {
        println!("{}", serde_json::to_string(item)?);
    }

    let report = MatchReport::from_items(&items);
    println!("{}", serde_json::to_string(&report)?);
    tracing::info!(library = %library, total = report.total, "Match report printed");

    Ok(())
}
