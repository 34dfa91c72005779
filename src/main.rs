mod app;
mod checkout;
mod config;
mod db;
mod event;
mod kv;
mod logging;
mod menu;
mod offline;
mod store;
mod task;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::kv::SqliteKvStore;
use crate::menu::CatalogLoader;
use crate::offline::{
  CacheGateway, GatewaySettings, HttpNetwork, Request, ResponseSource, SqliteCacheStorage,
};
use crate::store::OrderStore;
use crate::task::Task;

#[derive(Parser, Debug)]
#[command(name = "bistro")]
#[command(about = "Browse the Bistrô Recantinho da Serra menu and send your order")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./bistro.yaml, then $XDG_CONFIG_HOME/bistro/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Site root the catalog and offline assets are served from
  #[arg(long)]
  base_url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch a path through the offline cache and print the body
  Fetch {
    /// Path relative to the base URL, e.g. data/data.json
    path: String,

    /// Treat the request as a page navigation
    #[arg(long)]
    navigate: bool,
  },
  /// Pre-cache the app shell and purge old cache versions
  Install,
}

type Gateway = CacheGateway<SqliteCacheStorage, HttpNetwork>;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = Config::load(args.config.as_deref())?;
  if let Some(base_url) = args.base_url {
    config.base_url = base_url;
    config.base_url()?;
  }

  let data_dir = db::data_dir_or_default(config.data_dir.as_deref())?;
  let _log_guard = logging::init(&data_dir)?;
  let db_path = db::default_path(Some(&data_dir))?;
  info!(db = %db_path.display(), base_url = %config.base_url, "starting");

  let gateway: Gateway = CacheGateway::new(
    SqliteCacheStorage::open(&db_path)?,
    HttpNetwork::new(config.request_timeout())?,
    GatewaySettings::from_config(&config)?,
  );

  match args.command {
    None => {
      let catalog = CatalogLoader::new(gateway.clone(), config.catalog_url()?);
      info!(url = %catalog.url(), "catalog location");
      let store = OrderStore::from_config(SqliteKvStore::open(&db_path)?, &config);

      let background = gateway.clone();
      let gateway_task = Task::spawn(async move { background.start().await });

      let mut app = app::App::new(config, store, catalog, Some(gateway_task));
      app.run().await?;
    }
    Some(Command::Fetch { path, navigate }) => {
      let url = config.resolve(&path)?;
      let request = if navigate {
        Request::navigate(url)
      } else {
        Request::get(url)
      };

      let result = gateway.fetch(&request).await?;
      match (result.source, result.cached_at) {
        (ResponseSource::Network, _) => eprintln!("{} (network)", result.data.status),
        (source, Some(at)) => eprintln!(
          "{} ({:?}, cached {})",
          result.data.status,
          source,
          at.to_rfc3339()
        ),
        (source, None) => eprintln!("{} ({:?})", result.data.status, source),
      }
      if let Some(content_type) = result.data.header("content-type") {
        eprintln!("content-type: {}", content_type);
      }

      std::io::stdout()
        .write_all(&result.data.body)
        .map_err(|e| eyre!("Failed to write response body: {}", e))?;
    }
    Some(Command::Install) => {
      match gateway.install().await {
        Ok(count) => println!("Cached {} assets in {}", count, gateway.version()),
        Err(e) => eprintln!("Install failed, nothing cached: {}", e),
      }

      let purged = gateway.activate().await?;
      if purged.is_empty() {
        println!("No old cache versions to remove");
      } else {
        println!("Removed old cache versions: {}", purged.join(", "));
      }
    }
  }

  Ok(())
}
