//! Command-line interface.
//!
//! Two subcommands: `serve` runs the HTTP server, `routes` dumps the route
//! table and exits. Flags override the config file, which overrides the
//! built-in defaults.

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::middleware::{MetricsMiddleware, TracingMiddleware};
use crate::registry;
use crate::router::Router;
use crate::server::{AppService, HttpServer};
use crate::store::{ContactStore, MemoryStore};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Parser)]
#[command(name = "contactd")]
#[command(about = "Contacts web application", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080
        #[arg(long)]
        addr: Option<String>,

        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// YAML file of contacts loaded into the store at startup
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Print the route table and exit
    Routes,
}

fn build_store(seed: Option<&PathBuf>) -> anyhow::Result<Arc<dyn ContactStore>> {
    let store = match seed {
        Some(path) => {
            let store = MemoryStore::from_seed_file(path)?;
            info!(seed_file = %path.display(), contacts = store.all().len(), "store seeded");
            store
        }
        None => MemoryStore::new(),
    };
    Ok(Arc::new(store))
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve { addr, config, seed } => {
            let file_config = match config {
                Some(path) => AppConfig::load(path)?,
                None => AppConfig::default(),
            };
            let bind_addr = addr.clone().unwrap_or(file_config.bind_addr);
            let seed = seed.clone().or(file_config.seed_file);

            let store = build_store(seed.as_ref())?;

            let router = Arc::new(RwLock::new(Router::new(registry::routes())));
            let mut dispatcher = Dispatcher::new();
            let metrics = Arc::new(MetricsMiddleware::new());
            dispatcher.add_middleware(Arc::new(TracingMiddleware));
            dispatcher.add_middleware(metrics.clone());
            // SAFETY: handler coroutines are spawned once at startup, before
            // the server starts accepting connections.
            unsafe {
                registry::register_all(&mut dispatcher, store);
            }
            let dispatcher = Arc::new(RwLock::new(dispatcher));

            let mut service = AppService::new(router, dispatcher);
            service.set_metrics_middleware(metrics);

            info!(addr = %bind_addr, "starting server");
            let handle = HttpServer(service).start(&bind_addr)?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server exited abnormally: {e:?}"))?;
            Ok(())
        }
        Commands::Routes => {
            let router = Router::new(registry::routes());
            router.dump_routes();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_parses_flags() {
        let cli = Cli::try_parse_from([
            "contactd",
            "serve",
            "--addr",
            "127.0.0.1:9999",
            "--seed",
            "contacts.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve { addr, seed, config } => {
                assert_eq!(addr.as_deref(), Some("127.0.0.1:9999"));
                assert_eq!(seed, Some(PathBuf::from("contacts.yaml")));
                assert!(config.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn routes_subcommand_parses() {
        let cli = Cli::try_parse_from(["contactd", "routes"]).unwrap();
        assert!(matches!(cli.command, Commands::Routes));
    }
}
