use std::sync::Arc;

use edunexus::config::Config;
use edunexus::files::LocalFileStore;
use edunexus::server::CatalogServer;
use edunexus::state::CatalogState;
use edunexus::store::{IndexRegistry, MemoryStore};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr to avoid interfering with the RPC protocol
    // on stdout.
    edunexus::tracing::init();

    let config = Config::load()?;
    tracing::info!("Starting edunexus catalog server (data dir: {})", config.data_dir.display());

    // Provision the full power set of composite indexes before the first
    // query, so every legal filter combination is always indexable.
    let indexes = IndexRegistry::full_power_set();
    let store = Arc::new(
        MemoryStore::open(config.data_dir.join("catalog.bin"), indexes)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open catalog store: {}", e))?,
    );
    let files = Arc::new(LocalFileStore::new(config.data_dir.join("objects")));

    let state = Arc::new(CatalogState::new(store, files, config));
    let server = CatalogServer::new(state);

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving catalog server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
