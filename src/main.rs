mod config;

use application::MarketplaceApp;
use config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("pricebeat=info")
        .init();

    info!("Marketplace catalog with price-dominance comparison");

    // Load configuration from environment variables
    let config = Config::from_env()?;
    config.print_config();

    // Opening the app runs pending migrations and verifies the pool
    let app = MarketplaceApp::new(&config.database_path);

    let stores = app.store_service.list_stores().await?;
    info!("Catalog ready: {} store(s) registered", stores.len());
    info!("Run the api-server crate to serve HTTP traffic");

    Ok(())
}
