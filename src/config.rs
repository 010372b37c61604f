use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Ok(Config {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "pricebeat.db".to_string()),
        })
    }

    pub fn print_config(&self) {
        tracing::info!("Database path: {}", self.database_path);
    }
}
