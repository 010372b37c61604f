use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub api_host: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Config {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "pricebeat.db".to_string()),

            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        }
    }
}
