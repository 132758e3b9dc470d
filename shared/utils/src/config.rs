use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

/// Tunables of the import engine. The defaults reproduce the documented
/// import behavior and should only be changed deliberately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Leading rows searched for the header row
    pub header_scan_rows: usize,
    /// Native exports without a usable min stock level column
    pub default_min_stock_level: u32,
    /// Marketplace reorder point as a share of the ordered quantity
    pub reorder_ratio: f64,
    /// Floor of the marketplace reorder point
    pub min_reorder_level: u32,
    /// Purely numeric marketplace names below this are row sequence numbers
    pub sequence_number_ceiling: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: 50,
            default_min_stock_level: 10,
            reorder_ratio: 0.2,
            min_reorder_level: 5,
            sequence_number_ceiling: 100,
            allowed_extensions: vec![
                "csv".to_string(),
                "xls".to_string(),
                "xlsx".to_string(),
                "htm".to_string(),
                "html".to_string(),
                "json".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("PARTBIN").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_request_size: 16 * 1024 * 1024, // 16MB
                timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
                file_path: None,
            },
            import: ImportConfig::default(),
        }
    }
}
