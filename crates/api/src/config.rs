use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
    /// Hosted-checkout payment gateway configuration.
    pub gateway: GatewayConfig,
    /// Blob storage configuration.
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            gateway: GatewayConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

/// Payment gateway configuration for hosted checkout sessions.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API.
    pub api_base: String,
    /// Secret API key sent as a Bearer token on outbound calls.
    pub secret_key: String,
    /// Shared secret for verifying inbound webhook signatures.
    pub webhook_secret: String,
    /// ISO currency code for checkout sessions (default: `usd`).
    pub currency: String,
    /// Redirect target after a successful payment.
    pub success_url: String,
    /// Redirect target when the payer abandons checkout.
    pub cancel_url: String,
}

impl GatewayConfig {
    /// Load gateway configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default                              |
    /// |--------------------------|----------|--------------------------------------|
    /// | `GATEWAY_API_BASE`       | no       | `https://api.gateway.example`        |
    /// | `GATEWAY_SECRET_KEY`     | **yes**  | --                                   |
    /// | `GATEWAY_WEBHOOK_SECRET` | **yes**  | --                                   |
    /// | `GATEWAY_CURRENCY`       | no       | `usd`                                |
    /// | `CHECKOUT_SUCCESS_URL`   | no       | `http://localhost:5173/invoices?paid=1` |
    /// | `CHECKOUT_CANCEL_URL`    | no       | `http://localhost:5173/invoices`     |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("GATEWAY_API_BASE")
                .unwrap_or_else(|_| "https://api.gateway.example".into()),
            secret_key: std::env::var("GATEWAY_SECRET_KEY")
                .expect("GATEWAY_SECRET_KEY must be set in the environment"),
            webhook_secret: std::env::var("GATEWAY_WEBHOOK_SECRET")
                .expect("GATEWAY_WEBHOOK_SECRET must be set in the environment"),
            currency: std::env::var("GATEWAY_CURRENCY").unwrap_or_else(|_| "usd".into()),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:5173/invoices?paid=1".into()),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:5173/invoices".into()),
        }
    }
}

/// Blob storage configuration for uploaded documents.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage API.
    pub api_base: String,
    /// Bucket holding project documents.
    pub bucket: String,
    /// Service key with sign/delete rights.
    pub service_key: String,
    /// Lifetime of signed preview URLs in seconds (default: `300`).
    pub signed_url_ttl_secs: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default                       |
    /// |--------------------------|----------|-------------------------------|
    /// | `STORAGE_API_BASE`       | no       | `https://storage.example`     |
    /// | `STORAGE_BUCKET`         | no       | `project-documents`           |
    /// | `STORAGE_SERVICE_KEY`    | **yes**  | --                            |
    /// | `STORAGE_SIGNED_URL_TTL` | no       | `300`                         |
    ///
    /// # Panics
    ///
    /// Panics if `STORAGE_SERVICE_KEY` is missing.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("STORAGE_API_BASE")
                .unwrap_or_else(|_| "https://storage.example".into()),
            bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "project-documents".into()),
            service_key: std::env::var("STORAGE_SERVICE_KEY")
                .expect("STORAGE_SERVICE_KEY must be set in the environment"),
            signed_url_ttl_secs: std::env::var("STORAGE_SIGNED_URL_TTL")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .expect("STORAGE_SIGNED_URL_TTL must be a valid u64"),
        }
    }
}
