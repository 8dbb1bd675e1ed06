//! Service configuration.

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/credit-gate").
    pub data_dir: String,

    /// HS256 secret shared with the identity provider that mints principal
    /// tokens.
    pub auth_secret: String,

    /// Expected JWT audience (default: "credit-gate").
    pub auth_audience: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Fallback secret for local development. Production deployments must set
/// `AUTH_SECRET`.
pub const DEV_AUTH_SECRET: &str = "insecure-dev-secret";

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let auth_secret = std::env::var("AUTH_SECRET").unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET not set, using development secret");
            DEV_AUTH_SECRET.into()
        });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/credit-gate".into()),
            auth_secret,
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "credit-gate".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024), // request bodies here are tiny
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/credit-gate".into(),
            auth_secret: DEV_AUTH_SECRET.into(),
            auth_audience: "credit-gate".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
