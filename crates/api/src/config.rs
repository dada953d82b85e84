use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Runtime environment name (`development` or `production`).
    ///
    /// In development, password-reset tokens are echoed in the
    /// response body to ease testing without an SMTP server.
    pub environment: String,
    /// Base URL of the frontend, used to build activation links.
    pub frontend_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Seed credentials for the arbiter account.
    pub arbiter: ArbiterSeed,
}

/// Credentials for the arbiter account created at startup if absent.
#[derive(Debug, Clone)]
pub struct ArbiterSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8080`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `development`              |
    /// | `FRONTEND_URL`         | `http://localhost:8080`    |
    /// | `ARBITER_USERNAME`     | `arbiter`                  |
    /// | `ARBITER_EMAIL`        | `arbiter@winetasting.local`|
    /// | `ARBITER_PASSWORD`     | `Arbiter123!`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());

        let arbiter = ArbiterSeed {
            username: std::env::var("ARBITER_USERNAME").unwrap_or_else(|_| "arbiter".into()),
            email: std::env::var("ARBITER_EMAIL")
                .unwrap_or_else(|_| "arbiter@winetasting.local".into()),
            password: std::env::var("ARBITER_PASSWORD").unwrap_or_else(|_| "Arbiter123!".into()),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment,
            frontend_url,
            jwt,
            arbiter,
        }
    }

    /// Whether the server runs in development mode.
    pub fn is_development(&self) -> bool {
        self.environment != "production"
    }
}
