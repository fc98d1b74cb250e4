#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or_default};

/// Default endpoint: a MongoDB server on the local machine
pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017/";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// MongoDB connection configuration
///
/// Can be constructed manually or loaded from environment variables (with
/// the `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::new("mongodb://localhost:27017").with_app_name("health-records");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    /// MongoDB connection URL
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds. Bounds how long `connect` waits
    /// for an unreachable server before failing.
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a config for `url` with default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Override both timeouts
    pub fn with_timeouts(mut self, connect_secs: u64, server_selection_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.server_selection_timeout_secs = server_selection_secs;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MONGODB_URL.to_string(),
            app_name: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            server_selection_timeout_secs: DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        }
    }
}

/// Load MongoConfig from environment variables
///
/// Every variable is optional; with none set the config points at a local
/// server.
///
/// - `MONGODB_URL` or `MONGO_URL` (default: `mongodb://localhost:27017/`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGO_URL"))
            .unwrap_or_else(|_| DEFAULT_MONGODB_URL.to_string());

        let app_name = std::env::var("MONGODB_APP_NAME").ok();

        let connect_timeout_secs =
            env_parse_or_default("MONGODB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;

        let server_selection_timeout_secs = env_parse_or_default(
            "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        )?;

        Ok(Self {
            url,
            app_name,
            connect_timeout_secs,
            server_selection_timeout_secs,
        })
    }
}
