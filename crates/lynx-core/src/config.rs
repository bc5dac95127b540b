//! Configuration for Gremlin connections.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`LYNX_GREMLIN__*`, e.g. `LYNX_GREMLIN__ENDPOINT`)
//! 2. Config file (`<prefix>.toml`, `[gremlin]` section)
//! 3. Defaults

use serde::Deserialize;

use crate::error::LynxError;

/// Connection and compilation settings for a Gremlin endpoint.
///
/// The client never opens connections itself; `url()` and the credentials are
/// handed to whatever transport the caller constructs. The remaining fields
/// shape the scripts the client generates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GremlinConfig {
    /// Server host name.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request path of the Gremlin endpoint (default: "/gremlin").
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub user: String,

    /// Access key or password.
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub use_tls: bool,

    /// Alias scripts are bound to (default: "g").
    #[serde(default = "default_traversal_source")]
    pub traversal_source: String,

    /// Property stamped on every created vertex with the vertex type as value.
    #[serde(default = "default_partition_key")]
    pub partition_key: String,

    /// Upper bound on hops explored by reachability searches.
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
}

fn default_endpoint() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8182
}

fn default_path() -> String {
    "/gremlin".to_string()
}

fn default_traversal_source() -> String {
    "g".to_string()
}

fn default_partition_key() -> String {
    "_partitionKey".to_string()
}

fn default_max_hops() -> u32 {
    16
}

impl Default for GremlinConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            port: default_port(),
            path: default_path(),
            user: String::new(),
            key: String::new(),
            use_tls: false,
            traversal_source: default_traversal_source(),
            partition_key: default_partition_key(),
            max_hops: default_max_hops(),
        }
    }
}

impl GremlinConfig {
    /// Load the `[gremlin]` section from `<file_prefix>.toml` (optional) and
    /// `LYNX_GREMLIN__*` environment variables.
    ///
    /// A missing section yields the defaults.
    pub fn load(file_prefix: &str) -> Result<Self, LynxError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("LYNX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded = match cfg.get::<GremlinConfig>("gremlin") {
            Ok(c) => c,
            Err(config::ConfigError::NotFound(_)) => GremlinConfig::default(),
            Err(e) => return Err(e.into()),
        };
        loaded.validate()?;

        tracing::debug!(endpoint = %loaded.endpoint, port = loaded.port, "Loaded Gremlin config");
        Ok(loaded)
    }

    /// Reject settings that would produce unusable scripts.
    pub fn validate(&self) -> Result<(), LynxError> {
        if self.traversal_source.is_empty()
            || !self
                .traversal_source
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(LynxError::Config(format!(
                "traversal_source must be a plain identifier, got {:?}",
                self.traversal_source
            )));
        }
        if self.partition_key.is_empty() {
            return Err(LynxError::Config("partition_key must not be empty".into()));
        }
        if self.max_hops == 0 {
            return Err(LynxError::Config("max_hops must be at least 1".into()));
        }
        Ok(())
    }

    /// WebSocket URL of the endpoint.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("{scheme}://{}:{}{path}", self.endpoint, self.port)
    }
}
