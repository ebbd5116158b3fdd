//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::iiif::cache::CacheTier;

/// Root configuration for the IIIF edge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// IIIF protocol settings.
    pub iiif: IiifConfig,

    /// Routing table: request prefix → backend path and cache tier.
    pub prefixes: Vec<PrefixConfig>,

    /// Image processor / object store upstream.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            iiif: IiifConfig::default(),
            prefixes: vec![PrefixConfig::default()],
            upstream: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// IIIF protocol settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IiifConfig {
    /// Image API version served when no override is present.
    pub default_version: String,

    /// Header that lets test harnesses select another version.
    /// `None` disables the override entirely.
    pub version_override_header: Option<String>,

    /// Base URL used for `@id` in info documents. Falls back to
    /// `http://<Host>` when unset.
    pub public_base_url: Option<String>,

    /// Identifier extensions the image processor can read.
    pub processable_extensions: Vec<String>,
}

impl Default for IiifConfig {
    fn default() -> Self {
        Self {
            default_version: "2".to_string(),
            version_override_header: Some("X-Test-IIIF-Version".to_string()),
            public_base_url: None,
            processable_extensions: ["jpg", "jpeg", "png", "gif", "webp", "tif", "tiff"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// One routing table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrefixConfig {
    /// Request prefix, `""` for the default route or `/name`.
    #[serde(default)]
    pub prefix: String,

    /// Backend path template; `{identifier}` is replaced verbatim.
    pub backend_path: String,

    /// Cache tier for successful responses.
    #[serde(default = "default_cache_tier")]
    pub cache_tier: CacheTier,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            backend_path: "/{identifier}".to_string(),
            cache_tier: default_cache_tier(),
        }
    }
}

fn default_cache_tier() -> CacheTier {
    CacheTier::Public1h
}

/// Upstream image processor and metadata source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Image processor address (e.g., "127.0.0.1:9000"). It fronts the
    /// object store, so backend paths resolve against it.
    pub address: String,

    /// Metadata lookup address. Defaults to `address`.
    pub metadata_address: Option<String>,

    /// Query string that asks the metadata source for dimensions.
    pub metadata_query: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:9000".to_string(),
            metadata_address: None,
            metadata_query: "format=json".to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn metadata_address(&self) -> &str {
        self.metadata_address.as_deref().unwrap_or(&self.address)
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: EdgeConfig = toml::from_str("").unwrap();
        assert_eq!(config.iiif.default_version, "2");
        assert_eq!(config.prefixes.len(), 1);
        assert_eq!(config.prefixes[0].backend_path, "/{identifier}");
        assert_eq!(config.upstream.metadata_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_prefix_table_from_toml() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [[prefixes]]
            backend_path = "/{identifier}"

            [[prefixes]]
            prefix = "/kittehs"
            backend_path = "/cats/{identifier}"
            cache_tier = "surrogate-1h"

            [upstream]
            address = "bucket.example.com:80"
            "#,
        )
        .unwrap();

        assert_eq!(config.prefixes.len(), 2);
        assert_eq!(config.prefixes[0].cache_tier, CacheTier::Public1h);
        assert_eq!(config.prefixes[1].prefix, "/kittehs");
        assert_eq!(config.prefixes[1].cache_tier, CacheTier::Surrogate1h);
        assert_eq!(config.upstream.address, "bucket.example.com:80");
    }
}
