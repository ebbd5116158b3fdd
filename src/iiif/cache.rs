//! Cache tiers assigned to successful responses.
//!
//! The engine only assigns a tier; enforcement belongs to whatever cache
//! layer sits in front of it.

use std::fmt;

use axum::http::header::{HeaderName, CACHE_CONTROL};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// `Surrogate-Control`, read by edge caches and stripped before clients.
pub const SURROGATE_CONTROL: HeaderName = HeaderName::from_static("surrogate-control");

/// Named cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheTier {
    /// Cacheable anywhere for an hour.
    #[serde(rename = "public-1h")]
    Public1h,
    /// Cacheable by the edge for an hour, never by clients.
    #[serde(rename = "surrogate-1h")]
    Surrogate1h,
    /// Served but never stored.
    #[serde(rename = "no-store-private")]
    NoStorePrivate,
    /// Revalidate every time.
    #[serde(rename = "no-cache-revalidate")]
    NoCacheRevalidate,
}

impl CacheTier {
    pub fn tag(&self) -> &'static str {
        match self {
            CacheTier::Public1h => "public-1h",
            CacheTier::Surrogate1h => "surrogate-1h",
            CacheTier::NoStorePrivate => "no-store-private",
            CacheTier::NoCacheRevalidate => "no-cache-revalidate",
        }
    }

    /// Response headers that express this tier.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        match self {
            CacheTier::Public1h => vec![(CACHE_CONTROL, HeaderValue::from_static("max-age=3600, public"))],
            CacheTier::Surrogate1h => vec![(SURROGATE_CONTROL, HeaderValue::from_static("max-age=3600"))],
            CacheTier::NoStorePrivate => vec![(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store, must-revalidate, private"),
            )],
            CacheTier::NoCacheRevalidate => vec![(
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            )],
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_headers() {
        let headers = CacheTier::Public1h.headers();
        assert_eq!(headers[0].0, CACHE_CONTROL);
        assert_eq!(headers[0].1, "max-age=3600, public");

        let headers = CacheTier::Surrogate1h.headers();
        assert!(headers.iter().all(|(name, _)| *name != CACHE_CONTROL));
    }

    #[test]
    fn test_tier_tags_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            tier: CacheTier,
        }
        let w: Wrapper = toml::from_str(r#"tier = "no-store-private""#).unwrap();
        assert_eq!(w.tier, CacheTier::NoStorePrivate);
        assert_eq!(w.tier.to_string(), "no-store-private");
    }
}
