//! Prefix table lookup.
//!
//! # Responsibilities
//! - Store the compiled prefix entries
//! - Map a request prefix to its backend path template and cache tier
//! - Fall back to the default entry for unknown prefixes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) prefix lookup via HashMap
//! - Unknown prefixes resolve to the default entry, never to a 404

use std::collections::HashMap;

use serde::Serialize;

use crate::config::schema::PrefixConfig;
use crate::iiif::cache::CacheTier;

const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// A compiled prefix entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub prefix: String,
    pub backend_template: String,
    pub cache_tier: CacheTier,
}

impl Route {
    fn from_config(config: &PrefixConfig) -> Self {
        Self {
            prefix: normalize_prefix(&config.prefix),
            backend_template: config.backend_path.clone(),
            cache_tier: config.cache_tier,
        }
    }

    /// Substitute the identifier into the backend template.
    pub fn backend_path(&self, identifier: &str) -> String {
        self.backend_template.replace(IDENTIFIER_PLACEHOLDER, identifier)
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::from_config(&PrefixConfig::default())
    }
}

/// Result of resolving a prefix and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub backend_path: String,
    pub cache_tier: CacheTier,
}

/// Prefix → backend mapping with a default entry.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    routes: HashMap<String, Route>,
    default: Route,
}

impl PrefixTable {
    /// Build the table from config. The entry with an empty prefix becomes
    /// the default; later duplicates override earlier ones.
    pub fn from_config(entries: &[PrefixConfig]) -> Self {
        let mut routes = HashMap::new();
        let mut default = Route::default();

        for route in entries.iter().map(Route::from_config) {
            if route.prefix.is_empty() {
                default = route;
            } else {
                routes.insert(route.prefix.clone(), route);
            }
        }

        Self { routes, default }
    }

    pub fn lookup(&self, prefix: &str) -> &Route {
        self.routes.get(prefix).unwrap_or(&self.default)
    }

    pub fn resolve(&self, prefix: &str, identifier: &str) -> RouteDecision {
        let route = self.lookup(prefix);
        RouteDecision {
            backend_path: route.backend_path(identifier),
            cache_tier: route.cache_tier,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// `kittehs`, `/kittehs` and `/kittehs/` all name the same prefix.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
