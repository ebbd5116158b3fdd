//! Response composer.
//!
//! # Data Flow
//! ```text
//! EdgeRequest (method, path, headers)
//!     → method.rs   (GET/HEAD only)
//!     → version.rs  (default or override header)
//!     → path.rs     (image or info shape)
//!     → extension check on the identifier
//!     → routing     (backend path + cache tier)
//!     → info.rs     (negotiation)   | grammar (five segments)
//!     → Decision
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: the same request always yields the same decision
//! - The first failing stage short-circuits everything after it
//! - Upstream I/O happens in the server; the engine only says what to fetch

use axum::http::header::{ACCEPT, HOST};
use axum::http::{HeaderMap, HeaderName, Method};
use serde::Serialize;
use url::form_urlencoded;

use crate::config::schema::EdgeConfig;
use crate::config::ValidationError;
use crate::iiif::cache::CacheTier;
use crate::iiif::error::IiifError;
use crate::iiif::grammar::{validate_segments, Directive};
use crate::iiif::info::{negotiate, Negotiation};
use crate::iiif::method;
use crate::iiif::path::{ParsedPath, RequestKind};
use crate::iiif::version::{IiifVersion, VersionSelector};
use crate::routing::PrefixTable;

/// The engine's view of an inbound request.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRequest<'a> {
    pub method: &'a Method,
    /// Raw path, percent-encoding intact, no query string.
    pub path: &'a str,
    pub headers: &'a HeaderMap,
}

/// Pass-through to the image processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRewrite {
    pub identifier: String,
    pub backend_path: String,
    /// Encoded processing directives, possibly empty.
    pub query: String,
    pub cache_tier: CacheTier,
}

impl ImageRewrite {
    /// Backend path with the directive query appended.
    pub fn backend_uri(&self) -> String {
        if self.query.is_empty() {
            self.backend_path.clone()
        } else {
            format!("{}?{}", self.backend_path, self.query)
        }
    }
}

/// An `info.json` request ready for the metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRequest {
    pub identifier: String,
    /// Value of `@id` in the document.
    pub id: String,
    /// Where the metadata source finds the object.
    pub backend_path: String,
    pub version: IiifVersion,
    pub negotiation: Negotiation,
}

/// Final outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Reject(IiifError),
    Image(ImageRewrite),
    Info(InfoRequest),
}

impl Decision {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Reject(_) => "rejected",
            Decision::Image(_) => "image",
            Decision::Info(_) => "info",
        }
    }
}

/// Compiled request validator and rewrite engine.
#[derive(Debug, Clone)]
pub struct Engine {
    routes: PrefixTable,
    versions: VersionSelector,
    extensions: Vec<String>,
    public_base_url: Option<String>,
}

impl Engine {
    /// Compile an engine from validated configuration.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, ValidationError> {
        let default = config
            .iiif
            .default_version
            .parse::<IiifVersion>()
            .map_err(|_| ValidationError::UnknownDefaultVersion(config.iiif.default_version.clone()))?;

        let override_header = config
            .iiif
            .version_override_header
            .as_deref()
            .map(|name| {
                HeaderName::try_from(name).map_err(|_| ValidationError::InvalidHeaderName(name.to_string()))
            })
            .transpose()?;

        Ok(Self {
            routes: PrefixTable::from_config(&config.prefixes),
            versions: VersionSelector::new(default, override_header),
            extensions: config.iiif.processable_extensions.clone(),
            public_base_url: config
                .iiif
                .public_base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn routes(&self) -> &PrefixTable {
        &self.routes
    }

    /// Run the full pipeline for one request.
    pub fn evaluate(&self, request: &EdgeRequest<'_>) -> Decision {
        self.decide(request).unwrap_or_else(Decision::Reject)
    }

    fn decide(&self, request: &EdgeRequest<'_>) -> Result<Decision, IiifError> {
        method::check(request.method)?;
        let version = self.versions.select(request.headers)?;
        let parsed = ParsedPath::parse(request.path)?;

        if !parsed.is_processable(&self.extensions) {
            return Err(IiifError::NotProcessable {
                identifier: parsed.identifier,
            });
        }

        let route = self.routes.resolve(&parsed.prefix, &parsed.identifier);

        match &parsed.kind {
            RequestKind::Info => {
                let accept = request
                    .headers
                    .get(ACCEPT)
                    .map(|value| value.to_str().unwrap_or_default());

                Ok(Decision::Info(InfoRequest {
                    id: self.document_id(request.headers, &parsed),
                    identifier: parsed.identifier,
                    backend_path: route.backend_path,
                    version,
                    negotiation: negotiate(accept, route.cache_tier),
                }))
            }
            RequestKind::Image(segments) => {
                let directives = validate_segments(segments)?;

                Ok(Decision::Image(ImageRewrite {
                    identifier: parsed.identifier,
                    backend_path: route.backend_path,
                    query: encode_directives(&directives),
                    cache_tier: route.cache_tier,
                }))
            }
        }
    }

    /// `@id` of the info document: base URL, prefix and identifier.
    fn document_id(&self, headers: &HeaderMap, parsed: &ParsedPath) -> String {
        let base = match &self.public_base_url {
            Some(url) => url.clone(),
            None => {
                let host = headers
                    .get(HOST)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("localhost");
                format!("http://{host}")
            }
        };
        format!("{base}{}/{}", parsed.prefix, parsed.identifier)
    }
}

fn encode_directives(directives: &[Directive]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for directive in directives {
        query.append_pair(directive.key, &directive.value);
    }
    query.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PrefixConfig;
    use crate::iiif::grammar::Segment;
    use axum::http::HeaderValue;

    fn engine() -> Engine {
        let mut config = EdgeConfig::default();
        config.prefixes.push(PrefixConfig {
            prefix: "/kittehs".into(),
            backend_path: "/cats/{identifier}".into(),
            cache_tier: CacheTier::Surrogate1h,
        });
        Engine::from_config(&config).unwrap()
    }

    fn evaluate(method: Method, path: &str, headers: &[(&'static str, &'static str)]) -> Decision {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, HeaderValue::from_static(value));
        }
        engine().evaluate(&EdgeRequest {
            method: &method,
            path,
            headers: &map,
        })
    }

    fn rejection(decision: Decision) -> IiifError {
        match decision {
            Decision::Reject(err) => err,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_level0_image_is_rewritten() {
        let decision = evaluate(Method::GET, "/pug-life.jpg/full/full/0/default.jpg", &[]);
        let Decision::Image(rewrite) = decision else {
            panic!("expected image rewrite");
        };
        assert_eq!(rewrite.backend_uri(), "/pug-life.jpg?format=pjpg");
        assert_eq!(rewrite.cache_tier, CacheTier::Public1h);
    }

    #[test]
    fn test_alternate_prefix_rewrite() {
        let decision = evaluate(Method::HEAD, "/kittehs/pop6.jpg/full/full/0/default.jpg", &[]);
        let Decision::Image(rewrite) = decision else {
            panic!("expected image rewrite");
        };
        assert_eq!(rewrite.backend_uri(), "/cats/pop6.jpg?format=pjpg");
        assert_eq!(rewrite.cache_tier, CacheTier::Surrogate1h);
    }

    #[test]
    fn test_segment_rejections() {
        let err = rejection(evaluate(Method::GET, "/pug-life.jpg/square/full/0/default.jpg", &[]));
        assert_eq!(err.to_string(), "Unsupported region parameter");

        let err = rejection(evaluate(Method::GET, "/pug-life.jpg/0,0,-1,-1/full/0/default.jpg", &[]));
        assert_eq!(err.to_string(), "Invalid region parameter");
        assert!(matches!(err, IiifError::Invalid { segment: Segment::Region, .. }));

        let err = rejection(evaluate(Method::GET, "/pug-life.jpg/full/full/0/default.webp", &[]));
        assert_eq!(err.to_string(), "Unsupported format parameter");
    }

    #[test]
    fn test_method_rejected_before_anything_else() {
        let err = rejection(evaluate(
            Method::POST,
            "/pug-life.jpg/full/full/0/default.jpg",
            &[("x-test-iiif-version", "3")],
        ));
        assert_eq!(err.to_string(), "Not a IIIF method");

        let foo = Method::from_bytes(b"FOO").unwrap();
        let err = rejection(evaluate(foo, "/", &[]));
        assert_eq!(err.to_string(), "Not a IIIF method");
    }

    #[test]
    fn test_version_checked_before_path() {
        let err = rejection(evaluate(Method::GET, "/", &[("x-test-iiif-version", "foo")]));
        assert_eq!(err.to_string(), "Unknown IIIF version");
        assert_eq!(err.status().as_u16(), 500);
    }

    #[test]
    fn test_path_and_extension_checks() {
        let err = rejection(evaluate(Method::GET, "/foo.jpg/full/0/default.jpg", &[]));
        assert_eq!(err, IiifError::NotIiifPath);

        let err = rejection(evaluate(Method::GET, "/foo.txt/square/full/0/default.jpg", &[]));
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_info_negotiation() {
        let decision = evaluate(
            Method::GET,
            "/pug-life.jpg/info.json",
            &[("accept", "application/xml"), ("host", "images.example.org")],
        );
        let Decision::Info(info) = decision else {
            panic!("expected info request");
        };
        assert_eq!(info.id, "http://images.example.org/pug-life.jpg");
        assert_eq!(info.backend_path, "/pug-life.jpg");
        assert_eq!(info.negotiation.content_type, "application/json");
        assert_eq!(info.negotiation.cache_tier, CacheTier::NoStorePrivate);
    }

    #[test]
    fn test_info_id_uses_public_base_url() {
        let mut config = EdgeConfig::default();
        config.iiif.public_base_url = Some("https://iiif.example.org/".into());
        config.prefixes.push(PrefixConfig {
            prefix: "/kittehs".into(),
            backend_path: "/cats/{identifier}".into(),
            cache_tier: CacheTier::Surrogate1h,
        });
        let engine = Engine::from_config(&config).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        let decision = engine.evaluate(&EdgeRequest {
            method: &Method::GET,
            path: "/kittehs/more%2Fcat.jpg/info.json",
            headers: &headers,
        });
        let Decision::Info(info) = decision else {
            panic!("expected info request");
        };
        assert_eq!(info.id, "https://iiif.example.org/kittehs/more%2Fcat.jpg");
        assert_eq!(info.backend_path, "/cats/more%2Fcat.jpg");
        assert_eq!(info.negotiation.cache_tier, CacheTier::Surrogate1h);
    }

    #[test]
    fn test_decision_serializes_for_reports() {
        let decision = evaluate(Method::GET, "/pug-life.jpg/full/max/0/default.jpg", &[]);
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["decision"], "reject");
        assert_eq!(value["status"], 400);
        assert_eq!(value["body"], "Unsupported size parameter");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let path = "/pug-life.jpg/pct:0,0,50,50/full/0/default.jpg";
        assert_eq!(evaluate(Method::GET, path, &[]), evaluate(Method::GET, path, &[]));
    }
}
