//! Info responder: the `info.json` capability document.
//!
//! # Content Negotiation
//! ```text
//! no Accept                          → application/json,    no-cache-revalidate
//! Accept admits application/ld+json  → application/ld+json, prefix tier
//! anything else                      → application/json,    no-store-private
//! ```
//!
//! The last row serves the document but keeps it out of every cache so a
//! `Vary: Accept` entry is never stored for an arbitrary media type.

use serde::{Deserialize, Serialize};

use crate::iiif::cache::CacheTier;
use crate::iiif::version::IiifVersion;

pub const JSON_LD: &str = "application/ld+json";
pub const JSON: &str = "application/json";

const PROTOCOL: &str = "http://iiif.io/api/image";
const FORMATS: [&str; 1] = ["jpg"];
const SUPPORTS: [&str; 2] = ["cors", "jsonldMediaType"];

/// Source dimensions as reported by the metadata lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Outcome of negotiating the info document's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Negotiation {
    pub content_type: &'static str,
    pub cache_tier: CacheTier,
}

/// Pick content type and cache tier from the `Accept` header.
pub fn negotiate(accept: Option<&str>, prefix_tier: CacheTier) -> Negotiation {
    let Some(accept) = accept else {
        return Negotiation {
            content_type: JSON,
            cache_tier: CacheTier::NoCacheRevalidate,
        };
    };

    if accepts_json_ld(accept) {
        Negotiation {
            content_type: JSON_LD,
            cache_tier: prefix_tier,
        }
    } else {
        Negotiation {
            content_type: JSON,
            cache_tier: CacheTier::NoStorePrivate,
        }
    }
}

/// True when any media range in `accept` admits `application/ld+json`.
fn accepts_json_ld(accept: &str) -> bool {
    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = parts.any(|param| {
            param
                .split_once('=')
                .filter(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                .and_then(|(_, q)| q.trim().parse::<f32>().ok())
                .map(|q| q <= 0.0)
                .unwrap_or(false)
        });

        !refused && matches!(media.as_str(), JSON_LD | "application/*" | "*/*")
    })
}

/// Level 0 feature description, second element of `profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDescription {
    pub formats: Vec<&'static str>,
    pub supports: Vec<&'static str>,
}

/// The IIIF image information document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoDocument {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub protocol: &'static str,
    pub width: u32,
    pub height: u32,
    pub profile: (&'static str, ProfileDescription),
}

impl InfoDocument {
    pub fn new(version: IiifVersion, id: String, info: ImageInfo) -> Self {
        Self {
            context: version.context(),
            id,
            protocol: PROTOCOL,
            width: info.width,
            height: info.height,
            profile: (
                version.level0_profile(),
                ProfileDescription {
                    formats: FORMATS.to_vec(),
                    supports: SUPPORTS.to_vec(),
                },
            ),
        }
    }
}
