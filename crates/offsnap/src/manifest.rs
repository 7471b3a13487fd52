//! # Manifest Model
//!
//! Types for parsed manifests and their version history, the external parser
//! seam, URL absolutization, and the content hash that names each version.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use url::Url;

/// The literal network wildcard entry, preserved unresolved.
pub const NETWORK_WILDCARD: &str = "*";

/// Raw manifest sections as produced by the external parser.
/// Entries may still be relative; the engine absolutizes them against the
/// manifest URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSections {
    /// Resources to capture into the snapshot
    pub cache: Vec<String>,
    /// Resources allowed to bypass the snapshot, or the `"*"` wildcard
    pub network: Vec<String>,
    /// (namespace, fallback resource) pairs
    pub fallback: Vec<(String, String)>,
}

/// External collaborator: turns raw manifest text into sections.
/// Consumed once per full rebuild; never called on the fast path.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, text: &str) -> ManifestSections;
}

/// A network-section entry after absolutization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NetworkEntry {
    /// The literal `"*"` wildcard
    Wildcard,
    Url(Url),
}

/// A manifest with every URL rewritten to absolute form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedManifest {
    pub cache_urls: BTreeSet<Url>,
    pub network_urls: BTreeSet<NetworkEntry>,
    pub fallback_map: BTreeMap<Url, Url>,
}

impl ParsedManifest {
    /// The set of URLs a snapshot for this manifest must contain:
    /// the cache list plus every fallback target.
    pub fn snapshot_urls(&self) -> BTreeSet<Url> {
        self.cache_urls
            .iter()
            .cloned()
            .chain(self.fallback_map.values().cloned())
            .collect()
    }
}

/// One observed manifest version. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestVersionEntry {
    /// Content hash, also the snapshot region name
    pub hash: String,
    pub parsed: ParsedManifest,
}

/// Content fingerprint of a manifest: `hex(sha256(manifest_url ++ text))`.
///
/// Deterministic across calls and sessions; distinct for distinct content at
/// the same URL and for identical content at distinct URLs.
pub fn version_hash(manifest_url: &Url, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(manifest_url.as_str().as_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")
}

/// Rewrite every URL in the parsed sections to absolute form against the
/// manifest URL. The network wildcard is preserved unresolved; entries that
/// cannot be resolved are dropped with a warning, as the legacy mechanism
/// ignored malformed lines.
pub fn absolutize(sections: &ManifestSections, manifest_url: &Url) -> ParsedManifest {
    let mut parsed = ParsedManifest::default();

    for raw in &sections.cache {
        match manifest_url.join(raw) {
            Ok(url) => {
                parsed.cache_urls.insert(url);
            }
            Err(e) => warn!(entry = %raw, error = %e, "dropping unresolvable cache entry"),
        }
    }

    for raw in &sections.network {
        if raw == NETWORK_WILDCARD {
            parsed.network_urls.insert(NetworkEntry::Wildcard);
            continue;
        }
        match manifest_url.join(raw) {
            Ok(url) => {
                parsed.network_urls.insert(NetworkEntry::Url(url));
            }
            Err(e) => warn!(entry = %raw, error = %e, "dropping unresolvable network entry"),
        }
    }

    for (namespace, target) in &sections.fallback {
        match (manifest_url.join(namespace), manifest_url.join(target)) {
            (Ok(namespace), Ok(target)) => {
                parsed.fallback_map.insert(namespace, target);
            }
            _ => warn!(
                namespace = %namespace,
                target = %target,
                "dropping unresolvable fallback pair"
            ),
        }
    }

    parsed
}
