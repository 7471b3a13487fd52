//! Shared test doubles: a scriptable fetcher and a minimal section parser.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use url::Url;

use crate::error::{EngineError, FetchError};
use crate::fetch::{FetchedResponse, ResourceFetch};
use crate::manifest::{ManifestParser, ManifestSections};

enum Script {
    Respond(FetchedResponse),
    NetworkError,
}

/// Fetcher whose every response is scripted per URL. Unscripted URLs fail at
/// the network level so a test never passes on an accidental fetch.
pub struct ScriptedFetcher {
    manifest: Mutex<String>,
    manifest_unavailable: AtomicBool,
    scripts: Mutex<HashMap<String, Script>>,
    resource_fetches: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(manifest: &str) -> Self {
        Self {
            manifest: Mutex::new(manifest.to_string()),
            manifest_unavailable: AtomicBool::new(false),
            scripts: Mutex::new(HashMap::new()),
            resource_fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_manifest(&self, text: &str) {
        *self.manifest.lock() = text.to_string();
        self.manifest_unavailable.store(false, Ordering::SeqCst);
    }

    pub fn set_manifest_unavailable(&self) {
        self.manifest_unavailable.store(true, Ordering::SeqCst);
    }

    pub fn ok(&self, url: &str, body: &str) {
        self.ok_with_headers(url, body, vec![]);
    }

    pub fn ok_with_headers(&self, url: &str, body: &str, headers: Vec<(&str, &str)>) {
        self.respond(
            url,
            FetchedResponse {
                status: 200,
                headers: headers
                    .into_iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                body: Bytes::from(body.to_string()),
            },
        );
    }

    pub fn status(&self, url: &str, status: u16, body: &str) {
        self.respond(
            url,
            FetchedResponse {
                status,
                headers: vec![],
                body: Bytes::from(body.to_string()),
            },
        );
    }

    pub fn fail(&self, url: &str) {
        self.scripts
            .lock()
            .insert(url.to_string(), Script::NetworkError);
    }

    pub fn resource_fetch_count(&self) -> usize {
        self.resource_fetches.load(Ordering::SeqCst)
    }

    fn respond(&self, url: &str, response: FetchedResponse) {
        self.scripts
            .lock()
            .insert(url.to_string(), Script::Respond(response));
    }
}

#[async_trait]
impl ResourceFetch for ScriptedFetcher {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, EngineError> {
        if self.manifest_unavailable.load(Ordering::SeqCst) {
            return Err(EngineError::ManifestFetch {
                url: url.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(self.manifest.lock().clone())
    }

    async fn fetch_resource(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        self.resource_fetches.fetch_add(1, Ordering::SeqCst);
        match self.scripts.lock().get(url.as_str()) {
            Some(Script::Respond(response)) => Ok(response.clone()),
            Some(Script::NetworkError) => {
                Err(FetchError::Network(format!("scripted failure for {url}")))
            }
            None => Err(FetchError::Network(format!("no script for {url}"))),
        }
    }
}

/// Line-oriented parser for `CACHE:` / `NETWORK:` / `FALLBACK:` sections.
/// Lines before any header belong to the cache section.
pub struct SectionParser;

impl ManifestParser for SectionParser {
    fn parse(&self, text: &str) -> ManifestSections {
        enum Section {
            Cache,
            Network,
            Fallback,
        }

        let mut sections = ManifestSections::default();
        let mut current = Section::Cache;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                "CACHE:" => current = Section::Cache,
                "NETWORK:" => current = Section::Network,
                "FALLBACK:" => current = Section::Fallback,
                entry => match current {
                    Section::Cache => sections.cache.push(entry.to_string()),
                    Section::Network => sections.network.push(entry.to_string()),
                    Section::Fallback => {
                        let mut parts = entry.split_whitespace();
                        if let (Some(namespace), Some(target)) = (parts.next(), parts.next()) {
                            sections
                                .fallback
                                .push((namespace.to_string(), target.to_string()));
                        }
                    }
                },
            }
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_parser_splits_sections() {
        let text = "CACHE:\n/a.js\n/b.css\nNETWORK:\n*\nFALLBACK:\n/images/ /offline.png\n";
        let sections = SectionParser.parse(text);

        assert_eq!(sections.cache, vec!["/a.js", "/b.css"]);
        assert_eq!(sections.network, vec!["*"]);
        assert_eq!(
            sections.fallback,
            vec![("/images/".to_string(), "/offline.png".to_string())]
        );
    }

    #[test]
    fn test_section_parser_defaults_to_cache() {
        let sections = SectionParser.parse("/implicit.js\n");
        assert_eq!(sections.cache, vec!["/implicit.js"]);
    }
}
