//! # Page Load Orchestrator
//!
//! Drives a full page-load cycle: resolve the manifest version, then capture
//! the page itself into the version's region while recording the page's
//! association, concurrently. The orchestrator is a state machine whose
//! terminal states are `Done` and `Error`; `Error` absorbs every failure
//! along the way.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::join;
use tracing::{debug, error, info};
use url::Url;

use crate::error::EngineError;
use crate::ledger::VersionLedger;
use crate::resolver::{Resolution, ResolutionOutcome, VersionResolver};
use crate::snapshot::{ResourceOutcome, SnapshotBuilder};

/// Observable phase of a page-load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    Idle,
    ResolvingVersion,
    /// Fast path taken; no snapshot build ran
    UpToDate,
    /// Full snapshot build in progress
    Building,
    /// Capturing the page and committing its association
    AssociatingPage,
    Done,
    Error,
}

/// What a completed page-load cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoadReport {
    /// Version hash the page is now associated with
    pub hash: String,
    pub resolution: Resolution,
    /// How the page document itself landed in the region
    pub page_outcome: Option<ResourceOutcome>,
    pub final_state: PageLoadState,
}

pub struct PageLoadOrchestrator {
    resolver: Arc<VersionResolver>,
    builder: Arc<SnapshotBuilder>,
    ledger: Arc<VersionLedger>,
    state: Mutex<PageLoadState>,
}

impl PageLoadOrchestrator {
    pub fn new(
        resolver: Arc<VersionResolver>,
        builder: Arc<SnapshotBuilder>,
        ledger: Arc<VersionLedger>,
    ) -> Self {
        Self {
            resolver,
            builder,
            ledger,
            state: Mutex::new(PageLoadState::Idle),
        }
    }

    /// Current phase. Terminal once `Done` or `Error` is reached.
    pub fn state(&self) -> PageLoadState {
        *self.state.lock()
    }

    fn transition(&self, to: PageLoadState) {
        let mut state = self.state.lock();
        debug!(from = ?*state, to = ?to, "page load state transition");
        *state = to;
    }

    /// Run one page-load cycle for `page_url` governed by `manifest_url`.
    ///
    /// The page capture and the association commit run concurrently; the
    /// cycle is done only when both have completed. Any failure moves the
    /// orchestrator to `Error` and surfaces the cause.
    pub async fn run(
        &self,
        page_url: &Url,
        manifest_url: &Url,
    ) -> Result<PageLoadReport, EngineError> {
        self.transition(PageLoadState::ResolvingVersion);

        let resolution = match self.resolver.resolve(manifest_url).await {
            Ok(resolution) => resolution,
            Err(e) => {
                error!(page = %page_url, manifest = %manifest_url, error = %e, "version resolution failed");
                self.transition(PageLoadState::Error);
                return Err(e);
            }
        };

        match resolution.outcome {
            ResolutionOutcome::UpToDate => self.transition(PageLoadState::UpToDate),
            ResolutionOutcome::Rebuilt(_) => self.transition(PageLoadState::Building),
        }

        self.transition(PageLoadState::AssociatingPage);
        let hash = resolution.hash.clone();

        let associate = self
            .ledger
            .set_page_association(page_url, manifest_url, &hash);
        let capture = self
            .builder
            .build(&hash, std::iter::once(page_url.clone()).collect());

        let (associated, captured) = join!(associate, capture);

        if let Err(e) = associated {
            self.transition(PageLoadState::Error);
            return Err(EngineError::from(e));
        }
        let page_build = match captured {
            Ok(outcome) => outcome,
            Err(e) => {
                self.transition(PageLoadState::Error);
                return Err(e);
            }
        };

        self.transition(PageLoadState::Done);
        info!(page = %page_url, manifest = %manifest_url, hash = %hash, "page load cycle complete");

        Ok(PageLoadReport {
            hash,
            resolution,
            page_outcome: page_build.resources.get(page_url).copied(),
            final_state: PageLoadState::Done,
        })
    }
}
