//! # Retention Policy
//!
//! Pure classification of a single fetch outcome into keep / skip / fallback.
//! Keeping this free of I/O lets every call site share one tested rule table
//! instead of re-deriving it from status codes ad hoc.

use crate::error::FetchError;
use crate::fetch::FetchedResponse;

/// What to do with a fetched resource when populating a snapshot region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDecision {
    /// Store the fresh response under its URL
    Keep,
    /// Store nothing for this URL
    Skip,
    /// Substitute a previously cached response for the same URL, if one exists
    Fallback,
}

/// Classify a fetch outcome.
///
/// Rules, in order:
/// - network-level failure (no response at all): `Fallback`
/// - `Cache-Control: no-store`: `Skip` — explicit producer intent overrides
///   everything else, including a success status
/// - 2xx: `Keep`
/// - 404 or 410: `Skip` — explicit absence, never papered over with stale data
/// - anything else (5xx, 403, unfollowed redirects, ...): `Fallback`
pub fn classify(outcome: Result<&FetchedResponse, &FetchError>) -> RetentionDecision {
    let response = match outcome {
        Ok(response) => response,
        Err(_) => return RetentionDecision::Fallback,
    };

    if response.cache_control_no_store() {
        return RetentionDecision::Skip;
    }

    if response.is_success() {
        return RetentionDecision::Keep;
    }

    match response.status {
        404 | 410 => RetentionDecision::Skip,
        _ => RetentionDecision::Fallback,
    }
}
