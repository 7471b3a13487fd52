//! # Snapshot Types
//!
//! Common types shared by the snapshot store providers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::fetch::FetchedResponse;

/// Result of a snapshot store operation
pub type StoreResult<T> = std::result::Result<T, std::io::Error>;

/// Status and headers persisted alongside a captured response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

/// A response captured into a snapshot region, copied byte-for-byte when it
/// serves as a fallback for a later region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub meta: ResponseMeta,
    pub body: Bytes,
}

impl StoredResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            meta: ResponseMeta { status, headers },
            body,
        }
    }
}

impl From<FetchedResponse> for StoredResponse {
    fn from(response: FetchedResponse) -> Self {
        Self {
            meta: ResponseMeta {
                status: response.status,
                headers: response.headers,
            },
            body: response.body,
        }
    }
}
