//! Public links for shares and invitation responses.

use keyhub_core::types::ShareId;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Builds the URLs that go into API responses and invitation emails.
#[derive(Debug, Clone)]
pub struct LinkService {
    base_url: String,
}

impl LinkService {
    /// Creates a link service rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/share/{id}`
    pub fn share_url(&self, share_id: &ShareId) -> String {
        format!("{}/share/{}", self.base_url, share_id)
    }

    /// `{base}/share/{id}/accept?token=...`
    pub fn accept_url(&self, share_id: &ShareId, token: &str) -> String {
        format!("{}/accept?token={}", self.share_url(share_id), encode_query_value(token))
    }

    /// `{base}/share/{id}/reject?token=...`
    pub fn reject_url(&self, share_id: &ShareId, token: &str) -> String {
        format!("{}/reject?token={}", self.share_url(share_id), encode_query_value(token))
    }
}

/// Everything outside the RFC 3986 unreserved set.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
