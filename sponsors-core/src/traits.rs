//! Common traits for the sponsor metadata crates.
//!
//! These traits define the seams between the cache and its collaborators,
//! enabling fakes in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SponsorInfo, UserId};

// ═══════════════════════════════════════════════════════════════════════════════
// SPONSOR SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for fetching sponsor records from the remote API.
///
/// Implementations might use:
/// - The HTTP sponsors API (production)
/// - A canned in-memory table (tests, offline servers)
#[async_trait]
pub trait SponsorSource: Send + Sync {
    /// Fetches the sponsor record for a user.
    ///
    /// # Returns
    /// - `Ok(Some(info))` when the API returned a record (its tier may still be absent)
    /// - `Ok(None)` when the API has no record for this user
    /// - `Err(_)` on any remote, transport, or decoding failure
    async fn fetch(&self, base_url: &str, user_id: UserId) -> Result<Option<SponsorInfo>>;
}

#[async_trait]
impl<T: SponsorSource + ?Sized> SponsorSource for std::sync::Arc<T> {
    async fn fetch(&self, base_url: &str, user_id: UserId) -> Result<Option<SponsorInfo>> {
        (**self).fetch(base_url, user_id).await
    }
}
