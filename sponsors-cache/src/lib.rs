//! Per-session cache of sponsor metadata.
//!
//! One slot per connected user, opened on connect and closed on disconnect.
//! No size or time based eviction.

mod cache;

pub use cache::{CacheStats, InsertOutcome, SessionTicket, SponsorCache};
