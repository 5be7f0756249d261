//! # Sponsors Manager
//!
//! Keeps sponsor metadata for connected users. A connect opens a session and
//! fetches the user's record from the sponsors API; a disconnect drops it.
//! Other systems read records with [`SponsorsManager::lookup`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod events;
mod manager;

pub use config::{ApiUrlSetting, SponsorsConfig};
pub use events::ConnectionEvent;
pub use manager::SponsorsManager;
pub use sponsors_cache::CacheStats;
pub use sponsors_client::{ClientConfig, SponsorsApiClient};
