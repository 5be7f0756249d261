//! # Sponsors Core
//!
//! Core types, errors, and traits shared by the sponsor metadata crates.
//!
//! - **Types**: [`UserId`] and the [`SponsorInfo`] record served by the sponsors API
//! - **Errors**: [`SponsorsError`] covering remote, transport, and protocol failures
//! - **Constants**: API paths and client defaults
//! - **Traits**: [`SponsorSource`], the seam between the cache and the remote API
//!
//! ## Example
//!
//! ```rust
//! use sponsors_core::SponsorInfo;
//!
//! let info: SponsorInfo = serde_json::from_str(r#"{"tier": 2, "priorityJoin": true}"#).unwrap();
//! assert!(info.is_sponsor());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, SponsorsError};
pub use traits::*;
pub use types::*;
