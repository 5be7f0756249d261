//! Sponsors API client.
//!
//! Fetches sponsor records from `GET {base_url}/sponsors/{user_id}`.

mod client;

pub use client::{ClientConfig, SponsorsApiClient};
