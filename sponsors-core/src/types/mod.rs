//! Domain types for sponsor metadata.

mod sponsor;
mod user;

pub use sponsor::SponsorInfo;
pub use user::UserId;
