//! User identity as assigned by the network layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SponsorsError};

/// Unique identifier of a connecting account.
///
/// Opaque to the cache: it is only hashed, compared, and rendered into the
/// request path in its lowercase hyphenated form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wraps an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for UserId {
    type Err = SponsorsError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| SponsorsError::InvalidUserId(format!("{s}: {e}")))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_hyphenated() {
        let id: UserId = "8B1A9953-C461-4D8C-A4F6-2A6F4E5E4B17".parse().unwrap();
        assert_eq!(id.to_string(), "8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: UserId = "  8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17\n".parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), "8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "not-a-user".parse::<UserId>().unwrap_err();
        assert!(matches!(err, SponsorsError::InvalidUserId(_)));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
