//! Sponsor record as served by the sponsors API.

use serde::{Deserialize, Serialize};

/// Sponsor metadata for one user.
///
/// Field names on the wire follow the API (`tier`, `oocColor`, `priorityJoin`,
/// `nekoCharName`). Unknown fields are ignored and a missing `priorityJoin`
/// reads as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorInfo {
    /// Sponsorship level. `None` means the user is not a sponsor.
    #[serde(default)]
    pub tier: Option<i32>,
    /// Display color hint for out-of-character chat.
    #[serde(default)]
    pub ooc_color: Option<String>,
    /// Whether the user may skip the join queue.
    #[serde(default, rename = "priorityJoin")]
    pub have_priority_join: bool,
    /// Name of the user's custom character, if any.
    #[serde(default)]
    pub neko_char_name: Option<String>,
}

impl SponsorInfo {
    /// Creates a record for a sponsor of the given tier with no perks set.
    pub fn with_tier(tier: i32) -> Self {
        Self {
            tier: Some(tier),
            ..Default::default()
        }
    }

    /// Returns true if the record carries a tier and may be cached.
    pub fn is_sponsor(&self) -> bool {
        self.tier.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r##"{
            "tier": 3,
            "oocColor": "#ff00ff",
            "priorityJoin": true,
            "nekoCharName": "Whiskers"
        }"##;
        let info: SponsorInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.tier, Some(3));
        assert_eq!(info.ooc_color.as_deref(), Some("#ff00ff"));
        assert!(info.have_priority_join);
        assert_eq!(info.neko_char_name.as_deref(), Some("Whiskers"));
        assert!(info.is_sponsor());
    }

    #[test]
    fn test_deserialize_without_tier() {
        let info: SponsorInfo = serde_json::from_str(r#"{"oocColor": "red"}"#).unwrap();
        assert_eq!(info.tier, None);
        assert!(!info.have_priority_join);
        assert!(!info.is_sponsor());
    }

    #[test]
    fn test_deserialize_explicit_nulls_and_unknown_fields() {
        let json = r#"{"tier": null, "oocColor": null, "priorityJoin": false, "extra": 1}"#;
        let info: SponsorInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info, SponsorInfo::default());
    }

    #[test]
    fn test_serialize_uses_api_field_names() {
        let value = serde_json::to_value(SponsorInfo::with_tier(1)).unwrap();
        assert_eq!(value["tier"], 1);
        assert_eq!(value["priorityJoin"], false);
        assert!(value.get("oocColor").is_some());
        assert!(value.get("have_priority_join").is_none());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(serde_json::from_str::<SponsorInfo>(r#"{"tier": "gold"}"#).is_err());
    }
}
