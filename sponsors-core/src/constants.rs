//! Constants for the sponsors API and client.

// ═══════════════════════════════════════════════════════════════════════════════
// API
// ═══════════════════════════════════════════════════════════════════════════════

/// Path segment under the base URL where sponsor records live.
///
/// Records are fetched from `{base_url}/sponsors/{user_id}`.
pub const SPONSORS_PATH: &str = "sponsors";

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of response body bytes kept in an error message.
pub const MAX_ERROR_BODY_LEN: usize = 512;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable holding the sponsors API base URL.
pub const ENV_API_URL: &str = "SPONSORS_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_API_TIMEOUT: &str = "SPONSORS_API_TIMEOUT_SECS";
