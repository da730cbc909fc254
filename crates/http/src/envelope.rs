//! The `{code, data, message}` wrapper every API response uses.

use serde::Deserialize;
use serde_json::Value;

/// Business-level response envelope. `code == 0` is the sole success
/// sentinel, independent of the transport status.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
}

impl Envelope {
    pub const SUCCESS: i64 = 0;

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }
}
