//! Line-delimited JSON spoken between the helper client and server.
//!
//! One request per line, one response line per request:
//!
//! ```text
//! -> {"op":"read_text"}
//! <- {"text":"copied"}
//! -> {"op":"ping"}
//! <- {}
//! ```

use serde::{Deserialize, Serialize};
use tokio_util::codec::LinesCodec;

/// Upper bound for one protocol line (4 MiB of clipboard text plus framing).
pub const MAX_HELPER_LINE_BYTES: usize = 4 * 1024 * 1024 + 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HelperRequest {
    ReadText,
    Ping,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HelperResponse {
    pub fn text(text: Option<String>) -> Self {
        Self { text, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: None,
            error: Some(message.into()),
        }
    }
}

pub fn codec() -> LinesCodec {
    LinesCodec::new_with_max_length(MAX_HELPER_LINE_BYTES)
}
