use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/pastes`.
///
/// The expiry fields are camelCase on the wire; either, both, or neither may
/// be present. A paste with neither never expires.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaste {
    pub content: String,
    pub expire_after_views: Option<i64>,
    pub expire_after_seconds: Option<i64>,
}

/// Response to a successful `POST /api/pastes`.
#[derive(Debug, Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
    pub raw_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
