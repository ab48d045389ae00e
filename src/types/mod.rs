use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub mod api;

/// A stored paste.
///
/// Rows are soft-deleted only: expiry flips `is_deleted` and leaves the row
/// in place, so a dead id keeps answering "gone" rather than "not found".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining_views: Option<i64>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
}

impl Paste {
    /// Whether the paste's time-to-live has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn paste(expires_at: Option<DateTime<Utc>>) -> Paste {
        Paste {
            id: "abcdefghij".to_owned(),
            content: "hello".to_owned(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            expires_at,
            remaining_views: None,
            is_deleted: false,
        }
    }

    #[test]
    fn never_expires_without_deadline() {
        let paste = paste(None);
        assert!(!paste.is_expired_at(Utc.timestamp_opt(4_000_000_000, 0).unwrap()));
    }

    #[test]
    fn deadline_is_inclusive() {
        let expires_at = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        let paste = paste(Some(expires_at));

        assert!(!paste.is_expired_at(expires_at - chrono::Duration::seconds(1)));
        assert!(paste.is_expired_at(expires_at));
        assert!(paste.is_expired_at(expires_at + chrono::Duration::seconds(1)));
    }

    #[test]
    fn tombstone_flag_is_not_serialized() {
        let value = serde_json::to_value(paste(None)).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("id"));
        assert!(object.contains_key("content"));
        assert!(object.contains_key("created_at"));
        assert!(object.contains_key("expires_at"));
        assert!(object.contains_key("remaining_views"));
        assert!(!object.contains_key("is_deleted"));
    }
}
