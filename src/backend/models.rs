//! Backend Data Model
//!
//! Users and handshake records as returned by the auth and data APIs.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Authenticated identity issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }

    /// Part of the email before `@`, used for the greeting
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or("")
    }
}

/// Backend-assigned record id (bigint or uuid column)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{}", n),
            MessageId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A stored handshake message
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HandshakeMessage {
    pub id: MessageId,
    pub user_id: String,
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// `timestamptz` columns carry an offset; plain `timestamp` columns do not
/// and are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(at.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", text)))
}

/// Insert payload; id and timestamp are assigned server-side
#[derive(Debug, Clone, Serialize)]
pub struct NewHandshake<'a> {
    pub user_id: &'a str,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_email_local_part() {
        let user = User::new("u-1", "ada@example.com");
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn test_display_name_without_email() {
        let user = User {
            id: "u-2".to_string(),
            email: None,
        };
        assert_eq!(user.display_name(), "");
    }

    #[test]
    fn test_message_row_with_numeric_id() {
        let row = r#"{
            "id": 42,
            "user_id": "8d0f6c1e-0000-4000-8000-000000000001",
            "message": "hello",
            "created_at": "2025-03-01T10:15:30.123456+00:00"
        }"#;

        let msg: HandshakeMessage = serde_json::from_str(row).unwrap();
        assert_eq!(msg.id, MessageId::Number(42));
        assert_eq!(msg.message, "hello");
        assert_eq!(msg.created_at.timestamp(), 1740824130);
    }

    #[test]
    fn test_message_row_with_uuid_id() {
        let row = r#"{
            "id": "3f7c2d8a-1111-4222-8333-444455556666",
            "user_id": "u-1",
            "message": "hi",
            "created_at": "2025-03-01T10:15:30Z"
        }"#;

        let msg: HandshakeMessage = serde_json::from_str(row).unwrap();
        assert_eq!(msg.id.to_string(), "3f7c2d8a-1111-4222-8333-444455556666");
    }

    #[test]
    fn test_rows_without_time_zone_read_as_utc() {
        let rows = r#"[
            {"id": 2, "user_id": "u-1", "message": "naive", "created_at": "2025-03-01T10:15:30.123456"},
            {"id": 1, "user_id": "u-1", "message": "aware", "created_at": "2025-03-01T10:15:29+00:00"}
        ]"#;

        let msgs: Vec<HandshakeMessage> = serde_json::from_str(rows).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].created_at.timestamp(), 1740824130);
        assert_eq!(msgs[0].created_at.timestamp_subsec_micros(), 123456);
        assert_eq!(msgs[1].created_at.timestamp(), 1740824129);
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 30).unwrap();

        assert_eq!(parse_timestamp("2025-03-01T10:15:30Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T12:15:30+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:15:30+00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:15:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01 10:15:30"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let row = r#"{"id": 1, "user_id": "u-1", "message": "x", "created_at": "soon"}"#;
        let err = serde_json::from_str::<HandshakeMessage>(row).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
