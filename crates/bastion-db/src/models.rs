//! Database row types. These map directly to SQLite rows and are converted
//! into the `bastion-types` models at the edge of this crate.

use bastion_types::models::{User, Website};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

pub struct UserRow {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub created_at: String,
}

pub struct WebsiteRow {
    pub id: i64,
    pub user_id: i64,
    pub domain: String,
    pub waf_enabled: bool,
    pub created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            created_at: parse_timestamp(&row.created_at),
            id: row.id,
            email: row.email,
        }
    }
}

impl From<WebsiteRow> for Website {
    fn from(row: WebsiteRow) -> Self {
        Self {
            created_at: parse_timestamp(&row.created_at),
            id: row.id,
            user_id: row.user_id,
            domain: row.domain,
            waf_enabled: row.waf_enabled,
        }
    }
}

/// SQLite's `datetime('now')` yields "YYYY-MM-DD HH:MM:SS" without a zone;
/// those are UTC.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}
