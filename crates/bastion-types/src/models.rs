use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type WebsiteId = i64;

/// A registered account. The password hash never leaves the db crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A domain tracked by one user.
///
/// `waf_enabled` is stored and displayed but nothing toggles it yet; it is
/// reserved for the filtering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: WebsiteId,
    pub user_id: UserId,
    pub domain: String,
    pub waf_enabled: bool,
    pub created_at: DateTime<Utc>,
}
