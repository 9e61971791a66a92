use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    #[serde(with = "crate::time")]
    pub created_at: DateTime<Utc>,
}

/// A past question/answer pair. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(with = "crate::time")]
    pub timestamp: DateTime<Utc>,
}
