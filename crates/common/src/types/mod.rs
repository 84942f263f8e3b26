use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Health {
    pub fn ok(environment: Option<String>, database: Option<String>) -> Self {
        Self { status: "OK".into(), timestamp: Utc::now(), environment, database }
    }
}
