use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use models::guest::name_key;

/// A confirmed attendee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub name: String,
    pub confirmed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Guest {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim().to_string(), confirmed_at: Utc::now(), updated_at: None }
    }

    pub fn matches(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    pub fn rename(&mut self, new_name: &str) {
        self.name = new_name.trim().to_string();
        self.updated_at = Some(Utc::now());
    }
}

impl From<models::guest::Model> for Guest {
    fn from(m: models::guest::Model) -> Self {
        Self {
            name: m.name,
            confirmed_at: m.confirmed_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Listing order shared by every backing, see [`models::guest::compare_names`].
pub fn sort_guests(guests: &mut [Guest]) {
    guests.sort_by(|a, b| models::guest::compare_names(&a.name, &b.name));
}

/// Sub-actions of the admin maintenance endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Delete,
    Edit,
    Clear,
}

impl ManageAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "delete" => Some(Self::Delete),
            "edit" => Some(Self::Edit),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Edit => "edit",
            Self::Clear => "clear",
        }
    }
}

/// Admin request body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ManageOutcome {
    Removed(Guest),
    Updated { previous: String, guest: Guest },
    Cleared,
    NotFound,
    Unrecognized,
}
