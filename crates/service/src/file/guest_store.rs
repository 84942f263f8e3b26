use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::guest::domain::{sort_guests, Guest};
use crate::guest::repository::GuestRepository;
use crate::storage::json_document::JsonDocumentStore;

/// On-disk layout of the guest list: `{guests, createdAt, clearedAt?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDocument {
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared_at: Option<DateTime<Utc>>,
}

impl Default for GuestDocument {
    fn default() -> Self {
        Self { guests: Vec::new(), created_at: Utc::now(), cleared_at: None }
    }
}

/// Guest list persisted as one JSON file.
pub struct JsonGuestStore {
    doc: JsonDocumentStore<GuestDocument>,
}

impl JsonGuestStore {
    /// Open the file, creating `{guests: [], createdAt}` if it does not exist yet.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let doc = JsonDocumentStore::open(path, GuestDocument::default).await?;
        info!(path = %doc.path().display(), "guest file store ready");
        Ok(Self { doc })
    }

    pub fn path(&self) -> &std::path::Path { self.doc.path() }

    /// Raw document, including the bookkeeping timestamps.
    pub async fn document(&self) -> Result<GuestDocument, ServiceError> {
        self.doc.load().await
    }
}

#[async_trait]
impl GuestRepository for JsonGuestStore {
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
        let doc = self.doc.load().await?;
        Ok(doc.guests.into_iter().find(|g| g.matches(name)))
    }

    async fn insert(&self, name: &str) -> Result<Guest, ServiceError> {
        self.doc
            .update(|doc| {
                if doc.guests.iter().any(|g| g.matches(name)) {
                    return Err(ServiceError::Conflict(name.trim().to_string()));
                }
                let guest = Guest::new(name);
                doc.guests.push(guest.clone());
                Ok(guest)
            })
            .await
    }

    async fn list_all(&self) -> Result<Vec<Guest>, ServiceError> {
        let mut guests = self.doc.load().await?.guests;
        sort_guests(&mut guests);
        Ok(guests)
    }

    async fn delete_by_name(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
        self.doc
            .update(|doc| Ok(doc.guests.iter().position(|g| g.matches(name)).map(|i| doc.guests.remove(i))))
            .await
    }

    async fn update_name(&self, old_name: &str, new_name: &str) -> Result<Option<Guest>, ServiceError> {
        self.doc
            .update(|doc| {
                Ok(doc.guests.iter_mut().find(|g| g.matches(old_name)).map(|g| {
                    g.rename(new_name);
                    g.clone()
                }))
            })
            .await
    }

    async fn clear_all(&self) -> Result<(), ServiceError> {
        self.doc
            .update(|doc| {
                debug!(removed = doc.guests.len(), "clearing guest file");
                doc.guests.clear();
                doc.cleared_at = Some(Utc::now());
                Ok(())
            })
            .await
    }

    fn backend(&self) -> &'static str { "json-file" }
}
