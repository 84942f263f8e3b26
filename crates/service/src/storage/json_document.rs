use std::{marker::PhantomData, path::PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Whole-document JSON file store.
///
/// The file is the source of truth: every read loads it from disk and every
/// mutation loads, edits in memory and rewrites the full document. Mutations
/// inside one process are serialised through `write_gate`; writers in other
/// processes are not coordinated.
pub struct JsonDocumentStore<T> {
    file_path: PathBuf,
    write_gate: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonDocumentStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default + Clone + PartialEq,
{
    /// Open the store at `path`. Creates the parent directory and writes `init()` if the file is missing.
    pub async fn open<P, F>(path: P, init: F) -> Result<Self, ServiceError>
    where
        P: Into<PathBuf>,
        F: FnOnce() -> T,
    {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
            }
        }

        let store = Self { file_path, write_gate: Mutex::new(()), _doc: PhantomData };
        if fs::metadata(&store.file_path).await.is_err() {
            store.save(&init()).await?;
            debug!(path = %store.file_path.display(), "initialized json document");
        }
        Ok(store)
    }

    pub fn path(&self) -> &std::path::Path { &self.file_path }

    /// Read the current document. A missing file reads as `T::default()`.
    pub async fn load(&self) -> Result<T, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                warn!(path = %self.file_path.display(), error = %e, "json document is unreadable");
                ServiceError::store(e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(ServiceError::store(e)),
        }
    }

    /// Apply a mutation to a freshly loaded document and persist it.
    ///
    /// Nothing is written when `f` fails or leaves the document unchanged.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        let _gate = self.write_gate.lock().await;
        let before = self.load().await?;
        let mut doc = before.clone();
        let out = f(&mut doc)?;
        if doc != before {
            self.save(&doc).await?;
        }
        Ok(out)
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn save(&self, doc: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(ServiceError::store)?;
        let mut tmp = self.file_path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await.map_err(ServiceError::store)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::store)?;
        Ok(())
    }
}
