//! Module for local persistence of page data.
//!
//! A named key maps to one JSON blob stored as `<key>.json` in the records
//! directory. Reads are optimistic: a missing or unreadable blob is the
//! default value. Writes replace the whole blob, so the last write wins.

pub mod models;
pub mod queries;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
    // Serialises read-modify-write cycles within this process.
    update_lock: Arc<Mutex<()>>,
}

impl JsonStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| DatabaseError::Io {
                path: dir.clone(),
                source,
            })?;

        Ok(Self {
            dir,
            update_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub async fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(key, error = %err, "Discarding unreadable blob");
                T::default()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => T::default(),
            Err(err) => {
                warn!(key, error = %err, "Could not read blob");
                T::default()
            }
        }
    }

    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| DatabaseError::Encode {
            key: key.to_string(),
            source,
        })?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|source| DatabaseError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|source| DatabaseError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(key, "Blob written");
        Ok(())
    }

    /// Reads, applies `f`, and writes the result back.
    pub async fn update<T, F, R>(&self, key: &str, f: F) -> Result<R, DatabaseError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.update_lock.lock().await;
        let mut value = self.read::<T>(key).await;
        let out = f(&mut value);
        self.write(key, &value).await?;
        Ok(out)
    }
}
