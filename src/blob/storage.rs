use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Content-addressed-ish file storage for uploaded media. Keys are opaque
/// UUIDs minted at put time; the database rows hold the keys.
pub struct BlobStorage {
    base_path: PathBuf,
}

impl BlobStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join("blobs"),
        }
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        // Shard by the first two characters to keep directories small.
        Ok(self.base_path.join(&key[0..2]).join(key))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join("tmp").join(Uuid::new_v4().to_string())
    }

    /// Writes the bytes under a fresh key and returns it. The write goes to
    /// a temp file first and is renamed into place, so a crash mid-write
    /// never leaves a partial blob at a live key.
    pub async fn put(&self, data: &[u8]) -> Result<String> {
        let key = Uuid::new_v4().to_string();

        let temp_path = self.temp_path();
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_file = File::create(&temp_path).await?;
        temp_file.write_all(data).await?;
        temp_file.sync_all().await?;

        let final_path = self.blob_path(&key)?;
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&temp_path, &final_path).await?;

        Ok(key)
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Removes the blob. Missing keys are not an error; the row referencing
    /// the blob may already be gone by the time cleanup runs.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.blob_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.blob_path(key)?.exists())
    }
}

fn validate_key(key: &str) -> Result<()> {
    // Keys come out of our own database, but they end up in paths, so
    // reject anything that is not a plain UUID string.
    if key.len() < 2 || !key.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(Error::File(format!("invalid blob key: {key}")));
    }
    Ok(())
}
