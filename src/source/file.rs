//! Saved dump file source

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ConfigSource, FetchError};

/// Reads a config dump previously saved with `curl <admin>/config_dump > dump.json`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    async fn fetch_raw_config(&self) -> Result<Bytes, FetchError> {
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), bytes = contents.len(), "Read config dump file");
        Ok(Bytes::from(contents))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
