//! JSON Book Source - 读取翻译管线输出的 JSON 文件
//!
//! 实现 BookSourcePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{BookSourcePort, RepositoryError, SourceDocument};
use crate::domain::book::BookDescriptor;

/// 文件系统 JSON 源
pub struct JsonBookSource {
    /// 源文件根目录
    base_dir: PathBuf,
}

impl JsonBookSource {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn source_path(&self, book: &BookDescriptor) -> PathBuf {
        self.base_dir.join(&book.source)
    }
}

#[async_trait]
impl BookSourcePort for JsonBookSource {
    async fn load(&self, book: &BookDescriptor) -> Result<SourceDocument, RepositoryError> {
        let path = self.source_path(book);

        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                RepositoryError::NotFound(path.to_string_lossy().to_string())
            }
            _ => RepositoryError::IoError(format!("{}: {}", path.display(), e)),
        })?;

        let document: SourceDocument = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::SerializationError(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(
            book_id = %book.id(),
            path = %path.display(),
            size = bytes.len(),
            "Source loaded"
        );

        Ok(document)
    }
}
