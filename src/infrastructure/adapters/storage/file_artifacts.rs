//! File Artifacts - 文件系统章节产物存储
//!
//! 实现 ArtifactStorePort trait
//!
//! 目录结构：
//! ```text
//! {base_dir}/{book_id}/
//!   chapters/{chapter_key}.json
//!   vocabulary/{chapter_key}.json
//!   index.json
//!   report.json
//! ```
//!
//! 构建期间写入 `{base_dir}/.{book_id}.staging/`，提交时整体替换 `{book_id}/`。

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{
    ArtifactStorePort, BuildReport, ChapterIndexEntry, RepositoryError,
};
use crate::domain::book::{
    AnnotationRecord, BookId, BookMetadata, ChapterKey, ChapterParagraph, ChapterRecord, Language,
};
use crate::domain::vocabulary::AnnotationBundle;

/// 每个产物共有的书籍头部
#[derive(Serialize)]
struct BookHeader<'a> {
    title: &'a str,
    author: &'a str,
    language: &'a Language,
}

impl<'a> From<&'a BookMetadata> for BookHeader<'a> {
    fn from(book: &'a BookMetadata) -> Self {
        Self {
            title: &book.title,
            author: &book.author,
            language: &book.language,
        }
    }
}

#[derive(Serialize)]
struct ChapterHeader<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    part: Option<u32>,
    chapter: u32,
    sequence_number: u32,
    chapter_title: &'a str,
}

impl<'a> From<&'a ChapterRecord> for ChapterHeader<'a> {
    fn from(chapter: &'a ChapterRecord) -> Self {
        Self {
            part: chapter.part,
            chapter: chapter.chapter,
            sequence_number: chapter.sequence_number,
            chapter_title: &chapter.title,
        }
    }
}

#[derive(Serialize)]
struct ChapterArtifact<'a> {
    #[serde(flatten)]
    book: BookHeader<'a>,
    #[serde(flatten)]
    chapter: ChapterHeader<'a>,
    paragraphs: &'a [ChapterParagraph],
}

#[derive(Serialize)]
struct VocabularyArtifact<'a> {
    #[serde(flatten)]
    book: BookHeader<'a>,
    #[serde(flatten)]
    chapter: ChapterHeader<'a>,
    vocabulary: &'a [AnnotationRecord],
}

#[derive(Serialize)]
struct IndexArtifact<'a> {
    id: &'a BookId,
    #[serde(flatten)]
    book: BookHeader<'a>,
    chapters: &'a [ChapterIndexEntry],
}

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 输出根目录
    base_dir: PathBuf,
    /// 是否格式化 JSON
    pretty: bool,
}

impl FileArtifactStore {
    pub fn new(base_dir: impl AsRef<Path>, pretty: bool) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            pretty,
        }
    }

    pub fn book_dir(&self, book_id: &BookId) -> PathBuf {
        self.base_dir.join(book_id.as_str())
    }

    /// 未提交的写入目录
    pub fn staging_dir(&self, book_id: &BookId) -> PathBuf {
        self.base_dir.join(format!(".{}.staging", book_id))
    }

    fn retired_dir(&self, book_id: &BookId) -> PathBuf {
        self.base_dir.join(format!(".{}.old", book_id))
    }

    pub fn chapter_path(&self, book_id: &BookId, key: &ChapterKey) -> PathBuf {
        self.book_dir(book_id).join(chapter_file(key))
    }

    pub fn vocabulary_path(&self, book_id: &BookId, key: &ChapterKey) -> PathBuf {
        self.book_dir(book_id).join(vocabulary_file(key))
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, RepositoryError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }

    /// 写入暂存区中的相对路径
    async fn write(
        &self,
        book_id: &BookId,
        relative: &Path,
        bytes: &[u8],
    ) -> Result<(), RepositoryError> {
        let path = self.staging_dir(book_id).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::IoError(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(&path, bytes)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Artifact written");
        Ok(())
    }
}

fn chapter_file(key: &ChapterKey) -> PathBuf {
    Path::new("chapters").join(format!("{}.json", key))
}

fn vocabulary_file(key: &ChapterKey) -> PathBuf {
    Path::new("vocabulary").join(format!("{}.json", key))
}

async fn remove_dir_if_exists(dir: &Path) -> Result<(), RepositoryError> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RepositoryError::IoError(format!("{}: {}", dir.display(), e))),
    }
}

async fn rename(from: &Path, to: &Path) -> Result<(), RepositoryError> {
    fs::rename(from, to).await.map_err(|e| {
        RepositoryError::IoError(format!("{} -> {}: {}", from.display(), to.display(), e))
    })
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn begin_book(&self, book_id: &BookId) -> Result<(), RepositoryError> {
        let staging = self.staging_dir(book_id);
        // 上次失败的构建可能留下暂存区
        remove_dir_if_exists(&staging).await?;
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", staging.display(), e)))?;
        tracing::debug!(book_id = %book_id, path = %staging.display(), "Staging started");
        Ok(())
    }

    async fn save_chapter(
        &self,
        book: &BookMetadata,
        chapter: &ChapterRecord,
    ) -> Result<String, RepositoryError> {
        let bytes = self.encode(&ChapterArtifact {
            book: book.into(),
            chapter: chapter.into(),
            paragraphs: &chapter.paragraphs,
        })?;

        self.write(&book.id, &chapter_file(&chapter.chapter_key), &bytes)
            .await?;

        Ok(format!("{:x}", md5::compute(&bytes)))
    }

    async fn save_vocabulary(
        &self,
        book: &BookMetadata,
        chapter: &ChapterRecord,
        bundle: &AnnotationBundle,
    ) -> Result<(), RepositoryError> {
        let bytes = self.encode(&VocabularyArtifact {
            book: book.into(),
            chapter: chapter.into(),
            vocabulary: &bundle.annotations,
        })?;

        self.write(&book.id, &vocabulary_file(&bundle.chapter_key), &bytes)
            .await
    }

    async fn save_index(
        &self,
        book: &BookMetadata,
        entries: &[ChapterIndexEntry],
    ) -> Result<(), RepositoryError> {
        let bytes = self.encode(&IndexArtifact {
            id: &book.id,
            book: book.into(),
            chapters: entries,
        })?;

        self.write(&book.id, Path::new("index.json"), &bytes).await
    }

    async fn save_report(&self, report: &BuildReport) -> Result<(), RepositoryError> {
        let bytes = self.encode(report)?;
        self.write(&report.book_id, Path::new("report.json"), &bytes)
            .await
    }

    async fn commit_book(&self, book_id: &BookId) -> Result<(), RepositoryError> {
        let staging = self.staging_dir(book_id);
        let current = self.book_dir(book_id);
        let retired = self.retired_dir(book_id);

        remove_dir_if_exists(&retired).await?;
        if fs::metadata(&current).await.is_ok() {
            rename(&current, &retired).await?;
        }
        rename(&staging, &current).await?;
        remove_dir_if_exists(&retired).await?;

        tracing::debug!(book_id = %book_id, path = %current.display(), "Artifacts committed");
        Ok(())
    }
}
