//! Repository Ports - 出站端口
//!
//! 定义书籍源数据读取和章节产物写入的抽象接口
//! 具体实现在 infrastructure 层（JSON 文件）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::book::{
    AnnotationRecord, BookDescriptor, BookId, BookMetadata, ChapterKey, ChapterRecord,
    ParagraphRecord,
};
use crate::domain::segmentation::Diagnostic;
use crate::domain::vocabulary::AnnotationBundle;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

// ============================================================================
// Book Source
// ============================================================================

/// 翻译管线输出的书籍文档
///
/// 两个数组在 JSON 层面都可以缺失（缺失时记为 `MalformedInput` 诊断）；
/// 但存在时必须是合法的数组，记录必须包含必填字段。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub paragraphs: Option<Vec<ParagraphRecord>>,
    #[serde(default)]
    pub vocabulary: Option<Vec<AnnotationRecord>>,
}

/// Book Source Port
#[async_trait]
pub trait BookSourcePort: Send + Sync {
    /// 读取书籍的翻译管线文档
    async fn load(&self, book: &BookDescriptor) -> Result<SourceDocument, RepositoryError>;
}

// ============================================================================
// Artifact Store
// ============================================================================

/// 书籍目录中的一条章节记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterIndexEntry {
    pub chapter_key: ChapterKey,
    pub sequence_number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
    pub chapter: u32,
    pub paragraph_count: usize,
    /// 章节产物内容的 md5
    pub digest: String,
}

impl ChapterIndexEntry {
    pub fn new(chapter: &ChapterRecord, digest: String) -> Self {
        Self {
            chapter_key: chapter.chapter_key.clone(),
            sequence_number: chapter.sequence_number,
            title: chapter.title.clone(),
            part: chapter.part,
            chapter: chapter.chapter,
            paragraph_count: chapter.paragraph_count(),
            digest,
        }
    }
}

/// 单本书的构建报告
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub book_id: BookId,
    /// 分章方式：markers / layout / ranges
    pub structure: String,
    pub chapters: usize,
    pub paragraphs_in: usize,
    pub paragraphs_out: usize,
    pub annotations_in: usize,
    pub annotations_out: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub finished_at: DateTime<Utc>,
}

impl BuildReport {
    /// 没有任何诊断信息
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 开始写入一本书：之后的写入进入暂存区，旧产物保持不变
    async fn begin_book(&self, book_id: &BookId) -> Result<(), RepositoryError>;

    /// 写入章节产物，返回内容摘要
    async fn save_chapter(
        &self,
        book: &BookMetadata,
        chapter: &ChapterRecord,
    ) -> Result<String, RepositoryError>;

    /// 写入章节词汇产物
    async fn save_vocabulary(
        &self,
        book: &BookMetadata,
        chapter: &ChapterRecord,
        bundle: &AnnotationBundle,
    ) -> Result<(), RepositoryError>;

    /// 写入书籍目录
    async fn save_index(
        &self,
        book: &BookMetadata,
        entries: &[ChapterIndexEntry],
    ) -> Result<(), RepositoryError>;

    /// 写入构建报告
    async fn save_report(&self, report: &BuildReport) -> Result<(), RepositoryError>;

    /// 用暂存区整体替换旧产物
    async fn commit_book(&self, book_id: &BookId) -> Result<(), RepositoryError>;
}
