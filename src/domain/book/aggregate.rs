//! Book Context - Aggregate Root

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::{BookError, BookId, ChapterKey, ChapterRecord, Language};
use crate::domain::segmentation::BookStructure;
use crate::domain::vocabulary::AnnotationBundle;

/// 书籍元信息，写入每个章节产物的头部
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub language: Language,
}

/// 书目条目：一本书的元信息、源文件和结构描述
#[derive(Debug, Clone)]
pub struct BookDescriptor {
    pub metadata: BookMetadata,
    /// 翻译管线 JSON 路径（相对于源目录）
    pub source: PathBuf,
    pub structure: BookStructure,
}

impl BookDescriptor {
    pub fn new(
        metadata: BookMetadata,
        source: PathBuf,
        structure: BookStructure,
    ) -> Result<Self, BookError> {
        if metadata.title.trim().is_empty() {
            return Err(BookError::InvalidTitle(format!(
                "书籍 {} 的标题不能为空",
                metadata.id
            )));
        }
        if source.as_os_str().is_empty() {
            return Err(BookError::InvalidSource(format!(
                "书籍 {} 缺少源文件",
                metadata.id
            )));
        }
        Ok(Self {
            metadata,
            source,
            structure,
        })
    }

    pub fn id(&self) -> &BookId {
        &self.metadata.id
    }
}

/// 已构建的书籍聚合根
///
/// 不变量:
/// - `chapters[i].sequence_number == i + 1`
/// - 每个词汇包都对应一个存在的章节
#[derive(Debug, Clone)]
pub struct BookChapters {
    metadata: BookMetadata,
    chapters: Vec<ChapterRecord>,
    vocabulary: HashMap<ChapterKey, AnnotationBundle>,
}

impl BookChapters {
    pub fn new(
        metadata: BookMetadata,
        chapters: Vec<ChapterRecord>,
        bundles: Vec<AnnotationBundle>,
    ) -> Self {
        let vocabulary = bundles
            .into_iter()
            .filter(|bundle| {
                chapters
                    .iter()
                    .any(|chapter| chapter.chapter_key == bundle.chapter_key)
            })
            .map(|bundle| (bundle.chapter_key.clone(), bundle))
            .collect();

        Self {
            metadata,
            chapters,
            vocabulary,
        }
    }

    // Getters
    pub fn id(&self) -> &BookId {
        &self.metadata.id
    }

    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// 按阅读顺序号（从 1 开始）获取章节
    pub fn chapter(&self, sequence_number: u32) -> Option<&ChapterRecord> {
        let index = (sequence_number as usize).checked_sub(1)?;
        self.chapters.get(index)
    }

    pub fn vocabulary_for(&self, key: &ChapterKey) -> Option<&AnnotationBundle> {
        self.vocabulary.get(key)
    }

    pub fn paragraph_count(&self) -> usize {
        self.chapters.iter().map(ChapterRecord::paragraph_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BookMetadata {
        BookMetadata {
            id: BookId::new("farm").unwrap(),
            title: "Animal Farm".to_string(),
            author: "George Orwell".to_string(),
            language: Language::default(),
        }
    }

    fn chapter(book: &BookId, n: u32) -> ChapterRecord {
        ChapterRecord {
            chapter_key: ChapterKey::new(book, None, n),
            sequence_number: n,
            title: format!("Chapter {}", n),
            part: None,
            chapter: n,
            paragraphs: Vec::new(),
        }
    }

    #[test]
    fn test_chapter_lookup_by_sequence_number() {
        let meta = metadata();
        let book = BookChapters::new(
            meta.clone(),
            vec![chapter(&meta.id, 1), chapter(&meta.id, 2)],
            Vec::new(),
        );

        assert_eq!(book.chapter(1).unwrap().chapter, 1);
        assert_eq!(book.chapter(2).unwrap().chapter, 2);
        assert!(book.chapter(0).is_none());
        assert!(book.chapter(3).is_none());
    }

    #[test]
    fn test_bundles_without_chapter_are_discarded() {
        let meta = metadata();
        let stray = AnnotationBundle {
            chapter_key: ChapterKey::new(&meta.id, None, 9),
            sequence_number: 9,
            annotations: Vec::new(),
        };
        let book = BookChapters::new(meta.clone(), vec![chapter(&meta.id, 1)], vec![stray]);

        assert!(book
            .vocabulary_for(&ChapterKey::new(&meta.id, None, 9))
            .is_none());
    }

    #[test]
    fn test_descriptor_rejects_empty_title() {
        let mut meta = metadata();
        meta.title = "  ".to_string();
        let result = BookDescriptor::new(
            meta,
            PathBuf::from("farm.json"),
            BookStructure::Ranges(Vec::new()),
        );
        assert!(result.is_err());
    }
}
