//! Chapter Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ChapterCatalogPort;
use crate::application::queries::{GetChapter, ListBooks, ListChapters};
use crate::domain::book::{BookChapters, BookId, BookMetadata, ChapterKey, ChapterRecord};
use crate::domain::vocabulary::AnnotationBundle;

// ============================================================================
// Response DTOs
// ============================================================================

/// 书籍概要
#[derive(Debug, Clone, Serialize)]
pub struct BookSummaryResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub chapter_count: usize,
}

impl From<&BookChapters> for BookSummaryResponse {
    fn from(book: &BookChapters) -> Self {
        Self {
            id: book.id().clone(),
            title: book.metadata().title.clone(),
            author: book.metadata().author.clone(),
            chapter_count: book.chapter_count(),
        }
    }
}

/// 章节概要（目录项）
#[derive(Debug, Clone, Serialize)]
pub struct ChapterSummaryResponse {
    pub chapter_key: ChapterKey,
    pub sequence_number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
    pub chapter: u32,
    pub paragraph_count: usize,
}

impl From<&ChapterRecord> for ChapterSummaryResponse {
    fn from(chapter: &ChapterRecord) -> Self {
        Self {
            chapter_key: chapter.chapter_key.clone(),
            sequence_number: chapter.sequence_number,
            title: chapter.title.clone(),
            part: chapter.part,
            chapter: chapter.chapter,
            paragraph_count: chapter.paragraph_count(),
        }
    }
}

/// 章节内容
#[derive(Debug, Clone, Serialize)]
pub struct ChapterContentResponse {
    pub book: BookMetadata,
    pub chapter: ChapterRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<AnnotationBundle>,
    /// 上一章顺序号
    pub previous: Option<u32>,
    /// 下一章顺序号
    pub next: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

fn find_book(
    catalog: &dyn ChapterCatalogPort,
    book_id: &BookId,
) -> Result<Arc<BookChapters>, ApplicationError> {
    catalog
        .get(book_id)
        .ok_or_else(|| ApplicationError::not_found("Book", book_id))
}

/// ListBooks Handler
pub struct ListBooksHandler {
    catalog: Arc<dyn ChapterCatalogPort>,
}

impl ListBooksHandler {
    pub fn new(catalog: Arc<dyn ChapterCatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn handle(
        &self,
        _query: ListBooks,
    ) -> Result<Vec<BookSummaryResponse>, ApplicationError> {
        Ok(self
            .catalog
            .list()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .map(|book| BookSummaryResponse::from(book.as_ref()))
            .collect())
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    catalog: Arc<dyn ChapterCatalogPort>,
}

impl ListChaptersHandler {
    pub fn new(catalog: Arc<dyn ChapterCatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn handle(
        &self,
        query: ListChapters,
    ) -> Result<Vec<ChapterSummaryResponse>, ApplicationError> {
        let book = find_book(self.catalog.as_ref(), &query.book_id)?;
        Ok(book
            .chapters()
            .iter()
            .map(ChapterSummaryResponse::from)
            .collect())
    }
}

/// GetChapter Handler
pub struct GetChapterHandler {
    catalog: Arc<dyn ChapterCatalogPort>,
}

impl GetChapterHandler {
    pub fn new(catalog: Arc<dyn ChapterCatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn handle(
        &self,
        query: GetChapter,
    ) -> Result<ChapterContentResponse, ApplicationError> {
        if query.sequence_number == 0 {
            return Err(ApplicationError::validation("sequence numbers start at 1"));
        }
        let book = find_book(self.catalog.as_ref(), &query.book_id)?;

        let chapter = book.chapter(query.sequence_number).ok_or_else(|| {
            ApplicationError::not_found(
                "Chapter",
                format!("{}#{}", query.book_id, query.sequence_number),
            )
        })?;

        let vocabulary = if query.with_vocabulary {
            book.vocabulary_for(&chapter.chapter_key).cloned()
        } else {
            None
        };

        let sequence_number = chapter.sequence_number;
        let is_last = sequence_number as usize >= book.chapter_count();
        Ok(ChapterContentResponse {
            book: book.metadata().clone(),
            chapter: chapter.clone(),
            vocabulary,
            previous: (sequence_number > 1).then(|| sequence_number - 1),
            next: (!is_last).then(|| sequence_number + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{AnnotationRecord, Language, ParagraphId, ParagraphRecord};
    use crate::domain::segmentation::{segment_by_ranges, SectionRange};
    use crate::domain::vocabulary::partition_annotations;
    use crate::infrastructure::memory::InMemoryChapterCatalog;

    fn catalog() -> Arc<InMemoryChapterCatalog> {
        let metadata = BookMetadata {
            id: BookId::new("essays").unwrap(),
            title: "Essays".to_string(),
            author: "Montaigne".to_string(),
            language: Language::default(),
        };
        let paragraphs = vec![
            ParagraphRecord::new(5u64, "Of idleness.", "论闲散。"),
            ParagraphRecord::new(50u64, "Of liars.", "论说谎者。"),
        ];
        let ranges = vec![
            SectionRange::new("Intro", 0, Some(10)),
            SectionRange::new("Body", 11, Some(99999)),
        ];
        let segmentation = segment_by_ranges(&metadata.id, &paragraphs, &ranges);
        let partition = partition_annotations(
            &segmentation.index,
            vec![AnnotationRecord {
                paragraph_id: ParagraphId::Number(50),
                key_terms: Vec::new(),
            }],
        );

        let catalog = Arc::new(InMemoryChapterCatalog::new());
        catalog.publish(BookChapters::new(
            metadata,
            segmentation.chapters,
            partition.bundles,
        ));
        catalog
    }

    #[tokio::test]
    async fn test_list_books_and_chapters() {
        let catalog = catalog();

        let books = ListBooksHandler::new(catalog.clone())
            .handle(ListBooks)
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].chapter_count, 2);

        let chapters = ListChaptersHandler::new(catalog)
            .handle(ListChapters {
                book_id: BookId::new("essays").unwrap(),
            })
            .await
            .unwrap();
        let titles: Vec<&str> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Body"]);
    }

    #[tokio::test]
    async fn test_get_chapter_with_navigation_and_vocabulary() {
        let handler = GetChapterHandler::new(catalog());

        let response = handler
            .handle(GetChapter {
                book_id: BookId::new("essays").unwrap(),
                sequence_number: 2,
                with_vocabulary: true,
            })
            .await
            .unwrap();

        assert_eq!(response.chapter.title, "Body");
        assert_eq!(response.chapter.paragraphs[0].id, "essays-2-50");
        assert_eq!(response.previous, Some(1));
        assert_eq!(response.next, None);
        assert_eq!(response.vocabulary.unwrap().annotations.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_book_or_chapter_is_not_found() {
        let catalog = catalog();

        let missing_book = ListChaptersHandler::new(catalog.clone())
            .handle(ListChapters {
                book_id: BookId::new("nope").unwrap(),
            })
            .await;
        assert!(matches!(missing_book, Err(ApplicationError::NotFound { .. })));

        let missing_chapter = GetChapterHandler::new(catalog)
            .handle(GetChapter {
                book_id: BookId::new("essays").unwrap(),
                sequence_number: 3,
                with_vocabulary: false,
            })
            .await;
        assert!(matches!(missing_chapter, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_sequence_number_zero_is_invalid() {
        let result = GetChapterHandler::new(catalog())
            .handle(GetChapter {
                book_id: BookId::new("essays").unwrap(),
                sequence_number: 0,
                with_vocabulary: false,
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
