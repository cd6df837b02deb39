//! In-Memory Chapter Catalog Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::ChapterCatalogPort;
use crate::domain::book::{BookChapters, BookId};

/// 内存章节目录
///
/// 每本书保存为 `Arc` 快照，读者拿到的快照不受之后重新发布的影响
pub struct InMemoryChapterCatalog {
    books: DashMap<BookId, Arc<BookChapters>>,
}

impl InMemoryChapterCatalog {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryChapterCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterCatalogPort for InMemoryChapterCatalog {
    fn publish(&self, book: BookChapters) {
        let book_id = book.id().clone();
        let chapters = book.chapter_count();
        let replaced = self.books.insert(book_id.clone(), Arc::new(book)).is_some();
        tracing::info!(
            book_id = %book_id,
            chapters = chapters,
            replaced = replaced,
            "Book published"
        );
    }

    fn get(&self, book_id: &BookId) -> Option<Arc<BookChapters>> {
        self.books.get(book_id).map(|entry| Arc::clone(entry.value()))
    }

    fn list(&self) -> Vec<BookId> {
        let mut ids: Vec<BookId> = self.books.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}
