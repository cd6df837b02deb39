//! Chapter Catalog Port - 已构建书籍的只读目录
//!
//! 展示层通过查询读取章节，具体实现在 infrastructure/memory 层

use std::sync::Arc;

use crate::domain::book::{BookChapters, BookId};

/// Chapter Catalog Port
///
/// 每本书以不可变快照的形式发布，重新构建时整体替换
pub trait ChapterCatalogPort: Send + Sync {
    /// 发布（或替换）一本书
    fn publish(&self, book: BookChapters);

    /// 获取书籍快照
    fn get(&self, book_id: &BookId) -> Option<Arc<BookChapters>>;

    /// 所有书籍 ID（有序）
    fn list(&self) -> Vec<BookId>;
}
