//! Memory Layer - In-Memory State Management
//!
//! 实现 ChapterCatalog，保存已构建书籍的内存快照

mod chapter_catalog;

pub use chapter_catalog::InMemoryChapterCatalog;
