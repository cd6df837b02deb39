//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 双语段落、章节、词汇注释实体
//! - 书目描述与已构建书籍聚合

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{BookChapters, BookDescriptor, BookMetadata};
pub use entities::{AnnotationRecord, ChapterParagraph, ChapterRecord, ParagraphRecord, TermPair};
pub use errors::BookError;
pub use value_objects::{BookId, ChapterKey, Language, ParagraphId};
