//! Domain Layer - 领域层
//!
//! - Book Context: 双语段落、章节、词汇注释
//! - Segmentation: 标记分章与区间分章
//! - Vocabulary: 注释划分与文本高亮

pub mod book;
pub mod segmentation;
pub mod vocabulary;
