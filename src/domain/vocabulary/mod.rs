//! Vocabulary - 词汇注释
//!
//! - 按分章得到的段落索引把注释划分到章节
//! - 段落文本高亮（纯函数）

mod highlighter;
mod partitioner;

pub use highlighter::{highlight, highlight_annotations, Side, Span};
pub use partitioner::{partition_annotations, AnnotationBundle, Partition};
