//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：展示层读取章节

mod chapter_queries;

pub mod handlers;

pub use chapter_queries::*;
