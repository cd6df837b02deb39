//! Build Commands

use crate::domain::book::BookDescriptor;

/// 构建一本书：读取源文档、分章、划分词汇、写出产物并发布到目录
#[derive(Debug, Clone)]
pub struct BuildBook {
    pub book: BookDescriptor,
}
