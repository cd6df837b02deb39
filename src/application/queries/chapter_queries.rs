//! Chapter Queries

use crate::domain::book::BookId;

/// 列出所有已发布的书籍
#[derive(Debug, Clone)]
pub struct ListBooks;

/// 列出一本书的章节
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub book_id: BookId,
}

/// 获取单个章节内容
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub book_id: BookId,
    /// 阅读顺序号，从 1 开始
    pub sequence_number: u32,
    /// 是否附带该章的词汇包
    pub with_vocabulary: bool,
}
