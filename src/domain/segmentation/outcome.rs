//! 分章结果与段落索引

use std::collections::HashMap;

use super::{Diagnostic, Diagnostics};
use crate::domain::book::{
    BookId, ChapterKey, ChapterParagraph, ChapterRecord, ParagraphId, ParagraphRecord,
};

/// 段落所属章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub chapter_key: ChapterKey,
    pub sequence_number: u32,
}

/// 段落 id → 章节 的映射，分章的副产物
///
/// 词汇划分只读取这个索引，不再独立推断结构。
#[derive(Debug, Clone, Default)]
pub struct ParagraphIndex {
    entries: HashMap<ParagraphId, IndexEntry>,
}

impl ParagraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, paragraph_id: &ParagraphId, entry: IndexEntry) {
        self.entries.insert(paragraph_id.normalized(), entry);
    }

    pub fn lookup(&self, paragraph_id: &ParagraphId) -> Option<&IndexEntry> {
        self.entries.get(&paragraph_id.normalized())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 分章结果
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub chapters: Vec<ChapterRecord>,
    pub index: ParagraphIndex,
    pub diagnostics: Vec<Diagnostic>,
}

impl Segmentation {
    /// 所有章节的段落总数
    pub fn paragraph_count(&self) -> usize {
        self.chapters.iter().map(ChapterRecord::paragraph_count).sum()
    }
}

/// 尚未编号的章节草稿
#[derive(Debug, Clone)]
pub(crate) struct ChapterDraft<'a> {
    pub part: Option<u32>,
    pub chapter: u32,
    pub title: String,
    pub paragraphs: Vec<&'a ParagraphRecord>,
}

impl<'a> ChapterDraft<'a> {
    pub fn new(part: Option<u32>, chapter: u32, title: String) -> Self {
        Self {
            part,
            chapter,
            title,
            paragraphs: Vec::new(),
        }
    }
}

/// 按草稿顺序编号并生成章节、段落索引
///
/// 阅读顺序号跨卷累计：第二卷第一章的顺序号 = 第一卷实际输出的章数 + 1。
pub(crate) fn assemble(
    book_id: &BookId,
    drafts: Vec<ChapterDraft<'_>>,
    diagnostics: Diagnostics,
) -> Segmentation {
    let mut index = ParagraphIndex::new();

    let chapters = drafts
        .into_iter()
        .zip(1u32..)
        .map(|(draft, sequence_number)| {
            let chapter_key = ChapterKey::new(book_id, draft.part, draft.chapter);
            let paragraphs = draft
                .paragraphs
                .iter()
                .map(|record| {
                    index.insert(
                        &record.id,
                        IndexEntry {
                            chapter_key: chapter_key.clone(),
                            sequence_number,
                        },
                    );
                    ChapterParagraph::from_record(&chapter_key, record)
                })
                .collect();

            ChapterRecord {
                chapter_key,
                sequence_number,
                title: draft.title,
                part: draft.part,
                chapter: draft.chapter,
                paragraphs,
            }
        })
        .collect();

    Segmentation {
        chapters,
        index,
        diagnostics: diagnostics.into_vec(),
    }
}
