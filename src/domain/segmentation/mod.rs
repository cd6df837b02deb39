//! Segmentation - 分章
//!
//! 把按阅读顺序排列的双语段落流切分为 卷 → 章 → 段落 的层级结构:
//! - 标记分章：扫描 "Part I"、"Chapter One" 之类的结构标记段落
//! - 区间分章：按段落 id 的闭区间划分
//!
//! 两种方式都输出章节列表、段落索引和诊断信息。

mod diagnostics;
mod errors;
mod marker_segmenter;
mod markers;
mod numerals;
mod outcome;
mod range_segmenter;

pub use diagnostics::{Diagnostic, Diagnostics, UnassignedReason};
pub use errors::SegmentationError;
pub use marker_segmenter::{
    chapter_title, segment_by_layout, segment_by_markers, validate_layout, PartLayout,
};
pub use markers::{Marker, MarkerPattern, MarkerVocabulary};
pub use numerals::{parse_ordinal, parse_roman, parse_words, to_roman, NumeralStyle};
pub use outcome::{IndexEntry, ParagraphIndex, Segmentation};
pub use range_segmenter::{segment_by_ranges, validate_ranges, SectionRange};

use crate::domain::book::{BookId, ParagraphRecord};

/// 一本书的结构描述
#[derive(Debug, Clone)]
pub enum BookStructure {
    /// 结构标记；给出 layout 时按预期章数逐章定位，否则自由扫描
    Markers {
        vocabulary: MarkerVocabulary,
        layout: Option<Vec<PartLayout>>,
    },
    /// 段落 id 区间
    Ranges(Vec<SectionRange>),
}

impl BookStructure {
    pub fn segment(&self, book_id: &BookId, paragraphs: &[ParagraphRecord]) -> Segmentation {
        match self {
            BookStructure::Markers {
                vocabulary,
                layout: Some(layout),
            } => segment_by_layout(book_id, paragraphs, vocabulary, layout),
            BookStructure::Markers {
                vocabulary,
                layout: None,
            } => segment_by_markers(book_id, paragraphs, vocabulary),
            BookStructure::Ranges(ranges) => segment_by_ranges(book_id, paragraphs, ranges),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BookStructure::Markers { layout: Some(_), .. } => "layout",
            BookStructure::Markers { layout: None, .. } => "markers",
            BookStructure::Ranges(_) => "ranges",
        }
    }
}
