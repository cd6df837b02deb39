//! 基于段落 id 区间的分段
//!
//! 用于翻译管线没有输出结构标记的书：按 `[start_id, end_id]` 闭区间划分。

use serde::{Deserialize, Serialize};

use super::outcome::{assemble, ChapterDraft};
use super::{Diagnostic, Diagnostics, Segmentation, SegmentationError, UnassignedReason};
use crate::domain::book::{BookId, ParagraphRecord};

/// 区间描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRange {
    pub title: String,
    pub start_id: u64,
    /// 闭区间上界；None 表示收纳之后的所有段落
    #[serde(default)]
    pub end_id: Option<u64>,
}

impl SectionRange {
    pub fn new(title: impl Into<String>, start_id: u64, end_id: Option<u64>) -> Self {
        Self {
            title: title.into(),
            start_id,
            end_id,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        id >= self.start_id && self.end_id.map_or(true, |end| id <= end)
    }

    fn end(&self) -> u64 {
        self.end_id.unwrap_or(u64::MAX)
    }
}

/// 按区间分段
///
/// 每个区间输出一节（即使为空），章节键为 `{book}-{n}`，n 为区间序号（从 1 开始）。
/// 区间本身不在这里校验，见 [`validate_ranges`]；若区间重叠，段落归入第一个匹配的区间。
pub fn segment_by_ranges(
    book_id: &BookId,
    paragraphs: &[ParagraphRecord],
    ranges: &[SectionRange],
) -> Segmentation {
    let mut diagnostics = Diagnostics::new();
    let mut drafts: Vec<ChapterDraft<'_>> = ranges
        .iter()
        .zip(1u32..)
        .map(|(range, n)| ChapterDraft::new(None, n, range.title.clone()))
        .collect();

    for paragraph in paragraphs {
        let Some(id) = paragraph.id.as_number() else {
            diagnostics.push(Diagnostic::UnassignedParagraph {
                paragraph_id: paragraph.id.clone(),
                reason: UnassignedReason::NonNumericId,
            });
            continue;
        };

        match ranges.iter().position(|range| range.contains(id)) {
            Some(slot) => drafts[slot].paragraphs.push(paragraph),
            None => diagnostics.push(Diagnostic::UnassignedParagraph {
                paragraph_id: paragraph.id.clone(),
                reason: UnassignedReason::OutsideRanges,
            }),
        }
    }

    tracing::debug!(
        book_id = %book_id,
        sections = drafts.len(),
        dropped = diagnostics.len(),
        "Range segmentation finished"
    );

    assemble(book_id, drafts, diagnostics)
}

/// 校验区间描述：上下界有序、开放区间只能在最后、区间互不重叠
pub fn validate_ranges(ranges: &[SectionRange]) -> Result<(), SegmentationError> {
    for (index, range) in ranges.iter().enumerate() {
        if let Some(end) = range.end_id {
            if end < range.start_id {
                return Err(SegmentationError::InvalidRange {
                    index,
                    title: range.title.clone(),
                    reason: format!("end_id {} is before start_id {}", end, range.start_id),
                });
            }
        } else if index + 1 != ranges.len() {
            return Err(SegmentationError::InvalidRange {
                index,
                title: range.title.clone(),
                reason: "only the last range may be open-ended".to_string(),
            });
        }
    }

    let mut sorted: Vec<&SectionRange> = ranges.iter().collect();
    sorted.sort_by_key(|range| range.start_id);
    for pair in sorted.windows(2) {
        if pair[1].start_id <= pair[0].end() {
            return Err(SegmentationError::OverlappingRanges {
                first: pair[0].title.clone(),
                second: pair[1].title.clone(),
            });
        }
    }

    Ok(())
}
