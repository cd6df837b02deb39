//! 基于结构标记的分章
//!
//! 两种用法:
//! - [`segment_by_markers`]: 自由扫描，遇到什么标记就开什么章
//! - [`segment_by_layout`]: 已知每卷应有的章数，逐章定位起止位置

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

use super::outcome::{assemble, ChapterDraft};
use super::{
    to_roman, Diagnostic, Diagnostics, Marker, MarkerVocabulary, Segmentation, SegmentationError,
    UnassignedReason,
};
use crate::domain::book::{BookId, ParagraphRecord};

/// 一卷的预期结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartLayout {
    /// 卷号；None 表示没有卷层级，整本书即一卷
    #[serde(default)]
    pub part: Option<u32>,
    /// 预期章数
    pub chapters: u32,
}

/// 章节显示标题
pub fn chapter_title(part: Option<u32>, chapter: u32) -> String {
    match part {
        Some(part) => format!("Part {}, Chapter {}", to_roman(part), chapter),
        None => format!("Chapter {}", chapter),
    }
}

/// 扫描状态，作为 fold 的累加器显式传递
#[derive(Default)]
struct ScanState<'a> {
    part: Option<u32>,
    /// 当前章节在 drafts 中的下标
    current: Option<usize>,
    drafts: Vec<ChapterDraft<'a>>,
    slots: HashMap<(Option<u32>, u32), usize>,
    diagnostics: Diagnostics,
}

impl<'a> ScanState<'a> {
    fn enter(mut self, marker: Marker) -> Self {
        match marker {
            Marker::Part(part) => {
                self.part = Some(part);
                self.current = None;
            }
            Marker::Chapter(chapter) => {
                let key = (self.part, chapter);
                let slot = match self.slots.get(&key) {
                    Some(slot) => *slot,
                    None => {
                        self.drafts.push(ChapterDraft::new(
                            self.part,
                            chapter,
                            chapter_title(self.part, chapter),
                        ));
                        let slot = self.drafts.len() - 1;
                        self.slots.insert(key, slot);
                        slot
                    }
                };
                self.current = Some(slot);
            }
        }
        self
    }

    fn append(mut self, paragraph: &'a ParagraphRecord) -> Self {
        match self.current {
            Some(slot) => self.drafts[slot].paragraphs.push(paragraph),
            None => self.diagnostics.push(Diagnostic::UnassignedParagraph {
                paragraph_id: paragraph.id.clone(),
                reason: UnassignedReason::BeforeFirstMarker,
            }),
        }
        self
    }
}

/// 自由扫描分章
///
/// - 标记段落本身不属于任何章节
/// - 卷标记会清空当前章节，卷标记与该卷第一个章标记之间的段落被丢弃
/// - 同一 (卷, 章) 的重复标记继续向同一章节追加
/// - 章节按首次出现的顺序输出
pub fn segment_by_markers(
    book_id: &BookId,
    paragraphs: &[ParagraphRecord],
    vocabulary: &MarkerVocabulary,
) -> Segmentation {
    let state = paragraphs
        .iter()
        .fold(ScanState::default(), |state, paragraph| {
            match vocabulary.recognize(&paragraph.source) {
                Some(marker) => state.enter(marker),
                None => state.append(paragraph),
            }
        });

    tracing::debug!(
        book_id = %book_id,
        chapters = state.drafts.len(),
        "Marker scan finished"
    );

    assemble(book_id, state.drafts, state.diagnostics)
}

/// 定位一卷的段落区间：从卷标记到下一个卷标记（或结尾）
fn locate_part(
    sentinels: &[(usize, Marker)],
    len: usize,
    part: Option<u32>,
) -> Option<Range<usize>> {
    let Some(part) = part else {
        return Some(0..len);
    };
    let start = sentinels
        .iter()
        .find(|(_, marker)| *marker == Marker::Part(part))?
        .0;
    let end = sentinels
        .iter()
        .find(|(pos, marker)| *pos > start && matches!(marker, Marker::Part(_)))
        .map_or(len, |(pos, _)| *pos);
    Some(start..end)
}

/// 校验卷结构：要么只有一个无卷号条目，要么全部有卷号且严格递增
pub fn validate_layout(layout: &[PartLayout]) -> Result<(), SegmentationError> {
    if layout.is_empty() {
        return Err(SegmentationError::invalid_layout(0, "layout lists no parts"));
    }

    if let Some(index) = layout.iter().position(|p| p.part.is_none()) {
        if layout.len() > 1 {
            return Err(SegmentationError::invalid_layout(
                index,
                "a part without number must be the only entry",
            ));
        }
        return Ok(());
    }

    for (index, pair) in layout.windows(2).enumerate() {
        if let (Some(previous), Some(current)) = (pair[0].part, pair[1].part) {
            if current <= previous {
                return Err(SegmentationError::invalid_layout(
                    index + 1,
                    format!("part {} follows part {}", current, previous),
                ));
            }
        }
    }

    Ok(())
}

/// 按预期结构分章
///
/// 对每卷的第 1..=K 章，找到其起始标记，终点是其后的下一个标记（或卷末）。
/// 缺失的卷标记或章标记记为 `MissingMarker` 并跳过对应章节；
/// 没有被任何章节覆盖的正文段落记为 `UnassignedParagraph`。
pub fn segment_by_layout(
    book_id: &BookId,
    paragraphs: &[ParagraphRecord],
    vocabulary: &MarkerVocabulary,
    layout: &[PartLayout],
) -> Segmentation {
    let sentinels: Vec<(usize, Marker)> = paragraphs
        .iter()
        .enumerate()
        .filter_map(|(pos, p)| vocabulary.recognize(&p.source).map(|m| (pos, m)))
        .collect();

    let mut covered = vec![false; paragraphs.len()];
    for (pos, _) in &sentinels {
        covered[*pos] = true;
    }

    let mut diagnostics = Diagnostics::new();
    let mut drafts = Vec::new();
    let mut first_start = usize::MAX;

    for part_layout in layout {
        let part = part_layout.part;
        let Some(region) = locate_part(&sentinels, paragraphs.len(), part) else {
            diagnostics.push(Diagnostic::MissingMarker {
                part,
                chapter: None,
            });
            continue;
        };

        for chapter in 1..=part_layout.chapters {
            let start = sentinels
                .iter()
                .find(|(pos, marker)| region.contains(pos) && *marker == Marker::Chapter(chapter))
                .map(|(pos, _)| *pos);
            let Some(start) = start else {
                diagnostics.push(Diagnostic::MissingMarker {
                    part,
                    chapter: Some(chapter),
                });
                continue;
            };
            let end = sentinels
                .iter()
                .map(|(pos, _)| *pos)
                .find(|pos| *pos > start && *pos < region.end)
                .unwrap_or(region.end);

            let mut draft = ChapterDraft::new(part, chapter, chapter_title(part, chapter));
            for pos in start + 1..end {
                draft.paragraphs.push(&paragraphs[pos]);
                covered[pos] = true;
            }
            first_start = first_start.min(start);
            drafts.push(draft);
        }
    }

    for (pos, paragraph) in paragraphs.iter().enumerate() {
        if covered[pos] {
            continue;
        }
        let reason = if pos < first_start {
            UnassignedReason::BeforeFirstMarker
        } else {
            UnassignedReason::OutsideLayout
        };
        diagnostics.push(Diagnostic::UnassignedParagraph {
            paragraph_id: paragraph.id.clone(),
            reason,
        });
    }

    tracing::debug!(
        book_id = %book_id,
        expected = layout.iter().map(|p| p.chapters as usize).sum::<usize>(),
        chapters = drafts.len(),
        "Layout resolution finished"
    );

    assemble(book_id, drafts, diagnostics)
}
