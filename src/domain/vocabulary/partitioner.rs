//! 词汇注释按章节划分
//!
//! 只读取分章得到的段落索引，不重新推断结构，避免两次遍历结果不一致。

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::book::{AnnotationRecord, ChapterKey};
use crate::domain::segmentation::{Diagnostic, Diagnostics, ParagraphIndex};

/// 一个章节的词汇包
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationBundle {
    pub chapter_key: ChapterKey,
    pub sequence_number: u32,
    /// 保持输入中的原始顺序
    pub annotations: Vec<AnnotationRecord>,
}

/// 划分结果
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// 按章节顺序号排列，只包含有注释的章节
    pub bundles: Vec<AnnotationBundle>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Partition {
    pub fn annotation_count(&self) -> usize {
        self.bundles.iter().map(|b| b.annotations.len()).sum()
    }
}

/// 把注释分配到其段落所在的章节
///
/// 段落没有章节归属（被分章丢弃或根本不存在）的注释同样被丢弃，记为 `OrphanAnnotation`。
pub fn partition_annotations(
    index: &ParagraphIndex,
    annotations: Vec<AnnotationRecord>,
) -> Partition {
    let mut diagnostics = Diagnostics::new();
    let mut bundles: BTreeMap<u32, AnnotationBundle> = BTreeMap::new();

    for (position, annotation) in annotations.into_iter().enumerate() {
        let Some(entry) = index.lookup(&annotation.paragraph_id) else {
            diagnostics.push(Diagnostic::OrphanAnnotation {
                paragraph_id: annotation.paragraph_id.clone(),
                position,
            });
            continue;
        };

        bundles
            .entry(entry.sequence_number)
            .or_insert_with(|| AnnotationBundle {
                chapter_key: entry.chapter_key.clone(),
                sequence_number: entry.sequence_number,
                annotations: Vec::new(),
            })
            .annotations
            .push(annotation);
    }

    Partition {
        bundles: bundles.into_values().collect(),
        diagnostics: diagnostics.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{BookId, ParagraphId, ParagraphRecord, TermPair};
    use crate::domain::segmentation::{segment_by_markers, Marker, MarkerVocabulary};

    fn annotation(paragraph_id: u64, word: &str) -> AnnotationRecord {
        AnnotationRecord {
            paragraph_id: ParagraphId::Number(paragraph_id),
            key_terms: vec![TermPair {
                raw_source: word.to_string(),
                source_gloss: String::new(),
                raw_target: String::new(),
                target_gloss: String::new(),
            }],
        }
    }

    fn index() -> ParagraphIndex {
        let paragraphs = vec![
            ParagraphRecord::new(1u64, "Chapter One", ""),
            ParagraphRecord::new(2u64, "It was a dark night.", "那是一个黑夜。"),
            ParagraphRecord::new(3u64, "Chapter Two", ""),
            ParagraphRecord::new(4u64, "The sun rose.", "太阳升起了。"),
            ParagraphRecord::new(5u64, "It was warm.", "天气很暖。"),
        ];
        let vocabulary = MarkerVocabulary::from_pairs([
            ("Chapter One", Marker::Chapter(1)),
            ("Chapter Two", Marker::Chapter(2)),
        ])
        .unwrap();
        segment_by_markers(&BookId::new("night").unwrap(), &paragraphs, &vocabulary).index
    }

    #[test]
    fn test_annotations_follow_their_paragraph() {
        let partition = partition_annotations(
            &index(),
            vec![annotation(5, "warm"), annotation(2, "dark"), annotation(4, "sun")],
        );

        assert_eq!(partition.bundles.len(), 2);
        assert_eq!(partition.bundles[0].chapter_key.as_str(), "night-1");
        assert_eq!(partition.bundles[0].annotations[0].key_terms[0].raw_source, "dark");

        let second: Vec<&str> = partition.bundles[1]
            .annotations
            .iter()
            .map(|a| a.key_terms[0].raw_source.as_str())
            .collect();
        assert_eq!(second, vec!["warm", "sun"]);
        assert!(partition.diagnostics.is_empty());
    }

    #[test]
    fn test_orphan_annotation_dropped_with_diagnostic() {
        let partition =
            partition_annotations(&index(), vec![annotation(2, "dark"), annotation(404, "ghost")]);

        assert_eq!(partition.annotation_count(), 1);
        assert_eq!(
            partition.diagnostics,
            vec![Diagnostic::OrphanAnnotation {
                paragraph_id: ParagraphId::Number(404),
                position: 1,
            }]
        );
    }

    #[test]
    fn test_annotation_on_marker_paragraph_is_orphaned() {
        let partition = partition_annotations(&index(), vec![annotation(1, "Chapter")]);
        assert!(partition.bundles.is_empty());
        assert_eq!(partition.diagnostics.len(), 1);
    }

    #[test]
    fn test_string_paragraph_ids_resolve() {
        let mut record = annotation(0, "dark");
        record.paragraph_id = ParagraphId::Text("2".to_string());
        let partition = partition_annotations(&index(), vec![record]);
        assert_eq!(partition.annotation_count(), 1);
    }
}
