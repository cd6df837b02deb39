//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::{ChapterKey, ParagraphId};

/// 双语段落 - 翻译管线输出的最小单位
///
/// 不变量:
/// - 段落按阅读顺序交付，顺序是推断结构的唯一可靠依据
/// - `source` 可能本身就是结构标记（如 "Part I"），此时 `translation` 通常为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub id: ParagraphId,
    pub source: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ParagraphRecord {
    pub fn new(
        id: impl Into<ParagraphId>,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            translation: translation.into(),
            image: None,
        }
    }
}

/// 章节内段落，id 已按章节限定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterParagraph {
    /// `{chapter_key}-{original_id}`
    pub id: String,
    /// 原始段落 id，供回溯翻译管线输出
    pub source_id: ParagraphId,
    pub source: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChapterParagraph {
    pub fn from_record(key: &ChapterKey, record: &ParagraphRecord) -> Self {
        Self {
            id: key.qualify(&record.id),
            source_id: record.id.clone(),
            source: record.source.clone(),
            translation: record.translation.clone(),
            image: record.image.clone(),
        }
    }
}

/// 章节
///
/// 不变量:
/// - `sequence_number` 在整本书内从 1 连续递增（跨卷累计）
/// - 同一卷内相邻章节的段落区间连续且不重叠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterRecord {
    pub chapter_key: ChapterKey,
    pub sequence_number: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
    pub chapter: u32,
    pub paragraphs: Vec<ChapterParagraph>,
}

impl ChapterRecord {
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// 词汇条目中的一组术语
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPair {
    /// 原文中的词形
    #[serde(rename = "raw_en")]
    pub raw_source: String,
    /// 原文释义
    #[serde(rename = "en", default)]
    pub source_gloss: String,
    /// 译文中的词形
    #[serde(rename = "raw_cn")]
    pub raw_target: String,
    /// 译文释义
    #[serde(rename = "cn", default)]
    pub target_gloss: String,
}

/// 词汇注释，挂在某个段落上，只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(rename = "id")]
    pub paragraph_id: ParagraphId,
    #[serde(rename = "key_words", default)]
    pub key_terms: Vec<TermPair>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::BookId;

    #[test]
    fn test_paragraph_deserialize_without_translation() {
        let p: ParagraphRecord =
            serde_json::from_str(r#"{"id": 1, "source": "Chapter One"}"#).unwrap();
        assert_eq!(p.translation, "");
        assert!(p.image.is_none());
    }

    #[test]
    fn test_paragraph_requires_source() {
        let result: Result<ParagraphRecord, _> = serde_json::from_str(r#"{"id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_annotation_uses_pipeline_field_names() {
        let a: AnnotationRecord = serde_json::from_str(
            r#"{"id": 7, "key_words": [{"raw_en": "Swallowed", "en": "ate", "raw_cn": "吞下", "cn": "吃"}]}"#,
        )
        .unwrap();
        assert_eq!(a.paragraph_id, ParagraphId::Number(7));
        assert_eq!(a.key_terms[0].raw_source, "Swallowed");
        assert_eq!(a.key_terms[0].target_gloss, "吃");
    }

    #[test]
    fn test_chapter_paragraph_keeps_source_id() {
        let key = ChapterKey::new(&BookId::new("farm").unwrap(), None, 2);
        let p = ChapterParagraph::from_record(&key, &ParagraphRecord::new(9u64, "Hi.", "嗨。"));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "farm-2-9");
        assert_eq!(json["source_id"], 9);
        assert!(json.get("image").is_none());
    }
}
