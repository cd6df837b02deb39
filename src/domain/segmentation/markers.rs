//! 结构标记词表
//!
//! 标记段落（sentinel）是整段原文恰好等于某个已知标签的段落，
//! 例如 "Part I" 或 "Chapter One"。识别规则:
//! - 整段精确匹配，区分大小写，不做 trim
//! - 先查显式词条，再按卷/章编号模式解析

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{NumeralStyle, SegmentationError};

/// 结构标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// 卷边界（卷号）
    Part(u32),
    /// 章边界（章号，每卷重新计数）
    Chapter(u32),
}

/// 编号模式："{prefix} {numeral}"，无前缀时整段就是编号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPattern {
    #[serde(default)]
    pub prefix: Option<String>,
    pub numerals: NumeralStyle,
}

impl MarkerPattern {
    pub fn new(prefix: Option<&str>, numerals: NumeralStyle) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            numerals,
        }
    }

    pub fn parse(&self, text: &str) -> Option<u32> {
        let numeral = match &self.prefix {
            Some(prefix) => text.strip_prefix(prefix.as_str())?.strip_prefix(' ')?,
            None => text,
        };
        self.numerals.parse(numeral)
    }
}

/// 标记词表
#[derive(Debug, Clone, Default)]
pub struct MarkerVocabulary {
    entries: HashMap<String, Marker>,
    parts: Option<MarkerPattern>,
    chapters: Option<MarkerPattern>,
}

impl MarkerVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从有序的 `(标记文本, 标记)` 列表构建
    ///
    /// 同一文本映射到两个不同标记时报错；重复的相同映射被忽略。
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, SegmentationError>
    where
        I: IntoIterator<Item = (S, Marker)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |vocabulary, (text, marker)| {
                vocabulary.with_entry(text, marker)
            })
    }

    pub fn with_entry(
        mut self,
        text: impl Into<String>,
        marker: Marker,
    ) -> Result<Self, SegmentationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(SegmentationError::InvalidMarker(
                "marker text cannot be empty".to_string(),
            ));
        }
        if let Some(existing) = self.entries.get(&text) {
            if *existing != marker {
                return Err(SegmentationError::InvalidMarker(format!(
                    "'{}' maps to both {:?} and {:?}",
                    text, existing, marker
                )));
            }
        }
        self.entries.insert(text, marker);
        Ok(self)
    }

    pub fn with_part_pattern(mut self, pattern: MarkerPattern) -> Self {
        self.parts = Some(pattern);
        self
    }

    pub fn with_chapter_pattern(mut self, pattern: MarkerPattern) -> Self {
        self.chapters = Some(pattern);
        self
    }

    /// 识别一段原文是否为结构标记
    pub fn recognize(&self, text: &str) -> Option<Marker> {
        if let Some(marker) = self.entries.get(text) {
            return Some(*marker);
        }
        if let Some(n) = self.parts.as_ref().and_then(|p| p.parse(text)) {
            return Some(Marker::Part(n));
        }
        self.chapters
            .as_ref()
            .and_then(|p| p.parse(text))
            .map(Marker::Chapter)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.parts.is_none() && self.chapters.is_none()
    }
}
