//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

/// 书籍唯一标识（URL 友好的短名，如 `animal-farm`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.is_empty() {
            return Err("书籍标识不能为空");
        }
        if id.len() > 100 {
            return Err("书籍标识长度不能超过100字符");
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err("书籍标识只能包含小写字母、数字、'-' 和 '_'");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 段落标识
///
/// 翻译管线输出的 id 可能是整数也可能是字符串；
/// 纯数字字符串经 [`ParagraphId::normalized`] 后与整数等价。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParagraphId {
    Number(u64),
    Text(String),
}

impl ParagraphId {
    /// 数值形式（用于 id 区间划分和注释关联）
    pub fn as_number(&self) -> Option<u64> {
        match self {
            ParagraphId::Number(n) => Some(*n),
            ParagraphId::Text(s) => s.parse().ok(),
        }
    }

    /// 规范化：纯数字字符串转为整数
    pub fn normalized(&self) -> ParagraphId {
        match self.as_number() {
            Some(n) => ParagraphId::Number(n),
            None => self.clone(),
        }
    }
}

impl From<u64> for ParagraphId {
    fn from(n: u64) -> Self {
        ParagraphId::Number(n)
    }
}

impl From<&str> for ParagraphId {
    fn from(s: &str) -> Self {
        ParagraphId::Text(s.to_string())
    }
}

impl std::fmt::Display for ParagraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParagraphId::Number(n) => write!(f, "{}", n),
            ParagraphId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 章节键：`{book}-{part}-{chapter}`，无卷层级时为 `{book}-{chapter}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterKey(String);

impl ChapterKey {
    pub fn new(book_id: &BookId, part: Option<u32>, chapter: u32) -> Self {
        match part {
            Some(part) => Self(format!("{}-{}-{}", book_id, part, chapter)),
            None => Self(format!("{}-{}", book_id, chapter)),
        }
    }

    /// 段落在章节内的限定 id：`{chapter_key}-{original_id}`
    pub fn qualify(&self, paragraph_id: &ParagraphId) -> String {
        format!("{}-{}", self.0, paragraph_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 原文/译文语言对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub source: String,
    pub target: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            source: "en".to_string(),
            target: "zh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_validation() {
        assert!(BookId::new("animal-farm").is_ok());
        assert!(BookId::new("").is_err());
        assert!(BookId::new("Animal Farm").is_err());
    }

    #[test]
    fn test_chapter_key_with_and_without_part() {
        let book = BookId::new("farm").unwrap();
        assert_eq!(ChapterKey::new(&book, Some(2), 3).as_str(), "farm-2-3");
        assert_eq!(ChapterKey::new(&book, None, 3).as_str(), "farm-3");
    }

    #[test]
    fn test_qualified_paragraph_id() {
        let book = BookId::new("farm").unwrap();
        let key = ChapterKey::new(&book, Some(1), 4);
        assert_eq!(key.qualify(&ParagraphId::Number(17)), "farm-1-4-17");
    }

    #[test]
    fn test_paragraph_id_deserializes_number_or_string() {
        let ids: Vec<ParagraphId> = serde_json::from_str(r#"[12, "12", "p-3"]"#).unwrap();
        assert_eq!(ids[0], ParagraphId::Number(12));
        assert_eq!(ids[1].normalized(), ParagraphId::Number(12));
        assert_eq!(ids[2].as_number(), None);
    }
}
