//! 段落文本高亮
//!
//! 纯函数：给定文本和术语，切分出普通片段与高亮片段，片段直接借用原文。
//!
//! 匹配规则:
//! - 术语按字符长度降序依次处理（长度相同保持输入顺序），最长的术语优先
//! - 大小写不敏感的精确子串匹配，不判断词边界
//! - 已高亮的片段不再扫描，高亮不会嵌套

use crate::domain::book::{AnnotationRecord, TermPair};

/// 高亮哪一侧的词形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// 原文（raw_en）
    Source,
    /// 译文（raw_cn）
    Target,
}

impl TermPair {
    /// 指定一侧的词形
    pub fn surface(&self, side: Side) -> &str {
        match side {
            Side::Source => &self.raw_source,
            Side::Target => &self.raw_target,
        }
    }
}

/// 文本片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Plain(&'a str),
    Highlighted { text: &'a str, term: &'a TermPair },
}

impl<'a> Span<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Span::Plain(text) => text,
            Span::Highlighted { text, .. } => text,
        }
    }

    pub fn term(&self) -> Option<&'a TermPair> {
        match *self {
            Span::Plain(_) => None,
            Span::Highlighted { term, .. } => Some(term),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, Span::Highlighted { .. })
    }
}

#[inline]
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// 若 `rest` 以 `needle`（忽略大小写）开头，返回匹配部分在 `rest` 中的字节长度
fn match_prefix(rest: &str, needle: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    for n in needle.chars() {
        let (_, c) = chars.next()?;
        if !chars_eq_ignore_case(c, n) {
            return None;
        }
    }
    Some(chars.next().map_or(rest.len(), |(i, _)| i))
}

/// 查找第一个匹配，返回字节区间
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    haystack.char_indices().find_map(|(start, _)| {
        match_prefix(&haystack[start..], needle).map(|len| (start, start + len))
    })
}

/// 在普通片段中切出某个术语的所有匹配
fn split_plain<'a>(text: &'a str, needle: &str, term: &'a TermPair, out: &mut Vec<Span<'a>>) {
    let mut rest = text;
    while let Some((start, end)) = find_ignore_case(rest, needle) {
        if start > 0 {
            out.push(Span::Plain(&rest[..start]));
        }
        out.push(Span::Highlighted {
            text: &rest[start..end],
            term,
        });
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(Span::Plain(rest));
    }
}

/// 高亮文本中的术语
///
/// 所有片段的文本按顺序拼接即为原文。
pub fn highlight<'a, I>(text: &'a str, terms: I, side: Side) -> Vec<Span<'a>>
where
    I: IntoIterator<Item = &'a TermPair>,
{
    if text.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<(&'a str, &'a TermPair)> = terms
        .into_iter()
        .map(|term| (term.surface(side), term))
        .filter(|(surface, _)| !surface.is_empty())
        .collect();
    // sort_by 是稳定排序，长度相同的术语保持输入顺序
    ordered.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    ordered
        .into_iter()
        .fold(vec![Span::Plain(text)], |spans, (surface, term)| {
            let mut next = Vec::with_capacity(spans.len());
            for span in spans {
                match span {
                    Span::Plain(plain) => split_plain(plain, surface, term, &mut next),
                    highlighted => next.push(highlighted),
                }
            }
            next
        })
}

/// 用一组注释中的全部术语高亮文本
pub fn highlight_annotations<'a>(
    text: &'a str,
    annotations: &'a [AnnotationRecord],
    side: Side,
) -> Vec<Span<'a>> {
    highlight(
        text,
        annotations.iter().flat_map(|a| a.key_terms.iter()),
        side,
    )
}
