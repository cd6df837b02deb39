//! 可恢复的数据质量问题
//!
//! 缺失标记、无法归属的段落、孤立注释都不会中断构建，
//! 而是记录为诊断信息随结果返回，同时输出 warn 日志。

use serde::Serialize;

use crate::domain::book::ParagraphId;

/// 段落被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// 出现在第一个可识别的章节标记之前
    BeforeFirstMarker,
    /// 位于预期结构之外（如超出预期章数的章节）
    OutsideLayout,
    /// id 不落在任何区间内
    OutsideRanges,
    /// 按区间划分时 id 不是数字
    NonNumericId,
}

/// 诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 预期的卷/章标记不存在，对应章节被跳过
    MissingMarker {
        #[serde(skip_serializing_if = "Option::is_none")]
        part: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        chapter: Option<u32>,
    },
    /// 段落无法归入任何章节，被丢弃
    UnassignedParagraph {
        paragraph_id: ParagraphId,
        reason: UnassignedReason,
    },
    /// 注释引用的段落没有章节归属，被丢弃
    OrphanAnnotation {
        paragraph_id: ParagraphId,
        /// 注释在输入中的位置
        position: usize,
    },
    /// 输入缺少整个数组
    MalformedInput { field: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingMarker {
                part,
                chapter: Some(chapter),
            } => match part {
                Some(part) => write!(f, "missing marker for part {} chapter {}", part, chapter),
                None => write!(f, "missing marker for chapter {}", chapter),
            },
            Diagnostic::MissingMarker { part, chapter: None } => match part {
                Some(part) => write!(f, "missing marker for part {}", part),
                None => write!(f, "missing marker"),
            },
            Diagnostic::UnassignedParagraph {
                paragraph_id,
                reason,
            } => write!(f, "paragraph {} dropped ({:?})", paragraph_id, reason),
            Diagnostic::OrphanAnnotation {
                paragraph_id,
                position,
            } => write!(
                f,
                "annotation #{} references unmapped paragraph {}",
                position, paragraph_id
            ),
            Diagnostic::MalformedInput { field } => write!(f, "input has no '{}' array", field),
        }
    }
}

/// 诊断收集器
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录诊断并输出 warn 日志
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(diagnostic = %diagnostic, "Recovered from data issue");
        self.0.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Diagnostics> for Vec<Diagnostic> {
    fn from(diagnostics: Diagnostics) -> Self {
        diagnostics.0
    }
}
