//! Segmentation - Errors
//!
//! 只有结构性错误的输入才会报错；缺失标记等数据问题走诊断信息。

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("无效的标记定义: {0}")]
    InvalidMarker(String),

    #[error("无效的区间 #{index} ({title}): {reason}")]
    InvalidRange {
        index: usize,
        title: String,
        reason: String,
    },

    #[error("区间重叠: '{first}' 与 '{second}'")]
    OverlappingRanges { first: String, second: String },

    #[error("无效的卷结构 #{index}: {reason}")]
    InvalidLayout { index: usize, reason: String },
}

impl SegmentationError {
    pub(crate) fn invalid_layout(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            index,
            reason: reason.into(),
        }
    }
}
