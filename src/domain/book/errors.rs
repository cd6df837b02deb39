//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的源文件路径: {0}")]
    InvalidSource(String),
}
