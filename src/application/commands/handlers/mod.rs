//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod build_handlers;

pub use build_handlers::*;
