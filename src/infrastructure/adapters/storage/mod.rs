//! Storage Adapters - 源文档读取与产物写入

mod file_artifacts;
mod json_source;

pub use file_artifacts::FileArtifactStore;
pub use json_source::JsonBookSource;
