//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod chapter_catalog;
mod repositories;

pub use chapter_catalog::ChapterCatalogPort;
pub use repositories::{
    ArtifactStorePort, BookSourcePort, BuildReport, ChapterIndexEntry, RepositoryError,
    SourceDocument,
};
