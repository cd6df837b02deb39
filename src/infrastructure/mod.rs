//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod memory;
pub mod worker;

pub use adapters::{FileArtifactStore, JsonBookSource};
pub use memory::InMemoryChapterCatalog;
pub use worker::{BuildOutcome, BuildWorker, BuildWorkerConfig};
