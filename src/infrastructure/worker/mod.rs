//! Worker Layer - Background Task Processing
//!
//! 实现 BuildWorker，并发执行书籍构建

mod build_worker;

pub use build_worker::{BuildOutcome, BuildWorker, BuildWorkerConfig};
