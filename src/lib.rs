//! Bireader - 双语小说章节构建
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍、章节、段落与词汇注释
//! - Segmentation: 按结构标记或段落 id 区间分章
//! - Vocabulary: 词汇按章节划分、高亮
//!
//! 应用层 (application/):
//! - Ports: 端口定义（BookSource, ArtifactStore, ChapterCatalog）
//! - Commands: CQRS 命令处理器（BuildBook）
//! - Queries: CQRS 查询处理器（ListBooks, ListChapters, GetChapter），
//!   作为库 API 供展示层读取已发布的章节；命令行只用 ListBooks 汇总结果
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: JSON 源文档读取、章节产物写入
//! - Memory: 章节目录内存实现
//! - Worker: BuildWorker 并发构建

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_catalog, load_config, AppConfig};
