//! Bireader - 双语小说章节构建
//!
//! 读取书目与翻译管线 JSON，分章、划分词汇并写出章节产物:
//! - Domain: book/, segmentation/, vocabulary/
//! - Application: commands, queries, ports
//! - Infrastructure: adapters, memory, worker

use std::sync::Arc;

use bireader::application::commands::handlers::BuildBookHandler;
use bireader::application::queries::handlers::ListBooksHandler;
use bireader::application::queries::ListBooks;
use bireader::config::{load_catalog, load_config, print_config, AppConfig};
use bireader::infrastructure::adapters::{FileArtifactStore, JsonBookSource};
use bireader::infrastructure::memory::InMemoryChapterCatalog;
use bireader::infrastructure::worker::{BuildWorker, BuildWorkerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},bireader={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Bireader - 双语小说章节构建");
    print_config(&config);

    let books = load_catalog(&config.storage.catalog_path)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
    if books.is_empty() {
        tracing::warn!(path = %config.storage.catalog_path.display(), "Catalog contains no books");
        return Ok(());
    }

    tokio::fs::create_dir_all(&config.storage.output_dir).await?;

    // 创建适配器
    let source = Arc::new(JsonBookSource::new(&config.storage.source_dir));
    let store = Arc::new(FileArtifactStore::new(
        &config.storage.output_dir,
        config.build.pretty_json,
    ));
    let catalog = InMemoryChapterCatalog::new().arc();

    let handler = Arc::new(BuildBookHandler::new(source, store, catalog.clone()));
    let worker = BuildWorker::new(
        BuildWorkerConfig {
            max_concurrent: config.build.max_concurrent,
        },
        handler,
    );

    let outcomes = worker.run(books).await;

    let mut failed = 0usize;
    let mut unclean = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                if !report.is_clean() {
                    unclean += 1;
                }
                tracing::info!(
                    book_id = %outcome.book_id,
                    chapters = report.chapters,
                    paragraphs = report.paragraphs_out,
                    annotations = report.annotations_out,
                    diagnostics = report.diagnostics.len(),
                    "Built"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(book_id = %outcome.book_id, error = %e, "Failed");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} books failed to build", failed, outcomes.len());
    }
    if config.build.strict && unclean > 0 {
        anyhow::bail!("strict mode: {} books reported diagnostics", unclean);
    }

    // 通过查询层汇总已发布的目录
    let published = ListBooksHandler::new(catalog)
        .handle(ListBooks)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list books: {}", e))?;
    for book in &published {
        tracing::info!(
            book_id = %book.id,
            title = %book.title,
            chapters = book.chapter_count,
            "Published"
        );
    }

    tracing::info!(books = published.len(), "All books built");
    Ok(())
}
