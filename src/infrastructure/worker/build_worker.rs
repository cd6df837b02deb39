//! Build Worker - 并发构建多本书

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::application::commands::handlers::BuildBookHandler;
use crate::application::commands::BuildBook;
use crate::application::error::ApplicationError;
use crate::application::ports::BuildReport;
use crate::domain::book::{BookDescriptor, BookId};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct BuildWorkerConfig {
    /// 最大并发构建数
    pub max_concurrent: usize,
}

impl Default for BuildWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// 单本书的构建结果
#[derive(Debug)]
pub struct BuildOutcome {
    pub book_id: BookId,
    pub result: Result<BuildReport, ApplicationError>,
}

/// 构建 Worker
///
/// 每本书一个 tokio 任务，用 semaphore 限制同时运行的数量；
/// 书与书之间只共享章节目录
pub struct BuildWorker {
    config: BuildWorkerConfig,
    handler: Arc<BuildBookHandler>,
}

impl BuildWorker {
    pub fn new(config: BuildWorkerConfig, handler: Arc<BuildBookHandler>) -> Self {
        Self { config, handler }
    }

    /// 构建所有书籍，结果顺序与输入一致
    pub async fn run(&self, books: Vec<BookDescriptor>) -> Vec<BuildOutcome> {
        tracing::info!(
            books = books.len(),
            max_concurrent = self.config.max_concurrent,
            "BuildWorker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let book_ids: Vec<BookId> = books.iter().map(|book| book.id().clone()).collect();
        let mut tasks = JoinSet::new();

        for (index, book) in books.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let handler = self.handler.clone();

            tasks.spawn(async move {
                // 持有 permit 直到构建完成
                let _permit = semaphore.acquire_owned().await;
                let book_id = book.id().clone();
                let result = handler.handle(BuildBook { book }).await;
                if let Err(e) = &result {
                    tracing::error!(book_id = %book_id, error = %e, "Book build failed");
                }
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<BuildReport, ApplicationError>>> =
            book_ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!(error = %e, "Build task aborted"),
            }
        }

        let outcomes: Vec<BuildOutcome> = book_ids
            .into_iter()
            .zip(results)
            .map(|(book_id, result)| BuildOutcome {
                result: result.unwrap_or_else(|| {
                    Err(ApplicationError::internal(format!(
                        "build task for {} did not complete",
                        book_id
                    )))
                }),
                book_id,
            })
            .collect();

        tracing::info!(
            built = outcomes.iter().filter(|o| o.result.is_ok()).count(),
            failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
            "BuildWorker finished"
        );

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ChapterCatalogPort;
    use crate::domain::book::{BookMetadata, Language};
    use crate::domain::segmentation::{BookStructure, SectionRange};
    use crate::infrastructure::adapters::{FileArtifactStore, JsonBookSource};
    use crate::infrastructure::memory::InMemoryChapterCatalog;
    use std::path::PathBuf;

    fn descriptor(id: &str, source: &str) -> BookDescriptor {
        BookDescriptor::new(
            BookMetadata {
                id: BookId::new(id).unwrap(),
                title: id.to_string(),
                author: String::new(),
                language: Language::default(),
            },
            PathBuf::from(source),
            BookStructure::Ranges(vec![
                SectionRange::new("Intro", 0, Some(10)),
                SectionRange::new("Body", 11, None),
            ]),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_builds_books_in_input_order() {
        let sources = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::write(
                sources.path().join(format!("{}.json", name)),
                r#"{"paragraphs": [{"id": 5, "source": "x", "translation": "甲"},
                                   {"id": 50, "source": "y", "translation": "乙"}],
                    "vocabulary": []}"#,
            )
            .unwrap();
        }

        let catalog = Arc::new(InMemoryChapterCatalog::new());
        let handler = Arc::new(BuildBookHandler::new(
            Arc::new(JsonBookSource::new(sources.path())),
            Arc::new(FileArtifactStore::new(output.path(), false)),
            catalog.clone(),
        ));
        let worker = BuildWorker::new(BuildWorkerConfig { max_concurrent: 2 }, handler);

        let outcomes = worker
            .run(vec![
                descriptor("a", "a.json"),
                descriptor("b", "b.json"),
                descriptor("missing", "missing.json"),
                descriptor("c", "c.json"),
            ])
            .await;

        let ids: Vec<&str> = outcomes.iter().map(|o| o.book_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "missing", "c"]);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[2].result,
            Err(ApplicationError::RepositoryError(_))
        ));
        assert_eq!(catalog.list().len(), 3);
        assert!(output.path().join("c/chapters/c-2.json").exists());
        assert!(output.path().join("a/report.json").exists());
    }
}
