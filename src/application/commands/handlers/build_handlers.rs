//! Build Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::BuildBook;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactStorePort, BookSourcePort, BuildReport, ChapterCatalogPort, ChapterIndexEntry,
};
use crate::domain::book::BookChapters;
use crate::domain::segmentation::{Diagnostic, Diagnostics, Segmentation};
use crate::domain::vocabulary::partition_annotations;

// ============================================================================
// BuildBook
// ============================================================================

/// BuildBook Handler
///
/// 源文档 → 分章 → 词汇划分 → 暂存产物 → 提交 → 发布到目录
///
/// 任一写入失败时旧产物与目录中的旧快照保持不变。
pub struct BuildBookHandler {
    source: Arc<dyn BookSourcePort>,
    store: Arc<dyn ArtifactStorePort>,
    catalog: Arc<dyn ChapterCatalogPort>,
}

impl BuildBookHandler {
    pub fn new(
        source: Arc<dyn BookSourcePort>,
        store: Arc<dyn ArtifactStorePort>,
        catalog: Arc<dyn ChapterCatalogPort>,
    ) -> Self {
        Self {
            source,
            store,
            catalog,
        }
    }

    pub async fn handle(&self, command: BuildBook) -> Result<BuildReport, ApplicationError> {
        let book = command.book;
        let book_id = book.id().clone();

        let document = self.source.load(&book).await?;

        // 缺少整个数组时该部分输出为空，而不是报错
        let mut input_diagnostics = Diagnostics::new();
        let (paragraphs_in, segmentation) = match document.paragraphs {
            Some(paragraphs) => (
                paragraphs.len(),
                book.structure.segment(&book_id, &paragraphs),
            ),
            None => {
                input_diagnostics.push(Diagnostic::MalformedInput {
                    field: "paragraphs".to_string(),
                });
                (0, Segmentation::default())
            }
        };
        let annotations = match document.vocabulary {
            Some(annotations) => annotations,
            None => {
                input_diagnostics.push(Diagnostic::MalformedInput {
                    field: "vocabulary".to_string(),
                });
                Vec::new()
            }
        };

        let annotations_in = annotations.len();
        let partition = partition_annotations(&segmentation.index, annotations);

        self.store.begin_book(&book_id).await?;

        let mut entries = Vec::with_capacity(segmentation.chapters.len());
        for chapter in &segmentation.chapters {
            let digest = self.store.save_chapter(&book.metadata, chapter).await?;
            entries.push(ChapterIndexEntry::new(chapter, digest));
        }

        for bundle in &partition.bundles {
            let chapter = segmentation
                .chapters
                .iter()
                .find(|chapter| chapter.chapter_key == bundle.chapter_key)
                .ok_or_else(|| {
                    ApplicationError::internal(format!(
                        "vocabulary bundle {} has no chapter",
                        bundle.chapter_key
                    ))
                })?;
            self.store
                .save_vocabulary(&book.metadata, chapter, bundle)
                .await?;
        }

        self.store.save_index(&book.metadata, &entries).await?;

        let paragraphs_out = segmentation.paragraph_count();
        let annotations_out = partition.annotation_count();
        let mut diagnostics = input_diagnostics.into_vec();
        diagnostics.extend(segmentation.diagnostics);
        diagnostics.extend(partition.diagnostics);

        let report = BuildReport {
            book_id: book_id.clone(),
            structure: book.structure.kind().to_string(),
            chapters: segmentation.chapters.len(),
            paragraphs_in,
            paragraphs_out,
            annotations_in,
            annotations_out,
            diagnostics,
            finished_at: Utc::now(),
        };
        self.store.save_report(&report).await?;
        self.store.commit_book(&book_id).await?;

        self.catalog.publish(BookChapters::new(
            book.metadata,
            segmentation.chapters,
            partition.bundles,
        ));

        tracing::info!(
            book_id = %book_id,
            structure = %report.structure,
            chapters = report.chapters,
            paragraphs_in = report.paragraphs_in,
            paragraphs_out = report.paragraphs_out,
            annotations_out = report.annotations_out,
            diagnostics = report.diagnostics.len(),
            "Book built"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use crate::application::ports::{RepositoryError, SourceDocument};
    use crate::domain::book::{
        AnnotationRecord, BookDescriptor, BookId, BookMetadata, ChapterRecord, Language,
        ParagraphId, ParagraphRecord, TermPair,
    };
    use crate::domain::segmentation::{BookStructure, Marker, MarkerVocabulary, SectionRange};
    use crate::domain::vocabulary::AnnotationBundle;
    use crate::infrastructure::memory::InMemoryChapterCatalog;

    struct FixedSource(SourceDocument);

    #[async_trait]
    impl BookSourcePort for FixedSource {
        async fn load(&self, _book: &BookDescriptor) -> Result<SourceDocument, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    /// 记录写入顺序的内存 store
    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<Vec<String>>,
        /// 写入索引时失败
        fail_index: bool,
    }

    impl RecordingStore {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }

        fn record(&self, entry: String) {
            self.writes.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl ArtifactStorePort for RecordingStore {
        async fn begin_book(&self, book_id: &BookId) -> Result<(), RepositoryError> {
            self.record(format!("begin:{}", book_id));
            Ok(())
        }

        async fn save_chapter(
            &self,
            _book: &BookMetadata,
            chapter: &ChapterRecord,
        ) -> Result<String, RepositoryError> {
            self.record(format!("chapter:{}", chapter.chapter_key));
            Ok(format!("digest-{}", chapter.sequence_number))
        }

        async fn save_vocabulary(
            &self,
            _book: &BookMetadata,
            chapter: &ChapterRecord,
            bundle: &AnnotationBundle,
        ) -> Result<(), RepositoryError> {
            self.record(format!(
                "vocabulary:{}:{}",
                chapter.chapter_key,
                bundle.annotations.len()
            ));
            Ok(())
        }

        async fn save_index(
            &self,
            _book: &BookMetadata,
            entries: &[ChapterIndexEntry],
        ) -> Result<(), RepositoryError> {
            if self.fail_index {
                return Err(RepositoryError::IoError("disk full".to_string()));
            }
            self.record(format!("index:{}", entries.len()));
            Ok(())
        }

        async fn save_report(&self, report: &BuildReport) -> Result<(), RepositoryError> {
            self.record(format!("report:{}", report.diagnostics.len()));
            Ok(())
        }

        async fn commit_book(&self, book_id: &BookId) -> Result<(), RepositoryError> {
            self.record(format!("commit:{}", book_id));
            Ok(())
        }
    }

    fn descriptor(structure: BookStructure) -> BookDescriptor {
        BookDescriptor::new(
            BookMetadata {
                id: BookId::new("night").unwrap(),
                title: "A Dark Night".to_string(),
                author: "Anon".to_string(),
                language: Language::default(),
            },
            PathBuf::from("night.json"),
            structure,
        )
        .unwrap()
    }

    fn marker_structure() -> BookStructure {
        BookStructure::Markers {
            vocabulary: MarkerVocabulary::from_pairs([
                ("Chapter One", Marker::Chapter(1)),
                ("Chapter Two", Marker::Chapter(2)),
            ])
            .unwrap(),
            layout: None,
        }
    }

    fn document() -> SourceDocument {
        SourceDocument {
            paragraphs: Some(vec![
                ParagraphRecord::new(1u64, "Chapter One", ""),
                ParagraphRecord::new(2u64, "It was a dark night.", "那是一个黑夜。"),
                ParagraphRecord::new(3u64, "Chapter Two", ""),
                ParagraphRecord::new(4u64, "The sun rose.", "太阳升起了。"),
            ]),
            vocabulary: Some(vec![
                AnnotationRecord {
                    paragraph_id: ParagraphId::Number(2),
                    key_terms: vec![TermPair {
                        raw_source: "dark".to_string(),
                        source_gloss: "without light".to_string(),
                        raw_target: "黑".to_string(),
                        target_gloss: "黑暗".to_string(),
                    }],
                },
                AnnotationRecord {
                    paragraph_id: ParagraphId::Number(99),
                    key_terms: Vec::new(),
                },
            ]),
        }
    }

    fn handler_with_store(
        source: SourceDocument,
        store: RecordingStore,
    ) -> (BuildBookHandler, Arc<RecordingStore>, Arc<InMemoryChapterCatalog>) {
        let store = Arc::new(store);
        let catalog = Arc::new(InMemoryChapterCatalog::new());
        let handler =
            BuildBookHandler::new(Arc::new(FixedSource(source)), store.clone(), catalog.clone());
        (handler, store, catalog)
    }

    fn handler(
        source: SourceDocument,
    ) -> (BuildBookHandler, Arc<RecordingStore>, Arc<InMemoryChapterCatalog>) {
        handler_with_store(source, RecordingStore::default())
    }

    #[tokio::test]
    async fn test_build_writes_artifacts_and_publishes() {
        let (handler, store, catalog) = handler(document());

        let report = handler
            .handle(BuildBook {
                book: descriptor(marker_structure()),
            })
            .await
            .unwrap();

        assert_eq!(report.chapters, 2);
        assert_eq!(report.paragraphs_in, 4);
        assert_eq!(report.paragraphs_out, 2);
        assert_eq!(report.annotations_in, 2);
        assert_eq!(report.annotations_out, 1);
        assert_eq!(report.structure, "markers");
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::OrphanAnnotation {
                paragraph_id: ParagraphId::Number(99),
                position: 1,
            }]
        );

        assert_eq!(
            store.writes(),
            vec![
                "begin:night",
                "chapter:night-1",
                "chapter:night-2",
                "vocabulary:night-1:1",
                "index:2",
                "report:1",
                "commit:night",
            ]
        );

        let book = catalog.get(&BookId::new("night").unwrap()).unwrap();
        assert_eq!(book.chapter_count(), 2);
        assert!(book
            .vocabulary_for(&book.chapter(1).unwrap().chapter_key)
            .is_some());
    }

    #[tokio::test]
    async fn test_missing_arrays_yield_empty_book() {
        let (handler, store, catalog) = handler(SourceDocument::default());

        let report = handler
            .handle(BuildBook {
                book: descriptor(BookStructure::Ranges(vec![SectionRange::new(
                    "All", 0, None,
                )])),
            })
            .await
            .unwrap();

        // 区间模式也不产生空章节
        assert_eq!(report.chapters, 0);
        assert_eq!(report.paragraphs_in, 0);
        assert_eq!(report.paragraphs_out, 0);
        assert_eq!(
            report.diagnostics,
            vec![
                Diagnostic::MalformedInput {
                    field: "paragraphs".to_string()
                },
                Diagnostic::MalformedInput {
                    field: "vocabulary".to_string()
                },
            ]
        );
        assert_eq!(
            store.writes(),
            vec!["begin:night", "index:0", "report:2", "commit:night"]
        );
        let book = catalog.get(&BookId::new("night").unwrap()).unwrap();
        assert_eq!(book.chapter_count(), 0);
        assert_eq!(book.paragraph_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_is_not_committed_or_published() {
        let (handler, store, catalog) = handler_with_store(
            document(),
            RecordingStore {
                fail_index: true,
                ..RecordingStore::default()
            },
        );

        let result = handler
            .handle(BuildBook {
                book: descriptor(marker_structure()),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::RepositoryError(_))));
        assert!(!store.writes().iter().any(|w| w.starts_with("commit:")));
        assert!(catalog.get(&BookId::new("night").unwrap()).is_none());
    }
}
