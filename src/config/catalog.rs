//! Book Catalog - 书目文件（books.toml）
//!
//! ```toml
//! [[books]]
//! id = "animal-farm"
//! title = "Animal Farm"
//! author = "George Orwell"
//! source = "animal-farm.json"
//!
//! [books.structure]
//! kind = "markers"
//! chapters = { prefix = "Chapter", numerals = "roman" }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::domain::book::{BookDescriptor, BookId, BookMetadata, Language};
use crate::domain::segmentation::{
    validate_layout, validate_ranges, BookStructure, Marker, MarkerPattern, MarkerVocabulary,
    PartLayout, SectionRange,
};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    books: Vec<BookEntry>,
}

#[derive(Debug, Deserialize)]
struct BookEntry {
    id: String,
    title: String,
    #[serde(default)]
    author: String,
    source: PathBuf,
    #[serde(default)]
    language: Language,
    structure: StructureEntry,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum StructureEntry {
    Markers {
        #[serde(default)]
        parts: Option<MarkerPattern>,
        #[serde(default)]
        chapters: Option<MarkerPattern>,
        #[serde(default)]
        markers: Vec<MarkerEntry>,
        #[serde(default)]
        layout: Option<Vec<PartLayout>>,
    },
    Ranges {
        sections: Vec<SectionRange>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MarkerKind {
    Part,
    Chapter,
}

/// 显式标记：`{ text = "Chapter One", kind = "chapter", number = 1 }`
#[derive(Debug, Deserialize)]
struct MarkerEntry {
    text: String,
    kind: MarkerKind,
    number: u32,
}

impl MarkerEntry {
    fn marker(&self) -> Marker {
        match self.kind {
            MarkerKind::Part => Marker::Part(self.number),
            MarkerKind::Chapter => Marker::Chapter(self.number),
        }
    }
}

fn invalid(book: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::ValidationError(format!("book '{}': {}", book, reason))
}

impl StructureEntry {
    fn into_structure(self, book: &str) -> Result<BookStructure, ConfigError> {
        match self {
            StructureEntry::Markers {
                parts,
                chapters,
                markers,
                layout,
            } => {
                let mut vocabulary = MarkerVocabulary::from_pairs(
                    markers.iter().map(|entry| (entry.text.clone(), entry.marker())),
                )
                .map_err(|e| invalid(book, e))?;
                if let Some(pattern) = parts {
                    vocabulary = vocabulary.with_part_pattern(pattern);
                }
                if let Some(pattern) = chapters {
                    vocabulary = vocabulary.with_chapter_pattern(pattern);
                }
                if vocabulary.is_empty() {
                    return Err(invalid(book, "marker structure defines no markers"));
                }
                if let Some(layout) = &layout {
                    validate_layout(layout).map_err(|e| invalid(book, e))?;
                }
                Ok(BookStructure::Markers { vocabulary, layout })
            }
            StructureEntry::Ranges { sections } => {
                if sections.is_empty() {
                    return Err(invalid(book, "range structure defines no sections"));
                }
                validate_ranges(&sections).map_err(|e| invalid(book, e))?;
                Ok(BookStructure::Ranges(sections))
            }
        }
    }
}

impl BookEntry {
    fn into_descriptor(self) -> Result<BookDescriptor, ConfigError> {
        let id = BookId::new(self.id.as_str()).map_err(|e| invalid(&self.id, e))?;
        let structure = self.structure.into_structure(&self.id)?;
        let metadata = BookMetadata {
            id,
            title: self.title,
            author: self.author,
            language: self.language,
        };
        BookDescriptor::new(metadata, self.source, structure).map_err(|e| invalid(&self.id, e))
    }
}

/// 解析书目文本
pub fn parse_catalog(content: &str) -> Result<Vec<BookDescriptor>, ConfigError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let books = file
        .books
        .into_iter()
        .map(BookEntry::into_descriptor)
        .collect::<Result<Vec<_>, _>>()?;

    for (i, book) in books.iter().enumerate() {
        if books[..i].iter().any(|other| other.id() == book.id()) {
            return Err(invalid(book.id().as_str(), "duplicate book id"));
        }
    }

    Ok(books)
}

/// 读取并解析书目文件
pub fn load_catalog(path: &Path) -> Result<Vec<BookDescriptor>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
    let books = parse_catalog(&content)?;
    tracing::debug!(path = %path.display(), books = books.len(), "Catalog loaded");
    Ok(books)
}
