use std::path::Path;
use std::sync::LazyLock;

use lumen_core::LumenError;
use regex::Regex;

static CODE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d\s]+ - .+").expect("valid code line regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Longest heading, in words, still treated as a category.
const MAX_HEADING_WORDS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<CatalogError> for LumenError {
    fn from(e: CatalogError) -> Self {
        LumenError::Catalog(e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: String,
    pub meaning: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CodeEntry>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::parse(&text);
        tracing::info!(path = %path.display(), entries = catalog.len(), "healing code catalog loaded");
        Ok(catalog)
    }

    /// Parse catalog text. Lines that are neither headings nor code lines are
    /// skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut category: Option<String> = None;

        for line in text.lines().map(str::trim) {
            if is_heading(line) {
                category = Some(line.to_lowercase());
                continue;
            }
            if !CODE_LINE.is_match(line) {
                continue;
            }
            let Some((code, meaning)) = line.split_once('-') else {
                continue;
            };
            let meaning = meaning.trim().to_owned();
            let mut keywords: Vec<String> = WORD
                .find_iter(&meaning.to_lowercase())
                .map(|m| m.as_str().to_owned())
                .collect();
            if let Some(ref c) = category {
                keywords.push(c.clone());
            }
            entries.push(CodeEntry {
                code: code.trim().to_owned(),
                meaning,
                keywords,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_heading(line: &str) -> bool {
    line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
        && line.split_whitespace().count() < MAX_HEADING_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
EMOTIONAL BALANCE
519 7148 - Anxiety and nervous tension
8149 5431 - Calm mind

not a code line
SLEEP
514 854 81 - Restful sleep
";

    #[test]
    fn parses_entries_with_categories() {
        let catalog = Catalog::parse(SAMPLE);
        assert_eq!(catalog.len(), 3);

        let first = &catalog.entries()[0];
        assert_eq!(first.code, "519 7148");
        assert_eq!(first.meaning, "Anxiety and nervous tension");
        assert!(first.keywords.contains(&"anxiety".to_string()));
        assert!(first.keywords.contains(&"emotional balance".to_string()));

        let last = &catalog.entries()[2];
        assert!(last.keywords.contains(&"sleep".to_string()));
    }

    #[test]
    fn headings_need_upper_case_and_few_words() {
        assert!(is_heading("SLEEP"));
        assert!(!is_heading("Sleep"));
        assert!(!is_heading("123 456"));
        assert!(!is_heading("A B C D E F G H I J K"));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Catalog::load(Path::new("/nonexistent/codes.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/codes.txt"));
        assert_eq!(LumenError::from(err).error_kind(), "catalog");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(Catalog::load(&path).unwrap().len(), 3);
    }
}
