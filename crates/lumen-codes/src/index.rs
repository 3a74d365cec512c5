use std::collections::HashSet;
use std::sync::LazyLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use serde::Serialize;

use crate::catalog::{Catalog, CodeEntry};

/// Codes must be a digit followed by at least six more digits or spaces.
static CODE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d\s]{6,}$").expect("valid code format regex"));

/// Keywords shorter than this never take part in fuzzy matching; a one-letter
/// keyword would otherwise match every issue.
const MIN_FUZZY_KEYWORD: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealingCode {
    pub code: String,
    pub meaning: String,
}

/// Lookup contract consumed by the HTTP layer.
pub trait CodeLookup: Send + Sync {
    fn lookup(&self, issue: &str, limit: Option<usize>) -> Vec<HealingCode>;
}

/// Keyword index over a loaded [`Catalog`].
pub struct CodeIndex {
    entries: Vec<CodeEntry>,
    keywords: Vec<String>,
    threshold: u8,
}

impl CodeIndex {
    pub fn new(catalog: Catalog, threshold: u8) -> Self {
        let entries = catalog.entries().to_vec();
        let keywords = {
            let mut seen = HashSet::new();
            entries
                .iter()
                .flat_map(|e| e.keywords.iter())
                .filter(|k| seen.insert(k.as_str()))
                .cloned()
                .collect()
        };
        Self {
            entries,
            keywords,
            threshold,
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    fn entries_with_keyword<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a CodeEntry> {
        self.entries
            .iter()
            .filter(move |e| e.keywords.iter().any(|k| k == keyword))
    }

    /// Best fuzzy keyword for `issue` and its score, if any keyword matches at all.
    fn best_fuzzy_keyword(&self, issue: &str) -> Option<(&str, u8)> {
        let matcher = SkimMatcherV2::default().ignore_case();
        self.keywords
            .iter()
            .filter(|k| k.chars().count() >= MIN_FUZZY_KEYWORD)
            .filter_map(|k| {
                let score = similarity(&matcher, issue, k);
                (score > 0).then_some((k.as_str(), score))
            })
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.len().cmp(&b.0.len())))
    }
}

/// Partial similarity in 0..=100: the shorter string is matched inside the
/// longer one and scored against its own perfect match.
fn similarity(matcher: &SkimMatcherV2, a: &str, b: &str) -> u8 {
    let (pattern, choice) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let Some(score) = matcher.fuzzy_match(choice, pattern) else {
        return 0;
    };
    let Some(ceiling) = matcher.fuzzy_match(pattern, pattern) else {
        return 0;
    };
    if ceiling <= 0 {
        return 0;
    }
    ((score as f64 / ceiling as f64) * 100.0).clamp(0.0, 100.0) as u8
}

impl CodeLookup for CodeIndex {
    fn lookup(&self, issue: &str, limit: Option<usize>) -> Vec<HealingCode> {
        let issue = issue.trim().to_lowercase();
        if issue.is_empty() {
            return Vec::new();
        }

        let mut matched: Vec<&CodeEntry> = self.entries_with_keyword(&issue).collect();

        if matched.is_empty() {
            if let Some((keyword, score)) = self.best_fuzzy_keyword(&issue) {
                tracing::debug!(issue = %issue, keyword, score, "fuzzy keyword match");
                if score >= self.threshold {
                    matched = self.entries_with_keyword(keyword).collect();
                }
            }
        }

        let mut seen = HashSet::new();
        let codes = matched
            .into_iter()
            .filter(|e| seen.insert(e.code.as_str()))
            .filter(|e| CODE_FORMAT.is_match(&e.code))
            .map(|e| HealingCode {
                code: e.code.clone(),
                meaning: e.meaning.clone(),
            });

        match limit {
            Some(n) => codes.take(n).collect(),
            None => codes.collect(),
        }
    }
}
