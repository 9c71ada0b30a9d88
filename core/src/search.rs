use crate::boolean;
use crate::corpus::Document;
use crate::index::SearchIndex;
use crate::tokenizer::{stem, words};
use crate::vector::{self, TermUsage};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

pub const PAGE_SIZE: usize = 10;
pub const SNIPPET_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Conjunctive match, results in document id order
    #[serde(alias = "and")]
    Boolean,
    /// tf-idf ranking over the disjunctive candidates
    #[default]
    #[serde(alias = "vector")]
    Ranked,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boolean" | "and" => Ok(Mode::Boolean),
            "ranked" | "vector" => Ok(Mode::Ranked),
            other => Err(format!("unknown search mode `{other}` (expected boolean or ranked)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Boolean => "boolean",
            Mode::Ranked => "ranked",
        })
    }
}

/// A raw query split into usable stems and the tokens reported back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<String>,
    pub skipped: Vec<String>,
    pub unknown: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|x| x == item) {
        list.push(item.to_string());
    }
}

/// Splits on whitespace and runs each token through the index's own normalizer.
pub fn parse_query(raw: &str, index: &SearchIndex) -> ParsedQuery {
    let normalizer = index.normalizer();
    let mut parsed = ParsedQuery::default();
    for token in raw.split_whitespace() {
        for word in words(token) {
            if normalizer.is_stop_word(&word) {
                push_unique(&mut parsed.skipped, &word);
                continue;
            }
            let term = stem(&word);
            if index.contains_term(&term) {
                push_unique(&mut parsed.terms, &term);
            } else {
                push_unique(&mut parsed.unknown, token);
            }
        }
    }
    parsed
}

/// 1-based page of `items`. Page 0 and pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub title: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TermUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub mode: Mode,
    pub page: usize,
    pub total_hits: usize,
    pub hits: Vec<Hit>,
    pub skipped: Vec<String>,
    pub unknown: Vec<String>,
    pub took_s: f64,
}

/// Loaded index plus the documents needed to present results. Immutable once built.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: SearchIndex,
    documents: BTreeMap<DocId, Document>,
}

impl SearchEngine {
    pub fn new(index: SearchIndex, documents: BTreeMap<DocId, Document>) -> Self {
        Self { index, documents }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(&doc_id)
    }

    pub fn search(&self, raw: &str, mode: Mode, page: usize) -> SearchPage {
        let start = Instant::now();
        let parsed = parse_query(raw, &self.index);

        let (total_hits, hits) = match mode {
            // an unknown term can never be satisfied conjunctively
            Mode::Boolean if !parsed.unknown.is_empty() => (0, Vec::new()),
            Mode::Boolean => {
                let ids = boolean::intersect(&parsed.terms, &self.index);
                let hits = paginate(&ids, page, PAGE_SIZE)
                    .iter()
                    .map(|&doc_id| self.hit(doc_id, None, None))
                    .collect();
                (ids.len(), hits)
            }
            Mode::Ranked => {
                let ranked = vector::rank_all(&parsed.terms, &self.index);
                let hits = paginate(&ranked, page, PAGE_SIZE)
                    .iter()
                    .map(|d| {
                        let usage = vector::explain(d.doc_id, &parsed.terms, &self.index);
                        self.hit(d.doc_id, Some(d.score), Some(usage))
                    })
                    .collect();
                (ranked.len(), hits)
            }
        };

        let took_s = start.elapsed().as_secs_f64();
        tracing::debug!(query = raw, %mode, page, total_hits, unknown = parsed.unknown.len(), took_s, "search");
        SearchPage {
            query: raw.to_string(),
            mode,
            page,
            total_hits,
            hits,
            skipped: parsed.skipped,
            unknown: parsed.unknown,
            took_s,
        }
    }

    fn hit(&self, doc_id: DocId, score: Option<f64>, usage: Option<TermUsage>) -> Hit {
        let (title, snippet) = match self.documents.get(&doc_id) {
            Some(doc) => (doc.title.clone(), snippet(&doc.text)),
            None => (String::new(), String::new()),
        };
        Hit { doc_id, title, snippet, score, usage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &items[20..25]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, usize::MAX, 10).is_empty());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("AND".parse::<Mode>().unwrap(), Mode::Boolean);
        assert_eq!("vector".parse::<Mode>().unwrap(), Mode::Ranked);
        assert!("fuzzy".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Ranked);
    }

    #[test]
    fn snippet_counts_characters() {
        let text = "é".repeat(400);
        assert_eq!(snippet(&text).chars().count(), SNIPPET_CHARS);
        assert_eq!(snippet("short"), "short");
    }
}
