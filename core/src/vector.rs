//! Ranked retrieval over the normalized tf-idf document vectors.
//!
//! The query vector uses `idf(t)` per distinct term (tf fixed at 1, not
//! normalized). Only documents in the disjunctive candidate set are scored and
//! the score is the dot product over the query's dimensions.

use crate::boolean;
use crate::index::SearchIndex;
use crate::DocId;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Query terms partitioned by whether they carry weight in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermUsage {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Higher score first, then lower doc id.
type RankKey = (OrderedFloat<f64>, Reverse<DocId>);

fn rank_key(doc: &ScoredDoc) -> RankKey {
    (OrderedFloat(doc.score), Reverse(doc.doc_id))
}

fn distinct<S: AsRef<str>>(terms: &[S]) -> BTreeSet<&str> {
    let mut set = BTreeSet::new();
    for term in terms {
        let term: &str = term.as_ref();
        set.insert(term);
    }
    set
}

/// Top `k` candidates by score, descending; equal scores order by ascending doc id.
pub fn rank<S: AsRef<str>>(terms: &[S], index: &SearchIndex, k: usize) -> Vec<ScoredDoc> {
    let query = distinct(terms);
    if query.is_empty() || k == 0 {
        return Vec::new();
    }

    let candidates = boolean::union(terms, index);
    let mut scores: HashMap<DocId, f64> = candidates.iter().map(|&d| (d, 0.0)).collect();
    for term in &query {
        let w_q = index.idf(term);
        // weight is zero off the term's postings, so walking them covers every candidate
        for &doc_id in index.postings(term).unwrap_or_default() {
            if let Some(score) = scores.get_mut(&doc_id) {
                *score += index.weight(doc_id, term) * w_q;
            }
        }
    }

    let k = k.min(scores.len());
    let mut heap: BinaryHeap<Reverse<RankKey>> = BinaryHeap::with_capacity(k + 1);
    for (doc_id, score) in scores {
        heap.push(Reverse(rank_key(&ScoredDoc { doc_id, score })));
        if heap.len() > k {
            heap.pop();
        }
    }
    let mut results: Vec<ScoredDoc> = heap
        .into_iter()
        .map(|Reverse((score, Reverse(doc_id)))| ScoredDoc { doc_id, score: score.0 })
        .collect();
    results.sort_unstable_by(|a, b| rank_key(b).cmp(&rank_key(a)));
    results
}

/// Every candidate, ranked.
pub fn rank_all<S: AsRef<str>>(terms: &[S], index: &SearchIndex) -> Vec<ScoredDoc> {
    rank(terms, index, usize::MAX)
}

pub fn explain<S: AsRef<str>>(doc_id: DocId, terms: &[S], index: &SearchIndex) -> TermUsage {
    let (matched, missing): (Vec<&str>, Vec<&str>) = distinct(terms)
        .into_iter()
        .partition(|t| index.weight(doc_id, t) != 0.0);
    TermUsage {
        matched: matched.into_iter().map(str::to_string).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
    }
}
