//! Conjunctive and disjunctive evaluation over sorted posting lists.
//!
//! All merges assume ascending, duplicate-free input and run in linear time.

use crate::index::SearchIndex;
use crate::DocId;
use std::collections::HashSet;

/// Two-pointer intersection of two sorted lists.
pub fn intersect_sorted(p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(p1.len().min(p2.len()));
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        if p1[i] == p2[j] {
            out.push(p1[i]);
            i += 1;
            j += 1;
        } else if p1[i] < p2[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Two-pointer union of two sorted lists.
pub fn union_sorted(p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(p1.len() + p2.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        if p1[i] == p2[j] {
            out.push(p1[i]);
            i += 1;
            j += 1;
        } else if p1[i] < p2[j] {
            out.push(p1[i]);
            i += 1;
        } else {
            out.push(p2[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&p1[i..]);
    out.extend_from_slice(&p2[j..]);
    out
}

/// Posting lists for the distinct terms, shortest first. Missing terms map to `None`.
fn ordered_lists<'a, S: AsRef<str>>(terms: &[S], index: &'a SearchIndex) -> Vec<Option<&'a [DocId]>> {
    let mut seen = HashSet::new();
    let mut lists: Vec<(&str, Option<&[DocId]>)> = Vec::with_capacity(terms.len());
    for term in terms {
        let term: &str = term.as_ref();
        if seen.insert(term) {
            lists.push((term, index.postings(term)));
        }
    }
    lists.sort_by(|a, b| {
        let la = a.1.map_or(0, <[DocId]>::len);
        let lb = b.1.map_or(0, <[DocId]>::len);
        la.cmp(&lb).then_with(|| a.0.cmp(b.0))
    });
    lists.into_iter().map(|(_, l)| l).collect()
}

/// AND: documents containing every term. A term outside the vocabulary empties the result;
/// callers should report it as unknown before getting here.
pub fn intersect<S: AsRef<str>>(terms: &[S], index: &SearchIndex) -> Vec<DocId> {
    let lists = ordered_lists(terms, index);
    let mut iter = lists.into_iter();
    let mut result = match iter.next() {
        Some(Some(first)) => first.to_vec(),
        _ => return Vec::new(),
    };
    for list in iter {
        match list {
            Some(list) => result = intersect_sorted(&result, list),
            None => return Vec::new(),
        }
        if result.is_empty() {
            break;
        }
    }
    result
}

/// OR: documents containing at least one term, ascending.
pub fn union<S: AsRef<str>>(terms: &[S], index: &SearchIndex) -> Vec<DocId> {
    ordered_lists(terms, index)
        .into_iter()
        .flatten()
        .fold(Vec::new(), |acc, list| union_sorted(&acc, list))
}
