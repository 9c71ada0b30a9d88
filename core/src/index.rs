use crate::corpus::Document;
use crate::tokenizer::Normalizer;
use crate::DocId;
use std::collections::{BTreeMap, HashMap};

/// Per-document normalized tf-idf weights, keyed by term.
pub type DocWeights = HashMap<String, f64>;

/// Read-only index produced by [`IndexBuilder::finish`] or loaded from disk.
///
/// Holds the boolean postings, the idf table, the per-document weight vectors
/// and the normalizer (stop words) the index was built with.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    postings: HashMap<String, Vec<DocId>>, // sorted ascending, no duplicates
    idf: HashMap<String, f64>,
    weights: HashMap<DocId, DocWeights>,
    normalizer: Normalizer,
    num_docs: u32,
}

impl SearchIndex {
    pub fn from_parts(
        postings: HashMap<String, Vec<DocId>>,
        idf: HashMap<String, f64>,
        weights: HashMap<DocId, DocWeights>,
        normalizer: Normalizer,
        num_docs: u32,
    ) -> Self {
        Self { postings, idf, weights, normalizer, num_docs }
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn vocabulary_len(&self) -> usize {
        self.postings.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn df(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    /// Zero for terms outside the vocabulary.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Absent and zero-frequency terms both weigh 0.0.
    pub fn weight(&self, doc_id: DocId, term: &str) -> f64 {
        self.weights
            .get(&doc_id)
            .and_then(|w| w.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn doc_weights(&self, doc_id: DocId) -> Option<&DocWeights> {
        self.weights.get(&doc_id)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub(crate) fn postings_table(&self) -> &HashMap<String, Vec<DocId>> {
        &self.postings
    }

    pub(crate) fn idf_table(&self) -> &HashMap<String, f64> {
        &self.idf
    }

    pub(crate) fn weights_table(&self) -> &HashMap<DocId, DocWeights> {
        &self.weights
    }
}

/// Single-pass batch builder. Feed every document, then call [`finish`](Self::finish).
pub struct IndexBuilder {
    normalizer: Normalizer,
    postings: HashMap<String, Vec<DocId>>,
    term_freqs: BTreeMap<DocId, HashMap<String, u32>>,
}

impl IndexBuilder {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer, postings: HashMap::new(), term_freqs: BTreeMap::new() }
    }

    /// Counts title and text terms. Re-adding an id sums its counts.
    pub fn add_document(&mut self, doc: &Document) {
        let mut tokens = self.normalizer.normalize(&doc.title);
        tokens.extend(self.normalizer.normalize(&doc.text));

        let tf_counts = self.term_freqs.entry(doc.id).or_default();
        for term in tokens {
            let count = tf_counts.entry(term.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                let plist = self.postings.entry(term).or_default();
                if plist.last() != Some(&doc.id) {
                    plist.push(doc.id);
                }
            }
        }
    }

    pub fn finish(self) -> SearchIndex {
        let IndexBuilder { normalizer, mut postings, term_freqs } = self;
        let num_docs = term_freqs.len() as u32;
        let n = num_docs.max(1) as f64;

        // ingestion order is not id order
        for plist in postings.values_mut() {
            plist.sort_unstable();
            plist.dedup();
        }

        let idf: HashMap<String, f64> = postings
            .iter()
            .map(|(term, plist)| (term.clone(), (n / plist.len() as f64).log10()))
            .collect();

        let mut weights: HashMap<DocId, DocWeights> = HashMap::with_capacity(term_freqs.len());
        for (doc_id, tf_counts) in term_freqs {
            let mut w: DocWeights = tf_counts
                .into_iter()
                .map(|(term, tf)| {
                    let idf_t = idf.get(&term).copied().unwrap_or(0.0);
                    (term, log_tf(tf) * idf_t)
                })
                .collect();
            let norm = w.values().map(|x| x * x).sum::<f64>().sqrt();
            // every term occurs in all documents; leave the zero vector as is
            if norm > 0.0 {
                for x in w.values_mut() {
                    *x /= norm;
                }
            }
            weights.insert(doc_id, w);
        }

        tracing::info!(num_docs, num_terms = postings.len(), "index built");
        SearchIndex { postings, idf, weights, normalizer, num_docs }
    }
}

/// Sublinear tf scaling: `1 + log10(tf)`, 0 for tf = 0.
pub fn log_tf(tf: u32) -> f64 {
    if tf > 0 { 1.0 + (tf as f64).log10() } else { 0.0 }
}

pub fn build<'a, I>(normalizer: Normalizer, documents: I) -> SearchIndex
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut builder = IndexBuilder::new(normalizer);
    for doc in documents {
        builder.add_document(doc);
    }
    builder.finish()
}
