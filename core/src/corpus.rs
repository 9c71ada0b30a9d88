//! Film corpus as produced by the crawler: a JSON object mapping string ids to records.
//!
//! Record fields may be strings or lists of strings and may use either the
//! capitalized (`Title`) or lower-case (`title`) key. Anything missing or of the
//! wrong shape becomes an empty value; a bad record never fails the whole load.

use crate::error::Result;
use crate::DocId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub text: String,
    pub director: String,
    pub location: String,
    pub starring: Vec<String>,
    pub country: Vec<String>,
    pub language: String,
    pub running_time: String,
    pub categories: Vec<String>,
}

impl Document {
    pub fn new(id: DocId, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id, title: title.into(), text: text.into(), ..Default::default() }
    }

    fn from_record(id: DocId, record: &Map<String, Value>) -> Self {
        Self {
            id,
            title: first_string(record, &["Title", "title"]),
            text: first_string(record, &["Text", "text"]),
            director: first_string(record, &["Director", "director"]),
            location: first_string(record, &["Location", "location"]),
            starring: string_list(record, &["Starring", "starring"]),
            country: string_list(record, &["Country", "country"]),
            language: first_string(record, &["Language", "language"]),
            running_time: first_string(record, &["Running Time", "running time"]),
            categories: string_list(record, &["Categories", "categories"]),
        }
    }
}

/// A record that could not be taken as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusIssue {
    /// Key is not a positive integer; the record was skipped.
    InvalidId(String),
    /// Record is not a JSON object; indexed with empty fields.
    NotAnObject(DocId),
}

#[derive(Debug, Default)]
pub struct Corpus {
    pub documents: BTreeMap<DocId, Document>,
    pub issues: Vec<CorpusIssue>,
}

impl Corpus {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let json: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_value(json))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(json))
    }

    pub fn from_value(json: Value) -> Self {
        let mut corpus = Corpus::default();
        let entries = match json {
            Value::Object(map) => map,
            other => {
                tracing::warn!(kind = json_kind(&other), "corpus root is not an object; nothing to index");
                return corpus;
            }
        };
        for (key, record) in entries {
            let id = match key.trim().parse::<DocId>() {
                Ok(id) if id > 0 => id,
                _ => {
                    tracing::warn!(key = %key, "skipping corpus record with non-numeric id");
                    corpus.issues.push(CorpusIssue::InvalidId(key));
                    continue;
                }
            };
            let doc = match &record {
                Value::Object(fields) => Document::from_record(id, fields),
                other => {
                    tracing::warn!(doc_id = id, kind = json_kind(other), "corpus record is not an object");
                    corpus.issues.push(CorpusIssue::NotAnObject(id));
                    Document { id, ..Default::default() }
                }
            };
            corpus.documents.insert(id, doc);
        }
        corpus
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| record.get(*k))
}

fn first_string(record: &Map<String, Value>, keys: &[&str]) -> String {
    match field(record, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn string_list(record: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match field(record, keys) {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
