use crate::corpus::Document;
use crate::error::{IndexError, Result};
use crate::index::{DocWeights, SearchIndex};
use crate::tokenizer::Normalizer;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, remove_file, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

const POSTINGS: &str = "postings";
const IDF: &str = "idf";
const WEIGHTS: &str = "weights";
const STOP_WORDS: &str = "stop_words";
const DOCS: &str = "docs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn store(&self) -> PathBuf { self.root.join("store") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// Opens (creating if needed) the key-value store under the index root.
    pub fn open_store(&self) -> Result<sled::Db> {
        create_dir_all(&self.root)?;
        Ok(sled::open(self.store())?)
    }

    /// Like [`open_store`](Self::open_store) but refuses a directory the indexer never finished.
    pub fn open_built_store(&self) -> Result<sled::Db> {
        if !self.meta().is_file() {
            return Err(IndexError::NotBuilt(self.root.clone()));
        }
        self.open_store()
    }
}

fn doc_key(doc_id: DocId) -> [u8; 4] {
    doc_id.to_be_bytes()
}

fn decode_doc_key(table: &'static str, key: &[u8]) -> Result<DocId> {
    let bytes: [u8; 4] = key.try_into().map_err(|_| IndexError::Corrupt {
        table,
        detail: format!("doc key has {} bytes", key.len()),
    })?;
    Ok(DocId::from_be_bytes(bytes))
}

fn decode_term(table: &'static str, key: &[u8]) -> Result<String> {
    String::from_utf8(key.to_vec()).map_err(|e| IndexError::Corrupt { table, detail: e.to_string() })
}

pub fn save_postings(db: &sled::Db, postings: &HashMap<String, Vec<DocId>>) -> Result<()> {
    let tree = db.open_tree(POSTINGS)?;
    tree.clear()?;
    for (term, plist) in postings {
        tree.insert(term.as_bytes(), bincode::serialize(plist)?)?;
    }
    Ok(())
}

pub fn load_postings(db: &sled::Db) -> Result<HashMap<String, Vec<DocId>>> {
    let tree = db.open_tree(POSTINGS)?;
    let mut postings = HashMap::with_capacity(tree.len());
    for entry in tree.iter() {
        let (k, v) = entry?;
        let plist: Vec<DocId> = bincode::deserialize(&v)?;
        postings.insert(decode_term(POSTINGS, &k)?, plist);
    }
    Ok(postings)
}

pub fn save_idf(db: &sled::Db, idf: &HashMap<String, f64>) -> Result<()> {
    let tree = db.open_tree(IDF)?;
    tree.clear()?;
    for (term, value) in idf {
        tree.insert(term.as_bytes(), bincode::serialize(value)?)?;
    }
    Ok(())
}

pub fn load_idf(db: &sled::Db) -> Result<HashMap<String, f64>> {
    let tree = db.open_tree(IDF)?;
    let mut idf = HashMap::with_capacity(tree.len());
    for entry in tree.iter() {
        let (k, v) = entry?;
        idf.insert(decode_term(IDF, &k)?, bincode::deserialize::<f64>(&v)?);
    }
    Ok(idf)
}

pub fn save_weights(db: &sled::Db, weights: &HashMap<DocId, DocWeights>) -> Result<()> {
    let tree = db.open_tree(WEIGHTS)?;
    tree.clear()?;
    for (doc_id, w) in weights {
        tree.insert(doc_key(*doc_id), bincode::serialize(w)?)?;
    }
    Ok(())
}

pub fn load_weights(db: &sled::Db) -> Result<HashMap<DocId, DocWeights>> {
    let tree = db.open_tree(WEIGHTS)?;
    let mut weights = HashMap::with_capacity(tree.len());
    for entry in tree.iter() {
        let (k, v) = entry?;
        weights.insert(decode_doc_key(WEIGHTS, &k)?, bincode::deserialize(&v)?);
    }
    Ok(weights)
}

/// The stop words are stored so queries are normalized exactly as the corpus was.
pub fn save_stop_words(db: &sled::Db, normalizer: &Normalizer) -> Result<()> {
    let tree = db.open_tree(STOP_WORDS)?;
    tree.clear()?;
    for word in normalizer.stop_words() {
        tree.insert(word.as_bytes(), &[] as &[u8])?;
    }
    Ok(())
}

pub fn load_stop_words(db: &sled::Db) -> Result<Normalizer> {
    let tree = db.open_tree(STOP_WORDS)?;
    let mut words = Vec::with_capacity(tree.len());
    for entry in tree.iter() {
        let (k, _) = entry?;
        words.push(decode_term(STOP_WORDS, &k)?);
    }
    Ok(Normalizer::new(words))
}

pub fn save_documents(db: &sled::Db, docs: &BTreeMap<DocId, Document>) -> Result<()> {
    let tree = db.open_tree(DOCS)?;
    tree.clear()?;
    for (doc_id, doc) in docs {
        tree.insert(doc_key(*doc_id), bincode::serialize(doc)?)?;
    }
    Ok(())
}

pub fn load_documents(db: &sled::Db) -> Result<BTreeMap<DocId, Document>> {
    let tree = db.open_tree(DOCS)?;
    let mut docs = BTreeMap::new();
    for entry in tree.iter() {
        let (k, v) = entry?;
        docs.insert(decode_doc_key(DOCS, &k)?, bincode::deserialize(&v)?);
    }
    Ok(docs)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

fn remove_meta(paths: &IndexPaths) -> Result<()> {
    match remove_file(paths.meta()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IndexError::NotBuilt(paths.root.clone()),
        _ => IndexError::Io(e),
    })?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Writes all index tables and the documents, then `meta.json` last. Any existing
/// `meta.json` is removed first, so an interrupted rebuild loads as `NotBuilt`.
pub fn save_index(
    paths: &IndexPaths,
    index: &SearchIndex,
    docs: &BTreeMap<DocId, Document>,
    created_at: String,
) -> Result<MetaFile> {
    remove_meta(paths)?;
    let db = paths.open_store()?;
    save_postings(&db, index.postings_table())?;
    save_idf(&db, index.idf_table())?;
    save_weights(&db, index.weights_table())?;
    save_stop_words(&db, index.normalizer())?;
    save_documents(&db, docs)?;
    db.flush()?;

    let meta = MetaFile {
        num_docs: index.num_docs(),
        num_terms: index.vocabulary_len(),
        created_at,
        version: FORMAT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "index saved");
    Ok(meta)
}

/// Loads the index tables and documents written by [`save_index`].
pub fn load_index(paths: &IndexPaths) -> Result<(SearchIndex, BTreeMap<DocId, Document>, MetaFile)> {
    let meta = load_meta(paths)?;
    let db = paths.open_built_store()?;
    let index = SearchIndex::from_parts(
        load_postings(&db)?,
        load_idf(&db)?,
        load_weights(&db)?,
        load_stop_words(&db)?,
        meta.num_docs,
    );
    let docs = load_documents(&db)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = index.vocabulary_len(), "index loaded");
    Ok((index, docs, meta))
}
