//! Film retrieval core: normalization, index construction, boolean and tf-idf
//! query evaluation, and the persisted index format.

pub mod boolean;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod tokenizer;
pub mod vector;

pub type DocId = u32;

pub use corpus::{Corpus, CorpusIssue, Document};
pub use error::{IndexError, Result};
pub use index::{build, IndexBuilder, SearchIndex};
pub use search::{paginate, parse_query, Hit, Mode, ParsedQuery, SearchEngine, SearchPage, PAGE_SIZE};
pub use tokenizer::Normalizer;
pub use vector::{ScoredDoc, TermUsage};
