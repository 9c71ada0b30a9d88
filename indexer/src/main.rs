use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use filmdex_core::persist::{load_index, save_index, IndexPaths};
use filmdex_core::{Corpus, IndexBuilder, Mode, Normalizer, SearchEngine};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the film TF-IDF index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a corpus JSON file
    Build {
        /// Corpus file: a JSON object mapping document ids to film records
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Stop-word file (one word per line); defaults to the built-in English list
        #[arg(long)]
        stop_words: Option<String>,
    },
    /// Query a built index and print one page of results
    Search {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// boolean (all terms) or ranked (tf-idf)
        #[arg(long, default_value = "ranked")]
        mode: Mode,
        /// 1-based result page
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Free-text query
        #[arg(required = true)]
        query: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, stop_words } => build_index(&input, &output, stop_words.as_deref()),
        Commands::Search { index, mode, page, query } => search(&index, mode, page, &query.join(" ")),
    }
}

fn build_index(input: &str, output: &str, stop_words: Option<&str>) -> Result<()> {
    let input_path = Path::new(input);
    if !input_path.is_file() {
        bail!("corpus file not found: {input}");
    }

    let normalizer = match stop_words {
        Some(path) => {
            let contents = fs::read_to_string(path).with_context(|| format!("reading stop words from {path}"))?;
            Normalizer::from_stop_word_list(&contents)
        }
        None => Normalizer::default(),
    };

    let corpus = Corpus::load(input_path).with_context(|| format!("loading corpus {input}"))?;
    tracing::info!(num_docs = corpus.len(), issues = corpus.issues.len(), "corpus loaded");
    for issue in &corpus.issues {
        tracing::debug!(?issue, "corpus issue");
    }

    let mut builder = IndexBuilder::new(normalizer);
    for doc in corpus.documents.values() {
        builder.add_document(doc);
    }
    let index = builder.finish();

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    let meta = save_index(&IndexPaths::new(output), &index, &corpus.documents, created_at)?;

    tracing::info!(output, num_docs = meta.num_docs, num_terms = meta.num_terms, "index build complete");
    Ok(())
}

fn search(index_dir: &str, mode: Mode, page: usize, query: &str) -> Result<()> {
    let (index, docs, _meta) = load_index(&IndexPaths::new(index_dir))?;
    let engine = SearchEngine::new(index, docs);
    let result = engine.search(query, mode, page);

    println!("{} hits ({} mode, page {}, {:.4}s)", result.total_hits, result.mode, result.page, result.took_s);
    if !result.skipped.is_empty() {
        println!("stop words removed: {}", result.skipped.join(", "));
    }
    if !result.unknown.is_empty() {
        println!("unknown terms: {}", result.unknown.join(", "));
    }
    for hit in &result.hits {
        match hit.score {
            Some(score) => println!("\n[{}] {} ({score:.4})", hit.doc_id, hit.title),
            None => println!("\n[{}] {}", hit.doc_id, hit.title),
        }
        if let Some(usage) = &hit.usage {
            if !usage.missing.is_empty() {
                println!("    missing: {}", usage.missing.join(", "));
            }
        }
        println!("    {}", hit.snippet);
    }
    Ok(())
}
