use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use quarry_core::{
    Compressor, IndexBuilder, IndexReader, NoCompressor, TokenizerKind, VByteCompressor,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Build and inspect inverted index files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index file from a directory of documents
    Build {
        /// Repository directory to index
        #[arg(long)]
        input: PathBuf,
        /// Output index file
        #[arg(long)]
        output: PathBuf,
        /// Tokenizer variant: `whitespace` or `fast`
        #[arg(long, default_value = "whitespace")]
        tokenizer: TokenizerKind,
        /// Posting-list encoding: `none` or `vbyte`
        #[arg(long, default_value = "none")]
        compressor: String,
    },
    /// Print a JSON summary of an existing index file
    Inspect {
        /// Index file to read
        file: PathBuf,
        /// Also decode each posting list and report its length
        #[arg(long, default_value_t = false)]
        postings: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, tokenizer, compressor } => {
            build(input, output, tokenizer, &compressor)
        }
        Commands::Inspect { file, postings } => inspect(file, postings),
    }
}

fn parse_compressor(name: &str) -> Result<Box<dyn Compressor>> {
    match name {
        "none" => Ok(Box::new(NoCompressor)),
        "vbyte" => Ok(Box::new(VByteCompressor)),
        other => bail!("no compressor named `{other}` (expected `none` or `vbyte`)"),
    }
}

fn build(
    input: PathBuf,
    output: PathBuf,
    tokenizer: TokenizerKind,
    compressor: &str,
) -> Result<()> {
    let compressor = parse_compressor(compressor)?;
    let index = IndexBuilder::new(input)
        .tokenizer(tokenizer)
        .compressor(compressor)
        .output_path(output)
        .create_index()?;
    tracing::info!(
        terms = index.term_count(),
        documents = index.document_count(),
        output = %index.output_path().display(),
        "done"
    );
    Ok(())
}

#[derive(Serialize)]
struct TermSummary {
    text: String,
    doc_freq: u32,
    postings_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    postings: Option<usize>,
}

#[derive(Serialize)]
struct IndexSummary {
    file: String,
    dictionary_offset: u32,
    compressor_id: u32,
    documents: u32,
    terms: Vec<TermSummary>,
}

fn inspect(file: PathBuf, postings: bool) -> Result<()> {
    let mut reader = IndexReader::open(&file)?;
    let entries = reader.terms().to_vec();
    let mut terms = Vec::with_capacity(entries.len());
    for entry in entries {
        let decoded = if postings {
            Some(reader.postings_at(entry.postings_offset)?.len())
        } else {
            None
        };
        terms.push(TermSummary {
            text: entry.text,
            doc_freq: entry.doc_freq,
            postings_offset: entry.postings_offset,
            postings: decoded,
        });
    }

    let summary = IndexSummary {
        file: file.display().to_string(),
        dictionary_offset: reader.dictionary_offset(),
        compressor_id: reader.compressor_id(),
        documents: reader.document_count(),
        terms,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
