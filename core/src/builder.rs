use crate::compress::{Compressor, NoCompressor};
use crate::dictionary::{Dictionary, HashDictionary};
use crate::document::DocumentTable;
use crate::index::Index;
use crate::persist;
use crate::provider::{DocumentSource, FsDocumentProvider};
use crate::tokenizer::TokenizerKind;
use anyhow::Result;
use std::path::PathBuf;

/// Output file used when the caller configures none.
pub const DEFAULT_OUTPUT_FILE: &str = "index.quarry";

/// Single-pass, single-writer index construction.
///
/// All dependencies are optional and resolved once at the start of
/// [`create_index`]: hash dictionary, identity compressor, whitespace
/// tokenizer, [`DEFAULT_OUTPUT_FILE`], and a filesystem provider over the
/// repository path. The build is all-or-nothing; an I/O failure propagates
/// and leaves any partial output file for the caller to discard.
pub struct IndexBuilder {
    repository_path: PathBuf,
    dictionary: Option<Box<dyn Dictionary>>,
    compressor: Option<Box<dyn Compressor>>,
    tokenizer: TokenizerKind,
    output_path: Option<PathBuf>,
    source: Option<Box<dyn DocumentSource>>,
}

impl IndexBuilder {
    pub fn new(repository_path: impl Into<PathBuf>) -> Self {
        IndexBuilder {
            repository_path: repository_path.into(),
            dictionary: None,
            compressor: None,
            tokenizer: TokenizerKind::default(),
            output_path: None,
            source: None,
        }
    }

    pub fn dictionary(mut self, dictionary: Box<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    pub fn tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the default filesystem provider; mainly for tests and
    /// embedders with non-filesystem corpora.
    pub fn document_source(mut self, source: Box<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Run the full pipeline: pull documents, accumulate posting lists,
    /// finalize the document table, serialize, and return the artifact.
    pub fn create_index(self) -> Result<Index> {
        let mut dictionary = self
            .dictionary
            .unwrap_or_else(|| Box::new(HashDictionary::new()));
        let compressor = self.compressor.unwrap_or_else(|| Box::new(NoCompressor));
        let tokenizer = self.tokenizer;
        let output_path = self
            .output_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
        let mut source: Box<dyn DocumentSource> = match self.source {
            Some(source) => source,
            None => Box::new(FsDocumentProvider::open(&self.repository_path)?),
        };

        let mut documents = DocumentTable::new();
        while let Some(document) = source.next_document()? {
            let doc_id = documents.next_doc_id();
            for token in tokenizer.tokens(document.text()) {
                dictionary.add_term(&token).record(doc_id);
            }
            // this append is what advances the ordinal for the next document
            documents.add_document(document.into_meta());
        }
        documents.finalize();

        persist::write_index(
            &output_path,
            dictionary.as_mut(),
            &documents,
            compressor.as_ref(),
        )?;

        tracing::info!(
            documents = documents.document_count(),
            terms = dictionary.term_count(),
            output = %output_path.display(),
            "index build complete"
        );
        Ok(Index::new(dictionary, documents, compressor, output_path))
    }
}
