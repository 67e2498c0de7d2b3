use crate::compress::Compressor;
use crate::dictionary::{Dictionary, Term};
use crate::document::DocumentTable;
use std::path::{Path, PathBuf};

/// The completed build artifact: the dictionary (every posting list in its
/// `Written` state), the finalized document table, the compressor that
/// encoded the file, and where the file lives. Immutable after construction.
pub struct Index {
    dictionary: Box<dyn Dictionary>,
    documents: DocumentTable,
    compressor: Box<dyn Compressor>,
    output_path: PathBuf,
}

impl Index {
    pub(crate) fn new(
        dictionary: Box<dyn Dictionary>,
        documents: DocumentTable,
        compressor: Box<dyn Compressor>,
        output_path: PathBuf,
    ) -> Self {
        Index {
            dictionary,
            documents,
            compressor,
            output_path,
        }
    }

    pub fn term_count(&self) -> usize {
        self.dictionary.term_count()
    }

    pub fn document_count(&self) -> u32 {
        self.documents.document_count()
    }

    pub fn term(&self, text: &str) -> Option<&Term> {
        self.dictionary.term(text)
    }

    pub fn documents(&self) -> &DocumentTable {
        &self.documents
    }

    pub fn compressor_id(&self) -> u32 {
        self.compressor.id()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
