//! Single-pass inverted-index construction with a compact, self-describing
//! on-disk format.
//!
//! The pipeline is strictly sequential: documents are pulled one at a time
//! from a [`provider::DocumentSource`], tokenized, and folded into an
//! in-memory dictionary of posting lists; the finished structure is then
//! serialized by [`persist`] into a single binary file whose header is
//! backpatched with the dictionary section's offset.

pub mod builder;
pub mod compress;
pub mod dictionary;
pub mod document;
pub mod index;
pub mod persist;
pub mod provider;
pub mod tokenizer;

pub use builder::{IndexBuilder, DEFAULT_OUTPUT_FILE};
pub use compress::{Compressor, NoCompressor, VByteCompressor};
pub use dictionary::{Dictionary, HashDictionary, Posting, PostingState, Term};
pub use document::{DocId, DocMeta, Document, DocumentTable};
pub use index::Index;
pub use persist::{IndexReader, TermEntry};
pub use provider::{DocumentSource, FsDocumentProvider};
pub use tokenizer::{TokenStream, TokenizerKind};
