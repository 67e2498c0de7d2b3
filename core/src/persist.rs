//! Binary index file layout, all integers native-endian and fixed width:
//!
//! ```text
//! dictionary_offset  u32   backpatched after the dictionary is written
//! terms_number       u64
//! compressor_id      u32
//! document_number    u32
//! document metadata  document_number records, one contiguous block
//! posting lists      back-to-back compressor blocks, offsets captured
//! dictionary         per term: text_len u32, text bytes, doc_freq u32,
//!                    posting-list offset u32
//! ```
//!
//! The write is two-phase: a zero placeholder goes out first, the posting
//! lists and dictionary follow, then a seek back to offset 0 patches in the
//! dictionary's real position.

use crate::compress::{compressor_for_id, Compressor};
use crate::dictionary::{Dictionary, Posting};
use crate::document::{DocMeta, DocumentTable};
use anyhow::{ensure, Context, Result};
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Bytes before the document-metadata block: dictionary offset (u32), term
/// count (u64), compressor id (u32), document count (u32).
pub const HEADER_LEN: u64 = 20;

/// Serialize a finished build. Every term transitions to its `Written` state;
/// failures leave an incomplete file behind and are propagated as-is.
pub(crate) fn write_index(
    path: &Path,
    dictionary: &mut dyn Dictionary,
    documents: &DocumentTable,
    compressor: &dyn Compressor,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating index file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    // Header, with a placeholder for the dictionary offset.
    out.write_u32::<NativeEndian>(0)?;
    out.write_u64::<NativeEndian>(dictionary.term_count() as u64)?;
    out.write_u32::<NativeEndian>(compressor.id())?;
    let metas = documents.finalized();
    out.write_u32::<NativeEndian>(metas.len() as u32)?;

    for meta in metas {
        meta.write_to(&mut out)?;
    }

    // Both serialization passes walk this one frozen sequence; iterating the
    // dictionary itself twice would let offsets drift onto the wrong term.
    let order = dictionary.term_order();

    // First pass: stream the posting lists, capturing each term's offset.
    for text in &order {
        let offset = file_offset(&mut out)?;
        let term = dictionary.term_mut(text).expect("term in frozen order");
        let postings = term.mark_written(offset);
        compressor
            .compress(&mut out, &postings)
            .with_context(|| format!("writing posting list for `{text}`"))?;
    }

    // Second pass: the dictionary section, referencing the captured offsets.
    let dictionary_offset = file_offset(&mut out)?;
    for text in &order {
        let term = dictionary.term(text).expect("term in frozen order");
        let offset = term.written_offset().expect("written in first pass");
        out.write_u32::<NativeEndian>(text.len() as u32)?;
        out.write_all(text.as_bytes())?;
        out.write_u32::<NativeEndian>(term.doc_freq)?;
        out.write_u32::<NativeEndian>(offset)?;
    }

    // Backpatch the placeholder now that the dictionary's position is known.
    out.seek(SeekFrom::Start(0))?;
    out.write_u32::<NativeEndian>(dictionary_offset)?;
    out.flush()
        .with_context(|| format!("flushing index file {}", path.display()))?;
    Ok(())
}

fn file_offset<W: Write + Seek>(out: &mut W) -> Result<u32> {
    let pos = out.stream_position()?;
    u32::try_from(pos).context("index file exceeds the 4 GiB offset limit")
}

/// Parsed record from the dictionary section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub text: String,
    pub doc_freq: u32,
    pub postings_offset: u32,
}

/// Read side of the index file. The header, document metadata, and dictionary
/// section are parsed eagerly; posting lists are decoded on demand through
/// the compressor named in the header.
pub struct IndexReader {
    file: BufReader<File>,
    path: PathBuf,
    compressor: Box<dyn Compressor>,
    compressor_id: u32,
    dictionary_offset: u32,
    doc_metas: Vec<DocMeta>,
    terms: Vec<TermEntry>,
}

impl IndexReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("opening index file {}", path.display()))?;
        let mut file = BufReader::new(file);

        let dictionary_offset = file.read_u32::<NativeEndian>()?;
        let term_count = file.read_u64::<NativeEndian>()?;
        let compressor_id = file.read_u32::<NativeEndian>()?;
        let document_count = file.read_u32::<NativeEndian>()?;
        let compressor = compressor_for_id(compressor_id)
            .with_context(|| format!("reading header of {}", path.display()))?;

        let mut doc_metas = Vec::with_capacity(document_count as usize);
        for _ in 0..document_count {
            doc_metas.push(DocMeta::read_from(&mut file)?);
        }
        ensure!(
            u64::from(dictionary_offset)
                >= HEADER_LEN + u64::from(document_count) * DocMeta::ENCODED_LEN,
            "dictionary offset of {} points inside the header",
            path.display()
        );

        file.seek(SeekFrom::Start(u64::from(dictionary_offset)))?;
        let mut terms = Vec::with_capacity(term_count as usize);
        for _ in 0..term_count {
            let len = file.read_u32::<NativeEndian>()? as usize;
            let mut bytes = vec![0u8; len];
            file.read_exact(&mut bytes)?;
            let text = String::from_utf8(bytes)
                .with_context(|| format!("term text in {} is not UTF-8", path.display()))?;
            let doc_freq = file.read_u32::<NativeEndian>()?;
            let postings_offset = file.read_u32::<NativeEndian>()?;
            terms.push(TermEntry { text, doc_freq, postings_offset });
        }

        Ok(IndexReader {
            file,
            path,
            compressor,
            compressor_id,
            dictionary_offset,
            doc_metas,
            terms,
        })
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn document_count(&self) -> u32 {
        self.doc_metas.len() as u32
    }

    pub fn compressor_id(&self) -> u32 {
        self.compressor_id
    }

    pub fn dictionary_offset(&self) -> u32 {
        self.dictionary_offset
    }

    pub fn doc_metas(&self) -> &[DocMeta] {
        &self.doc_metas
    }

    /// Dictionary entries in file order.
    pub fn terms(&self) -> &[TermEntry] {
        &self.terms
    }

    /// Decode the posting-list block starting at `offset`.
    pub fn postings_at(&mut self, offset: u32) -> Result<Vec<Posting>> {
        self.file.seek(SeekFrom::Start(u64::from(offset)))?;
        self.compressor
            .decompress(&mut self.file)
            .with_context(|| format!("decoding posting list in {}", self.path.display()))
    }

    /// Decode the posting list for `text`, if the term exists.
    pub fn postings_for(&mut self, text: &str) -> Result<Option<Vec<Posting>>> {
        let Some(offset) = self
            .terms
            .iter()
            .find(|t| t.text == text)
            .map(|t| t.postings_offset)
        else {
            return Ok(None);
        };
        Ok(Some(self.postings_at(offset)?))
    }
}
