use anyhow::Result;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Document ordinal: position of the document in processing order, 0-based.
pub type DocId = u32;

/// Fixed-size per-document record copied into the [`DocumentTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocMeta {
    /// Hash of the document's repository path.
    pub path_hash: u64,
    /// Length of the document text in bytes.
    pub byte_len: u32,
}

impl DocMeta {
    /// Encoded size of one record in the index file.
    pub const ENCODED_LEN: u64 = 12;

    pub(crate) fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_u64::<NativeEndian>(self.path_hash)?;
        out.write_u32::<NativeEndian>(self.byte_len)?;
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(input: &mut R) -> Result<Self> {
        Ok(DocMeta {
            path_hash: input.read_u64::<NativeEndian>()?,
            byte_len: input.read_u32::<NativeEndian>()?,
        })
    }
}

/// One unit of indexable text, owned exclusively by the builder for the
/// duration of a single tokenization pass and then reduced to its metadata.
#[derive(Debug)]
pub struct Document {
    text: String,
    meta: DocMeta,
}

impl Document {
    pub fn new(text: String, meta: DocMeta) -> Self {
        Document { text, meta }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> DocMeta {
        self.meta
    }

    pub fn into_meta(self) -> DocMeta {
        self.meta
    }
}

/// Append-only store of per-document metadata, indexed by document ordinal.
///
/// Insertion order is the semantic document index. `finalize` makes the table
/// immutable; it is idempotent, and the finalized view must not be touched
/// before it.
#[derive(Debug, Default)]
pub struct DocumentTable {
    metas: Vec<DocMeta>,
    finalized: bool,
}

impl DocumentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinal the NEXT appended document will receive. Query this before
    /// `add_document`, which is what advances it.
    pub fn next_doc_id(&self) -> DocId {
        self.metas.len() as DocId
    }

    pub fn document_count(&self) -> u32 {
        self.metas.len() as u32
    }

    pub fn add_document(&mut self, meta: DocMeta) {
        assert!(!self.finalized, "document appended after finalize");
        self.metas.push(meta);
    }

    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Contiguous finalized view, suitable for a single block write.
    /// Panics if the table has not been finalized.
    pub fn finalized(&self) -> &[DocMeta] {
        assert!(self.finalized, "document table read before finalize");
        &self.metas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(n: u64) -> DocMeta {
        DocMeta { path_hash: n, byte_len: n as u32 }
    }

    #[test]
    fn ordinals_follow_insertion_order() {
        let mut table = DocumentTable::new();
        assert_eq!(table.next_doc_id(), 0);
        table.add_document(meta(10));
        assert_eq!(table.next_doc_id(), 1);
        table.add_document(meta(20));
        assert_eq!(table.document_count(), 2);
        table.finalize();
        assert_eq!(table.finalized(), &[meta(10), meta(20)]);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut table = DocumentTable::new();
        table.add_document(meta(1));
        table.finalize();
        let first: Vec<DocMeta> = table.finalized().to_vec();
        table.finalize();
        assert_eq!(table.finalized(), first.as_slice());
    }

    #[test]
    #[should_panic(expected = "read before finalize")]
    fn finalized_view_before_finalize_panics() {
        let table = DocumentTable::new();
        let _ = table.finalized();
    }

    #[test]
    #[should_panic(expected = "appended after finalize")]
    fn append_after_finalize_panics() {
        let mut table = DocumentTable::new();
        table.finalize();
        table.add_document(meta(1));
    }
}
