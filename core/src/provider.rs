use crate::document::{DocMeta, Document};
use anyhow::{Context, Result};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supplies documents one at a time, in indexing order. `Ok(None)` is the
/// end-of-corpus sentinel; ownership of each document passes to the caller.
pub trait DocumentSource {
    fn next_document(&mut self) -> Result<Option<Document>>;
}

/// Reads every regular file under a repository root as UTF-8 text, in sorted
/// path order so document ordinals are stable across runs.
pub struct FsDocumentProvider {
    files: std::vec::IntoIter<PathBuf>,
}

impl FsDocumentProvider {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry =
                entry.with_context(|| format!("scanning repository {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(FsDocumentProvider { files: files.into_iter() })
    }
}

impl DocumentSource for FsDocumentProvider {
    fn next_document(&mut self) -> Result<Option<Document>> {
        let Some(path) = self.files.next() else {
            return Ok(None);
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading document {}", path.display()))?;
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        let meta = DocMeta {
            path_hash: hasher.finish(),
            byte_len: text.len() as u32,
        };
        Ok(Some(Document::new(text, meta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();

        let mut provider = FsDocumentProvider::open(dir.path()).unwrap();
        let first = provider.next_document().unwrap().unwrap();
        let second = provider.next_document().unwrap().unwrap();
        assert_eq!(first.text(), "first");
        assert_eq!(second.text(), "second");
        assert!(provider.next_document().unwrap().is_none());
    }

    #[test]
    fn empty_repository_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FsDocumentProvider::open(dir.path()).unwrap();
        assert!(provider.next_document().unwrap().is_none());
    }
}
