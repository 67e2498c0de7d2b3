use crate::DocId;
use std::collections::HashMap;

/// One (document, within-document frequency) pair of a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_freq: u32,
}

/// Where a term's posting list currently lives.
///
/// Accumulation happens in `Pending`; serialization drains the list and
/// replaces it with the byte offset of its encoding in the index file. The
/// transition is one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingState {
    Pending(Vec<Posting>),
    Written(u32),
}

/// Dictionary entry: document frequency plus the posting list (or, after
/// serialization, its file offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub doc_freq: u32,
    state: PostingState,
}

impl Term {
    fn new() -> Self {
        Term {
            doc_freq: 0,
            state: PostingState::Pending(Vec::new()),
        }
    }

    /// Record one occurrence of this term in `doc_id`.
    ///
    /// Documents arrive in ascending order, so the current document, if
    /// already represented, is always the last entry; the whole list is never
    /// rescanned.
    pub fn record(&mut self, doc_id: DocId) {
        let PostingState::Pending(postings) = &mut self.state else {
            panic!("occurrence recorded after the posting list was serialized");
        };
        match postings.last_mut() {
            Some(last) if last.doc_id == doc_id => last.term_freq += 1,
            _ => {
                postings.push(Posting { doc_id, term_freq: 1 });
                self.doc_freq += 1;
            }
        }
    }

    /// In-memory posting list, `None` once serialized.
    pub fn postings(&self) -> Option<&[Posting]> {
        match &self.state {
            PostingState::Pending(postings) => Some(postings),
            PostingState::Written(_) => None,
        }
    }

    /// File offset of the serialized posting list, `None` while pending.
    pub fn written_offset(&self) -> Option<u32> {
        match self.state {
            PostingState::Pending(_) => None,
            PostingState::Written(offset) => Some(offset),
        }
    }

    /// One-way transition to `Written`, returning the drained posting list.
    /// Panics if the list was already written.
    pub(crate) fn mark_written(&mut self, offset: u32) -> Vec<Posting> {
        match std::mem::replace(&mut self.state, PostingState::Written(offset)) {
            PostingState::Pending(postings) => postings,
            PostingState::Written(_) => panic!("posting list written twice"),
        }
    }
}

/// Term-storage strategy seam.
pub trait Dictionary {
    /// Look up `text`, inserting an empty [`Term`] on first sight.
    fn add_term(&mut self, text: &str) -> &mut Term;

    fn term(&self, text: &str) -> Option<&Term>;

    fn term_mut(&mut self, text: &str) -> Option<&mut Term>;

    fn term_count(&self) -> usize;

    /// Materialized serialization order. The writer iterates this one frozen
    /// sequence for both of its passes instead of trusting the backing
    /// structure's iteration to stay stable across traversals.
    fn term_order(&self) -> Vec<String>;
}

/// Default dictionary: a hash map with a lexicographic serialization order,
/// which also makes index files deterministic for a given corpus.
#[derive(Debug, Default)]
pub struct HashDictionary {
    terms: HashMap<String, Term>,
}

impl HashDictionary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dictionary for HashDictionary {
    fn add_term(&mut self, text: &str) -> &mut Term {
        // contains_key first so existing terms don't pay for a key allocation
        if !self.terms.contains_key(text) {
            self.terms.insert(text.to_owned(), Term::new());
        }
        self.terms.get_mut(text).expect("present after insert")
    }

    fn term(&self, text: &str) -> Option<&Term> {
        self.terms.get(text)
    }

    fn term_mut(&mut self, text: &str) -> Option<&mut Term> {
        self.terms.get_mut(text)
    }

    fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn term_order(&self) -> Vec<String> {
        let mut order: Vec<String> = self.terms.keys().cloned().collect();
        order.sort_unstable();
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_merges_same_document_and_counts_doc_freq() {
        let mut dict = HashDictionary::new();
        // doc 0: "a a b", doc 1: "b c"
        dict.add_term("a").record(0);
        dict.add_term("a").record(0);
        dict.add_term("b").record(0);
        dict.add_term("b").record(1);
        dict.add_term("c").record(1);

        let a = dict.term("a").unwrap();
        assert_eq!(a.doc_freq, 1);
        assert_eq!(a.postings().unwrap(), &[Posting { doc_id: 0, term_freq: 2 }]);

        let b = dict.term("b").unwrap();
        assert_eq!(b.doc_freq, 2);
        assert_eq!(
            b.postings().unwrap(),
            &[
                Posting { doc_id: 0, term_freq: 1 },
                Posting { doc_id: 1, term_freq: 1 }
            ]
        );

        let c = dict.term("c").unwrap();
        assert_eq!(c.doc_freq, 1);
        assert_eq!(c.postings().unwrap(), &[Posting { doc_id: 1, term_freq: 1 }]);
        assert_eq!(dict.term_count(), 3);
    }

    #[test]
    fn doc_freq_equals_posting_list_length() {
        let mut dict = HashDictionary::new();
        for doc_id in 0..5 {
            dict.add_term("x").record(doc_id);
            dict.add_term("x").record(doc_id);
        }
        let x = dict.term("x").unwrap();
        assert_eq!(x.doc_freq as usize, x.postings().unwrap().len());
    }

    #[test]
    fn term_order_is_stable_and_sorted() {
        let mut dict = HashDictionary::new();
        for t in ["pear", "apple", "quince", "banana"] {
            dict.add_term(t).record(0);
        }
        let order = dict.term_order();
        assert_eq!(order, vec!["apple", "banana", "pear", "quince"]);
        assert_eq!(order, dict.term_order());
    }

    #[test]
    fn mark_written_drains_and_records_offset() {
        let mut term = Term::new();
        term.record(3);
        let drained = term.mark_written(42);
        assert_eq!(drained, vec![Posting { doc_id: 3, term_freq: 1 }]);
        assert_eq!(term.written_offset(), Some(42));
        assert!(term.postings().is_none());
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn mark_written_twice_panics() {
        let mut term = Term::new();
        term.mark_written(0);
        term.mark_written(1);
    }

    #[test]
    #[should_panic(expected = "after the posting list was serialized")]
    fn record_after_written_panics() {
        let mut term = Term::new();
        term.mark_written(0);
        term.record(0);
    }
}
