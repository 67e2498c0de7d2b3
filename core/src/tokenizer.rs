use anyhow::{bail, Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::str::{FromStr, SplitWhitespace};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}_']+").expect("valid regex");
}

/// Closed set of tokenizer strategies.
///
/// `Whitespace` splits on Unicode whitespace and yields tokens verbatim.
/// `Fast` extracts word runs with a regex and yields them NFKC-normalized and
/// lowercased. Selection by name goes through [`FromStr`], so an unknown name
/// is rejected before any document or file I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizerKind {
    #[default]
    Whitespace,
    Fast,
}

impl TokenizerKind {
    /// Lazy token stream over one document's text. The stream is stateful and
    /// not restartable; exhaustion is the end-of-document sentinel. Empty or
    /// whitespace-only text yields nothing.
    pub fn tokens<'a>(&self, text: &'a str) -> TokenStream<'a> {
        match self {
            TokenizerKind::Whitespace => TokenStream::Whitespace(text.split_whitespace()),
            TokenizerKind::Fast => TokenStream::Fast(WORD.find_iter(text)),
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "whitespace" | "simple" => Ok(TokenizerKind::Whitespace),
            "fast" => Ok(TokenizerKind::Fast),
            other => bail!("no tokenizer named `{other}` (expected `whitespace` or `fast`)"),
        }
    }
}

/// Per-document token iterator produced by [`TokenizerKind::tokens`].
pub enum TokenStream<'a> {
    Whitespace(SplitWhitespace<'a>),
    Fast(regex::Matches<'static, 'a>),
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            TokenStream::Whitespace(words) => words.next().map(Cow::Borrowed),
            TokenStream::Fast(matches) => matches
                .next()
                .map(|m| Cow::Owned(m.as_str().nfkc().collect::<String>().to_lowercase())),
        }
    }
}
