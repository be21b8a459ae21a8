//! Survey configuration.

use std::collections::BTreeSet;

use crate::PrintableRun;

/// Default minimum run length.
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Options for a string survey.
///
/// Keywords are stored lowercased. An empty keyword set means "keep every run".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurveyOptions {
    /// Minimum run length in bytes.
    pub min_length: usize,
    keywords: BTreeSet<String>,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            keywords: BTreeSet::new(),
        }
    }
}

impl SurveyOptions {
    /// Set the minimum run length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Add a keyword. Blank keywords are ignored.
    pub fn with_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.add_keyword(keyword);
        self
    }

    /// Add several keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            self.add_keyword(keyword);
        }
        self
    }

    /// Add a keyword in place. Blank keywords are ignored.
    pub fn add_keyword(&mut self, keyword: impl AsRef<str>) {
        let keyword = keyword.as_ref().trim();
        if !keyword.is_empty() {
            self.keywords.insert(keyword.to_lowercase());
        }
    }

    /// Lowercased keywords, sorted.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Whether any keywords are configured.
    #[inline]
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Whether a run's text contains any keyword, ignoring case.
    ///
    /// Always true when no keywords are configured.
    pub fn matches(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Keep only the runs that [`matches`](Self::matches) accepts, preserving order.
    pub fn filter<'s, 'a, I>(&'s self, runs: I) -> impl Iterator<Item = PrintableRun<'a>> + 's
    where
        I: IntoIterator<Item = PrintableRun<'a>>,
        I::IntoIter: 's,
        'a: 's,
    {
        runs.into_iter().filter(move |run| self.matches(run.text()))
    }
}
