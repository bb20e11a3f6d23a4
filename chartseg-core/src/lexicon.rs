//! Span lexicon: the lookup interface the chart parser seeds from, and a
//! hash-map backed lexicon that implements it
//!
//! Lexicon files hold one entry per line:
//!
//! ```text
//! ; comment
//! john := NP
//! sees := (NP\S)/NP : see' : 3
//! ab
//! ```
//!
//! The optional third field is a logical form (empty for none) and the
//! fourth a positive frequency. A line without `:=` is a bare word, used by
//! the segmentation lattice, and gets the category [`WORD_CATEGORY`].

use crate::category::{CatId, CategoryTable};
use crate::error::LexiconError;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Category given to bare words
pub const WORD_CATEGORY: &str = "x";

/// Line prefix for comments in lexicon files
pub const COMMENT_PREFIX: char = ';';

/// Lookup interface consumed by the chart parser.
pub trait SpanLexicon {
    /// All homonymous entries whose surface form is `surface`, in homonym
    /// order. An empty slice means the span is not recognized.
    fn lookup(&self, surface: &str) -> &[LexicalEntry];
}

impl<T: SpanLexicon + ?Sized> SpanLexicon for &T {
    fn lookup(&self, surface: &str) -> &[LexicalEntry] {
        (**self).lookup(surface)
    }
}

/// One `<surface, category, logical form>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LexicalEntry {
    /// Surface (phonological) form
    pub surface: String,
    /// Category the entry contributes to the chart
    pub category: CatId,
    /// Optional logical form
    pub logical_form: Option<String>,
    /// Token frequency of this entry
    pub frequency: usize,
}

/// In-memory lexicon keyed by surface form.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    categories: CategoryTable,
    entries: HashMap<String, Vec<LexicalEntry>>,
    entry_count: usize,
}

impl SpanLexicon for Lexicon {
    fn lookup(&self, surface: &str) -> &[LexicalEntry] {
        self.entries.get(surface).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Lexicon {
    /// Create an empty lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a segmentation lexicon from bare words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::new();
        for word in words {
            lexicon.add_word(word.as_ref());
        }
        lexicon
    }

    /// Read a lexicon in the line format described in the module docs
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut lexicon = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            lexicon.add_line(&line?, idx + 1)?;
        }
        log::debug!(
            "loaded lexicon: {} entries, {} surface forms, {} categories",
            lexicon.len(),
            lexicon.surface_count(),
            lexicon.categories.len()
        );
        Ok(lexicon)
    }

    /// Load a lexicon file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Add an entry; an existing `<surface, category, logical form>` triple
    /// only gains frequency.
    pub fn add(
        &mut self,
        surface: &str,
        category: &str,
        logical_form: Option<&str>,
        frequency: usize,
    ) -> Result<CatId, crate::error::CategoryError> {
        let category = self.categories.intern(category)?;
        self.insert(surface, category, logical_form, frequency);
        Ok(category)
    }

    /// Add a bare word with category [`WORD_CATEGORY`]
    pub fn add_word(&mut self, surface: &str) -> CatId {
        let category = self.categories.intern_basic(WORD_CATEGORY);
        self.insert(surface, category, None, 1);
        category
    }

    /// Parse one line of a lexicon file. Returns `false` for comments and
    /// blank lines.
    pub fn add_line(&mut self, line: &str, line_no: usize) -> Result<bool, LexiconError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(false);
        }

        let Some((surface, rest)) = line.split_once(":=") else {
            self.add_word(line);
            return Ok(true);
        };

        let surface = surface.trim();
        if surface.is_empty() {
            return Err(LexiconError::MissingSurface { line: line_no });
        }

        let mut fields = rest.splitn(3, ':');
        let category = fields.next().unwrap_or_default();
        let logical_form = fields
            .next()
            .map(|lf| lf.trim())
            .filter(|lf| !lf.is_empty());
        let frequency = match fields.next().map(str::trim) {
            None => 1,
            Some(value) => match value.parse::<usize>() {
                Ok(freq) if freq > 0 => freq,
                _ => {
                    return Err(LexiconError::InvalidFrequency {
                        line: line_no,
                        value: value.to_string(),
                    })
                }
            },
        };

        self.add(surface, category, logical_form, frequency)
            .map_err(|source| LexiconError::Category {
                line: line_no,
                source,
            })?;
        Ok(true)
    }

    /// Category table shared by all entries
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Summed frequency of all entries with this surface form
    pub fn frequency(&self, surface: &str) -> usize {
        self.lookup(surface).iter().map(|e| e.frequency).sum()
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// True when the lexicon has no entries
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of distinct surface forms
    pub fn surface_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over all entries, grouped by surface form
    pub fn entries(&self) -> impl Iterator<Item = &LexicalEntry> {
        self.entries.values().flatten()
    }

    fn insert(
        &mut self,
        surface: &str,
        category: CatId,
        logical_form: Option<&str>,
        frequency: usize,
    ) {
        let homonyms = self.entries.entry(surface.to_string()).or_default();
        if let Some(entry) = homonyms
            .iter_mut()
            .find(|e| e.category == category && e.logical_form.as_deref() == logical_form)
        {
            entry.frequency += frequency;
            return;
        }
        homonyms.push(LexicalEntry {
            surface: surface.to_string(),
            category,
            logical_form: logical_form.map(str::to_string),
            frequency,
        });
        self.entry_count += 1;
    }
}

impl FromStr for Lexicon {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}
