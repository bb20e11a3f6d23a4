//! Categorial-grammar categories and their interning table
//!
//! Categories are identity-keyed: the table hands out one [`CatId`] per
//! canonical category, so comparing two ids compares the categories.

use crate::error::CategoryError;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name printed for [`CatId::SPAN_MARKER`]
pub const SPAN_MARKER_NAME: &str = "C";

/// Identity handle of an interned category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatId(u32);

impl CatId {
    /// Generic "recognized span" marker used by the segmentation lattice.
    ///
    /// No [`CategoryTable`] ever returns this id, so it cannot collide with a
    /// lexical category.
    pub const SPAN_MARKER: CatId = CatId(u32::MAX);

    /// Position of the category in its table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a complex category's argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slash {
    /// `X/Y` takes `Y` from the right and yields `X`
    Forward,
    /// `Y\X` takes `Y` from the left and yields `X`
    Backward,
}

impl Slash {
    /// Printed symbol
    pub fn symbol(self) -> char {
        match self {
            Slash::Forward => '/',
            Slash::Backward => '\\',
        }
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '/' => Some(Slash::Forward),
            '\\' => Some(Slash::Backward),
            _ => None,
        }
    }
}

/// Structure of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Atomic category such as `S` or `NP`
    Basic,
    /// Functor category, `result/argument` or `argument\result`
    Complex {
        /// Argument direction
        slash: Slash,
        /// Category left after the argument is consumed
        result: CatId,
        /// Expected argument
        argument: CatId,
    },
}

/// An interned category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    kind: CategoryKind,
}

impl Category {
    /// Canonical printed form
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structure of the category
    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    /// True for functor categories
    pub fn is_complex(&self) -> bool {
        matches!(self.kind, CategoryKind::Complex { .. })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Interning table for categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
    index: HashMap<String, CatId>,
}

impl CategoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and intern a category string, returning its identity.
    ///
    /// Whitespace is ignored, parentheses group, slashes associate to the
    /// left (`NP\S/NP` is `(NP\S)/NP`) and redundant outer parentheses are
    /// dropped. Every sub-category is interned as well.
    pub fn intern(&mut self, text: &str) -> Result<CatId, CategoryError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        check_balance(&compact)?;
        self.intern_compact(&compact)
    }

    /// Intern an atomic category name without parsing it
    pub(crate) fn intern_basic(&mut self, name: &str) -> CatId {
        self.insert(name.to_string(), CategoryKind::Basic)
    }

    /// Find an already interned category
    pub fn lookup(&self, text: &str) -> Option<CatId> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        check_balance(&compact).ok()?;
        let canonical = self.canonical_name(&compact)?;
        self.index.get(&canonical).copied()
    }

    /// Category behind an id, `None` for ids this table did not issue
    pub fn get(&self, id: CatId) -> Option<&Category> {
        self.categories.get(id.index())
    }

    /// Printed name of a category
    pub fn name(&self, id: CatId) -> &str {
        if id == CatId::SPAN_MARKER {
            return SPAN_MARKER_NAME;
        }
        self.get(id).map(Category::name).unwrap_or("?")
    }

    /// Number of interned categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate over all categories with their ids
    pub fn iter(&self) -> impl Iterator<Item = (CatId, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, cat)| (CatId(i as u32), cat))
    }

    fn intern_compact(&mut self, text: &str) -> Result<CatId, CategoryError> {
        let text = strip_outer_parens(text);
        if text.is_empty() {
            return Err(CategoryError::Empty);
        }

        match top_level_slash(text) {
            None => {
                if text.contains(|c| c == '(' || c == ')') {
                    return Err(CategoryError::Unbalanced(text.to_string()));
                }
                Ok(self.insert(text.to_string(), CategoryKind::Basic))
            }
            Some((pos, slash)) => {
                let (lhs, rhs) = (&text[..pos], &text[pos + 1..]);
                if lhs.is_empty() || rhs.is_empty() {
                    return Err(CategoryError::MissingOperand(text.to_string()));
                }
                let lhs = self.intern_compact(lhs)?;
                let rhs = self.intern_compact(rhs)?;
                let name = format!(
                    "{}{}{}",
                    self.operand_name(lhs),
                    slash.symbol(),
                    self.operand_name(rhs)
                );
                // `X/Y` is written result first, `Y\X` argument first
                let (result, argument) = match slash {
                    Slash::Forward => (lhs, rhs),
                    Slash::Backward => (rhs, lhs),
                };
                Ok(self.insert(
                    name,
                    CategoryKind::Complex {
                        slash,
                        result,
                        argument,
                    },
                ))
            }
        }
    }

    fn canonical_name(&self, text: &str) -> Option<String> {
        let text = strip_outer_parens(text);
        match top_level_slash(text) {
            None if text.is_empty() => None,
            None => Some(text.to_string()),
            Some((pos, slash)) => {
                let res = self.index.get(&self.canonical_name(&text[..pos])?)?;
                let arg = self.index.get(&self.canonical_name(&text[pos + 1..])?)?;
                Some(format!(
                    "{}{}{}",
                    self.operand_name(*res),
                    slash.symbol(),
                    self.operand_name(*arg)
                ))
            }
        }
    }

    fn operand_name(&self, id: CatId) -> String {
        match self.get(id) {
            Some(cat) if cat.is_complex() => format!("({})", cat.name),
            Some(cat) => cat.name.clone(),
            None => self.name(id).to_string(),
        }
    }

    fn insert(&mut self, name: String, kind: CategoryKind) -> CatId {
        if let Some(&id) = self.index.get(&name) {
            return id;
        }
        let id = match u32::try_from(self.categories.len()) {
            Ok(raw) if raw < u32::MAX => CatId(raw),
            _ => panic!("category table is limited to {} entries", u32::MAX),
        };
        self.index.insert(name.clone(), id);
        self.categories.push(Category { name, kind });
        id
    }
}

fn check_balance(text: &str) -> Result<(), CategoryError> {
    let mut depth = 0i32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CategoryError::Unbalanced(text.to_string()));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CategoryError::Unbalanced(text.to_string()));
    }
    Ok(())
}

/// Remove parentheses that enclose the whole (balanced) string.
fn strip_outer_parens(mut text: &str) -> &str {
    while text.starts_with('(') && text.ends_with(')') {
        let mut depth = 0;
        let mut closes_at_end = false;
        for (pos, ch) in text.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        closes_at_end = pos == text.len() - 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        if !closes_at_end {
            break;
        }
        text = &text[1..text.len() - 1];
    }
    text
}

/// Byte position of the last slash outside any parentheses.
fn top_level_slash(text: &str) -> Option<(usize, Slash)> {
    let mut depth = 0;
    let mut found = None;
    for (pos, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 => {
                if let Some(slash) = Slash::from_char(ch) {
                    found = Some((pos, slash));
                }
            }
            _ => {}
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_category() {
        let mut table = CategoryTable::new();
        let np = table.intern("NP").unwrap();
        assert_eq!(table.name(np), "NP");
        assert_eq!(table.get(np).unwrap().kind(), CategoryKind::Basic);
    }

    #[test]
    fn test_identity_across_spellings() {
        let mut table = CategoryTable::new();
        let a = table.intern("(NP\\S)/NP").unwrap();
        let b = table.intern(" ((NP \\ S)) / (NP) ").unwrap();
        let c = table.intern("NP\\S/NP").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(table.name(a), "(NP\\S)/NP");
    }

    #[test]
    fn test_complex_structure() {
        let mut table = CategoryTable::new();
        let tv = table.intern("(NP\\S)/NP").unwrap();
        let iv = table.lookup("NP\\S").unwrap();
        let np = table.lookup("NP").unwrap();
        match table.get(tv).unwrap().kind() {
            CategoryKind::Complex {
                slash,
                result,
                argument,
            } => {
                assert_eq!(slash, Slash::Forward);
                assert_eq!(result, iv);
                assert_eq!(argument, np);
            }
            CategoryKind::Basic => panic!("expected a complex category"),
        }
        // NP, S, NP\S, (NP\S)/NP
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_backward_slash_reads_argument_first() {
        let mut table = CategoryTable::new();
        let id = table.intern("X\\Y").unwrap();
        let x = table.lookup("X").unwrap();
        let y = table.lookup("Y").unwrap();
        assert_eq!(
            table.get(id).unwrap().kind(),
            CategoryKind::Complex {
                slash: Slash::Backward,
                result: y,
                argument: x,
            }
        );
        assert_eq!(table.name(id), "X\\Y");
    }

    #[test]
    fn test_right_grouping_is_preserved() {
        let mut table = CategoryTable::new();
        let id = table.intern("S/(NP\\S)").unwrap();
        assert_eq!(table.name(id), "S/(NP\\S)");
        assert_ne!(Some(id), table.lookup("(S/S)\\NP"));
    }

    #[test]
    fn test_malformed_categories() {
        let mut table = CategoryTable::new();
        assert_eq!(table.intern(""), Err(CategoryError::Empty));
        assert_eq!(table.intern("()"), Err(CategoryError::Empty));
        assert!(matches!(
            table.intern("(S/NP"),
            Err(CategoryError::Unbalanced(_))
        ));
        assert!(matches!(
            table.intern("S/"),
            Err(CategoryError::MissingOperand(_))
        ));
        assert!(matches!(
            table.intern("\\NP"),
            Err(CategoryError::MissingOperand(_))
        ));
    }

    #[test]
    fn test_span_marker_is_never_issued() {
        let mut table = CategoryTable::new();
        for name in ["a", "b", "C", "a/b"] {
            assert_ne!(table.intern(name).unwrap(), CatId::SPAN_MARKER);
        }
        assert_eq!(table.name(CatId::SPAN_MARKER), SPAN_MARKER_NAME);
        assert!(table.get(CatId::SPAN_MARKER).is_none());
    }

    #[test]
    fn test_lookup_missing() {
        let mut table = CategoryTable::new();
        table.intern("NP").unwrap();
        assert!(table.lookup("S").is_none());
        assert!(table.lookup("NP/NP").is_none());
    }
}
