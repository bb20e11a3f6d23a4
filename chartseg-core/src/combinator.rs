//! Combination rules applied by the chart parser to adjacent analyses

use crate::category::{CatId, CategoryKind, CategoryTable, Slash};

/// Decides whether two adjacent categories combine, and into what.
pub trait Combinator {
    /// Result of combining `left` with the `right` category that follows it
    fn combine(&self, left: CatId, right: CatId) -> Option<CatId>;
}

impl<F> Combinator for F
where
    F: Fn(CatId, CatId) -> Option<CatId>,
{
    fn combine(&self, left: CatId, right: CatId) -> Option<CatId> {
        self(left, right)
    }
}

/// Forward and backward function application.
///
/// `X/Y Y => X` and `Y Y\X => X`; the argument must be the identical category.
#[derive(Debug, Clone, Copy)]
pub struct Application<'a> {
    categories: &'a CategoryTable,
}

impl<'a> Application<'a> {
    /// Apply over the categories of `table`
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }
}

impl Combinator for Application<'_> {
    fn combine(&self, left: CatId, right: CatId) -> Option<CatId> {
        if let Some(cat) = self.categories.get(left) {
            if let CategoryKind::Complex {
                slash: Slash::Forward,
                result,
                argument,
            } = cat.kind()
            {
                if argument == right {
                    return Some(result);
                }
            }
        }
        if let Some(cat) = self.categories.get(right) {
            if let CategoryKind::Complex {
                slash: Slash::Backward,
                result,
                argument,
            } = cat.kind()
            {
                if argument == left {
                    return Some(result);
                }
            }
        }
        None
    }
}

/// Combinator of the segmentation lattice: any two spans combine into the
/// marker category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanCombinator {
    marker: CatId,
}

impl SpanCombinator {
    /// Use `marker` as the combined category
    pub fn new(marker: CatId) -> Self {
        Self { marker }
    }

    /// The category every combination yields
    pub fn marker(&self) -> CatId {
        self.marker
    }
}

impl Default for SpanCombinator {
    fn default() -> Self {
        Self::new(CatId::SPAN_MARKER)
    }
}

impl Combinator for SpanCombinator {
    fn combine(&self, _left: CatId, _right: CatId) -> Option<CatId> {
        Some(self.marker)
    }
}
