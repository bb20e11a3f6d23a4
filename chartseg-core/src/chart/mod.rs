//! Packed chart over a triangular span lattice
//!
//! Cell `(i, j)` holds the analyses of the span that starts at token `j` and
//! is `i + 1` tokens long. A cell keeps at most one node per category; the
//! different ways a category was derived at that cell are kept as backlink
//! pairs on the node instead of as separate nodes.
//!
//! Nodes live in an arena owned by the chart and are addressed by
//! [`NodeId`]. Nodes are created bottom-up, so a node's children always
//! have smaller ids than the node itself.

mod render;

pub use render::ChartDisplay;
pub(crate) use render::write_table;

use crate::category::{CatId, CategoryTable};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arena index of a chart node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the chart arena
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => NodeId(raw),
            Err(_) => panic!("chart arena is limited to {} nodes", u32::MAX),
        }
    }
}

/// Half-open token range `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// First token of the span
    pub start: usize,
    /// Number of tokens
    pub len: usize,
}

impl Span {
    /// Create a span
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// One past the last token
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Chart coordinates `(i, j)` of the span
    pub fn cell(&self) -> (usize, usize) {
        (self.len - 1, self.start)
    }
}

/// One way of deriving a node: a left and a right sub-analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Backlink {
    /// Analysis of the left part of the span
    pub left: NodeId,
    /// Analysis of the right part of the span
    pub right: NodeId,
}

impl Backlink {
    /// Create a backlink pair
    pub fn new(left: NodeId, right: NodeId) -> Self {
        Self { left, right }
    }
}

/// The analysis of one category at one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartNode {
    category: CatId,
    backlinks: SmallVec<[Backlink; 2]>,
    lexical: bool,
    span: Span,
}

impl ChartNode {
    /// Category of the analysis
    pub fn category(&self) -> CatId {
        self.category
    }

    /// Distinct derivations of this node from two sub-analyses
    pub fn backlinks(&self) -> &[Backlink] {
        &self.backlinks
    }

    /// True when a lexicon entry supplied this category for the span
    pub fn is_lexical(&self) -> bool {
        self.lexical
    }

    /// True when the node has no backlinks
    pub fn is_terminal(&self) -> bool {
        self.backlinks.is_empty()
    }

    /// Span covered by the node
    pub fn span(&self) -> Span {
        self.span
    }

    /// Number of distinct readings: every backlink pair plus the lexical one
    pub fn alternative_count(&self) -> usize {
        self.backlinks.len() + usize::from(self.lexical)
    }
}

/// Triangular table of cells plus the token strings of the input.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    size: usize,
    tokens: Vec<String>,
    cells: Vec<SmallVec<[NodeId; 2]>>,
    nodes: Vec<ChartNode>,
}

impl Chart {
    /// Create an empty chart for `size` tokens
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tokens: vec![String::new(); size],
            cells: vec![SmallVec::new(); size * (size + 1) / 2],
            nodes: Vec::new(),
        }
    }

    /// Number of input tokens
    pub fn size(&self) -> usize {
        self.size
    }

    /// True for a chart over zero tokens
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Printable form of every token
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Record the printable form of token `j`
    pub fn set_token(&mut self, j: usize, token: impl Into<String>) {
        self.tokens[j] = token.into();
    }

    /// Insert `category` at cell `(i, j)`, or merge it into the node that
    /// already carries that category there.
    ///
    /// `children` is the backlink pair the category was derived from, `None`
    /// for a lexical analysis. Repeating a call with the same arguments does
    /// not change the chart.
    ///
    /// # Panics
    ///
    /// Panics if the chart already holds `u32::MAX` nodes.
    pub fn add_or_merge(
        &mut self,
        i: usize,
        j: usize,
        category: CatId,
        children: Option<Backlink>,
    ) -> NodeId {
        let cell = self.cell_index(i, j);
        let existing = self.cells[cell]
            .iter()
            .copied()
            .find(|id| self.nodes[id.index()].category == category);

        if let Some(id) = existing {
            let node = &mut self.nodes[id.index()];
            match children {
                Some(pair) if !node.backlinks.contains(&pair) => node.backlinks.push(pair),
                Some(_) => {}
                None => node.lexical = true,
            }
            return id;
        }

        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(ChartNode {
            category,
            backlinks: children.into_iter().collect(),
            lexical: children.is_none(),
            span: Span::new(j, i + 1),
        });
        self.cells[cell].insert(0, id);
        id
    }

    /// Node ids at cell `(i, j)`, most recently created first
    pub fn cell(&self, i: usize, j: usize) -> &[NodeId] {
        &self.cells[self.cell_index(i, j)]
    }

    /// Nodes at cell `(i, j)` with their ids
    pub fn nodes_at(&self, i: usize, j: usize) -> impl Iterator<Item = (NodeId, &ChartNode)> {
        self.cell(i, j).iter().map(move |&id| (id, self.node(id)))
    }

    /// Node behind an id
    pub fn node(&self, id: NodeId) -> &ChartNode {
        &self.nodes[id.index()]
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[ChartNode] {
        &self.nodes
    }

    /// Nodes spanning the whole input
    pub fn top(&self) -> &[NodeId] {
        if self.size == 0 {
            return &[];
        }
        self.cell(self.size - 1, 0)
    }

    /// True when some analysis covers the whole input
    pub fn has_full_span(&self) -> bool {
        !self.top().is_empty()
    }

    /// True when a lexical node sits at cell `(i, j)`
    pub fn has_lexical(&self, i: usize, j: usize) -> bool {
        self.nodes_at(i, j).any(|(_, node)| node.lexical)
    }

    /// Lengths of the lexical spans starting at `start`, shortest first
    pub fn lexical_lengths_from(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        (1..=self.size.saturating_sub(start)).filter(move |&len| self.has_lexical(len - 1, start))
    }

    /// True when a lexical span starts at token `pos`
    pub fn has_lexical_starting_at(&self, pos: usize) -> bool {
        self.lexical_lengths_from(pos).next().is_some()
    }

    /// True when a lexical span ends right before token `pos`
    pub fn has_lexical_ending_at(&self, pos: usize) -> bool {
        pos <= self.size && (1..=pos).any(|len| self.has_lexical(len - 1, pos - len))
    }

    /// Surface string of a span, the concatenation of its tokens
    pub fn span_text(&self, start: usize, len: usize) -> String {
        self.tokens[start..start + len].concat()
    }

    /// Number of nodes in the chart
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of backlink pairs over all nodes
    pub fn backlink_count(&self) -> usize {
        self.nodes.iter().map(|n| n.backlinks.len()).sum()
    }

    /// Debugging table of the chart, one row per span length
    pub fn display<'a>(&'a self, categories: &'a CategoryTable) -> ChartDisplay<'a> {
        ChartDisplay::new(self, categories)
    }

    fn cell_index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size - i,
            "cell ({i}, {j}) is outside a chart of size {}",
            self.size
        );
        // rows 0..i hold size, size - 1, ... cells
        i * self.size - i * (i.saturating_sub(1)) / 2 + j
    }
}
