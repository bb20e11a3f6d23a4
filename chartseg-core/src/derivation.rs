//! Enumeration of complete derivations out of a packed chart
//!
//! Derivation trees are built top-down from the nodes of the top cell with
//! an explicit worklist. A tree node that points at an ambiguous chart node
//! is resolved when it is first popped: the tree it belongs to keeps the
//! first alternative, and every other alternative gets a copy of the tree
//! with that node replaced. A copy duplicates only the nodes that can still
//! change, which are the resolved node, the unexpanded nodes of the tree and
//! their ancestors. Finished subtrees are shared between copies.
//!
//! The items of one tree always sit next to each other on the worklist, so
//! the unexpanded nodes of the tree being resolved are the items on top.
//!
//! All trees live in one arena owned by [`Derivations`]; the chart nodes they
//! point at are shared, never copied.

use crate::category::{CatId, CategoryTable};
use crate::chart::{Chart, ChartNode, NodeId, Span};
use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arena index of a derivation tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u32);

impl TreeId {
    fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => TreeId(raw),
            Err(_) => panic!("derivation forest is limited to {} tree nodes", u32::MAX),
        }
    }
}

/// Reading a tree node commits its chart node to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The lexical analysis of the span
    Lexical,
    /// The backlink pair at this index
    Pair(usize),
}

#[derive(Debug, Clone, Copy)]
struct TreeNode {
    node: NodeId,
    /// `None` until the worklist resolves the node
    choice: Option<Choice>,
    left: Option<TreeId>,
    right: Option<TreeId>,
    /// Only meaningful for nodes owned by a single tree
    parent: Option<TreeId>,
}

/// A tree node that still needs expanding, and the root of its tree.
#[derive(Debug, Clone, Copy)]
struct WorkItem {
    root: TreeId,
    node: TreeId,
}

fn alternatives(node: &ChartNode) -> impl Iterator<Item = Choice> {
    (0..node.backlinks().len())
        .map(Choice::Pair)
        .chain(node.is_lexical().then_some(Choice::Lexical))
}

/// Items of the tree under `root` waiting on top of the worklist.
fn pending_items(work: &[WorkItem], root: TreeId) -> &[WorkItem] {
    let start = work
        .iter()
        .rposition(|item| item.root != root)
        .map_or(0, |pos| pos + 1);
    &work[start..]
}

/// Every complete derivation of a chart's top cell.
#[derive(Debug, Clone)]
pub struct Derivations<'c> {
    chart: &'c Chart,
    trees: Vec<TreeNode>,
    roots: Vec<TreeId>,
}

/// Enumerate all derivations spanning the whole input.
///
/// The result holds exactly as many derivations as an unpacked chart would
/// store in its top cell. A chart without full-span nodes yields none.
pub fn enumerate_full(chart: &Chart) -> Derivations<'_> {
    let mut forest = Derivations {
        chart,
        trees: Vec::new(),
        roots: Vec::new(),
    };
    let mut work = Vec::new();

    for &id in chart.top() {
        for choice in alternatives(chart.node(id)) {
            let root = forest.push(id, Some(choice), None);
            forest.roots.push(root);
            if matches!(choice, Choice::Pair(_)) {
                work.push(WorkItem { root, node: root });
            }
        }
    }

    while let Some(item) = work.pop() {
        forest.expand(item, &mut work);
    }

    log::debug!(
        "enumerated {} derivations using {} tree nodes",
        forest.len(),
        forest.tree_node_count()
    );
    forest
}

/// Count the derivations of the top cell without building them.
///
/// Relies on children having smaller node ids than their parents, which
/// holds for every chart filled by the parser. Saturates at `u128::MAX`.
pub fn count_derivations(chart: &Chart) -> u128 {
    let mut counts = vec![0u128; chart.node_count()];
    for (idx, node) in chart.nodes().iter().enumerate() {
        let mut count = u128::from(node.is_lexical());
        for link in node.backlinks() {
            let pair = counts[link.left.index()].saturating_mul(counts[link.right.index()]);
            count = count.saturating_add(pair);
        }
        counts[idx] = count;
    }
    chart
        .top()
        .iter()
        .fold(0u128, |acc, id| acc.saturating_add(counts[id.index()]))
}

impl<'c> Derivations<'c> {
    /// Chart the derivations were read from
    pub fn chart(&self) -> &'c Chart {
        self.chart
    }

    /// Number of derivations
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// True when the chart has no complete derivation
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of tree nodes allocated over all derivations.
    ///
    /// Subtrees shared between derivations are counted once.
    pub fn tree_node_count(&self) -> usize {
        self.trees.len()
    }

    /// Derivation at `index`
    pub fn get(&self, index: usize) -> Option<Derivation<'_>> {
        self.roots.get(index).map(|&root| Derivation { forest: self, root })
    }

    /// Iterate over all derivations
    pub fn iter(&self) -> impl Iterator<Item = Derivation<'_>> + '_ {
        self.roots.iter().map(move |&root| Derivation { forest: self, root })
    }

    fn push(&mut self, node: NodeId, choice: Option<Choice>, parent: Option<TreeId>) -> TreeId {
        let id = TreeId::from_index(self.trees.len());
        self.trees.push(TreeNode {
            node,
            choice,
            left: None,
            right: None,
            parent,
        });
        id
    }

    fn expand(&mut self, item: WorkItem, work: &mut Vec<WorkItem>) {
        let chart = self.chart;
        let node = chart.node(self.trees[item.node.index()].node);
        log::trace!("expanding {:?} of tree {:?}", node.span(), item.root);

        let mut copies = Vec::new();
        if self.trees[item.node.index()].choice.is_none() {
            let mut alts = alternatives(node);
            let Some(first) = alts.next() else {
                return;
            };
            let pending = pending_items(work, item.root);
            for alt in alts {
                self.duplicate(item.root, item.node, alt, pending, &mut copies);
            }
            self.trees[item.node.index()].choice = Some(first);
        }

        if let Some(Choice::Pair(k)) = self.trees[item.node.index()].choice {
            let link = node.backlinks()[k];
            let left = self.child(link.left, item, work);
            let right = self.child(link.right, item, work);
            let tree = &mut self.trees[item.node.index()];
            tree.left = Some(left);
            tree.right = Some(right);
        }

        // copies go above this tree's items to keep each tree's items together
        work.extend(copies);
    }

    fn child(&mut self, id: NodeId, parent: WorkItem, work: &mut Vec<WorkItem>) -> TreeId {
        // plain terminals have a single reading and are resolved right away
        let choice = self.chart.node(id).is_terminal().then_some(Choice::Lexical);
        let tree = self.push(id, choice, Some(parent.node));
        if choice.is_none() {
            work.push(WorkItem {
                root: parent.root,
                node: tree,
            });
        }
        tree
    }

    /// Copy the tree under `root` with `target` committed to `alt`, register
    /// the copy as a new derivation and queue its unexpanded nodes.
    ///
    /// `pending` lists the other unexpanded nodes of the tree. Only they,
    /// `target` and their ancestors are copied; every other subtree is
    /// finished and is shared with the copy.
    fn duplicate(
        &mut self,
        root: TreeId,
        target: TreeId,
        alt: Choice,
        pending: &[WorkItem],
        copies: &mut Vec<WorkItem>,
    ) {
        let mut live = HashSet::new();
        for start in pending.iter().map(|item| item.node).chain([target]) {
            let mut cursor = Some(start);
            while let Some(id) = cursor {
                if !live.insert(id) {
                    break;
                }
                cursor = self.trees[id.index()].parent;
            }
        }

        let copy_root = self.copy_node(root, target, alt, None);
        let mut stack = vec![(root, copy_root)];
        let mut queued = Vec::new();

        while let Some((src, dst)) = stack.pop() {
            if src == target {
                // the copy of the target gets its own children once expanded
                if matches!(alt, Choice::Pair(_)) {
                    queued.push(dst);
                }
                continue;
            }
            let source = self.trees[src.index()];
            let (Some(left), Some(right)) = (source.left, source.right) else {
                if source.choice != Some(Choice::Lexical) {
                    queued.push(dst);
                }
                continue;
            };

            let mut link = |this: &mut Self, child: TreeId| {
                if live.contains(&child) {
                    let copy = this.copy_node(child, target, alt, Some(dst));
                    stack.push((child, copy));
                    copy
                } else {
                    child
                }
            };
            let new_right = link(self, right);
            let new_left = link(self, left);
            let copy = &mut self.trees[dst.index()];
            copy.left = Some(new_left);
            copy.right = Some(new_right);
        }

        log::trace!(
            "copied tree {:?} as {:?} with {} open nodes",
            root,
            copy_root,
            queued.len()
        );
        self.roots.push(copy_root);
        copies.extend(queued.into_iter().map(|node| WorkItem {
            root: copy_root,
            node,
        }));
    }

    fn copy_node(
        &mut self,
        src: TreeId,
        target: TreeId,
        alt: Choice,
        parent: Option<TreeId>,
    ) -> TreeId {
        let source = self.trees[src.index()];
        let choice = if src == target {
            Some(alt)
        } else {
            source.choice
        };
        self.push(source.node, choice, parent)
    }
}

/// Right-hand side of a production.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rhs {
    /// The category was read off the lexicon for this surface string
    Lexical(String),
    /// The category was built from two adjacent categories
    Binary {
        /// Category of the left part
        left: CatId,
        /// Category of the right part
        right: CatId,
        /// Token offset where the right part starts
        split: usize,
    },
}

/// One step of a derivation: `category` over `span` rewrites to `rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Production {
    /// Category of the span
    pub category: CatId,
    /// Span it covers
    pub span: Span,
    /// How it was obtained
    pub rhs: Rhs,
}

impl Production {
    /// Printable form such as `S -> NP NP\S` or `NP -> john`
    pub fn display<'a>(&'a self, categories: &'a CategoryTable) -> ProductionDisplay<'a> {
        ProductionDisplay {
            production: self,
            categories,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`Production::display`].
pub struct ProductionDisplay<'a> {
    production: &'a Production,
    categories: &'a CategoryTable,
}

impl fmt::Display for ProductionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id| self.categories.name(id);
        match &self.production.rhs {
            Rhs::Lexical(surface) => write!(f, "{} -> {}", name(self.production.category), surface),
            Rhs::Binary { left, right, .. } => write!(
                f,
                "{} -> {} {}",
                name(self.production.category),
                name(*left),
                name(*right)
            ),
        }
    }
}

enum Bracket {
    Open(TreeId),
    Close,
}

/// One complete derivation.
#[derive(Debug, Clone, Copy)]
pub struct Derivation<'a> {
    forest: &'a Derivations<'a>,
    root: TreeId,
}

impl<'a> Derivation<'a> {
    /// Category at the root
    pub fn category(&self) -> CatId {
        self.chart_node(self.root).category()
    }

    /// Span covered by the derivation
    pub fn span(&self) -> Span {
        self.chart_node(self.root).span()
    }

    /// Productions in pre-order, root first
    pub fn productions(&self) -> Vec<Production> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let tree = self.tree(id);
            let node = self.chart_node(id);
            let rhs = match (tree.left, tree.right) {
                (Some(left), Some(right)) => {
                    stack.push(right);
                    stack.push(left);
                    Rhs::Binary {
                        left: self.chart_node(left).category(),
                        right: self.chart_node(right).category(),
                        split: self.chart_node(right).span().start,
                    }
                }
                _ => {
                    let span = node.span();
                    Rhs::Lexical(self.forest.chart.span_text(span.start, span.len))
                }
            };
            out.push(Production {
                category: node.category(),
                span: node.span(),
                rhs,
            });
        }
        out
    }

    /// Write one production per line
    pub fn write_productions<W: fmt::Write>(
        &self,
        out: &mut W,
        categories: &CategoryTable,
    ) -> fmt::Result {
        for production in self.productions() {
            writeln!(out, "{}", production.display(categories))?;
        }
        Ok(())
    }

    /// Labelled bracketing such as `(S (NP john) (NP\S runs))`
    pub fn bracketed(&self, categories: &CategoryTable) -> String {
        let mut out = String::new();
        let mut stack = vec![Bracket::Open(self.root)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Bracket::Open(id) => id,
                Bracket::Close => {
                    out.push(')');
                    continue;
                }
            };
            if !out.is_empty() {
                out.push(' ');
            }
            let tree = self.tree(id);
            let node = self.chart_node(id);
            out.push('(');
            out.push_str(categories.name(node.category()));
            stack.push(Bracket::Close);
            match (tree.left, tree.right) {
                (Some(left), Some(right)) => {
                    stack.push(Bracket::Open(right));
                    stack.push(Bracket::Open(left));
                }
                _ => {
                    let span = node.span();
                    out.push(' ');
                    out.push_str(&self.forest.chart.span_text(span.start, span.len));
                }
            }
        }
        out
    }

    fn tree(&self, id: TreeId) -> &'a TreeNode {
        &self.forest.trees[id.index()]
    }

    fn chart_node(&self, id: TreeId) -> &'a ChartNode {
        self.forest.chart.node(self.tree(id).node)
    }
}
