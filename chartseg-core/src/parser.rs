//! Bottom-up chart parser over span lattices
//!
//! The dynamic-programming fill is written once against the [`SpanChart`]
//! store trait and shared by the packed [`Chart`] and the unpacked
//! [`SimpleChart`](crate::simple::SimpleChart).
//!
//! Two seeding modes exist:
//! - grammar parsing seeds only single tokens, and every token must be known
//!   to the lexicon;
//! - the segmentation lattice looks up every sub-span of the input, since any
//!   substring may be a word, and never fails.

use crate::category::CatId;
use crate::chart::{Backlink, Chart, NodeId};
use crate::combinator::{Combinator, SpanCombinator};
use crate::error::ChartError;
use crate::lexicon::SpanLexicon;
use smallvec::SmallVec;

/// Node list of one cell as seen by the parser
pub type CellEntries<R> = SmallVec<[(R, CatId); 4]>;

/// Storage the span DP writes into.
pub trait SpanChart {
    /// Handle to a stored analysis
    type NodeRef: Copy;

    /// Number of tokens the chart covers
    fn size(&self) -> usize;

    /// Record the printable form of token `j`
    fn set_token(&mut self, j: usize, token: String);

    /// Store `category` at cell `(i, j)`, derived from `children` or lexical
    fn insert(
        &mut self,
        i: usize,
        j: usize,
        category: CatId,
        children: Option<(Self::NodeRef, Self::NodeRef)>,
    );

    /// Analyses currently stored at cell `(i, j)`
    fn entries(&self, i: usize, j: usize) -> CellEntries<Self::NodeRef>;
}

impl SpanChart for Chart {
    type NodeRef = NodeId;

    fn size(&self) -> usize {
        Chart::size(self)
    }

    fn set_token(&mut self, j: usize, token: String) {
        Chart::set_token(self, j, token);
    }

    fn insert(&mut self, i: usize, j: usize, category: CatId, children: Option<(NodeId, NodeId)>) {
        self.add_or_merge(i, j, category, children.map(|(l, r)| Backlink::new(l, r)));
    }

    fn entries(&self, i: usize, j: usize) -> CellEntries<NodeId> {
        self.nodes_at(i, j)
            .map(|(id, node)| (id, node.category()))
            .collect()
    }
}

/// Split an utterance into one token per character, dropping whitespace.
pub fn tokenize(utterance: &str) -> Vec<String> {
    utterance
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect()
}

/// Parse a token sequence with a grammar lexicon into a packed chart.
///
/// Every token must have at least one lexicon entry; the first unknown token
/// aborts the parse.
pub fn parse<L, C, T>(lexicon: &L, tokens: &[T], combinator: &C) -> Result<Chart, ChartError>
where
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    let mut chart = Chart::new(tokens.len());
    fill_grammar(&mut chart, lexicon, tokens, combinator)?;
    log::debug!(
        "parsed {} tokens: {} nodes, {} backlinks, {} full analyses",
        chart.size(),
        chart.node_count(),
        chart.backlink_count(),
        chart.top().len()
    );
    Ok(chart)
}

/// Build the segmentation lattice of `tokens`: every sub-span recognized by
/// the lexicon is seeded, and adjacent spans combine with `combinator`.
pub fn parse_segments<L, C, T>(lexicon: &L, tokens: &[T], combinator: &C) -> Chart
where
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    let mut chart = Chart::new(tokens.len());
    fill_segments(&mut chart, lexicon, tokens, combinator);
    log::debug!(
        "segment lattice over {} tokens: {} nodes, {} backlinks",
        chart.size(),
        chart.node_count(),
        chart.backlink_count()
    );
    chart
}

/// [`parse_segments`] with the default [`SpanCombinator`].
pub fn segment_lattice<L, T>(lexicon: &L, tokens: &[T]) -> Chart
where
    L: SpanLexicon + ?Sized,
    T: AsRef<str>,
{
    parse_segments(lexicon, tokens, &SpanCombinator::default())
}

/// Grammar-mode DP fill: seed single tokens, then combine spans of
/// increasing length.
pub(crate) fn fill_grammar<S, L, C, T>(
    chart: &mut S,
    lexicon: &L,
    tokens: &[T],
    combinator: &C,
) -> Result<(), ChartError>
where
    S: SpanChart,
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    if tokens.is_empty() {
        return Err(ChartError::EmptyInput);
    }

    for (j, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let entries = lexicon.lookup(token);
        if entries.is_empty() {
            return Err(ChartError::UnknownToken {
                token: token.to_string(),
                position: j,
            });
        }
        chart.set_token(j, token.to_string());
        for entry in entries {
            chart.insert(0, j, entry.category, None);
        }
    }

    let n = tokens.len();
    for i in 1..n {
        for j in 0..n - i {
            combine_cell(chart, i, j, combinator);
        }
    }
    Ok(())
}

/// Lattice-mode DP fill: each cell is looked up in the lexicon before the
/// spans below it are combined into it.
pub(crate) fn fill_segments<S, L, C, T>(chart: &mut S, lexicon: &L, tokens: &[T], combinator: &C)
where
    S: SpanChart,
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    let n = tokens.len();
    let mut text = String::new();
    let mut offsets = Vec::with_capacity(n + 1);
    offsets.push(0);
    for (j, token) in tokens.iter().enumerate() {
        text.push_str(token.as_ref());
        offsets.push(text.len());
        chart.set_token(j, token.as_ref().to_string());
    }

    for i in 0..n {
        for j in 0..n - i {
            let surface = &text[offsets[j]..offsets[j + i + 1]];
            for entry in lexicon.lookup(surface) {
                chart.insert(i, j, entry.category, None);
            }
            combine_cell(chart, i, j, combinator);
        }
    }
}

/// Try every split point of cell `(i, j)` and every pair of analyses of the
/// two halves.
fn combine_cell<S, C>(chart: &mut S, i: usize, j: usize, combinator: &C)
where
    S: SpanChart,
    C: Combinator + ?Sized,
{
    for k in 1..=i {
        let left = chart.entries(k - 1, j);
        let right = chart.entries(i - k, j + k);
        for &(l, left_cat) in &left {
            for &(r, right_cat) in &right {
                if let Some(result) = combinator.combine(left_cat, right_cat) {
                    chart.insert(i, j, result, Some((l, r)));
                }
            }
        }
    }
    log::trace!("filled cell ({i}, {j})");
}
