//! Unpacked reference chart
//!
//! Every derivation of a category at a cell is its own node, so the top
//! cell lists each complete derivation separately. Node counts grow with
//! ambiguity; this chart is meant for small inputs and for checking the
//! packed chart's enumeration.

use crate::category::{CatId, CategoryTable};
use crate::chart::{write_table, Span};
use crate::combinator::Combinator;
use crate::derivation::{Production, Rhs};
use crate::error::ChartError;
use crate::lexicon::SpanLexicon;
use crate::parser::{fill_grammar, fill_segments, CellEntries, SpanChart};
use std::fmt;

/// Arena index of a node in a [`SimpleChart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimpleNodeId(u32);

impl SimpleNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => SimpleNodeId(raw),
            Err(_) => panic!("simple chart is limited to {} nodes", u32::MAX),
        }
    }
}

#[derive(Debug, Clone)]
struct SimpleNode {
    category: CatId,
    children: Option<(SimpleNodeId, SimpleNodeId)>,
    span: Span,
}

/// Chart keeping one node per derivation.
#[derive(Debug, Clone, Default)]
pub struct SimpleChart {
    size: usize,
    tokens: Vec<String>,
    cells: Vec<Vec<SimpleNodeId>>,
    nodes: Vec<SimpleNode>,
}

impl SpanChart for SimpleChart {
    type NodeRef = SimpleNodeId;

    fn size(&self) -> usize {
        self.size
    }

    fn set_token(&mut self, j: usize, token: String) {
        self.tokens[j] = token;
    }

    fn insert(
        &mut self,
        i: usize,
        j: usize,
        category: CatId,
        children: Option<(SimpleNodeId, SimpleNodeId)>,
    ) {
        let id = SimpleNodeId::from_index(self.nodes.len());
        self.nodes.push(SimpleNode {
            category,
            children,
            span: Span::new(j, i + 1),
        });
        let cell = self.cell_index(i, j);
        self.cells[cell].insert(0, id);
    }

    fn entries(&self, i: usize, j: usize) -> CellEntries<SimpleNodeId> {
        self.cells[self.cell_index(i, j)]
            .iter()
            .map(|&id| (id, self.nodes[id.index()].category))
            .collect()
    }
}

/// Parse `tokens` with a grammar lexicon into an unpacked chart.
pub fn parse_simple<L, C, T>(
    lexicon: &L,
    tokens: &[T],
    combinator: &C,
) -> Result<SimpleChart, ChartError>
where
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    let mut chart = SimpleChart::new(tokens.len());
    fill_grammar(&mut chart, lexicon, tokens, combinator)?;
    log::debug!(
        "simple chart over {} tokens: {} nodes, {} full derivations",
        chart.size,
        chart.node_count(),
        chart.derivation_count()
    );
    Ok(chart)
}

/// Build the unpacked segmentation lattice of `tokens`.
pub fn parse_simple_segments<L, C, T>(lexicon: &L, tokens: &[T], combinator: &C) -> SimpleChart
where
    L: SpanLexicon + ?Sized,
    C: Combinator + ?Sized,
    T: AsRef<str>,
{
    let mut chart = SimpleChart::new(tokens.len());
    fill_segments(&mut chart, lexicon, tokens, combinator);
    chart
}

impl SimpleChart {
    /// Create an empty chart for `size` tokens
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tokens: vec![String::new(); size],
            cells: vec![Vec::new(); size * (size + 1) / 2],
            nodes: Vec::new(),
        }
    }

    /// Number of input tokens
    pub fn size(&self) -> usize {
        self.size
    }

    /// Printable form of every token
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of nodes over all cells
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of complete derivations, one per node of the top cell
    pub fn derivation_count(&self) -> usize {
        self.top().len()
    }

    /// Productions of every complete derivation, in pre-order
    pub fn derivations(&self) -> Vec<Vec<Production>> {
        self.top().iter().map(|&root| self.productions(root)).collect()
    }

    /// Debugging table of category names per cell
    pub fn display<'a>(&'a self, categories: &'a CategoryTable) -> SimpleChartDisplay<'a> {
        SimpleChartDisplay {
            chart: self,
            categories,
        }
    }

    fn top(&self) -> &[SimpleNodeId] {
        if self.size == 0 {
            return &[];
        }
        &self.cells[self.cell_index(self.size - 1, 0)]
    }

    fn productions(&self, root: SimpleNodeId) -> Vec<Production> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            let rhs = match node.children {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                    let (left, right) = (&self.nodes[left.index()], &self.nodes[right.index()]);
                    Rhs::Binary {
                        left: left.category,
                        right: right.category,
                        split: right.span.start,
                    }
                }
                None => Rhs::Lexical(self.tokens[node.span.start..node.span.end()].concat()),
            };
            out.push(Production {
                category: node.category,
                span: node.span,
                rhs,
            });
        }
        out
    }

    fn cell_index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size - i,
            "cell ({i}, {j}) outside a chart of {} tokens",
            self.size
        );
        i * self.size - i * (i.saturating_sub(1)) / 2 + j
    }
}

/// [`fmt::Display`] adapter returned by [`SimpleChart::display`].
pub struct SimpleChartDisplay<'a> {
    chart: &'a SimpleChart,
    categories: &'a CategoryTable,
}

impl fmt::Display for SimpleChartDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.chart.size;
        let rows: Vec<Vec<String>> = (0..size)
            .map(|i| {
                (0..size - i)
                    .map(|j| {
                        self.chart.cells[self.chart.cell_index(i, j)]
                            .iter()
                            .map(|id| self.categories.name(self.chart.nodes[id.index()].category))
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .collect()
            })
            .collect();
        write_table(f, &self.chart.tokens, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::Application;
    use crate::derivation::enumerate_full;
    use crate::lexicon::Lexicon;
    use crate::parser::parse;

    #[test]
    fn test_simple_matches_packed() {
        let lexicon: Lexicon = "n := N\np := (N\\N)/N".parse().unwrap();
        let app = Application::new(lexicon.categories());
        let tokens = ["n", "p", "n", "p", "n", "p", "n"];

        let simple = parse_simple(&lexicon, &tokens, &app).unwrap();
        let packed = parse(&lexicon, &tokens, &app).unwrap();
        let derivations = enumerate_full(&packed);

        // Catalan(3): three modifiers attach in five ways
        assert_eq!(simple.derivation_count(), 5);
        assert_eq!(derivations.len(), 5);
        assert!(simple.node_count() > packed.node_count());

        let mut from_simple = simple.derivations();
        let mut from_packed: Vec<Vec<Production>> =
            derivations.iter().map(|d| d.productions()).collect();
        from_simple.sort();
        from_packed.sort();
        assert_eq!(from_simple, from_packed);
    }

    #[test]
    fn test_simple_unknown_token() {
        let lexicon: Lexicon = "a := X".parse().unwrap();
        let app = Application::new(lexicon.categories());
        assert!(matches!(
            parse_simple(&lexicon, &["a", "b"], &app),
            Err(ChartError::UnknownToken { position: 1, .. })
        ));
    }

    #[test]
    fn test_simple_display() {
        let lexicon: Lexicon = "a := X\nb := X\\Y".parse().unwrap();
        let app = Application::new(lexicon.categories());
        let chart = parse_simple(&lexicon, &["a", "b"], &app).unwrap();
        let rendered = chart.display(lexicon.categories()).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "a   |b   |");
        assert_eq!(lines[2], "X   |X\\Y |");
        assert_eq!(lines[3], "Y   |");
    }

    #[test]
    fn test_empty_simple_chart() {
        let chart = SimpleChart::new(0);
        assert_eq!(chart.derivation_count(), 0);
        assert!(chart.derivations().is_empty());
    }
}
