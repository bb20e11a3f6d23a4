//! Text rendering of charts for debugging

use super::Chart;
use crate::category::CategoryTable;
use std::fmt;

/// Displays a packed chart as a table: the tokens, then one row per span
/// length listing `category:backlinks` for every node of every cell.
pub struct ChartDisplay<'a> {
    chart: &'a Chart,
    categories: &'a CategoryTable,
}

impl<'a> ChartDisplay<'a> {
    pub(super) fn new(chart: &'a Chart, categories: &'a CategoryTable) -> Self {
        Self { chart, categories }
    }
}

impl fmt::Display for ChartDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.chart.size();
        let rows: Vec<Vec<String>> = (0..size)
            .map(|i| {
                (0..size - i)
                    .map(|j| {
                        self.chart
                            .nodes_at(i, j)
                            .map(|(_, node)| {
                                format!(
                                    "{}:{}",
                                    self.categories.name(node.category()),
                                    node.backlinks().len()
                                )
                            })
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .collect()
            })
            .collect();
        write_table(f, self.chart.tokens(), &rows)
    }
}

/// Shared table layout for the packed and the reference chart.
pub(crate) fn write_table(
    f: &mut fmt::Formatter<'_>,
    tokens: &[String],
    rows: &[Vec<String>],
) -> fmt::Result {
    let width = tokens
        .iter()
        .chain(rows.iter().flatten())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    writeln!(f, "------ Chart:")?;
    for token in tokens {
        write!(f, "{token:<width$} |")?;
    }
    writeln!(f)?;
    for row in rows {
        for cell in row {
            write!(f, "{cell:<width$} |")?;
        }
        writeln!(f)?;
    }
    writeln!(f, "------ End of chart")
}
