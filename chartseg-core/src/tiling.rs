//! Enumeration of utterance tilings over a segmentation lattice
//!
//! A tiling covers `[0, N)` with adjacent segments. Lexical segments come
//! from lexical chart nodes. Where no lexical span starts at the current
//! edge, a lenient [`TilingPolicy`] may bridge the gap with a tentative
//! segment; consecutive unrecognized tokens share one tentative segment.
//!
//! Partial tilings are explored depth first with an explicit stack, and a
//! partial state the policy already rejects is dropped immediately. A
//! rejected state stays rejected under every extension: segments are only
//! appended, and a trailing gap only grows.

use crate::chart::{Chart, Span};
use crate::error::{Error, SegmentationError};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where tentative segments may appear in an emitted tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TilingPolicy {
    /// Any number of tentative segments anywhere
    #[default]
    All,
    /// At most one tentative segment
    One,
    /// A tentative segment only at the start
    Begin,
    /// A tentative segment only at the end
    End,
    /// At most one tentative segment, at the start or at the end
    BeginEnd,
}

impl TilingPolicy {
    /// Every policy, most lenient first
    pub const VARIANTS: [TilingPolicy; 5] = [
        TilingPolicy::All,
        TilingPolicy::One,
        TilingPolicy::BeginEnd,
        TilingPolicy::Begin,
        TilingPolicy::End,
    ];

    /// Name accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            TilingPolicy::All => "all",
            TilingPolicy::One => "one",
            TilingPolicy::Begin => "begin",
            TilingPolicy::End => "end",
            TilingPolicy::BeginEnd => "beginend",
        }
    }

    /// One-line description for help output
    pub fn description(&self) -> &'static str {
        match self {
            TilingPolicy::All => "gaps may be bridged anywhere",
            TilingPolicy::One => "at most one bridged gap",
            TilingPolicy::Begin => "only a gap at the start may be bridged",
            TilingPolicy::End => "only a gap at the end may be bridged",
            TilingPolicy::BeginEnd => "one bridged gap, at the start or at the end",
        }
    }

    /// True when a tiling whose segments so far are `segments` is allowed
    pub fn admits(&self, segments: &[SegmentBoundary]) -> bool {
        let last = segments.len().saturating_sub(1);
        let mut tentative = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_tentative())
            .map(|(k, _)| k);

        match self {
            TilingPolicy::All => true,
            TilingPolicy::One => tentative.nth(1).is_none(),
            TilingPolicy::Begin => tentative.all(|k| k == 0),
            TilingPolicy::End => tentative.all(|k| k == last),
            TilingPolicy::BeginEnd => match (tentative.next(), tentative.next()) {
                (None, _) => true,
                (Some(k), None) => k == 0 || k == last,
                (Some(_), Some(_)) => false,
            },
        }
    }
}

impl fmt::Display for TilingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TilingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TilingPolicy::All),
            "one" => Ok(TilingPolicy::One),
            "begin" => Ok(TilingPolicy::Begin),
            "end" => Ok(TilingPolicy::End),
            "beginend" | "begin-end" => Ok(TilingPolicy::BeginEnd),
            other => Err(Error::Config(format!("unknown tiling policy `{other}`"))),
        }
    }
}

/// Right edge of a placed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentBoundary {
    /// The segment is a lexical span
    Confirmed(usize),
    /// The segment bridges tokens no lexical span starts at
    Tentative(usize),
}

impl SegmentBoundary {
    /// Token offset of the edge
    pub fn offset(&self) -> usize {
        match *self {
            SegmentBoundary::Confirmed(o) | SegmentBoundary::Tentative(o) => o,
        }
    }

    /// True for a gap-bridging segment
    pub fn is_tentative(&self) -> bool {
        matches!(self, SegmentBoundary::Tentative(_))
    }
}

/// Segments placed so far, left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialTiling {
    segments: Vec<SegmentBoundary>,
}

impl PartialTiling {
    /// Right edges of the placed segments
    pub fn segments(&self) -> &[SegmentBoundary] {
        &self.segments
    }

    /// Offset the next segment starts at
    pub fn edge(&self) -> usize {
        self.segments.last().map_or(0, SegmentBoundary::offset)
    }

    /// Number of tentative segments
    pub fn tentative_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_tentative()).count()
    }

    fn with_word(&self, end: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(SegmentBoundary::Confirmed(end));
        next
    }

    /// Bridge one more token, growing the last segment if it is a gap.
    fn with_gap(&self) -> Self {
        let mut next = self.clone();
        let end = self.edge() + 1;
        if let Some(last) = next.segments.last_mut().filter(|s| s.is_tentative()) {
            *last = SegmentBoundary::Tentative(end);
        } else {
            next.segments.push(SegmentBoundary::Tentative(end));
        }
        next
    }

    fn into_segmentation(self, length: usize) -> Segmentation {
        let count = self.segments.len();
        Segmentation {
            boundaries: self.segments[..count.saturating_sub(1)]
                .iter()
                .map(SegmentBoundary::offset)
                .collect(),
            length,
            tentative: self.segments.iter().map(SegmentBoundary::is_tentative).collect(),
        }
    }
}

/// A complete tiling of an utterance.
///
/// `boundaries` are the interior cut points, strictly increasing within
/// `(0, length)`; the tiling has `boundaries.len() + 1` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segmentation {
    boundaries: Vec<usize>,
    length: usize,
    tentative: Vec<bool>,
}

impl Segmentation {
    /// Build a segmentation of `length` tokens from its cut points; all
    /// segments are marked lexical.
    pub fn from_boundaries(
        length: usize,
        boundaries: Vec<usize>,
    ) -> Result<Self, SegmentationError> {
        let mut previous = 0;
        for &offset in &boundaries {
            if offset == 0 || offset >= length {
                return Err(SegmentationError::OutOfRange { offset, length });
            }
            if offset <= previous {
                return Err(SegmentationError::NotIncreasing { offset });
            }
            previous = offset;
        }
        let tentative = vec![false; boundaries.len() + 1];
        Ok(Self {
            boundaries,
            length,
            tentative,
        })
    }

    /// Replace the per-segment tentative flags
    pub fn with_tentative(mut self, flags: Vec<bool>) -> Result<Self, SegmentationError> {
        if flags.len() != self.segment_count() {
            return Err(SegmentationError::FlagCount {
                expected: self.segment_count(),
                actual: flags.len(),
            });
        }
        self.tentative = flags;
        Ok(self)
    }

    /// Interior cut points
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Number of tokens covered
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// Segments as spans, left to right
    pub fn segments(&self) -> impl Iterator<Item = Span> + '_ {
        let starts = std::iter::once(0).chain(self.boundaries.iter().copied());
        let ends = self
            .boundaries
            .iter()
            .copied()
            .chain(std::iter::once(self.length));
        starts
            .zip(ends)
            .map(|(start, end)| Span::new(start, end - start))
    }

    /// True when segment `k` bridges a gap
    pub fn is_tentative(&self, k: usize) -> bool {
        self.tentative.get(k).copied().unwrap_or(false)
    }

    /// Number of tentative segments
    pub fn tentative_count(&self) -> usize {
        self.tentative.iter().filter(|&&t| t).count()
    }

    /// True when the tiling cuts right before token `pos`
    pub fn has_boundary(&self, pos: usize) -> bool {
        self.boundaries.binary_search(&pos).is_ok()
    }

    /// Surface string of every segment
    pub fn words<T: AsRef<str>>(&self, tokens: &[T]) -> Vec<String> {
        self.segments()
            .map(|span| {
                tokens[span.start..span.end()]
                    .iter()
                    .map(AsRef::as_ref)
                    .collect()
            })
            .collect()
    }

    /// Words joined by single spaces
    pub fn text<T: AsRef<str>>(&self, tokens: &[T]) -> String {
        self.words(tokens).join(" ")
    }
}

/// Tilings of the whole chart by lexical spans only.
pub fn enumerate_full_tilings(chart: &Chart) -> Vec<Segmentation> {
    tile(chart, None)
}

/// Tilings of the whole chart, bridging gaps as `policy` allows.
pub fn enumerate_tilings(chart: &Chart, policy: TilingPolicy) -> Vec<Segmentation> {
    tile(chart, Some(policy))
}

fn tile(chart: &Chart, policy: Option<TilingPolicy>) -> Vec<Segmentation> {
    let n = chart.size();
    let mut out = Vec::new();
    if n == 0 {
        return out;
    }

    let admits = |state: &PartialTiling| policy.map_or(true, |p| p.admits(state.segments()));
    let mut stack = vec![PartialTiling::default()];
    let mut explored = 0usize;

    while let Some(state) = stack.pop() {
        explored += 1;
        let edge = state.edge();
        if edge == n {
            out.push(state.into_segmentation(n));
            continue;
        }

        let mut lexical = false;
        for len in chart.lexical_lengths_from(edge) {
            lexical = true;
            let next = state.with_word(edge + len);
            if admits(&next) {
                stack.push(next);
            }
        }
        if !lexical && policy.is_some() {
            let next = state.with_gap();
            if admits(&next) {
                stack.push(next);
            }
        }
    }

    out.sort_by(|a, b| a.boundaries.cmp(&b.boundaries));
    log::debug!(
        "{} tilings of {} tokens ({} partial states, policy {})",
        out.len(),
        n,
        explored,
        policy.map_or("none", |p| p.as_str())
    );
    out
}
