//! Property tests over random small lexicons and utterances

use chartseg_core::simple::parse_simple_segments;
use chartseg_core::{
    count_derivations, enumerate_full, enumerate_full_tilings, enumerate_tilings, parse_segments,
    tokenize, Backlink, Chart, Lexicon, Production, Segmentation, SpanCombinator, TilingPolicy,
};
use proptest::prelude::*;

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ab]{1,3}", 0..6)
}

fn arb_utterance() -> impl Strategy<Value = String> {
    "[abc]{1,6}"
}

fn lattice(words: &[String], utterance: &str) -> Chart {
    let lexicon = Lexicon::from_words(words);
    parse_segments(&lexicon, &tokenize(utterance), &SpanCombinator::default())
}

fn cuts(tilings: &[Segmentation]) -> Vec<Vec<usize>> {
    tilings.iter().map(|s| s.boundaries().to_vec()).collect()
}

fn subset(small: &[Vec<usize>], large: &[Vec<usize>]) -> bool {
    small.iter().all(|b| large.contains(b))
}

proptest! {
    #[test]
    fn reinserting_is_idempotent(words in arb_words(), utterance in arb_utterance()) {
        let mut chart = lattice(&words, &utterance);
        let nodes = chart.node_count();
        let links = chart.backlink_count();

        let again: Vec<_> = chart
            .nodes()
            .iter()
            .map(|n| (n.span(), n.category(), n.is_lexical(), n.backlinks().to_vec()))
            .collect();
        for (span, category, lexical, backlinks) in again {
            let (i, j) = span.cell();
            if lexical {
                chart.add_or_merge(i, j, category, None);
            }
            for Backlink { left, right } in backlinks {
                chart.add_or_merge(i, j, category, Some(Backlink::new(left, right)));
            }
        }

        prop_assert_eq!(chart.node_count(), nodes);
        prop_assert_eq!(chart.backlink_count(), links);
    }

    #[test]
    fn packed_and_simple_agree(words in arb_words(), utterance in "[ab]{1,5}") {
        let lexicon = Lexicon::from_words(&words);
        let tokens = tokenize(&utterance);
        let combinator = SpanCombinator::default();
        let packed = parse_segments(&lexicon, &tokens, &combinator);
        let simple = parse_simple_segments(&lexicon, &tokens, &combinator);

        let derivations = enumerate_full(&packed);
        prop_assert_eq!(derivations.len(), simple.derivation_count());
        prop_assert_eq!(count_derivations(&packed), simple.derivation_count() as u128);

        let mut from_packed: Vec<Vec<Production>> =
            derivations.iter().map(|d| d.productions()).collect();
        let mut from_simple = simple.derivations();
        from_packed.sort();
        from_simple.sort();
        prop_assert_eq!(from_packed, from_simple);
    }

    #[test]
    fn tilings_round_trip(words in arb_words(), utterance in arb_utterance()) {
        let chart = lattice(&words, &utterance);
        for policy in TilingPolicy::VARIANTS {
            for seg in enumerate_tilings(&chart, policy) {
                prop_assert_eq!(seg.words(chart.tokens()).concat(), utterance.clone());
            }
        }
    }

    #[test]
    fn boundaries_strictly_increase(words in arb_words(), utterance in arb_utterance()) {
        let chart = lattice(&words, &utterance);
        let n = chart.size();
        for seg in enumerate_tilings(&chart, TilingPolicy::All) {
            let b = seg.boundaries();
            prop_assert!(b.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(b.iter().all(|&o| 0 < o && o < n));
            prop_assert!(Segmentation::from_boundaries(n, b.to_vec()).is_ok());
        }
    }

    #[test]
    fn policies_nest(words in arb_words(), utterance in arb_utterance()) {
        let chart = lattice(&words, &utterance);
        let all = cuts(&enumerate_tilings(&chart, TilingPolicy::All));
        let one = cuts(&enumerate_tilings(&chart, TilingPolicy::One));
        let both = cuts(&enumerate_tilings(&chart, TilingPolicy::BeginEnd));
        let begin = cuts(&enumerate_tilings(&chart, TilingPolicy::Begin));
        let end = cuts(&enumerate_tilings(&chart, TilingPolicy::End));
        let full = cuts(&enumerate_full_tilings(&chart));

        prop_assert!(!all.is_empty());
        prop_assert!(subset(&one, &all));
        prop_assert!(subset(&both, &one));
        prop_assert!(subset(&begin, &both));
        prop_assert!(subset(&end, &both));
        prop_assert!(subset(&full, &begin));
        prop_assert!(subset(&full, &end));
    }

    #[test]
    fn results_are_sorted(words in arb_words(), utterance in arb_utterance()) {
        let chart = lattice(&words, &utterance);
        let all = cuts(&enumerate_tilings(&chart, TilingPolicy::All));
        prop_assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
