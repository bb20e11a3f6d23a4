//! Integration tests for lexicon-driven segmentation

use chartseg_core::{
    enumerate_full_tilings, enumerate_tilings, segment_lattice, tokenize, Lexicon,
    LexiconSegmenter, SegmenterConfig, TilingPolicy,
};

fn boundaries(lexicon: &Lexicon, utterance: &str, policy: TilingPolicy) -> Vec<Vec<usize>> {
    let chart = segment_lattice(lexicon, &tokenize(utterance));
    enumerate_tilings(&chart, policy)
        .iter()
        .map(|s| s.boundaries().to_vec())
        .collect()
}

#[test]
fn test_three_tilings_of_abc() {
    let lexicon = Lexicon::from_words(["a", "b", "c", "ab", "bc"]);
    assert_eq!(
        boundaries(&lexicon, "abc", TilingPolicy::All),
        vec![vec![1], vec![1, 2], vec![2]]
    );
}

#[test]
fn test_whole_utterance_word() {
    let lexicon = Lexicon::from_words(["abc", "a", "bc"]);
    let chart = segment_lattice(&lexicon, &tokenize("abc"));
    let tilings = enumerate_full_tilings(&chart);
    assert_eq!(tilings.len(), 2);
    assert!(tilings[0].boundaries().is_empty());
    assert_eq!(tilings[0].segment_count(), 1);
    assert_eq!(tilings[1].boundaries(), &[1]);
}

#[test]
fn test_policies_on_unknown_prefix_and_suffix() {
    let lexicon = Lexicon::from_words(["do", "g", "dog"]);

    // unknown prefix "the"
    assert_eq!(
        boundaries(&lexicon, "thedog", TilingPolicy::Begin),
        vec![vec![3], vec![3, 5]]
    );
    assert!(boundaries(&lexicon, "thedog", TilingPolicy::End).is_empty());

    // unknown suffix "s"
    assert_eq!(
        boundaries(&lexicon, "dogs", TilingPolicy::End),
        vec![vec![2, 3], vec![3]]
    );
    assert!(boundaries(&lexicon, "dogs", TilingPolicy::Begin).is_empty());

    // both: only the lenient policies survive
    assert_eq!(boundaries(&lexicon, "thedogs", TilingPolicy::All).len(), 2);
    assert!(boundaries(&lexicon, "thedogs", TilingPolicy::One).is_empty());
    assert!(boundaries(&lexicon, "thedogs", TilingPolicy::BeginEnd).is_empty());
}

#[test]
fn test_policy_inclusions() {
    let lexicon = Lexicon::from_words(["a", "ab", "ba", "b"]);
    for utterance in ["abxab", "xabab", "ababx", "xabx", "abab"] {
        let all = boundaries(&lexicon, utterance, TilingPolicy::All);
        let one = boundaries(&lexicon, utterance, TilingPolicy::One);
        let both = boundaries(&lexicon, utterance, TilingPolicy::BeginEnd);
        let begin = boundaries(&lexicon, utterance, TilingPolicy::Begin);
        let end = boundaries(&lexicon, utterance, TilingPolicy::End);

        assert!(one.iter().all(|b| all.contains(b)), "{utterance}");
        assert!(both.iter().all(|b| one.contains(b)), "{utterance}");
        assert!(begin.iter().all(|b| both.contains(b)), "{utterance}");
        assert!(end.iter().all(|b| both.contains(b)), "{utterance}");
    }
}

#[test]
fn test_segmenter_round_trip() {
    let lexicon = Lexicon::from_words(["you", "want", "to", "see", "the", "book", "a"]);
    let segmenter = LexiconSegmenter::new(&lexicon);

    for utterance in ["youwanttoseethebook", "youwantabook", "seethebookq"] {
        let output = segmenter.segment(utterance);
        assert!(!output.is_empty(), "{utterance}");
        for seg in &output.segmentations {
            assert_eq!(seg.words(&output.tokens).concat(), utterance);
        }
    }

    let output = segmenter.segment("you want to see the book");
    assert_eq!(output.texts(), vec!["you want to see the book"]);
}

#[test]
fn test_lexical_only_configuration() {
    let lexicon = Lexicon::from_words(["ab", "c"]);
    let config = SegmenterConfig::builder()
        .policy_name("none")
        .unwrap()
        .build()
        .unwrap();
    let segmenter = LexiconSegmenter::with_config(lexicon, config);

    assert_eq!(segmenter.segment("abc").texts(), vec!["ab c"]);
    assert!(segmenter.segment("abcd").is_empty());
}

#[test]
fn test_lexicon_file_format() {
    let text = "\
; words with frequencies
ab := x : : 4
c
c
";
    let lexicon: Lexicon = text.parse().unwrap();
    assert_eq!(lexicon.frequency("ab"), 4);
    assert_eq!(lexicon.frequency("c"), 2);

    let chart = segment_lattice(&lexicon, &tokenize("abc"));
    let tilings = enumerate_full_tilings(&chart);
    assert_eq!(tilings.len(), 1);
    assert_eq!(tilings[0].text(chart.tokens()), "ab c");
}
