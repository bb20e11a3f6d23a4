//! Integration tests for grammar parsing and derivation enumeration

use chartseg_core::simple::parse_simple;
use chartseg_core::{
    count_derivations, enumerate_full, parse, Application, ChartError, GrammarParser, Lexicon,
    Production,
};

const GRAMMAR: &str = "\
; toy grammar with a prepositional attachment ambiguity
i := NP
saw := (NP\\S)/NP : see'
the := NP/N
man := N
telescope := N
with := (N\\N)/NP
with := ((NP\\S)\\(NP\\S))/NP
";

fn grammar() -> Lexicon {
    GRAMMAR.parse().unwrap()
}

fn sentence(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

#[test]
fn test_attachment_ambiguity() {
    let lexicon = grammar();
    let app = Application::new(lexicon.categories());
    let tokens = sentence("i saw the man with the telescope");

    let chart = parse(&lexicon, &tokens, &app).unwrap();
    let s = lexicon.categories().lookup("S").unwrap();
    assert_eq!(chart.top().len(), 1);
    assert_eq!(chart.node(chart.top()[0]).category(), s);

    let derivations = enumerate_full(&chart);
    assert_eq!(derivations.len(), 2);
    assert_eq!(count_derivations(&chart), 2);

    let mut brackets: Vec<String> = derivations
        .iter()
        .map(|d| d.bracketed(lexicon.categories()))
        .collect();
    brackets.sort();
    assert_ne!(brackets[0], brackets[1]);
    for b in &brackets {
        assert!(b.starts_with("(S (NP i) (NP\\S "));
    }
}

#[test]
fn test_packed_and_simple_agree() {
    let lexicon = grammar();
    let app = Application::new(lexicon.categories());
    let inputs = [
        "i saw the man",
        "i saw the man with the telescope",
        "i saw the man with the man with the telescope",
    ];

    for input in inputs {
        let tokens = sentence(input);
        let packed = parse(&lexicon, &tokens, &app).unwrap();
        let simple = parse_simple(&lexicon, &tokens, &app).unwrap();

        let mut from_packed: Vec<Vec<Production>> = enumerate_full(&packed)
            .iter()
            .map(|d| d.productions())
            .collect();
        let mut from_simple = simple.derivations();
        from_packed.sort();
        from_simple.sort();

        assert_eq!(from_packed.len(), simple.derivation_count(), "{input}");
        assert_eq!(from_packed, from_simple, "{input}");
        assert_eq!(
            count_derivations(&packed),
            simple.derivation_count() as u128
        );
    }
}

#[test]
fn test_production_listing() {
    let lexicon = grammar();
    let parser = GrammarParser::new(&lexicon);
    let output = parser.parse_sentence("i saw the man").unwrap();

    let derivations = output.derivations();
    let mut listing = String::new();
    derivations
        .get(0)
        .unwrap()
        .write_productions(&mut listing, lexicon.categories())
        .unwrap();

    let expected = "\
S -> NP NP\\S
NP -> i
NP\\S -> (NP\\S)/NP NP
(NP\\S)/NP -> saw
NP -> NP/N N
NP/N -> the
N -> man
";
    assert_eq!(listing, expected);
}

#[test]
fn test_unknown_token_reported_with_position() {
    let lexicon = grammar();
    let parser = GrammarParser::new(&lexicon);
    let err = parser.parse_sentence("i saw a man").unwrap_err();
    assert_eq!(
        err,
        ChartError::UnknownToken {
            token: "a".to_string(),
            position: 2
        }
    );
}

#[test]
fn test_no_derivation_is_empty() {
    let lexicon = grammar();
    let parser = GrammarParser::new(&lexicon);
    let output = parser.parse_sentence("the man saw").unwrap();
    assert_eq!(output.derivation_count, 0);
    assert!(output.derivations().is_empty());
}

#[test]
fn test_chart_display_has_every_row() {
    let lexicon = grammar();
    let app = Application::new(lexicon.categories());
    let chart = parse(&lexicon, &sentence("i saw the man"), &app).unwrap();
    let rendered = chart.display(lexicon.categories()).to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    // header, tokens, four span lengths, footer
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("i "));
    assert!(lines[5].starts_with("S:1"));
}

#[test]
fn test_backward_functor_takes_argument_on_its_left() {
    let lexicon: Lexicon = "a := X\nb := X\\Y".parse().unwrap();
    let parser = GrammarParser::new(&lexicon);
    let output = parser.parse(&["a", "b"]).unwrap();

    let derivations = output.derivations();
    assert_eq!(derivations.len(), 1);
    let d = derivations.get(0).unwrap();
    assert_eq!(lexicon.categories().name(d.category()), "Y");
    assert_eq!((d.span().start, d.span().len), (0, 2));

    // the functor alone on the left does not apply
    assert!(parser.parse(&["b", "a"]).unwrap().derivations().is_empty());
}

#[test]
fn test_nested_attachment_enumeration_finishes() {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let lexicon: Lexicon = "n := N\np := (N\\N)/N".parse().unwrap();
        let app = Application::new(lexicon.categories());
        let chart = parse(&lexicon, &sentence("n p n p n p n p n"), &app).unwrap();
        let derivations = enumerate_full(&chart);
        let mut distinct: Vec<Vec<Production>> =
            derivations.iter().map(|d| d.productions()).collect();
        distinct.sort();
        distinct.dedup();
        let _ = tx.send((derivations.len(), distinct.len(), count_derivations(&chart)));
    });

    let (found, distinct, counted) = rx
        .recv_timeout(std::time::Duration::from_secs(20))
        .expect("derivation enumeration did not finish");
    // Catalan(4): four modifiers attach in fourteen ways
    assert_eq!(found, 14);
    assert_eq!(distinct, 14);
    assert_eq!(counted, 14);
}
