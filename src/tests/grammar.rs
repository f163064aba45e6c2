use super::*;
use crate::tests::{re, seq, toks};

#[test]
fn terms_store_whole_token_anchoring() {
    assert_eq!(Term::new("[ab]+").unwrap().source(), "^(?:[ab]+)$");
    assert_eq!(Term::new("^[ab]+$").unwrap().source(), "^(?:[ab]+)$");
    assert_eq!(Term::new("^[ab]+").unwrap().source(), "^(?:[ab]+)$");
    assert_eq!(Term::new("[ab]+$").unwrap().source(), "^(?:[ab]+)$");
}

#[test]
fn escaped_dollar_is_not_an_anchor() {
    assert_eq!(Term::new(r"a\$").unwrap().source(), r"^(?:a\$)$");
    // an escaped backslash before the dollar leaves the anchor live
    assert_eq!(Term::new(r"a\\$").unwrap().source(), r"^(?:a\\)$");
}

#[test]
fn term_equality_goes_by_anchored_source() {
    let a = Term::new("x+").unwrap();
    let b = Term::new("^x+$").unwrap();
    let c = Term::new("y").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn terms_match_whole_tokens_only() {
    let t = Term::new("[0-9]+").unwrap();
    assert!(t.matches(&Value::from("123")));
    assert!(!t.matches(&Value::from("12a")));
    assert!(!t.matches(&Value::from("a12")));
}

#[test]
fn rule_spec_from_str_splits_on_spaces() {
    let spec = RuleSpec::from("A B C");
    assert_eq!(spec.0.len(), 3);
    assert!(matches!(&spec.0[0], Symbol::NonTerm(n) if n.name() == "A"));
    assert!(matches!(&spec.0[2], Symbol::NonTerm(n) if n.name() == "C"));
    // repeated spaces do not make empty names
    assert_eq!(RuleSpec::from("A  B").0.len(), 2);
}

#[test]
fn empty_rule_spec_is_epsilon() {
    assert_eq!(RuleSpec::from("").0.len(), 0);
}

#[test]
fn rules_accumulate_in_insertion_order() {
    let mut g = Grammar::new("S");
    g.add_rule("S", "A")
        .add_rule("A", re("x"))
        .add_rule("S", "B")
        .add_rule("B", re("y"));
    let order: Vec<&str> = g.iter_rules().map(|(lhs, _)| lhs).collect();
    assert_eq!(order, ["S", "A", "B"]);
    assert_eq!(g.productions("S").unwrap().len(), 2);
    assert!(g.productions("Z").is_none());
}

#[test]
fn display_renders_productions() {
    let mut g = Grammar::new("S");
    g.add_rule("S", seq(vec!["S".into(), re(r"\+").into(), "T".into()]))
        .add_rule("S", "T")
        .add_rule("T", re("[0-9]+"))
        .add_rule("E", "");
    let shown = g.to_string();
    assert_eq!(
        shown,
        "S -> S /^(?:\\+)$/ T | T\nT -> /^(?:[0-9]+)$/\nE -> ''\n"
    );
}

#[test]
fn anchored_and_bare_patterns_parse_identically() {
    let mut bare = Grammar::new("T");
    bare.add_rule("T", re("x+"));
    let mut anchored = Grammar::new("T");
    anchored.add_rule("T", re("^x+$"));
    let input = toks(&["xx"]);
    assert_eq!(
        bare.parse(input.clone()).unwrap(),
        anchored.parse(input).unwrap()
    );
}

#[test]
fn text_without_tokenizer_is_consumed_per_character() {
    let mut g = Grammar::new("S");
    g.add_rule("S", seq(vec![re("a").into(), re("b").into()]));
    g.options_mut().collapse_branches = true;
    let trees = g.parse("ab").unwrap();
    assert_eq!(
        trees,
        [Value::List(vec!["a".into(), "b".into()])]
    );
    assert!(g.parse("ba").unwrap().is_empty());
}

#[test]
fn parse_with_overrides_the_grammar_defaults() {
    let mut g = Grammar::new("S");
    g.add_rule("S", re("x"));
    let mut opts = g.options().clone();
    opts.add_categories = true;
    let plain = g.parse(toks(&["x"])).unwrap();
    let labeled = g.parse_with(toks(&["x"]), &opts).unwrap();
    assert_eq!(plain, [Value::List(vec!["x".into()])]);
    assert_eq!(
        labeled,
        [Value::List(vec!["S".into(), "x".into()])]
    );
}

#[test]
fn tokenizer_failure_yields_no_parses() {
    let mut g = Grammar::new("S");
    g.add_rule("S", re("[a-z]+"));
    let mut t = Tokenizer::new();
    t.add_type("[a-z]+", crate::Formatter::Identity).unwrap();
    g.options_mut().tokenizer = Some(t);
    assert_eq!(g.parse("abc").unwrap().len(), 1);
    assert_eq!(g.parse("ab!").unwrap().len(), 0);
}
