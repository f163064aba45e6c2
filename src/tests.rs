//! Shared test fixtures, plus cross-cutting properties that quantify over
//! generated inputs.

use proptest::prelude::*;
use regex::Regex;

use crate::{Grammar, RuleSpec, Symbol, Value};

pub(crate) fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

pub(crate) fn seq(symbols: Vec<Symbol>) -> RuleSpec {
    RuleSpec::from(symbols)
}

pub(crate) fn toks(parts: &[&str]) -> Vec<Value> {
    parts.iter().copied().map(Value::from).collect()
}

pub(crate) fn rendered(trees: &[Value]) -> Vec<String> {
    trees.iter().map(|t| t.to_string()).collect()
}

/// P -> S; S -> S '+' M | M; M -> M '*' T | T; T -> integer
pub(crate) fn arith_grammar() -> Grammar {
    let mut g = Grammar::new("P");
    g.add_rule("P", "S")
        .add_rule("S", seq(vec!["S".into(), re(r"\+").into(), "M".into()]))
        .add_rule("S", "M")
        .add_rule("M", seq(vec!["M".into(), re(r"\*").into(), "T".into()]))
        .add_rule("M", "T")
        .add_rule("T", re("-?[0-9]+"));
    g
}

/// S -> S S | letter. Catalan-ambiguous for three or more tokens.
pub(crate) fn juxtaposition_grammar() -> Grammar {
    let mut g = Grammar::new("S");
    g.add_rule("S", "S S").add_rule("S", re("[ab]"));
    g.options_mut().collapse_branches = true;
    g
}

fn set_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| b.iter().any(|y| x.structural_eq(y)))
        && b.iter().all(|y| a.iter().any(|x| x.structural_eq(y)))
}

proptest! {
    /// Nested parens are unambiguous: any character string has at most one
    /// parse. Exercises the scannerless path (text input, no tokenizer)
    /// and the epsilon rule.
    #[test]
    fn unambiguous_grammar_yields_at_most_one_parse(input in "[()]{0,10}") {
        let mut g = Grammar::new("P");
        g.add_rule("P", seq(vec![re(r"\(").into(), "P".into(), re(r"\)").into()]))
            .add_rule("P", "");
        let trees = g.parse(input.as_str()).unwrap();
        prop_assert!(trees.len() <= 1, "{} parses for {:?}", trees.len(), input);
    }

    /// With identity formatters and token types covering every character
    /// class, the concatenation of the emitted tokens reconstructs the
    /// input exactly.
    #[test]
    fn tokenization_reconstructs_input(input in "[a-z0-9 .,+*-]{0,40}") {
        let mut t = crate::Tokenizer::new();
        t.add_type("[a-z]+", crate::Formatter::Identity).unwrap();
        t.add_type("[0-9]+", crate::Formatter::Identity).unwrap();
        t.add_type(r"\s+", crate::Formatter::Identity).unwrap();
        t.add_type(r"[^a-z0-9\s]+", crate::Formatter::Identity).unwrap();
        let tokens = t.tokenize(&input).unwrap();
        let mut rebuilt = String::new();
        for tok in &tokens {
            match tok {
                Value::Str(s) => rebuilt.push_str(s),
                other => prop_assert!(false, "unexpected token {:?}", other),
            }
        }
        prop_assert_eq!(rebuilt, input);
    }

    /// Reordering the alternatives of one lhs may permute the results but
    /// never changes the result set.
    #[test]
    fn alternative_order_changes_order_not_set(letters in proptest::collection::vec("[ab]", 1..6)) {
        let input: Vec<Value> = letters.iter().map(|s| Value::from(s.as_str())).collect();

        let forward = juxtaposition_grammar();

        let mut reversed = Grammar::new("S");
        reversed.add_rule("S", re("[ab]")).add_rule("S", "S S");
        reversed.options_mut().collapse_branches = true;

        let a = forward.parse(input.clone()).unwrap();
        let b = reversed.parse(input).unwrap();
        prop_assert!(set_equal(&a, &b), "{:?} vs {:?}", a, b);
    }
}
