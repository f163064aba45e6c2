//! Grammar storage and the options layer.
//!
//! A grammar G is a start nonterminal plus a map from nonterminal name to
//! an ordered list of right-hand sides. Rule order is load-bearing: it
//! fixes the order in which alternative parses are discovered and thus the
//! order of results.

use std::fmt;
use std::sync::Arc;

use linear_map::LinearMap;
use regex::Regex;

use crate::earley;
use crate::earley::ParseError;
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// A terminal: an anchored regex matched against exactly one token.
///
/// The caller's pattern is rewrapped as `^(?:body)$` with any pre-existing
/// outer anchors stripped first, so `r` and `^r$` store identically.
/// Equality and hashing go by the anchored source text.
#[derive(Clone, Debug)]
pub struct Term {
    source: String,
    re: Regex,
}

impl Term {
    pub fn new(pattern: &str) -> Result<Term, regex::Error> {
        let source = anchor_whole(pattern);
        let re = Regex::new(&source)?;
        Ok(Term { source, re })
    }

    /// Anchoring strips at most one outer `^`/`$` and wraps the rest in a
    /// non-capturing group, which keeps any pattern that already compiled
    /// compilable.
    fn rewrap(re: &Regex) -> Term {
        let source = anchor_whole(re.as_str());
        let re = Regex::new(&source).expect("anchored form of a compiled pattern");
        Term { source, re }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, token: &Value) -> bool {
        self.re.is_match(&token.match_text())
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Term) -> bool {
        self.source == other.source
    }
}
impl Eq for Term {}

impl std::hash::Hash for Term {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

fn anchor_whole(pattern: &str) -> String {
    let mut body = pattern.strip_prefix('^').unwrap_or(pattern);
    if ends_with_unescaped_dollar(body) {
        body = &body[..body.len() - 1];
    }
    format!("^(?:{})$", body)
}

fn ends_with_unescaped_dollar(s: &str) -> bool {
    if !s.ends_with('$') {
        return false;
    }
    let backslashes = s[..s.len() - 1]
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count();
    backslashes % 2 == 0
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct NonTerm(pub(crate) String);

impl NonTerm {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NonTerm { fn from(a: &str) -> Self { Self(a.into()) } }
impl From<String> for NonTerm { fn from(a: String) -> Self { Self(a) } }

/// One entry of a right-hand side.
#[derive(Clone, PartialEq, Debug)]
pub enum Symbol {
    Term(Term),
    NonTerm(NonTerm),
}

impl From<&str> for Symbol { fn from(a: &str) -> Self { Symbol::NonTerm(a.into()) } }
impl From<Regex> for Symbol { fn from(re: Regex) -> Self { Symbol::Term(Term::rewrap(&re)) } }
impl From<&Regex> for Symbol { fn from(re: &Regex) -> Self { Symbol::Term(Term::rewrap(re)) } }
impl From<Term> for Symbol { fn from(t: Term) -> Self { Symbol::Term(t) } }
impl From<NonTerm> for Symbol { fn from(n: NonTerm) -> Self { Symbol::NonTerm(n) } }

/// One production right-hand side, as accepted by [`Grammar::add_rule`]:
/// a lone regex (single-terminal rhs), a space-separated string of
/// nonterminal names (the empty string is an epsilon rule), or an explicit
/// symbol sequence.
#[derive(Clone, PartialEq, Debug)]
pub struct RuleSpec(pub(crate) Vec<Symbol>);

impl From<&str> for RuleSpec {
    fn from(names: &str) -> RuleSpec {
        RuleSpec(
            names
                .split(' ')
                .filter(|n| !n.is_empty())
                .map(Symbol::from)
                .collect(),
        )
    }
}
impl From<String> for RuleSpec { fn from(names: String) -> RuleSpec { names.as_str().into() } }
impl From<Regex> for RuleSpec { fn from(re: Regex) -> RuleSpec { RuleSpec(vec![re.into()]) } }
impl From<&Regex> for RuleSpec { fn from(re: &Regex) -> RuleSpec { RuleSpec(vec![re.into()]) } }
impl From<Vec<Symbol>> for RuleSpec { fn from(syms: Vec<Symbol>) -> RuleSpec { RuleSpec(syms) } }

/// Rewrites completed subtrees bottom-up: receives the producing
/// nonterminal's name and the rewritten children; `None` rejects the
/// whole candidate parse.
pub type ExpressionBuilder = Arc<dyn Fn(&str, Vec<Value>) -> Option<Value> + Send + Sync>;

/// Equality predicate used to deduplicate final parse trees.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Receives debug trace lines when `show_debugging_output` is set.
pub type DebugSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-grammar defaults, overridable per parse via [`Grammar::parse_with`].
#[derive(Clone)]
pub struct Options {
    /// Prefix each completed subtree with its producing nonterminal's name.
    pub add_categories: bool,
    /// Unwrap any completed tuple of length one to its single element.
    pub collapse_branches: bool,
    /// Emit engine tracing through `debug_sink` (stderr when unset).
    pub show_debugging_output: bool,
    /// Cap on scanner/completer appends plus prediction attempts;
    /// 0 means unlimited.
    pub max_iterations: usize,
    pub tokenizer: Option<Tokenizer>,
    pub expression_builder: Option<ExpressionBuilder>,
    pub comparator: Comparator,
    pub debug_sink: Option<DebugSink>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            add_categories: false,
            collapse_branches: false,
            show_debugging_output: false,
            max_iterations: 0,
            tokenizer: None,
            expression_builder: None,
            comparator: Arc::new(|a, b| a.structural_eq(b)),
            debug_sink: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        w.debug_struct("Options")
            .field("add_categories", &self.add_categories)
            .field("collapse_branches", &self.collapse_branches)
            .field("show_debugging_output", &self.show_debugging_output)
            .field("max_iterations", &self.max_iterations)
            .field("tokenizer", &self.tokenizer.is_some())
            .field("expression_builder", &self.expression_builder.is_some())
            .finish()
    }
}

impl Options {
    pub(crate) fn trace(&self, line: impl FnOnce() -> String) {
        if !self.show_debugging_output {
            return;
        }
        let line = line();
        match &self.debug_sink {
            Some(sink) => sink(&line),
            None => eprintln!("{}", line),
        }
    }
}

/// Input to [`Grammar::parse`]: raw text, or an already-tokenized sequence.
#[derive(Clone, Debug)]
pub enum ParseInput {
    Text(String),
    Tokens(Vec<Value>),
}

impl From<&str> for ParseInput { fn from(s: &str) -> Self { ParseInput::Text(s.to_string()) } }
impl From<String> for ParseInput { fn from(s: String) -> Self { ParseInput::Text(s) } }
impl From<Vec<Value>> for ParseInput { fn from(toks: Vec<Value>) -> Self { ParseInput::Tokens(toks) } }

#[derive(Clone, Debug)]
pub struct Grammar {
    start: String,
    rules: LinearMap<String, Vec<Vec<Symbol>>>,
    options: Options,
}

impl Grammar {
    /// An empty grammar with the given start symbol. The start symbol need
    /// not be defined yet; it is resolved lazily at parse time.
    pub fn new(start: impl Into<String>) -> Grammar {
        Grammar {
            start: start.into(),
            rules: LinearMap::new(),
            options: Options::default(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Appends one production for `lhs`. Repeated calls with the same `lhs`
    /// accumulate alternatives in order.
    pub fn add_rule(&mut self, lhs: impl Into<String>, spec: impl Into<RuleSpec>) -> &mut Self {
        let lhs = lhs.into();
        let RuleSpec(rhs) = spec.into();
        if let Some(prods) = self.rules.get_mut(&lhs) {
            prods.push(rhs);
        } else {
            self.rules.insert(lhs, vec![rhs]);
        }
        self
    }

    /// Appends several alternative productions for `lhs`.
    pub fn add_rules(
        &mut self,
        lhs: impl Into<String>,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> &mut Self {
        let lhs = lhs.into();
        for spec in specs {
            self.add_rule(lhs.clone(), spec);
        }
        self
    }

    pub(crate) fn productions(&self, name: &str) -> Option<&[Vec<Symbol>]> {
        self.rules.get(name).map(|v| v.as_slice())
    }

    pub(crate) fn iter_rules(&self) -> impl Iterator<Item = (&str, &[Vec<Symbol>])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Parses with the grammar's default options. Unparseable input (and
    /// tokenizer failure on text input) yields `Ok` with no trees; the only
    /// errors are an undefined nonterminal met during prediction and a
    /// breached iteration cap.
    pub fn parse(&self, input: impl Into<ParseInput>) -> Result<Vec<Value>, ParseError> {
        self.parse_with(input, &self.options)
    }

    /// Parses with explicit options (typically a tweaked clone of
    /// [`Grammar::options`]).
    pub fn parse_with(
        &self,
        input: impl Into<ParseInput>,
        options: &Options,
    ) -> Result<Vec<Value>, ParseError> {
        let tokens = match input.into() {
            ParseInput::Tokens(toks) => toks,
            ParseInput::Text(text) => match &options.tokenizer {
                Some(tokenizer) => match tokenizer.tokenize(&text) {
                    Ok(toks) => toks,
                    Err(err) => {
                        options.trace(|| format!("tokenize failed: {}", err));
                        return Ok(Vec::new());
                    }
                },
                // without a tokenizer, text is consumed scannerless, one
                // character per token
                None => text.chars().map(Value::from).collect(),
            },
        };
        earley::run(self, &tokens, options)
    }
}

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
