//! A greedy regex tokenizer. Token types are tried in registration order
//! at each position of the remaining input; the first whose anchored
//! pattern matches consumes the matched text and emits a formatted token.
//!
//! Matching is first-match-wins, not longest-match: the caller orders
//! specific patterns before general ones. A position where no type matches
//! fails the whole tokenization; there are no partial results.

use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::value::Value;

/// How a matched token's text becomes the emitted token value.
#[derive(Clone)]
pub enum Formatter {
    /// Emit the matched text unchanged.
    Identity,
    /// Expand `%N` placeholders against the match's capture groups
    /// (`%0` is the whole match).
    Template(String),
    /// Arbitrary callable. Returning `None` drops the token.
    Func(Arc<dyn Fn(&str, &Captures) -> Option<Value> + Send + Sync>),
}

impl Formatter {
    pub fn func(f: impl Fn(&str, &Captures) -> Option<Value> + Send + Sync + 'static) -> Formatter {
        Formatter::Func(Arc::new(f))
    }

    fn apply(&self, matched: &str, caps: &Captures) -> Option<Value> {
        match self {
            Formatter::Identity => Some(Value::Str(matched.to_string())),
            Formatter::Template(t) => Some(Value::Str(expand_template(t, caps))),
            Formatter::Func(f) => f(matched, caps),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formatter::Identity => write!(w, "Identity"),
            Formatter::Template(t) => write!(w, "Template({:?})", t),
            Formatter::Func(_) => write!(w, "Func(..)"),
        }
    }
}

impl From<&str> for Formatter { fn from(t: &str) -> Formatter { Formatter::Template(t.to_string()) } }
impl From<String> for Formatter { fn from(t: String) -> Formatter { Formatter::Template(t) } }

#[derive(Clone, Debug)]
struct TokenType {
    re: Regex,
    formatter: Formatter,
}

/// No registered type matched at `position` (a byte offset into the input).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no token type matched at byte {position}")]
pub struct TokenizeError {
    pub position: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Tokenizer {
    types: Vec<TokenType>,
}

impl Tokenizer {
    pub fn new() -> Tokenizer {
        Tokenizer { types: Vec::new() }
    }

    /// Registers a token type. The pattern is stored anchored to the start
    /// of the remaining input; a pattern that already begins with `^` is
    /// kept as written.
    pub fn add_type(
        &mut self,
        pattern: &str,
        formatter: impl Into<Formatter>,
    ) -> Result<&mut Self, regex::Error> {
        let source = if pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("^(?:{})", pattern)
        };
        let re = Regex::new(&source)?;
        self.types.push(TokenType { re, formatter: formatter.into() });
        Ok(self)
    }

    /// Splits `input` into formatted tokens, or fails at the first position
    /// where no registered type matches.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Value>, TokenizeError> {
        let mut out = Vec::new();
        let mut pos = 0;
        'scan: while pos < input.len() {
            let rest = &input[pos..];
            for ty in &self.types {
                let caps = match ty.re.captures(rest) {
                    Some(caps) => caps,
                    None => continue,
                };
                let whole = match caps.get(0) {
                    // an empty match consumes nothing and cannot make
                    // progress, so it does not count as a match
                    Some(m) if !m.as_str().is_empty() => m,
                    _ => continue,
                };
                if let Some(token) = ty.formatter.apply(whole.as_str(), &caps) {
                    out.push(token);
                }
                pos += whole.end();
                continue 'scan;
            }
            return Err(TokenizeError { position: pos });
        }
        Ok(out)
    }
}

/// `%N` takes as many decimal digits as follow the `%`; an unmatched group
/// expands to nothing; `%` before a non-digit stays literal.
fn expand_template(template: &str, caps: &Captures) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(d);
                chars.next();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            out.push('%');
            continue;
        }
        if let Some(m) = digits.parse::<usize>().ok().and_then(|n| caps.get(n)) {
            out.push_str(m.as_str());
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/tokenizer.rs"]
mod tests_for_tokenizer;
