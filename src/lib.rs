//! Earley chart parsing over regex terminals, with a companion tokenizer.
//!
//! A [`Grammar`] maps nonterminal names to productions whose right-hand
//! sides mix nonterminal names and anchored regex terminals. [`parse`]
//! accepts raw text (tokenized by an attached [`Tokenizer`], or consumed
//! character-by-character without one) or a pre-tokenized sequence, and
//! returns every distinct parse tree; ambiguous grammars simply return
//! more than one. Left recursion and epsilon rules need no preprocessing.
//!
//! ```
//! use charta::{Grammar, Value};
//! use regex::Regex;
//!
//! let mut g = Grammar::new("Sum");
//! g.add_rule("Sum", "Sum Plus Int")
//!     .add_rule("Sum", "Int")
//!     .add_rule("Plus", Regex::new(r"\+").unwrap())
//!     .add_rule("Int", Regex::new("[0-9]+").unwrap());
//! g.options_mut().collapse_branches = true;
//!
//! let input: Vec<Value> = vec!["1".into(), "+".into(), "2".into()];
//! let trees = g.parse(input).unwrap();
//! assert_eq!(trees.len(), 1);
//! ```
//!
//! [`parse`]: Grammar::parse

pub mod commands;
mod display;
mod earley;
mod grammar;
mod node;
mod tokenizer;
mod value;

pub use earley::ParseError;
pub use grammar::{
    Comparator, DebugSink, ExpressionBuilder, Grammar, NonTerm, Options, ParseInput, RuleSpec,
    Symbol, Term,
};
pub use tokenizer::{Formatter, TokenizeError, Tokenizer};
pub use value::Value;

#[cfg(test)]
mod tests;
