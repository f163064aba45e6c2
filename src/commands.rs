//! A transport-free command shell over the core API.
//!
//! A message-passing front end (worker thread, subprocess, test harness)
//! deserializes each incoming message into a [`Command`], hands it to
//! [`Registry::dispatch`], and serializes the [`Response`] back. The
//! registry itself performs no I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::earley::ParseError;
use crate::grammar::{Grammar, RuleSpec, Symbol, Term};
use crate::tokenizer::{Formatter, Tokenizer};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// `grammars[name] = Grammar::new(start)`
    CreateParser { name: String, start: String },
    /// Lazily attaches a tokenizer to the named grammar and registers a
    /// token type on it. A formatter, when present, is a `%N` template
    /// (callable formatters cannot cross a message boundary).
    AddType {
        name: String,
        pattern: String,
        #[serde(default)]
        formatter: Option<String>,
    },
    /// Appends one production per sequence under `category`.
    AddRule {
        name: String,
        category: String,
        sequences: Vec<RuleSeq>,
    },
    Parse { name: String, text: String },
    DeleteParser { name: String },
}

/// One production right-hand side on the wire. `Tagged` elements carry a
/// `t:` (terminal regex source) or `c:` (nonterminal name) prefix; a
/// `Bare` string splits on spaces into nonterminal names, as in the
/// direct API.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleSeq {
    Bare(String),
    Tagged(Vec<String>),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "response", rename_all = "camelCase")]
pub enum Response {
    Ack,
    Parses { trees: Vec<serde_json::Value> },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no parser named `{0}`")]
    UnknownParser(String),
    #[error("bad terminal pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Named grammars addressed by the commands above.
#[derive(Debug, Default)]
pub struct Registry {
    grammars: HashMap<String, Grammar>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry { grammars: HashMap::new() }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Response, CommandError> {
        match command {
            Command::CreateParser { name, start } => {
                self.grammars.insert(name, Grammar::new(start));
                Ok(Response::Ack)
            }
            Command::AddType { name, pattern, formatter } => {
                let grammar = self.grammar_mut(&name)?;
                let tokenizer = grammar
                    .options_mut()
                    .tokenizer
                    .get_or_insert_with(Tokenizer::new);
                let formatter = match formatter {
                    Some(template) => Formatter::Template(template),
                    None => Formatter::Identity,
                };
                tokenizer.add_type(&pattern, formatter)?;
                Ok(Response::Ack)
            }
            Command::AddRule { name, category, sequences } => {
                let mut specs = Vec::with_capacity(sequences.len());
                for seq in sequences {
                    specs.push(translate_seq(seq)?);
                }
                let grammar = self.grammar_mut(&name)?;
                grammar.add_rules(category, specs);
                Ok(Response::Ack)
            }
            Command::Parse { name, text } => {
                let grammar = self.grammar(&name)?;
                let trees = grammar.parse(text.as_str())?;
                Ok(Response::Parses {
                    trees: trees.iter().map(serde_json::Value::from).collect(),
                })
            }
            Command::DeleteParser { name } => {
                self.grammars.remove(&name);
                Ok(Response::Ack)
            }
        }
    }

    fn grammar(&self, name: &str) -> Result<&Grammar, CommandError> {
        self.grammars
            .get(name)
            .ok_or_else(|| CommandError::UnknownParser(name.to_string()))
    }

    fn grammar_mut(&mut self, name: &str) -> Result<&mut Grammar, CommandError> {
        self.grammars
            .get_mut(name)
            .ok_or_else(|| CommandError::UnknownParser(name.to_string()))
    }
}

fn translate_seq(seq: RuleSeq) -> Result<RuleSpec, CommandError> {
    match seq {
        RuleSeq::Bare(names) => Ok(RuleSpec::from(names)),
        RuleSeq::Tagged(elements) => {
            let mut symbols = Vec::with_capacity(elements.len());
            for element in &elements {
                let symbol = if let Some(source) = element.strip_prefix("t:") {
                    Symbol::Term(Term::new(source)?)
                } else if let Some(name) = element.strip_prefix("c:") {
                    Symbol::from(name)
                } else {
                    // unprefixed elements read as nonterminal names
                    Symbol::from(element.as_str())
                };
                symbols.push(symbol);
            }
            Ok(RuleSpec::from(symbols))
        }
    }
}

#[cfg(test)]
#[path = "tests/commands.rs"]
mod tests_for_commands;
