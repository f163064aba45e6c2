//! Traditional Earley: gradually build, from left to right, a set of
//! "Earley items" for each position in the input.
//!
//! The state sets memoize: rather than reparse portions of input, the
//! engine reuses the items recorded in earlier sets. An item carries its
//! partial parse tree in `got`, so completed top-level items in the final
//! set hold the finished trees directly and no separate backpointer walk
//! is needed.
//!
//! Ambiguity falls out for free: the completer may advance the same
//! waiting item once per distinct completion of a nonterminal, and each
//! advancement is its own item whose `got` shares the completed subtrees
//! by reference. The final set then holds one top-level item per
//! derivation, deduplicated afterwards by the configured comparator.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::grammar::{Grammar, NonTerm, Options, Symbol};
use crate::node::{Branch, Subtree};
use crate::value::Value;

/// The lhs of the synthetic top item seeded into state set 0.
const TOP: &str = "";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A production referenced a nonterminal with no definitions; found
    /// lazily, during prediction.
    #[error("unknown nonterminal `{0}` referenced during prediction")]
    UnknownNonterm(String),
    /// The configured `max_iterations` cap was breached.
    #[error("parse exceeded the limit of {0} iterations")]
    IterationLimitExceeded(usize),
}

/// One Earley item. `pos` is the dot; `ori` is the input index where this
/// production started matching; `got` holds one subtree per rhs element
/// already matched. Cloning an item on advancement is shallow: the
/// subtrees themselves are shared.
#[derive(Clone, Debug)]
struct Item<'a> {
    lhs: &'a str,
    rhs: &'a [Symbol],
    pos: usize,
    ori: usize,
    got: Vec<Rc<Subtree>>,
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        let lhs = if self.lhs.is_empty() { "$" } else { self.lhs };
        write!(w, "{} ->", lhs)?;
        for (idx, sym) in self.rhs.iter().enumerate() {
            if idx == self.pos {
                write!(w, " .")?;
            }
            write!(w, " {}", sym)?;
        }
        if self.pos == self.rhs.len() {
            write!(w, " .")?;
        }
        write!(w, " @{}", self.ori)
    }
}

/// Runs recognition and forest reconstruction over pre-tokenized input.
pub(crate) fn run(
    grammar: &Grammar,
    input: &[Value],
    opts: &Options,
) -> Result<Vec<Value>, ParseError> {
    let top_rhs = [Symbol::NonTerm(NonTerm(grammar.start().to_string()))];
    let mut chart: Vec<Vec<Item>> = (0..=input.len()).map(|_| Vec::new()).collect();
    chart[0].push(Item { lhs: TOP, rhs: &top_rhs, pos: 0, ori: 0, got: Vec::new() });

    let mut engine = Engine { grammar, input, opts, chart, steps: 0 };
    engine.process()?;
    Ok(engine.harvest())
}

struct Engine<'a> {
    grammar: &'a Grammar,
    input: &'a [Value],
    opts: &'a Options,
    chart: Vec<Vec<Item<'a>>>,
    steps: usize,
}

impl<'a> Engine<'a> {
    /// Bumped on every scanner or completer append and on every prediction
    /// attempt. A cap of 0 disables the check.
    fn bump(&mut self) -> Result<(), ParseError> {
        self.steps += 1;
        let cap = self.opts.max_iterations;
        if cap > 0 && self.steps > cap {
            return Err(ParseError::IterationLimitExceeded(cap));
        }
        Ok(())
    }

    fn process(&mut self) -> Result<(), ParseError> {
        for i in 0..=self.input.len() {
            self.opts.trace(|| format!("state set {}:", i));
            // Index-based traversal, re-reading the length each step:
            // items appended mid-iteration must be observed in this pass.
            let mut k = 0;
            while k < self.chart[i].len() {
                let item = self.chart[i][k].clone();
                let rhs: &'a [Symbol] = item.rhs;
                if item.pos == rhs.len() {
                    self.opts.trace(|| format!("  complete {}", item));
                    self.complete(i, &item)?;
                } else {
                    match &rhs[item.pos] {
                        Symbol::Term(_) => {
                            if i < self.input.len() {
                                self.scan(i, &item)?;
                            }
                        }
                        Symbol::NonTerm(next) => self.predict(i, next)?,
                    }
                }
                k += 1;
            }
        }
        Ok(())
    }

    /// For every item in set `done.ori` waiting on `done.lhs`, append its
    /// advanced copy to set `i`, extended with the completed child. The
    /// child is built once and every parent shares it. The walk re-reads
    /// the set's length so completions introduced into the same set
    /// earlier in its processing stay visible.
    fn complete(&mut self, i: usize, done: &Item<'a>) -> Result<(), ParseError> {
        let child = self.build_child(done);
        let ori = done.ori;
        let mut j = 0;
        while j < self.chart[ori].len() {
            let waiting = {
                let p = &self.chart[ori][j];
                p.pos < p.rhs.len()
                    && matches!(&p.rhs[p.pos], Symbol::NonTerm(nt) if nt.name() == done.lhs)
            };
            if waiting {
                let mut advanced = self.chart[ori][j].clone();
                advanced.pos += 1;
                advanced.got.push(Rc::clone(&child));
                self.bump()?;
                self.opts.trace(|| format!("    advance {}", advanced));
                self.chart[i].push(advanced);
            }
            j += 1;
        }
        Ok(())
    }

    fn scan(&mut self, i: usize, item: &Item<'a>) -> Result<(), ParseError> {
        let term = match &item.rhs[item.pos] {
            Symbol::Term(t) => t,
            Symbol::NonTerm(_) => return Ok(()),
        };
        if !term.matches(&self.input[i]) {
            return Ok(());
        }
        let mut advanced = item.clone();
        advanced.pos += 1;
        advanced.got.push(Rc::new(Subtree::Tok(self.input[i].clone())));
        self.bump()?;
        self.opts.trace(|| format!("  scan {} -> {}", self.input[i], advanced));
        self.chart[i + 1].push(advanced);
        Ok(())
    }

    /// Adds a dot-zero item at `i` for each production of `next`, unless an
    /// equal prediction (same lhs, element-equal rhs, dot at zero) is
    /// already present. Terminal equality goes by anchored source pattern.
    fn predict(&mut self, i: usize, next: &'a NonTerm) -> Result<(), ParseError> {
        let prods = self
            .grammar
            .productions(next.name())
            .ok_or_else(|| ParseError::UnknownNonterm(next.name().to_string()))?;
        for rhs in prods {
            self.bump()?;
            let already = self
                .chart[i]
                .iter()
                .any(|it| it.pos == 0 && it.lhs == next.name() && it.rhs == rhs.as_slice());
            if already {
                continue;
            }
            let fresh = Item { lhs: next.name(), rhs, pos: 0, ori: i, got: Vec::new() };
            self.opts.trace(|| format!("  predict {}", fresh));
            self.chart[i].push(fresh);
        }
        Ok(())
    }

    /// Builds the child subtree a completion contributes to its parents:
    /// the completed item's `got`, marked for the builder when one is
    /// configured, labeled when `add_categories` is set, and unwrapped by
    /// `collapse_branches` when the visible tuple has exactly one element.
    fn build_child(&self, done: &Item<'a>) -> Rc<Subtree> {
        let mut children = done.got.clone();
        let labeled = self.opts.add_categories;
        if self.opts.expression_builder.is_some() {
            // builder-marked tuples always keep their shape; the rewriting
            // pass strips the mark and the label before calling the builder
            return Rc::new(Subtree::Branch(Branch {
                category: done.lhs.to_string(),
                labeled,
                builder: true,
                children,
            }));
        }
        if self.opts.collapse_branches {
            if labeled && children.is_empty() {
                return Rc::new(Subtree::Tok(Value::Str(done.lhs.to_string())));
            }
            if !labeled && children.len() == 1 {
                if let Some(only) = children.pop() {
                    return only;
                }
            }
        }
        Rc::new(Subtree::Branch(Branch {
            category: done.lhs.to_string(),
            labeled,
            builder: false,
            children,
        }))
    }

    /// Scans the final state set for complete top-level items, rewrites
    /// through the expression builder when configured, and deduplicates
    /// with the comparator, preserving first-occurrence order.
    fn harvest(&self) -> Vec<Value> {
        let last = &self.chart[self.input.len()];
        let mut out: Vec<Value> = Vec::new();
        for item in last {
            if item.lhs != TOP || item.pos != item.rhs.len() {
                continue;
            }
            let root = match item.got.first() {
                Some(root) => root,
                None => continue,
            };
            let candidate = match &self.opts.expression_builder {
                Some(builder) => match root.rewrite(builder) {
                    Some(v) => v,
                    None => {
                        self.opts.trace(|| "  builder rejected a candidate".to_string());
                        continue;
                    }
                },
                None => root.render(),
            };
            let duplicate = out.iter().any(|seen| (self.opts.comparator)(seen, &candidate));
            if !duplicate {
                out.push(candidate);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/earley.rs"]
mod tests_for_earley;
