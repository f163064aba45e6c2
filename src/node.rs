//! Partial parse trees, as accumulated inside Earley items.
//!
//! A subtree is either a raw token or a completed nonterminal. Branches
//! carry their producing nonterminal out-of-band together with two flags:
//! whether the category is rendered into the output tuple, and whether the
//! branch is marked for bottom-up rewriting by the expression builder.
//!
//! Subtrees are immutable once built and shared by reference: when a
//! completion advances several waiting parents, each parent's `got` holds
//! the same `Rc`'d child rather than a deep copy.

use std::rc::Rc;

use crate::grammar::ExpressionBuilder;
use crate::value::Value;

#[derive(Clone, PartialEq, Debug)]
pub(crate) enum Subtree {
    /// A token produced by the tokenizer or consumed by the scanner.
    Tok(Value),
    /// A completed nonterminal.
    Branch(Branch),
}

#[derive(Clone, PartialEq, Debug)]
pub(crate) struct Branch {
    /// The producing nonterminal's name.
    pub category: String,
    /// When set, the category becomes the first element of the rendered
    /// tuple.
    pub labeled: bool,
    /// Marked for rewriting by the expression builder.
    pub builder: bool,
    pub children: Vec<Rc<Subtree>>,
}

impl Subtree {
    /// Renders a finished subtree into a plain value. Branch collapsing has
    /// already happened at completion time, so this is a direct traversal.
    pub(crate) fn render(&self) -> Value {
        match self {
            Subtree::Tok(v) => v.clone(),
            Subtree::Branch(b) => {
                let mut items = Vec::with_capacity(b.children.len() + 1);
                if b.labeled {
                    items.push(Value::Str(b.category.clone()));
                }
                items.extend(b.children.iter().map(|child| child.render()));
                Value::List(items)
            }
        }
    }

    /// Rewrites the tree bottom-up through the expression builder. `None`
    /// anywhere rejects the whole candidate parse.
    pub(crate) fn rewrite(&self, builder: &ExpressionBuilder) -> Option<Value> {
        match self {
            Subtree::Tok(v) => Some(v.clone()),
            Subtree::Branch(b) => {
                debug_assert!(b.builder, "every branch of a builder parse is marked");
                let mut args = Vec::with_capacity(b.children.len());
                for child in &b.children {
                    args.push(child.rewrite(builder)?);
                }
                builder(&b.category, args)
            }
        }
    }
}
