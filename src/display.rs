use crate::grammar::{Grammar, NonTerm, Symbol, Term};
use crate::value::Value;

impl std::fmt::Display for Term {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "/{}/", self.source())
    }
}

impl std::fmt::Display for NonTerm {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{}", self.0)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::Term(t) => write!(w, "{}", t),
            Symbol::NonTerm(n) => write!(w, "{}", n),
        }
    }
}

/// Productions rendered one lhs per line, alternatives joined with `|`.
impl std::fmt::Display for Grammar {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (lhs, prods) in self.iter_rules() {
            write!(w, "{} ->", lhs)?;
            for (idx, rhs) in prods.iter().enumerate() {
                if idx > 0 {
                    write!(w, " |")?;
                }
                if rhs.is_empty() {
                    write!(w, " ''")?;
                }
                for sym in rhs {
                    write!(w, " {}", sym)?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Unit => write!(w, "()"),
            Value::Bool(b) => write!(w, "{:?}", b),
            Value::Int(i) => write!(w, "{:?}", i),
            Value::Str(s) => write!(w, "\"{}\"", s),
            Value::List(items) => {
                write!(w, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(w, ", ")?;
                    }
                    write!(w, "{}", item)?;
                }
                write!(w, "]")
            }
            Value::Map(pairs) => {
                write!(w, "{{")?;
                for (idx, (k, v)) in pairs.iter().enumerate() {
                    if idx > 0 {
                        write!(w, ", ")?;
                    }
                    write!(w, "\"{}\": {}", k, v)?;
                }
                write!(w, "}}")
            }
        }
    }
}
