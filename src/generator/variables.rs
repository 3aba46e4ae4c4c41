//! Symbols and the extraction of the variable set from equation text.
use crate::generator::normalizer::{TokenizationPolicy, normalize};
use crate::global::RESERVED_WORDS;
use crate::symbolic::symbolic_engine::Expr;
use regex::Regex;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern is a valid regex")
});

/// Canonical handle of a named variable. Ordered and compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn to_expr(&self) -> Expr {
        Expr::Var(self.0.clone())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Distinct variables referenced in `text`, sorted by name.
///
/// Works on raw as well as normalized text: in single-letter mode the text is normalized
/// first so that `xy` and `x*y` give the same set.
pub fn extract_variables(text: &str, policy: TokenizationPolicy) -> Vec<Symbol> {
    let text = match policy {
        TokenizationPolicy::SingleLetter => normalize(text, policy),
        TokenizationPolicy::MultiLetter => text.to_string(),
    };
    let names: BTreeSet<&str> = IDENTIFIER
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|name| !is_reserved(name))
        .collect();
    names.into_iter().map(Symbol::new).collect()
}

/// Variables of several equation lines.
pub fn extract_from_lines<S: AsRef<str>>(lines: &[S], policy: TokenizationPolicy) -> Vec<Symbol> {
    let joined = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    extract_variables(&joined, policy)
}
