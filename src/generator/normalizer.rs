//! Rewrites shorthand equation text into the form accepted by the expression parser:
//! `^` becomes `**` and implicit multiplication is made explicit (`2x` -> `2*x`,
//! `2(x+1)` -> `2*(x+1)`, `(a)(b)` -> `(a)*(b)`). In single-letter mode adjacent letters are
//! separate variables too (`xy` -> `x*y`), except for function names followed by a bracket.
use crate::global::RESERVED_WORDS;
use strum_macros::{Display, EnumIter, EnumString};

/// How runs of letters are read as variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TokenizationPolicy {
    /// every letter is its own variable: `xy` is `x*y`
    SingleLetter,
    /// identifiers `[A-Za-z_][A-Za-z0-9_]*` are variables: `xy` is one variable
    #[default]
    MultiLetter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Number,
    Variable,
    Function,
    Open,
    Close,
    Other,
}

/// a reserved function name starting at `pos` and directly followed by '('
fn function_at(chars: &[char], pos: usize) -> Option<usize> {
    RESERVED_WORDS
        .iter()
        .filter(|name| {
            let len = name.len();
            pos + len < chars.len()
                && chars[pos + len] == '('
                && name.chars().zip(&chars[pos..pos + len]).all(|(a, b)| a == *b)
        })
        .map(|name| name.len())
        .max()
}

fn tokenize(text: &str, policy: TokenizationPolicy) -> Vec<(Kind, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        let kind = if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) {
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            Kind::Number
        } else if c.is_ascii_alphabetic() || (c == '_' && policy == TokenizationPolicy::MultiLetter) {
            match (policy, function_at(&chars, i)) {
                (TokenizationPolicy::SingleLetter, Some(len)) => {
                    i += len;
                    Kind::Function
                }
                (TokenizationPolicy::SingleLetter, None) => {
                    i += 1;
                    Kind::Variable
                }
                (TokenizationPolicy::MultiLetter, _) => {
                    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();
                    if chars.get(i) == Some(&'(') && RESERVED_WORDS.contains(&word.as_str()) {
                        Kind::Function
                    } else {
                        Kind::Variable
                    }
                }
            }
        } else {
            i += 1;
            match c {
                '(' => Kind::Open,
                ')' => Kind::Close,
                _ => Kind::Other,
            }
        };
        tokens.push((kind, chars[start..i].iter().collect()));
    }
    tokens
}

/// true if juxtaposing these two tokens means multiplication
fn implicit_product(prev: Kind, next: Kind) -> bool {
    matches!(prev, Kind::Number | Kind::Variable | Kind::Close)
        && matches!(next, Kind::Number | Kind::Variable | Kind::Function | Kind::Open)
}

/// Normalizes one side of an equation (or a whole equation line, '=' is left alone).
pub fn normalize(text: &str, policy: TokenizationPolicy) -> String {
    let text = text.replace('^', "**");
    let tokens = tokenize(&text, policy);
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<Kind> = None;
    for (kind, token) in tokens {
        if prev.is_some_and(|p| implicit_product(p, kind)) {
            out.push('*');
        }
        out.push_str(&token);
        prev = Some(kind);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_power_and_digit_letter() {
        let res = normalize("2x^2=3", TokenizationPolicy::MultiLetter);
        assert!(!res.contains('^'));
        assert!(res.contains("2*x"));
        assert_eq!(res, "2*x**2=3");
    }

    #[test]
    fn test_adjacent_letters() {
        assert_eq!(normalize("xy+2", TokenizationPolicy::SingleLetter), "x*y+2");
        assert_eq!(normalize("xy+2", TokenizationPolicy::MultiLetter), "xy+2");
        assert_eq!(normalize("2ab", TokenizationPolicy::SingleLetter), "2*a*b");
        assert_eq!(normalize("x2", TokenizationPolicy::SingleLetter), "x*2");
        assert_eq!(normalize("x2", TokenizationPolicy::MultiLetter), "x2");
    }

    #[test]
    fn test_brackets() {
        let p = TokenizationPolicy::MultiLetter;
        assert_eq!(normalize("2(x+1)", p), "2*(x+1)");
        assert_eq!(normalize("(a+b)(a-b)", p), "(a+b)*(a-b)");
        assert_eq!(normalize("(x)y", p), "(x)*y");
        assert_eq!(normalize("3sin(x)", p), "3*sin(x)");
        assert_eq!(normalize("sin(x)", p), "sin(x)");
    }

    #[test]
    fn test_functions_survive_single_letter_mode() {
        let p = TokenizationPolicy::SingleLetter;
        assert_eq!(normalize("sin(x)=1", p), "sin(x)=1");
        assert_eq!(normalize("asin(x)+cos(yz)", p), "asin(x)+cos(y*z)");
        assert_eq!(normalize("ksqrt(x)", p), "k*sqrt(x)");
    }

    #[test]
    fn test_idempotent() {
        for p in TokenizationPolicy::iter() {
            for text in ["2x^2 + 3xy = 7", "a*(b+c)^2 = sqrt(d)", "1.5t - v0 = 0"] {
                let once = normalize(text, p);
                assert_eq!(normalize(&once, p), once);
            }
        }
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            TokenizationPolicy::from_str("single_letter").unwrap(),
            TokenizationPolicy::SingleLetter
        );
        assert_eq!(
            TokenizationPolicy::from_str("Multi_Letter").unwrap(),
            TokenizationPolicy::MultiLetter
        );
        assert_eq!(TokenizationPolicy::default().to_string(), "multi_letter");
        assert!(TokenizationPolicy::from_str("letters").is_err());
    }
}
