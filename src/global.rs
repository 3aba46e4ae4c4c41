//! crate-wide constants

/// default sampling range of a free variable, both ends included
pub const DEFAULT_RANGE: (f64, f64) = (1.0, 100.0);
/// default number of decimal digits a drawn free value is rounded to
pub const DEFAULT_PRECISION: u32 = 2;
/// default number of generated instances
pub const DEFAULT_COUNT: usize = 10;
/// names that are never variables: every function the expression parser understands
pub const RESERVED_WORDS: [&str; 17] = [
    "sin", "cos", "tan", "tg", "cot", "ctg", "asin", "arcsin", "acos", "arccos", "atan",
    "arctan", "arctg", "exp", "log", "ln", "sqrt",
];
/// numbers closer than this are considered equal when comparing solutions
pub const THRESHOLD: f64 = 1e-8;
/// decimal digits used in the answer table
pub const TABLE_DIGITS: usize = 4;
/// placeholder of a value that could not be found
pub const MISSING: &str = "-";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::function_names;

    #[test]
    fn test_reserved_words_cover_parser_functions() {
        for name in function_names() {
            assert!(RESERVED_WORDS.contains(&name), "{} is not reserved", name);
        }
        assert_eq!(function_names().count(), RESERVED_WORDS.len());
    }
}
