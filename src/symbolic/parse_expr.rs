//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use EqTaskGen::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^2.3* log(x+y+y^2.6)").unwrap();
//! let parsed_function = parsed_expression.lambdify(&["x", "y"]);
//! assert!(parsed_function(&[1.0, 2.0]).is_finite());
//! ```

use crate::symbolic::symbolic_engine::{Expr, UnaryCtor};
use crate::symbolic::utils::{
    brackets_balanced, find_char_positions_outside_brackets, find_pair_to_this_bracket,
    find_rightmost_operator_outside_brackets, wrapped_in_brackets,
};

//                  search recursion diagram
//                "y^2+exp(x)+log(x)/y-x^2.3"       |
//                |       left  | right             |
//                |_________________________________|
//                |     div by rightmost -          |
//                |_________________________________|
//                |y^2+exp(x)+log(x)/y | x^2.3      |
//                |       |            |    |       |
//                |_____ \|/___________|___\|/______|
//                |   div by +         | div by ^   |
//                |____________________|____________|
//                |y^2+exp(x)|log(x)/y | x  | 2.3   |
//                |__________|_________|____Ok______|
//                  etc...
/// deepest bracket/operator nesting accepted
const MAX_DEPTH: usize = 256;

/// function names understood by the parser and the variant each one builds
const FUNCTIONS: [(&str, UnaryCtor); 17] = [
    ("exp", Expr::Exp),
    ("ln", Expr::Ln),
    ("log", Expr::Ln),
    ("sin", Expr::sin),
    ("cos", Expr::cos),
    ("tg", Expr::tg),
    ("tan", Expr::tg),
    ("ctg", Expr::ctg),
    ("cot", Expr::ctg),
    ("arcsin", Expr::arcsin),
    ("asin", Expr::arcsin),
    ("arccos", Expr::arccos),
    ("acos", Expr::arccos),
    ("arctg", Expr::arctg),
    ("arctan", Expr::arctg),
    ("atan", Expr::arctg),
    ("sqrt", sqrt_ctor),
];

fn sqrt_ctor(arg: Box<Expr>) -> Expr {
    Expr::Pow(arg, Box::new(Expr::Const(0.5)))
}

/// names reserved for functions; they can never be variables
pub fn function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|(name, _)| *name)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.chars().filter(|c| *c == '.').count() <= 1
        && s != "."
}

fn check_characters(input: &str) -> Result<(), String> {
    match input
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "_.+-*/^() \t".contains(*c)))
    {
        Some(c) => Err(format!("unknown symbol '{}' in expression '{}'", c, input)),
        None => Ok(()),
    }
}

/// a '+' or '-' at `pos` is binary if something that ends an operand stands right before it
fn is_binary_sign(input: &[u8], pos: usize) -> bool {
    pos > 0 && {
        let prev = input[pos - 1];
        prev.is_ascii_alphanumeric() || prev == b'_' || prev == b')' || prev == b'.'
    }
}

/// Parses `input` into an expression tree.
///
/// `depth` is the recursion depth; callers start with 0. At depth 0 the input is validated
/// (ASCII operators, balanced brackets) and normalized (whitespace dropped, `**` read as `^`).
/// Precedence from loosest to tightest: binary `+ -`, `* /`, unary sign, `^`, function call.
/// `+ - * /` associate to the left, `^` to the right.
pub fn parse_expression_func(depth: usize, input: &str) -> Result<Expr, String> {
    if depth > MAX_DEPTH {
        return Err("expression is nested too deeply".to_string());
    }
    let normalized;
    let input = if depth == 0 {
        check_characters(input)?;
        if !brackets_balanced(input) {
            return Err(format!("unbalanced parentheses in '{}'", input));
        }
        normalized = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .replace("**", "^");
        normalized.as_str()
    } else {
        input
    };
    if input.is_empty() {
        return Err("empty expression".to_string());
    }
    let bytes = input.as_bytes();

    // fully bracketed group
    if wrapped_in_brackets(input) {
        return parse_expression_func(depth + 1, &input[1..input.len() - 1]);
    }

    // addition and subtraction
    if let Some((pos, op)) =
        find_rightmost_operator_outside_brackets(input, &['+', '-'], |i| is_binary_sign(bytes, i))
    {
        let left = parse_expression_func(depth + 1, &input[..pos])?;
        let right = parse_expression_func(depth + 1, &input[pos + 1..])?;
        return Ok(match op {
            '+' => Expr::Add(Box::new(left), Box::new(right)),
            _ => Expr::Sub(Box::new(left), Box::new(right)),
        });
    }

    // multiplication and division
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/'], |_| true)
    {
        let left = parse_expression_func(depth + 1, &input[..pos])?;
        let right = parse_expression_func(depth + 1, &input[pos + 1..])?;
        return Ok(match op {
            '*' => Expr::Mul(Box::new(left), Box::new(right)),
            _ => Expr::Div(Box::new(left), Box::new(right)),
        });
    }

    // unary sign
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(match parse_expression_func(depth + 1, rest)? {
            Expr::Const(value) => Expr::Const(-value),
            inner => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(inner)),
        });
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(depth + 1, rest);
    }

    // power, split at the leftmost sign so that a^b^c = a^(b^c)
    if let Some(&pos) = find_char_positions_outside_brackets(input, '^').first() {
        let base = parse_expression_func(depth + 1, &input[..pos])?;
        let exponent = parse_expression_func(depth + 1, &input[pos + 1..])?;
        return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
    }

    // function call: name(...)
    if let Some(bracket_start) = input.find('(') {
        let name = &input[..bracket_start];
        if !is_identifier(name) {
            return Err(format!("invalid expression format: '{}'", input));
        }
        if find_pair_to_this_bracket(input, bracket_start) != Some(input.len() - 1) {
            return Err(format!("invalid expression format: '{}'", input));
        }
        let ctor = FUNCTIONS
            .iter()
            .find(|(fname, _)| *fname == name)
            .map(|(_, ctor)| *ctor)
            .ok_or_else(|| format!("unknown function '{}'", name))?;
        let inner = parse_expression_func(depth + 1, &input[bracket_start + 1..input.len() - 1])?;
        return Ok(ctor(Box::new(inner)));
    }

    // constants and variables
    if is_number(input) {
        return input
            .parse::<f64>()
            .map(Expr::Const)
            .map_err(|e| format!("invalid number '{}': {}", input, e));
    }
    if is_identifier(input) {
        if function_names().any(|f| f == input) {
            return Err(format!("function '{}' used without an argument", input));
        }
        return Ok(Expr::Var(input.to_string()));
    }
    Err(format!("invalid expression format: '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    #[test]
    fn test_parse_exponential() {
        let expr = parse_expression_func(0, "exp(x)").unwrap();
        assert_eq!(expr, Expr::Exp(var("x")));
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func(0, "42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
        let expr = parse_expression_func(0, "3.25").unwrap();
        assert_eq!(expr, Expr::Const(3.25));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func(0, "speed_1").unwrap();
        assert_eq!(expr, Expr::Var("speed_1".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func(0, "x + 2").unwrap();
        assert_eq!(expr, Expr::Add(var("x"), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_parse_subtraction_is_left_associative() {
        let expr = parse_expression_func(0, "x^2 - x - 1").unwrap();
        let x = Expr::Var("x".to_string());
        let to_check = Expr::Pow(x.clone().boxed(), Box::new(Expr::Const(2.0))) - x - Expr::Const(1.0);
        assert_eq!(expr, to_check);
    }

    #[test]
    fn test_parse_division_is_left_associative() {
        let expr = parse_expression_func(0, "x / 2 / y").unwrap();
        assert_eq!(
            expr,
            Expr::Div(Box::new(Expr::Div(var("x"), Box::new(Expr::Const(2.0)))), var("y"))
        );
    }

    #[test]
    fn test_parse_power_both_spellings() {
        let caret = parse_expression_func(0, "x^2").unwrap();
        let stars = parse_expression_func(0, "x**2").unwrap();
        assert_eq!(caret, Expr::Pow(var("x"), Box::new(Expr::Const(2.0))));
        assert_eq!(caret, stars);
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let expr = parse_expression_func(0, "2^3^2").unwrap();
        assert_eq!(expr.try_constant(), Some(512.0));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse_expression_func(0, "-3").unwrap(), Expr::Const(-3.0));
        // -x^2 is -(x^2)
        let expr = parse_expression_func(0, "-x^2").unwrap();
        assert_eq!(expr.eval_expression(&["x"], &[3.0]), -9.0);
        let expr = parse_expression_func(0, "2*-x").unwrap();
        assert_eq!(expr.eval_expression(&["x"], &[4.0]), -8.0);
        let expr = parse_expression_func(0, "x^-1").unwrap();
        assert_eq!(expr.eval_expression(&["x"], &[4.0]), 0.25);
    }

    #[test]
    fn test_parse_logarithm() {
        assert_eq!(parse_expression_func(0, "log(x)").unwrap(), Expr::Ln(var("x")));
        assert_eq!(parse_expression_func(0, "ln(x)").unwrap(), Expr::Ln(var("x")));
    }

    #[test]
    fn test_parse_sqrt() {
        let expr = parse_expression_func(0, "sqrt(x)").unwrap();
        assert_eq!(expr, Expr::Pow(var("x"), Box::new(Expr::Const(0.5))));
    }

    #[test]
    fn test_parse_expression_func_with_brackets() {
        let expr = parse_expression_func(0, "(x + y) * z").unwrap();
        assert_eq!(expr, Expr::Mul(Box::new(Expr::Add(var("x"), var("y"))), var("z")));
    }

    #[test]
    fn test_parse_complex_expression() {
        let expr = parse_expression_func(0, "(x + y) * (z - 2) / exp(w)").unwrap();
        let x_plus_y = Box::new(Expr::Add(var("x"), var("y")));
        let z_minus_c = Box::new(Expr::Sub(var("z"), Box::new(Expr::Const(2.0))));
        let e = Box::new(Expr::Exp(var("w")));
        let res = Expr::Div(Box::new(Expr::Mul(x_plus_y, z_minus_c)), e);
        assert_eq!(expr, res);
    }

    #[test]
    fn test_trig_aliases() {
        assert_eq!(parse_expression_func(0, "tan(x)").unwrap(), Expr::tg(var("x")));
        assert_eq!(parse_expression_func(0, "cot(x)").unwrap(), Expr::ctg(var("x")));
        assert_eq!(parse_expression_func(0, "atan(x)").unwrap(), Expr::arctg(var("x")));
        assert_eq!(parse_expression_func(0, "arcsin(x)").unwrap(), Expr::arcsin(var("x")));
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func(0, "sin(cos(x)) + cos(y)").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::sin(Box::new(Expr::cos(var("x"))))),
                Box::new(Expr::cos(var("y")))
            )
        );
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(parse_expression_func(0, "(x +").is_err());
        assert!(parse_expression_func(0, "(x + y").is_err());
        assert!(parse_expression_func(0, "x + y)").is_err());
        assert!(parse_expression_func(0, "").is_err());
        assert!(parse_expression_func(0, "()").is_err());
        assert!(parse_expression_func(0, "x % 2").is_err());
        assert!(parse_expression_func(0, "foo(x)").is_err());
        assert!(parse_expression_func(0, "2(x)").is_err());
        assert!(parse_expression_func(0, "sin").is_err());
        assert!(parse_expression_func(0, "1.2.3").is_err());
    }
}
