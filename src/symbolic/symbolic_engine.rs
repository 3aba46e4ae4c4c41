//! # Symbolic Engine Module
//!
//! Core expression tree used by the equation parser, the solver backend and the task
//! renderer. Equations typed by the user end up here as pairs of `Expr`.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "speed"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg`, `arcsin`, `arccos`, `arctg`
//!
//! ### Key Methods
//! - `Symbols(symbols: &str)` - Create multiple variables from comma-separated string
//! - `set_variable()` / `set_variable_from_map()` - Substitute variables with values
//! - `substitute_variable()` - Substitute a variable with an expression
//! - `map_variables()` - generic rewrite of every variable leaf
//! - `try_constant()` - evaluate an expression that holds no variables
//!
//! Functions use mathematical notation (tg, ctg, arctg) as variant names; the parser maps
//! `tan`, `cot`, `atan`, `sqrt`, `log` onto them.

#![allow(non_camel_case_types)]

use std::collections::HashMap;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y", "velocity")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// tan(x)
    tg(Box<Expr>),
    /// cot(x)
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// atan(x)
    arctg(Box<Expr>),
}

/// Constructor of a one-argument variant, e.g. `Expr::sin`.
pub type UnaryCtor = fn(Box<Expr>) -> Expr;
/// Constructor of a two-argument variant, e.g. `Expr::Add`.
pub type BinaryCtor = fn(Box<Expr>, Box<Expr>) -> Expr;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, z");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Splits a function variant into its constructor and argument.
    pub fn as_function(&self) -> Option<(UnaryCtor, &Expr)> {
        match self {
            Expr::Exp(arg) => Some((Expr::Exp as UnaryCtor, arg)),
            Expr::Ln(arg) => Some((Expr::Ln as UnaryCtor, arg)),
            Expr::sin(arg) => Some((Expr::sin as UnaryCtor, arg)),
            Expr::cos(arg) => Some((Expr::cos as UnaryCtor, arg)),
            Expr::tg(arg) => Some((Expr::tg as UnaryCtor, arg)),
            Expr::ctg(arg) => Some((Expr::ctg as UnaryCtor, arg)),
            Expr::arcsin(arg) => Some((Expr::arcsin as UnaryCtor, arg)),
            Expr::arccos(arg) => Some((Expr::arccos as UnaryCtor, arg)),
            Expr::arctg(arg) => Some((Expr::arctg as UnaryCtor, arg)),
            _ => None,
        }
    }

    /// Splits an arithmetic variant into its constructor and operands.
    pub fn as_binary(&self) -> Option<(BinaryCtor, &Expr, &Expr)> {
        match self {
            Expr::Add(lhs, rhs) => Some((Expr::Add as BinaryCtor, lhs, rhs)),
            Expr::Sub(lhs, rhs) => Some((Expr::Sub as BinaryCtor, lhs, rhs)),
            Expr::Mul(lhs, rhs) => Some((Expr::Mul as BinaryCtor, lhs, rhs)),
            Expr::Div(lhs, rhs) => Some((Expr::Div as BinaryCtor, lhs, rhs)),
            Expr::Pow(lhs, rhs) => Some((Expr::Pow as BinaryCtor, lhs, rhs)),
            _ => None,
        }
    }

    /// Rebuilds the tree, replacing every variable leaf for which `f` returns `Some`.
    pub fn map_variables(&self, f: &dyn Fn(&str) -> Option<Expr>) -> Expr {
        match self {
            Expr::Var(name) => f(name).unwrap_or_else(|| self.clone()),
            Expr::Const(_) => self.clone(),
            _ => {
                if let Some((ctor, lhs, rhs)) = self.as_binary() {
                    ctor(Box::new(lhs.map_variables(f)), Box::new(rhs.map_variables(f)))
                } else if let Some((ctor, arg)) = self.as_function() {
                    ctor(Box::new(arg.map_variables(f)))
                } else {
                    self.clone()
                }
            }
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.map_variables(&|name: &str| (name == var).then_some(Expr::Const(value)))
    }

    /// Substitutes multiple variables with constant values using a HashMap.
    /// Only variables present in the map are substituted.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, f64>) -> Expr {
        self.map_variables(&|name: &str| var_map.get(name).map(|value| Expr::Const(*value)))
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        self.map_variables(&|name: &str| (name == var).then(|| expr.clone()))
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            _ => {
                if let Some((_, lhs, rhs)) = self.as_binary() {
                    lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
                } else if let Some((_, arg)) = self.as_function() {
                    arg.contains_variable(var_name)
                } else {
                    false
                }
            }
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Evaluates an expression with no variables. Returns `None` if a variable is met
    /// or the result is not finite.
    pub fn try_constant(&self) -> Option<f64> {
        self.eval_with(&|_: &str| None).filter(|v| v.is_finite())
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, z) -> creates variables x, y, z
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            ($(
                $crate::symbolic::symbolic_engine::Expr::Var(stringify!($var).to_string())
            ),+)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        let vars = Expr::Symbols("x, y, , z");
        assert_eq!(
            vars,
            vec![
                Expr::Var("x".to_string()),
                Expr::Var("y".to_string()),
                Expr::Var("z".to_string())
            ]
        );
    }

    #[test]
    fn test_set_variable_from_map() {
        let (x, y) = symbols!(x, y);
        let expr = x.clone() * y.clone() + Expr::sin(x.boxed());
        let mut map = HashMap::new();
        map.insert("x".to_string(), 2.0);
        let res = expr.set_variable_from_map(&map);
        assert!(!res.contains_variable("x"));
        assert!(res.contains_variable("y"));
        assert_eq!(res.set_variable("y", 3.0).try_constant(), Some(6.0 + 2.0f64.sin()));
    }

    #[test]
    fn test_substitute_variable() {
        let (x, y) = symbols!(x, y);
        let expr = Expr::cos(x.boxed());
        let res = expr.substitute_variable("x", &(y.clone() + Expr::Const(1.0)));
        assert_eq!(
            res,
            Expr::cos(Box::new(Expr::Add(y.boxed(), Box::new(Expr::Const(1.0)))))
        );
    }

    #[test]
    fn test_try_constant_rejects_variables_and_nan() {
        let x = Expr::Var("x".to_string());
        assert_eq!((x + Expr::Const(1.0)).try_constant(), None);
        let bad = Expr::Ln(Box::new(Expr::Const(-1.0)));
        assert_eq!(bad.try_constant(), None);
    }
}
