//! Equations `lhs = rhs` and their parsing from text.
use crate::generator::errors::{Result, TaskGenError};
use crate::generator::normalizer::{TokenizationPolicy, normalize};
use crate::generator::variables::Symbol;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::fmt;

/// An equality constraint between two expressions. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `symbol = value`
    pub fn fixing(symbol: &Symbol, value: f64) -> Self {
        Equation::new(symbol.to_expr(), Expr::Const(value))
    }

    /// `lhs - rhs`, zero exactly where the equation holds
    pub fn residual(&self) -> Expr {
        Expr::Sub(Box::new(self.lhs.clone()), Box::new(self.rhs.clone()))
    }

    /// variables of both sides, sorted
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut names = self.lhs.all_arguments_are_variables();
        names.extend(self.rhs.all_arguments_are_variables());
        names.sort();
        names.dedup();
        names.into_iter().map(Symbol::new).collect()
    }

    /// If the equation reads `symbol = number` (either way round), returns that pair.
    pub fn as_fixing(&self) -> Option<(Symbol, f64)> {
        match (&self.lhs, &self.rhs) {
            (Expr::Var(name), other) | (other, Expr::Var(name)) => {
                other.try_constant().map(|value| (Symbol::new(name.as_str()), value))
            }
            _ => None,
        }
    }

    pub fn substitute(&self, values: &std::collections::HashMap<String, f64>) -> Equation {
        Equation::new(
            self.lhs.set_variable_from_map(values),
            self.rhs.set_variable_from_map(values),
        )
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

fn parse_side(side: &str, policy: TokenizationPolicy) -> Result<Expr> {
    let normalized = normalize(side, policy);
    Expr::parse_expression(&normalized).map_err(|cause| TaskGenError::ExpressionParse {
        text: side.trim().to_string(),
        cause,
    })
}

/// Parses one line holding exactly one '='.
pub fn parse_equation(line: &str, policy: TokenizationPolicy) -> Result<Equation> {
    let found = line.matches('=').count();
    if found != 1 {
        return Err(TaskGenError::EquationFormat {
            line: line.trim().to_string(),
            found,
        });
    }
    let (lhs, rhs) = line.split_once('=').ok_or_else(|| TaskGenError::EquationFormat {
        line: line.trim().to_string(),
        found,
    })?;
    let equation = Equation::new(parse_side(lhs, policy)?, parse_side(rhs, policy)?);
    debug!("equation '{}' parsed as {}", line.trim(), equation);
    Ok(equation)
}

/// Parses all non-blank lines; fails on the first malformed one or if nothing is left.
pub fn parse_equations<S: AsRef<str>>(lines: &[S], policy: TokenizationPolicy) -> Result<Vec<Equation>> {
    let equations = lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .map(|l| parse_equation(l, policy))
        .collect::<Result<Vec<Equation>>>()?;
    if equations.is_empty() {
        return Err(TaskGenError::EmptySystem);
    }
    Ok(equations)
}
