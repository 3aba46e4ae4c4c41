//! Turns whatever the solver returned for one instance into one row: a cell per variable, in the
//! canonical variable order.
//!
//! Priority of the sources of a cell: the declared known value, the drawn free value, the
//! solver's mapping, its positional tuples (by the position of the variable among the
//! solver's unknowns), its single value (only when there is exactly one target), and finally
//! the `-` placeholder. Several roots stay together in one cell, ordered by (real, imaginary).
use crate::generator::classifier::VariableClassification;
use crate::generator::errors::SolverFailure;
use crate::generator::sampler::RawInstance;
use crate::generator::solver::{SolvedValue, SolverOutput};
use crate::generator::variables::Symbol;
use crate::global::{MISSING, TABLE_DIGITS};
use crate::symbolic::symbolic_engine::Expr;
use num_complex::Complex64;
use std::fmt;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Value(Complex64),
    Roots(Vec<Complex64>),
    Expression(Expr),
    Missing,
}

impl Cell {
    pub fn real(value: f64) -> Self {
        Cell::Value(Complex64::new(value, 0.0))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// text of the cell with `digits` decimals
    pub fn format_with(&self, digits: usize) -> String {
        match self {
            Cell::Value(z) => format_complex(*z, digits),
            Cell::Roots(roots) => format!(
                "({})",
                roots
                    .iter()
                    .map(|z| format_complex(*z, digits))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Cell::Expression(expr) => expr.to_string(),
            Cell::Missing => MISSING.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_with(TABLE_DIGITS))
    }
}

impl From<&SolvedValue> for Cell {
    fn from(value: &SolvedValue) -> Self {
        match value {
            SolvedValue::Scalar(z) => Cell::Value(*z),
            SolvedValue::Roots(roots) => Cell::Roots(roots.clone()),
            SolvedValue::Expression(expr) => Cell::Expression(expr.clone()),
        }
    }
}

/// fixed-point text of a real number without the sign of a rounded zero
pub fn format_real(value: f64, digits: usize) -> String {
    let text = format!("{:.*}", digits, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// `re` for real numbers, `(re + imj)` or `(re - imj)` otherwise
pub fn format_complex(z: Complex64, digits: usize) -> String {
    if z.im == 0.0 {
        return format_real(z.re, digits);
    }
    let sign = if z.im < 0.0 { '-' } else { '+' };
    format!(
        "({} {} {}j)",
        format_real(z.re, digits),
        sign,
        format_real(z.im.abs(), digits)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum InstanceStatus {
    /// every target has a value
    Solved,
    /// some targets have a value
    Partial,
    /// no target has a value
    Failed,
}

/// One row of the answer table.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedInstance {
    pub cells: Vec<(Symbol, Cell)>,
    pub failure: Option<SolverFailure>,
    pub status: InstanceStatus,
}

impl SolvedInstance {
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(symbol, _)| symbol.name() == name)
            .map(|(_, cell)| cell)
    }

    pub fn row(&self) -> Vec<String> {
        self.cells.iter().map(|(_, cell)| cell.to_string()).collect()
    }
}

fn positional_cell(unknowns: &[Symbol], tuples: &[Vec<SolvedValue>], symbol: &Symbol) -> Cell {
    let Some(index) = unknowns.iter().position(|u| u == symbol) else {
        return Cell::Missing;
    };
    let components: Vec<&SolvedValue> = tuples.iter().filter_map(|t| t.get(index)).collect();
    match components.as_slice() {
        [] => Cell::Missing,
        [only] => Cell::from(*only),
        many => {
            let mut roots = Vec::new();
            for value in many {
                match value {
                    SolvedValue::Scalar(z) => roots.push(*z),
                    SolvedValue::Roots(rs) => roots.extend(rs.iter().copied()),
                    SolvedValue::Expression(_) => return Cell::from(many[0]),
                }
            }
            Cell::Roots(roots)
        }
    }
}

fn solved_cell(output: &SolverOutput, symbol: &Symbol, classification: &VariableClassification) -> Cell {
    match output {
        SolverOutput::Mapping(map) => map.get(symbol).map(Cell::from).unwrap_or(Cell::Missing),
        SolverOutput::Positional { unknowns, tuples } => positional_cell(unknowns, tuples, symbol),
        SolverOutput::Single(value)
            if classification.target.len() == 1 && classification.target[0] == *symbol =>
        {
            Cell::from(value)
        }
        _ => Cell::Missing,
    }
}

/// Builds the row of one raw instance over `variables`.
pub fn normalize_instance(
    raw: &RawInstance,
    variables: &[Symbol],
    classification: &VariableClassification,
) -> SolvedInstance {
    let cells: Vec<(Symbol, Cell)> = variables
        .iter()
        .map(|symbol| {
            let cell = if let Some(value) = classification.known.get(symbol) {
                Cell::real(*value)
            } else if let Some(value) = raw.drawn.get(symbol) {
                Cell::real(*value)
            } else {
                match &raw.result {
                    Ok(output) => solved_cell(output, symbol, classification),
                    Err(_) => Cell::Missing,
                }
            };
            (symbol.clone(), cell)
        })
        .collect();
    let found = classification
        .target
        .iter()
        .filter(|t| cells.iter().any(|(s, c)| s == *t && !c.is_missing()))
        .count();
    let status = if found == classification.target.len() {
        InstanceStatus::Solved
    } else if found > 0 {
        InstanceStatus::Partial
    } else {
        InstanceStatus::Failed
    };
    SolvedInstance {
        cells,
        failure: raw.result.as_ref().err().cloned(),
        status,
    }
}

pub fn normalize_instances(
    raws: &[RawInstance],
    variables: &[Symbol],
    classification: &VariableClassification,
) -> Vec<SolvedInstance> {
    raws.iter()
        .map(|raw| normalize_instance(raw, variables, classification))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn classification(known: &[(&str, f64)], target: &[&str], free: &[&str]) -> VariableClassification {
        VariableClassification {
            known: known.iter().map(|(n, v)| (Symbol::from(*n), *v)).collect(),
            target: target.iter().map(|n| Symbol::from(*n)).collect(),
            free: free.iter().map(|n| Symbol::from(*n)).collect(),
        }
    }

    fn vars(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::from(*n)).collect()
    }

    fn raw(drawn: &[(&str, f64)], result: Result<SolverOutput, SolverFailure>) -> RawInstance {
        RawInstance {
            drawn: drawn.iter().map(|(n, v)| (Symbol::from(*n), *v)).collect(),
            result,
        }
    }

    #[test]
    fn test_formatting() {
        assert_eq!(Cell::real(6.0).to_string(), "6.0000");
        assert_eq!(Cell::real(-0.00001).to_string(), "0.0000");
        assert_eq!(Cell::Value(Complex64::new(1.0, -2.0)).to_string(), "(1.0000 - 2.0000j)");
        assert_eq!(
            Cell::Roots(vec![Complex64::new(2.0, 0.0), Complex64::new(3.0, 0.0)]).to_string(),
            "(2.0000, 3.0000)"
        );
        assert_eq!(Cell::Missing.to_string(), "-");
        assert_eq!(format_complex(Complex64::new(0.5, 1.0), 1), "(0.5 + 1.0j)");
    }

    #[test]
    fn test_mapping_with_known_and_free() {
        let c = classification(&[("b", 10.0)], &["x"], &["a"]);
        let out = SolverOutput::Mapping(BTreeMap::from([(Symbol::from("x"), SolvedValue::real(10.0))]));
        let row = normalize_instance(&raw(&[("a", 1.0)], Ok(out)), &vars(&["a", "b", "x"]), &c);
        assert_eq!(row.row(), vec!["1.0000", "10.0000", "10.0000"]);
        assert_eq!(row.status, InstanceStatus::Solved);
        assert_eq!(row.failure, None);
    }

    #[test]
    fn test_known_value_wins_over_solver() {
        let c = classification(&[("b", 10.0)], &["x"], &[]);
        let out = SolverOutput::Mapping(BTreeMap::from([
            (Symbol::from("b"), SolvedValue::real(99.0)),
            (Symbol::from("x"), SolvedValue::real(1.0)),
        ]));
        let row = normalize_instance(&raw(&[], Ok(out)), &vars(&["b", "x"]), &c);
        assert_eq!(row.get("b"), Some(&Cell::real(10.0)));
    }

    #[test]
    fn test_single_value_needs_one_target() {
        let out = SolverOutput::Single(SolvedValue::real(4.0));
        let one = classification(&[], &["x"], &[]);
        let row = normalize_instance(&raw(&[], Ok(out.clone())), &vars(&["x"]), &one);
        assert_eq!(row.get("x"), Some(&Cell::real(4.0)));
        let two = classification(&[], &["x", "y"], &[]);
        let row = normalize_instance(&raw(&[], Ok(out)), &vars(&["x", "y"]), &two);
        assert!(row.cells.iter().all(|(_, c)| c.is_missing()));
        assert_eq!(row.status, InstanceStatus::Failed);
    }

    #[test]
    fn test_positional_tuples() {
        let c = classification(&[], &["x", "y"], &[]);
        let out = SolverOutput::Positional {
            unknowns: vars(&["x", "y"]),
            tuples: vec![
                vec![SolvedValue::real(1.0), SolvedValue::real(-3.0)],
                vec![SolvedValue::real(3.0), SolvedValue::real(-1.0)],
            ],
        };
        let row = normalize_instance(&raw(&[], Ok(out)), &vars(&["x", "y"]), &c);
        assert_eq!(row.row(), vec!["(1.0000, 3.0000)", "(-3.0000, -1.0000)"]);
    }

    #[test]
    fn test_empty_and_failure_give_placeholders() {
        let c = classification(&[], &["x", "y"], &["a"]);
        let empty = normalize_instance(&raw(&[("a", 2.0)], Ok(SolverOutput::Empty)), &vars(&["a", "x", "y"]), &c);
        assert_eq!(empty.row(), vec!["2.0000", "-", "-"]);
        let failed = normalize_instance(
            &raw(&[("a", 2.0)], Err(SolverFailure::Timeout(5))),
            &vars(&["a", "x", "y"]),
            &c,
        );
        assert_eq!(failed.row(), vec!["2.0000", "-", "-"]);
        assert_eq!(failed.failure, Some(SolverFailure::Timeout(5)));
        assert_eq!(failed.status, InstanceStatus::Failed);
    }

    #[test]
    fn test_partial_instance() {
        let c = classification(&[], &["x", "y"], &[]);
        let out = SolverOutput::Mapping(BTreeMap::from([(
            Symbol::from("x"),
            SolvedValue::Roots(vec![Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0)]),
        )]));
        let row = normalize_instance(&raw(&[], Ok(out)), &vars(&["x", "y"]), &c);
        assert_eq!(row.status, InstanceStatus::Partial);
        assert_eq!(row.row()[0], "((0.0000 - 1.0000j), (0.0000 + 1.0000j))");
    }
}
