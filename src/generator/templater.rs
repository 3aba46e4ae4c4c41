//! Substitution of instance values into `{name}` placeholders of a task text.
use crate::generator::solution::{Cell, SolvedInstance};
use log::debug;
use num_complex::Complex64;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is a valid regex")
});

/// digits used for values inside task texts, before trailing zeros are stripped
const TEMPLATE_DIGITS: usize = 6;

/// `3.500000` -> `3.5`, `10.000000` -> `10`
pub fn trim_number(value: f64) -> String {
    let text = format!("{:.*}", TEMPLATE_DIGITS, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" { "0".to_string() } else { text }
}

fn template_complex(z: Complex64) -> String {
    if z.im == 0.0 {
        trim_number(z.re)
    } else {
        let sign = if z.im < 0.0 { '-' } else { '+' };
        format!("({} {} {}j)", trim_number(z.re), sign, trim_number(z.im.abs()))
    }
}

/// Text a cell contributes to a task, `None` if it has no value.
/// Of several roots the largest real one is used, or the first one if none is real.
pub fn template_value(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Value(z) => Some(template_complex(*z)),
        Cell::Roots(roots) => roots
            .iter()
            .filter(|z| z.im == 0.0)
            .map(|z| z.re)
            .max_by(|a, b| a.total_cmp(b))
            .map(trim_number)
            .or_else(|| roots.first().map(|z| template_complex(*z))),
        Cell::Expression(expr) => Some(expr.to_string()),
        Cell::Missing => None,
    }
}

/// Replaces every `{name}` whose variable has a value; other placeholders are kept as they are.
///
/// Example#
/// ```
/// use EqTaskGen::generator::solution::{Cell, InstanceStatus, SolvedInstance};
/// use EqTaskGen::generator::templater::render_task;
/// use EqTaskGen::generator::variables::Symbol;
/// let instance = SolvedInstance {
///     cells: vec![(Symbol::from("x"), Cell::real(3.5))],
///     failure: None,
///     status: InstanceStatus::Solved,
/// };
/// assert_eq!(render_task("Solve: x={x}", &instance), "Solve: x=3.5");
/// ```
pub fn render_task(template: &str, instance: &SolvedInstance) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match instance.get(name).and_then(template_value) {
                Some(value) => value,
                None => {
                    debug!("placeholder {{{}}} left unresolved", name);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// One task per instance, separated by a blank line.
pub fn render_tasks(template: &str, instances: &[SolvedInstance]) -> String {
    instances
        .iter()
        .map(|instance| render_task(template, instance))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::solution::InstanceStatus;
    use crate::generator::variables::Symbol;

    fn instance(cells: Vec<(&str, Cell)>) -> SolvedInstance {
        SolvedInstance {
            cells: cells.into_iter().map(|(n, c)| (Symbol::from(n), c)).collect(),
            failure: None,
            status: InstanceStatus::Solved,
        }
    }

    #[test]
    fn test_trim_number() {
        assert_eq!(trim_number(3.5), "3.5");
        assert_eq!(trim_number(10.0), "10");
        assert_eq!(trim_number(-0.0000001), "0");
        assert_eq!(trim_number(0.125), "0.125");
        assert_eq!(trim_number(-2.25), "-2.25");
    }

    #[test]
    fn test_render_and_pass_through() {
        let inst = instance(vec![("x", Cell::real(3.5)), ("y", Cell::Missing)]);
        assert_eq!(render_task("Solve: x={x}", &inst), "Solve: x=3.5");
        assert_eq!(render_task("x={x}, y={y}, z={z}", &inst), "x=3.5, y={y}, z={z}");
        assert_eq!(render_task("no placeholders", &inst), "no placeholders");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let inst = instance(vec![("v0", Cell::real(12.0))]);
        assert_eq!(render_task("{v0} and {V0}", &inst), "12 and {V0}");
    }

    #[test]
    fn test_complex_and_roots() {
        let inst = instance(vec![
            ("z", Cell::Value(Complex64::new(1.5, -2.0))),
            (
                "x",
                Cell::Roots(vec![Complex64::new(-3.0, 0.0), Complex64::new(2.0, 0.0)]),
            ),
            (
                "w",
                Cell::Roots(vec![Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0)]),
            ),
        ]);
        assert_eq!(render_task("{z}; {x}; {w}", &inst), "(1.5 - 2j); 2; (0 - 1j)");
    }

    #[test]
    fn test_render_tasks_joined_by_blank_line() {
        let a = instance(vec![("x", Cell::real(1.0))]);
        let b = instance(vec![("x", Cell::real(2.0))]);
        assert_eq!(render_tasks("x={x}", &[a, b]), "x=1\n\nx=2");
        assert_eq!(render_tasks("x={x}", &[]), "");
    }
}
