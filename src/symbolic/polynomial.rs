//! Conversion of an expression into the coefficients of a polynomial in one variable.
//!
//! Coefficients are stored in ascending order: `[c0, c1, c2]` is `c0 + c1*x + c2*x^2`.
//! Anything that is not a polynomial in the chosen variable (a function of it, a division
//! by it, a non-integer power, another free variable) makes the conversion return `None`.

use crate::symbolic::symbolic_engine::Expr;

/// highest degree a polynomial may reach; larger ones are left to the iterative solvers
pub const MAX_DEGREE: usize = 64;

fn bounded(coeffs: Vec<f64>) -> Option<Vec<f64>> {
    let top = coeffs.iter().rposition(|c| *c != 0.0).unwrap_or(0);
    if top > MAX_DEGREE {
        None
    } else {
        Some(coeffs)
    }
}

fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut res = vec![0.0; a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        res[i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        res[i] += c;
    }
    res
}

fn scale(a: &[f64], k: f64) -> Vec<f64> {
    a.iter().map(|c| c * k).collect()
}

fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut res = vec![0.0; a.len() + b.len() - 1];
    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            res[i + j] += ca * cb;
        }
    }
    res
}

/// drops vanishing leading coefficients, keeping at least the constant term
pub fn trim(mut coeffs: Vec<f64>) -> Vec<f64> {
    while coeffs.len() > 1 && coeffs.last().is_some_and(|c| *c == 0.0) {
        coeffs.pop();
    }
    coeffs
}

/// degree of trimmed coefficients; the zero polynomial has degree 0
pub fn degree(coeffs: &[f64]) -> usize {
    coeffs.len().saturating_sub(1)
}

impl Expr {
    /// Coefficients of the expression as a polynomial in `var`, ascending and trimmed.
    pub fn polynomial_coefficients(&self, var: &str) -> Option<Vec<f64>> {
        self.poly_coeffs(var).map(trim)
    }

    fn poly_coeffs(&self, var: &str) -> Option<Vec<f64>> {
        if !self.contains_variable(var) {
            return self.try_constant().map(|c| vec![c]);
        }
        match self {
            Expr::Var(_) => Some(vec![0.0, 1.0]),
            Expr::Add(lhs, rhs) => Some(add(&lhs.poly_coeffs(var)?, &rhs.poly_coeffs(var)?)),
            Expr::Sub(lhs, rhs) => Some(add(
                &lhs.poly_coeffs(var)?,
                &scale(&rhs.poly_coeffs(var)?, -1.0),
            )),
            Expr::Mul(lhs, rhs) => bounded(mul(&lhs.poly_coeffs(var)?, &rhs.poly_coeffs(var)?)),
            Expr::Div(lhs, rhs) if !rhs.contains_variable(var) => {
                let denom = rhs.try_constant()?;
                if denom == 0.0 {
                    return None;
                }
                Some(scale(&lhs.poly_coeffs(var)?, 1.0 / denom))
            }
            Expr::Pow(base, exp) if !exp.contains_variable(var) => {
                let e = exp.try_constant()?;
                if e < 0.0 || e.fract() != 0.0 || e > MAX_DEGREE as f64 {
                    return None;
                }
                let base = base.poly_coeffs(var)?;
                let mut res = vec![1.0];
                for _ in 0..e as usize {
                    res = bounded(mul(&res, &base))?;
                }
                Some(res)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_coefficients() {
        let expr = Expr::parse_expression("(x - 1)*(x + 3) - 2*x").unwrap();
        assert_eq!(expr.polynomial_coefficients("x"), Some(vec![-3.0, 0.0, 1.0]));
    }

    #[test]
    fn test_power_and_division_by_constant() {
        let expr = Expr::parse_expression("(2*x)^3/4 - 2^2").unwrap();
        assert_eq!(expr.polynomial_coefficients("x"), Some(vec![-4.0, 0.0, 0.0, 2.0]));
    }

    #[test]
    fn test_leading_terms_cancel() {
        let expr = Expr::parse_expression("x^2 + x - x^2").unwrap();
        let coeffs = expr.polynomial_coefficients("x").unwrap();
        assert_eq!(degree(&coeffs), 1);
    }

    #[test]
    fn test_degree_is_bounded() {
        let expr = Expr::parse_expression("x^64 - 2").unwrap();
        assert_eq!(degree(&expr.polynomial_coefficients("x").unwrap()), 64);
        for input in ["(x^64)^32 - 2", "x^65", "x^40*x^40"] {
            let expr = Expr::parse_expression(input).unwrap();
            assert_eq!(expr.polynomial_coefficients("x"), None, "{}", input);
        }
    }

    #[test]
    fn test_non_polynomials() {
        for input in ["sin(x)", "1/x", "x^0.5", "x*y", "2^x"] {
            let expr = Expr::parse_expression(input).unwrap();
            assert_eq!(expr.polynomial_coefficients("x"), None, "{}", input);
        }
    }
}
