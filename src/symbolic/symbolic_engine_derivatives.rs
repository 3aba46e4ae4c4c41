//! # Differentiation, evaluation and parsing entry points of `Expr`
//!
//! - `diff(var)` analytical derivative, used to build Jacobians for the Newton solver and to
//!   detect linear systems (a residual is linear when all its derivatives are constant)
//! - `eval_with` / `eval_expression` / `lambdify` numerical evaluation
//! - `parse_expression` / `parse_vector_expression` string to `Expr`
//! - `all_arguments_are_variables` sorted, deduplicated variable names
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;

/// Function produced by [`Expr::lambdify`]: values are given in the order of the `vars` slice.
pub type LambdifiedFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules (sum, product, quotient, chain). For `Pow` with a
    /// non-constant exponent the general rule d(u^v) = u^v * (v' ln u + v u'/u) is used.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(self.clone()),
                Box::new(Expr::Add(
                    Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                    Box::new(Expr::Div(
                        Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                        base.clone(),
                    )),
                )),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// vector of partial derivatives in the order of `all_vars`
    pub fn diff_multi_args(&self, all_vars: &[String]) -> Vec<Expr> {
        all_vars.iter().map(|var| self.diff(var).simplify_()).collect()
    }

    /// EVALUATION

    /// Evaluates the expression, asking `lookup` for the value of every variable.
    /// Returns `None` as soon as a variable has no value.
    pub fn eval_with(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Option<f64> {
        let value = match self {
            Expr::Var(name) => lookup(name)?,
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_with(lookup)? + rhs.eval_with(lookup)?,
            Expr::Sub(lhs, rhs) => lhs.eval_with(lookup)? - rhs.eval_with(lookup)?,
            Expr::Mul(lhs, rhs) => lhs.eval_with(lookup)? * rhs.eval_with(lookup)?,
            Expr::Div(lhs, rhs) => lhs.eval_with(lookup)? / rhs.eval_with(lookup)?,
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_with(lookup)?;
                let exp_fn = exp.eval_with(lookup)?;
                if exp_fn.fract() == 0.0 && exp_fn.abs() <= i32::MAX as f64 {
                    base_fn.powi(exp_fn as i32)
                } else {
                    base_fn.powf(exp_fn)
                }
            }
            Expr::Exp(expr) => expr.eval_with(lookup)?.exp(),
            Expr::Ln(expr) => expr.eval_with(lookup)?.ln(),
            Expr::sin(expr) => expr.eval_with(lookup)?.sin(),
            Expr::cos(expr) => expr.eval_with(lookup)?.cos(),
            Expr::tg(expr) => expr.eval_with(lookup)?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_with(lookup)?.tan(),
            Expr::arcsin(expr) => expr.eval_with(lookup)?.asin(),
            Expr::arccos(expr) => expr.eval_with(lookup)?.acos(),
            Expr::arctg(expr) => expr.eval_with(lookup)?.atan(),
        };
        Some(value)
    }

    /// Evaluates the expression with variable values given positionally.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// Variables missing from `vars` evaluate to NaN.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> f64 {
        self.eval_with(&|name: &str| {
            vars.iter()
                .position(|&x| x == name)
                .and_then(|index| values.get(index).copied())
        })
        .unwrap_or(f64::NAN)
    }

    /// Turns the expression into a closure of positional arguments.
    pub fn lambdify(&self, vars: &[&str]) -> LambdifiedFn {
        let expr = self.clone();
        let vars: Vec<String> = vars.iter().map(|v| v.to_string()).collect();
        Box::new(move |values: &[f64]| {
            expr.eval_with(&|name: &str| {
                vars.iter()
                    .position(|x| x == name)
                    .and_then(|index| values.get(index).copied())
            })
            .unwrap_or(f64::NAN)
        })
    }

    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, var_name
    /// - Constants: 3.14, 2.5
    /// - Operators: +, -, *, /, ^ and ** for powers
    /// - Functions: sin, cos, tan/tg, cot/ctg, asin, acos, atan, exp, log/ln, sqrt
    /// - Parentheses for grouping
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        let expr = parse_expression_func(0, input)?;
        log::debug!("parsed '{}' as {}", input, expr);
        Ok(expr)
    }

    /// Parses multiple expressions, failing on the first malformed one.
    pub fn parse_vector_expression(input: Vec<&str>) -> Result<Vec<Expr>, String> {
        input.into_iter().map(Expr::parse_expression).collect()
    }

    /// Extracts all unique variable names from the symbolic expression, sorted.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            _ => {
                if let Some((_, lhs, rhs)) = self.as_binary() {
                    lhs.collect_variables(vars);
                    rhs.collect_variables(vars);
                } else if let Some((_, arg)) = self.as_function() {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diff_polynomial() {
        let expr = Expr::parse_expression("x^2 + 3*x*y").unwrap();
        let df_dx = expr.diff("x");
        let value = df_dx.eval_expression(&["x", "y"], &[2.0, 1.0]);
        assert_relative_eq!(value, 7.0, epsilon = 1e-12);
        let df_dy = expr.diff("y");
        assert_relative_eq!(df_dy.eval_expression(&["x", "y"], &[2.0, 1.0]), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_variable_exponent() {
        // d/dx 2^x = 2^x ln 2
        let expr = Expr::parse_expression("2^x").unwrap();
        let value = expr.diff("x").eval_expression(&["x"], &[3.0]);
        assert_relative_eq!(value, 8.0 * 2.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_diff_trig() {
        let expr = Expr::parse_expression("sin(x)*cos(x)").unwrap();
        let value = expr.diff("x").eval_expression(&["x"], &[0.3]);
        assert_relative_eq!(value, (2.0 * 0.3f64).cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify() {
        let expr = Expr::parse_expression("a*x - b").unwrap();
        let f = expr.lambdify(&["a", "x", "b"]);
        assert_relative_eq!(f(&[2.0, 5.0, 10.0]), 0.0);
        assert!(f(&[2.0]).is_nan());
    }

    #[test]
    fn test_all_arguments_are_variables() {
        let expr = Expr::parse_expression("y*z + x^2 + x").unwrap();
        assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_parse_vector_expression_reports_error() {
        assert!(Expr::parse_vector_expression(vec!["x+1", "(x"]).is_err());
        assert_eq!(Expr::parse_vector_expression(vec!["x", "2"]).unwrap().len(), 2);
    }
}
