use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_engine_derivatives::LambdifiedFn;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
///
/// calculate symbolic jacobian and evaluate it
/// Example#
/// ```
/// use EqTaskGen::symbolic::symbolic_functions::Jacobian;
/// let mut Jacobian_instance = Jacobian::new();
/// // function of 2 or more arguments
/// let vec_of_expressions = vec!["2*x^3+y".to_string(), "1".to_string()];
/// // set vector of functions
/// Jacobian_instance.set_funcvecor_from_str(vec_of_expressions).unwrap();
/// // set vector of variables
/// Jacobian_instance.set_variables(vec!["x", "y"]);
/// // calculate symbolic jacobian
/// Jacobian_instance.calc_jacobian();
/// // generate jacobian made of regular rust functions
/// Jacobian_instance.jacobian_generate();
/// Jacobian_instance.lambdify_funcvector();
/// let jac = Jacobian_instance.evaluate_func_jacobian_DMatrix(&[10.0, 2.0]);
/// assert_eq!(jac[(0, 0)], 600.0);
/// let f = Jacobian_instance.evaluate_funvector_lambdified_DVector(&[10.0, 2.0]);
/// assert_eq!(f[0], 2002.0);
/// ```
pub struct Jacobian {
    pub vector_of_functions: Vec<Expr>, // vector of symbolic functions/expressions
    pub lambdified_functions: Vec<LambdifiedFn>, // symbolic functions converted to rust functions
    pub variable_string: Vec<String>,   // vector of string representation of variables
    pub symbolic_jacobian: Vec<Vec<Expr>>, // vector of symbolic jacobian
    pub readable_jacobian: Vec<Vec<String>>, // human readable jacobian
    pub function_jacobian: Vec<Vec<LambdifiedFn>>,
}

impl Default for Jacobian {
    fn default() -> Self {
        Self::new()
    }
}

impl Jacobian {
    pub fn new() -> Self {
        Self {
            vector_of_functions: Vec::new(),
            lambdified_functions: Vec::new(),
            variable_string: Vec::new(),
            symbolic_jacobian: Vec::new(),
            readable_jacobian: Vec::new(),
            function_jacobian: Vec::new(),
        }
    }

    /// builds everything needed by the Newton solver in one go
    pub fn from_vectors(vector_of_functions: Vec<Expr>, variables: &[String]) -> Self {
        let mut jac = Self::new();
        jac.set_vector_of_functions(vector_of_functions);
        jac.variable_string = variables.to_vec();
        jac.calc_jacobian();
        jac.jacobian_generate();
        jac.lambdify_funcvector();
        jac
    }

    pub fn set_vector_of_functions(&mut self, value: Vec<Expr>) {
        self.vector_of_functions = value;
    }

    pub fn set_funcvecor_from_str(&mut self, value: Vec<String>) -> Result<(), String> {
        self.vector_of_functions = value
            .iter()
            .map(|s| Expr::parse_expression(s))
            .collect::<Result<Vec<Expr>, String>>()?;
        Ok(())
    }

    pub fn set_variables(&mut self, varvec: Vec<&str>) {
        self.variable_string = varvec.iter().map(|v| v.to_string()).collect();
    }

    /// turn jacobian into readable format
    pub fn readable_jacobian(&mut self) {
        self.readable_jacobian = self
            .symbolic_jacobian
            .iter()
            .map(|row| row.iter().map(|el| el.to_string()).collect())
            .collect();
    }

    /// calculate the symbolic jacobian in parallel
    pub fn calc_jacobian(&mut self) {
        let variable_string_vec = &self.variable_string;
        self.symbolic_jacobian = self
            .vector_of_functions
            .par_iter()
            .map(|func| func.diff_multi_args(variable_string_vec))
            .collect();
    }

    /// true if no entry of the jacobian depends on any variable, i.e. the system is linear
    pub fn is_constant(&self) -> bool {
        self.symbolic_jacobian
            .iter()
            .flatten()
            .all(|el| el.all_arguments_are_variables().is_empty())
    }

    //////////////////////////////JACOBIAN AND RESIDUAL VECTOR IN VECTOR FORM FOR
    ///////                               NONLINEAR SOLVERS           ///////////////////////////
    /// creating function jacobian a matrix of functions with partial derivatives
    pub fn jacobian_generate(&mut self) {
        let variable_str: Vec<&str> = self.variable_string.iter().map(|s| s.as_str()).collect();
        self.function_jacobian = self
            .symbolic_jacobian
            .par_iter()
            .map(|row| row.iter().map(|el| el.lambdify(&variable_str)).collect())
            .collect();
    }

    pub fn lambdify_funcvector(&mut self) {
        let variable_str: Vec<&str> = self.variable_string.iter().map(|s| s.as_str()).collect();
        self.lambdified_functions = self
            .vector_of_functions
            .iter()
            .map(|func| func.lambdify(&variable_str))
            .collect();
    }

    // evaluate jacobian to nalgebra DMatrix
    pub fn evaluate_func_jacobian_DMatrix(&self, x: &[f64]) -> DMatrix<f64> {
        let rows = self.function_jacobian.len();
        let cols = self.variable_string.len();
        DMatrix::from_fn(rows, cols, |i, j| self.function_jacobian[i][j](x))
    }

    pub fn evaluate_funvector_lambdified_DVector(&self, arg_values: &[f64]) -> DVector<f64> {
        DVector::from_iterator(
            self.lambdified_functions.len(),
            self.lambdified_functions.iter().map(|func| func(arg_values)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jacobian_of_nonlinear_system() {
        let eqs = Expr::parse_vector_expression(vec!["x^2+y^2-10", "x-y-4"]).unwrap();
        let jac = Jacobian::from_vectors(eqs, &["x".to_string(), "y".to_string()]);
        assert!(!jac.is_constant());
        let m = jac.evaluate_func_jacobian_DMatrix(&[1.0, 2.0]);
        assert_eq!(m, DMatrix::from_row_slice(2, 2, &[2.0, 4.0, 1.0, -1.0]));
        let f = jac.evaluate_funvector_lambdified_DVector(&[1.0, 2.0]);
        assert_eq!(f, DVector::from_vec(vec![-5.0, -5.0]));
    }

    #[test]
    fn test_linear_system_has_constant_jacobian() {
        let eqs = Expr::parse_vector_expression(vec!["x+y-10", "x-y-2"]).unwrap();
        let mut jac = Jacobian::from_vectors(eqs, &["x".to_string(), "y".to_string()]);
        assert!(jac.is_constant());
        jac.readable_jacobian();
        assert_eq!(jac.readable_jacobian[1], vec!["1".to_string(), "-1".to_string()]);
    }
}
