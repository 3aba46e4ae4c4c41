//! Numerical building blocks of the bundled equation solver.
//!
/// Newton-Raphson method on a symbolic Jacobian with LU or least squares (SVD) steps
/// Example#1
/// ```
/// use EqTaskGen::numerical::NR::NR;
/// use EqTaskGen::symbolic::symbolic_engine::Expr;
/// let mut NR_instanse = NR::new();
/// let vec_of_expressions = Expr::parse_vector_expression(vec!["x^2+y^2-10", "x-y-4"]).unwrap();
/// NR_instanse
///     .set_equation_system(vec_of_expressions, None, vec![1.0, 1.0], 1e-10, 100)
///     .unwrap();
/// let result = NR_instanse.solve().unwrap();
/// assert!((result[0] - 3.0).abs() < 1e-8);
/// ```
pub mod NR;
/// Gauss-Jordan elimination telling apart unique, parametric and inconsistent linear systems
pub mod linear_system;
/// complex roots of univariate polynomials (closed forms and Aberth-Ehrlich iteration)
pub mod polynomial_roots;
