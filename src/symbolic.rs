#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use EqTaskGen::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2.3* log(x+y+y^2.6)").unwrap();
/// let parsed_function = parsed_expression.lambdify(&["x", "y"]);
/// assert!(parsed_function(&[1.0, 2.0]).is_finite());
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) turns a symbolic expression into a Rust function
/// 3) differentiates, substitutes and simplifies symbolic expressions
///# Example#
/// ```
/// use EqTaskGen::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("exp(x)+log(y)").unwrap();
/// // return vec of all arguments
/// let all = parsed_expression.all_arguments_are_variables();
/// assert_eq!(all, vec!["x", "y"]);
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x").simplify_();
/// assert_eq!(df_dx.eval_expression(&["x"], &[0.0]), 1.0);
/// // convert symbolic expression to a Rust function and evaluate the function
/// let function_of_x_and_y = parsed_expression.lambdify(&["x", "y"]);
/// assert_eq!(function_of_x_and_y(&[0.0, 1.0]), 1.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// algebraic clean-up of expressions
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
///
/// calculate symbolic jacobian and evaluate it
pub mod symbolic_functions;
/// coefficients of an expression seen as a polynomial in one variable
pub mod polynomial;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
