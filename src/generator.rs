//! Generation of randomized practice problems from equation systems.
//!
/// error types of the generator and of the solver backend
pub mod errors;
/// canonical text of an equation before it meets the expression parser
pub mod normalizer;
/// variable symbols found in equation text
pub mod variables;
/// `lhs = rhs` lines turned into symbolic equations
pub mod equation;
/// validation of values typed by the user: known values, ranges, precisions
pub mod input;
/// partition of the variables into known, target and free
pub mod classifier;
/// the solver seam and the bundled numeric solver
///
/// Example#
/// ```
/// use EqTaskGen::generator::equation::parse_equations;
/// use EqTaskGen::generator::normalizer::TokenizationPolicy;
/// use EqTaskGen::generator::solver::{NumericSolver, Solver, SolverOutput};
/// use EqTaskGen::generator::variables::Symbol;
/// let equations = parse_equations(&["x^2 = 4"], TokenizationPolicy::MultiLetter).unwrap();
/// let output = NumericSolver::default().solve(&equations, &[Symbol::from("x")]).unwrap();
/// assert!(matches!(output, SolverOutput::Single(_)));
/// ```
pub mod solver;
/// random draws of free variables, one solver call per instance
pub mod sampler;
/// solver results turned into one cell per variable
pub mod solution;
/// placeholder substitution in task texts
pub mod templater;
/// answer table and run statistics
pub mod table;
/// task documents
pub mod config;
/// the stages of a generation run
pub mod pipeline;
