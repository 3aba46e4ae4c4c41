//! The solver capability used by the sampler and its bundled numeric backend.
//!
//! A solver takes an ordered equation system and the list of unknowns and answers with one of
//! four shapes: nothing, a single value, a mapping unknown -> value, or a list of positional
//! solution tuples. Values may be real or complex scalars, several roots, or an expression of
//! other unknowns when the system has a whole family of solutions.
//!
//! `NumericSolver` works in stages:
//! 1. equations `symbol = number` for symbols that are not unknowns are substituted into the
//!    rest, constant-only equations are checked;
//! 2. one unknown and polynomial equations: all complex roots;
//! 3. constant Jacobian: Gauss-Jordan elimination (unique, family or no solution);
//! 4. anything else: Newton-Raphson from several deterministic starting points.
//!
//! Example#
//! ```
//! use EqTaskGen::generator::equation::parse_equations;
//! use EqTaskGen::generator::normalizer::TokenizationPolicy;
//! use EqTaskGen::generator::solver::{NumericSolver, Solver, SolverOutput};
//! use EqTaskGen::generator::variables::Symbol;
//! let equations = parse_equations(&["x + y = 10", "x - y = 2"], TokenizationPolicy::MultiLetter).unwrap();
//! let solver = NumericSolver::default();
//! let output = solver.solve(&equations, &[Symbol::from("x"), Symbol::from("y")]).unwrap();
//! assert!(matches!(output, SolverOutput::Mapping(_)));
//! ```
use crate::generator::equation::Equation;
use crate::generator::errors::SolverFailure;
use crate::generator::variables::Symbol;
use crate::global::THRESHOLD;
use crate::numerical::NR::{NR, NRError};
use crate::numerical::linear_system::{LinearFamily, LinearResult, solve_linear_system};
use crate::numerical::polynomial_roots::{RootsError, polynomial_roots};
use crate::symbolic::polynomial::degree;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_functions::Jacobian;
use log::debug;
use nalgebra::DVector;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// two solutions closer than this (relative) are the same solution
const SAME_SOLUTION: f64 = 1e-6;
/// seed of the random Newton starting points, fixed so that solving is reproducible
const START_SEED: u64 = 20_240_601;
/// random starting points are drawn from [-START_RADIUS, START_RADIUS]
const START_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum SolvedValue {
    Scalar(Complex64),
    /// several roots, sorted by (real, imaginary) part
    Roots(Vec<Complex64>),
    /// value in terms of other unknowns (parametric family)
    Expression(Expr),
}

impl SolvedValue {
    pub fn real(value: f64) -> Self {
        SolvedValue::Scalar(Complex64::new(value, 0.0))
    }

    /// real part if the value is a single real number
    pub fn as_real(&self) -> Option<f64> {
        match self {
            SolvedValue::Scalar(z) if z.im == 0.0 => Some(z.re),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverOutput {
    Empty,
    Single(SolvedValue),
    Mapping(BTreeMap<Symbol, SolvedValue>),
    /// one tuple per solution branch, components ordered like `unknowns`
    Positional {
        unknowns: Vec<Symbol>,
        tuples: Vec<Vec<SolvedValue>>,
    },
}

pub trait Solver: Sync {
    fn solve(&self, equations: &[Equation], unknowns: &[Symbol]) -> Result<SolverOutput, SolverFailure>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// number of Newton starting points
    pub starts: usize,
    /// wall-clock limit of one `solve` call
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 1e-10,
            max_iterations: 100,
            starts: 8,
            timeout: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumericSolver {
    pub config: SolverConfig,
}

/// the system after the known values have been substituted
struct Reduced {
    residuals: Vec<Expr>,
    /// unknowns that still occur in some residual, in the caller's order
    active: Vec<String>,
}

impl NumericSolver {
    pub fn new(config: SolverConfig) -> Self {
        NumericSolver { config }
    }

    fn reduce(&self, equations: &[Equation], unknowns: &[Symbol]) -> Result<Option<Reduced>, SolverFailure> {
        let mut fixed: HashMap<String, f64> = HashMap::new();
        let mut residuals = Vec::new();
        for equation in equations {
            match equation.as_fixing() {
                Some((symbol, value)) if !unknowns.contains(&symbol) => {
                    if let Some(previous) = fixed.get(symbol.name()) {
                        if (previous - value).abs() > THRESHOLD * (1.0 + value.abs()) {
                            return Err(SolverFailure::Inconsistent);
                        }
                    } else {
                        fixed.insert(symbol.name().to_string(), value);
                    }
                }
                _ => residuals.push(equation.residual()),
            }
        }
        let mut reduced = Vec::with_capacity(residuals.len());
        for residual in residuals {
            let residual = residual.set_variable_from_map(&fixed).simplify_();
            if residual.all_arguments_are_variables().is_empty() {
                match residual.try_constant() {
                    Some(c) if c.abs() <= THRESHOLD => continue,
                    _ => {
                        debug!("constant equation {} = 0 does not hold", residual);
                        return Ok(None);
                    }
                }
            }
            reduced.push(residual);
        }
        let mut unresolved: Vec<String> = reduced
            .iter()
            .flat_map(|r| r.all_arguments_are_variables())
            .filter(|name| !unknowns.iter().any(|u| u.name() == name))
            .collect();
        unresolved.sort();
        unresolved.dedup();
        if !unresolved.is_empty() {
            return Err(SolverFailure::UnresolvedVariables(unresolved));
        }
        let active = unknowns
            .iter()
            .filter(|u| reduced.iter().any(|r| r.contains_variable(u.name())))
            .map(|u| u.name().to_string())
            .collect();
        Ok(Some(Reduced {
            residuals: reduced,
            active,
        }))
    }

    /// all complex roots of a system of polynomial equations in one unknown
    fn solve_polynomial(
        &self,
        polynomials: &[Vec<f64>],
        deadline: Instant,
        begin: Instant,
    ) -> Result<Vec<Complex64>, SolverFailure> {
        let mut nontrivial: Vec<&Vec<f64>> = Vec::new();
        for p in polynomials {
            if degree(p) == 0 {
                if p[0].abs() > THRESHOLD {
                    return Ok(Vec::new());
                }
            } else {
                nontrivial.push(p);
            }
        }
        let Some(lowest) = nontrivial.iter().min_by_key(|p| degree(p)) else {
            return Ok(Vec::new());
        };
        let max_iterations = self.config.max_iterations.max(200);
        let mut roots = polynomial_roots(lowest, self.config.tolerance, max_iterations, Some(deadline))
            .map_err(|e| match e {
                RootsError::Timeout(_) => SolverFailure::Timeout(begin.elapsed().as_millis()),
                RootsError::NotConverged(_) => SolverFailure::NotConverged(e.to_string()),
            })?;
        roots.retain(|z| nontrivial.iter().all(|p| vanishes_at(p, *z)));
        roots.dedup_by(|a, b| (*a - *b).norm() <= SAME_SOLUTION * (1.0 + b.norm()));
        Ok(roots)
    }

    /// Newton-Raphson from several starting points, distinct converged solutions sorted
    fn solve_newton(
        &self,
        reduced: &Reduced,
        jacobian: Jacobian,
        deadline: Instant,
        begin: Instant,
    ) -> Result<Vec<DVector<f64>>, SolverFailure> {
        let n = reduced.active.len();
        let mut NR_instanse = NR::new();
        NR_instanse
            .set_equation_system(
                reduced.residuals.clone(),
                Some(reduced.active.clone()),
                vec![1.0; n],
                self.config.tolerance,
                self.config.max_iterations,
            )
            .and_then(|_| NR_instanse.set_solver_params(None, Some(deadline)))
            .map_err(|e| SolverFailure::Unsupported(e.to_string()))?;
        NR_instanse.jacobian = jacobian;

        let mut rng = StdRng::seed_from_u64(START_SEED);
        let mut starts = vec![vec![1.0; n], vec![-1.0; n]];
        while starts.len() < self.config.starts.max(1) {
            starts.push((0..n).map(|_| rng.random_range(-START_RADIUS..=START_RADIUS)).collect());
        }
        starts.truncate(self.config.starts.max(1));

        let mut solutions: Vec<DVector<f64>> = Vec::new();
        let mut last_error = NRError::NotConverged(self.config.max_iterations);
        for start in starts {
            NR_instanse
                .set_initial_guess(start)
                .map_err(|e| SolverFailure::Unsupported(e.to_string()))?;
            match NR_instanse.main_loop() {
                Ok(x) => {
                    let x = x.map(|v| v + 0.0);
                    let seen = solutions
                        .iter()
                        .any(|s| (s - &x).amax() <= SAME_SOLUTION * (1.0 + x.amax()));
                    if !seen {
                        solutions.push(x);
                    }
                }
                Err(NRError::Timeout(_)) => {
                    return Err(SolverFailure::Timeout(begin.elapsed().as_millis()));
                }
                Err(e) => {
                    debug!("Newton start failed: {}", e);
                    last_error = e;
                }
            }
        }
        if solutions.is_empty() {
            return Err(SolverFailure::NotConverged(last_error.to_string()));
        }
        solutions.sort_by(|a, b| {
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(solutions)
    }
}

/// true if the polynomial vanishes at `z` up to rounding
fn vanishes_at(coeffs: &[f64], z: Complex64) -> bool {
    let value = coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + *c);
    let scale: f64 = coeffs
        .iter()
        .enumerate()
        .map(|(k, c)| c.abs() * z.norm().powi(k as i32))
        .sum();
    value.norm() <= SAME_SOLUTION * (1.0 + scale)
}

/// `x_pivot = c - sum a_j x_free_j` as expressions, free unknowns map to themselves
fn family_to_values(family: &LinearFamily, names: &[String]) -> BTreeMap<Symbol, SolvedValue> {
    let mut values = BTreeMap::new();
    for (k, pivot) in family.pivot_columns.iter().enumerate() {
        let mut expr = Expr::Const(family.constants[k]);
        for (j, free) in family.free_columns.iter().enumerate() {
            let a = family.coefficients[k][j];
            if a.abs() > THRESHOLD {
                expr = Expr::Sub(
                    Box::new(expr),
                    Box::new(Expr::Mul(
                        Box::new(Expr::Const(a)),
                        Box::new(Expr::Var(names[*free].clone())),
                    )),
                );
            }
        }
        values.insert(Symbol::new(names[*pivot].as_str()), SolvedValue::Expression(expr.simplify_()));
    }
    for free in &family.free_columns {
        values.insert(
            Symbol::new(names[*free].as_str()),
            SolvedValue::Expression(Expr::Var(names[*free].clone())),
        );
    }
    values
}

impl Solver for NumericSolver {
    fn solve(&self, equations: &[Equation], unknowns: &[Symbol]) -> Result<SolverOutput, SolverFailure> {
        let begin = Instant::now();
        let deadline = begin + self.config.timeout;
        let Some(reduced) = self.reduce(equations, unknowns)? else {
            return Ok(SolverOutput::Empty);
        };
        if reduced.active.is_empty() {
            return Ok(SolverOutput::Empty);
        }
        let single_unknown = unknowns.len() == 1;

        // one unknown, polynomial equations
        if reduced.active.len() == 1 {
            let var = &reduced.active[0];
            let polynomials: Option<Vec<Vec<f64>>> = reduced
                .residuals
                .iter()
                .map(|r| r.polynomial_coefficients(var))
                .collect();
            if let Some(polynomials) = polynomials {
                let roots = self.solve_polynomial(&polynomials, deadline, begin)?;
                debug!("{} roots for {}", roots.len(), var);
                let value = match roots.len() {
                    0 => return Ok(SolverOutput::Empty),
                    1 => SolvedValue::Scalar(roots[0]),
                    _ => SolvedValue::Roots(roots),
                };
                if single_unknown {
                    return Ok(SolverOutput::Single(value));
                }
                return Ok(SolverOutput::Mapping(BTreeMap::from([(
                    Symbol::new(var.as_str()),
                    value,
                )])));
            }
        }

        // linear system
        let jacobian = Jacobian::from_vectors(reduced.residuals.clone(), &reduced.active);
        if jacobian.is_constant() {
            let origin = vec![0.0; reduced.active.len()];
            let a = jacobian.evaluate_func_jacobian_DMatrix(&origin);
            let b = -jacobian.evaluate_funvector_lambdified_DVector(&origin);
            if a.iter().chain(b.iter()).all(|v| v.is_finite()) {
                return Ok(match solve_linear_system(&a, &b) {
                    LinearResult::Unique(x) => SolverOutput::Mapping(
                        reduced
                            .active
                            .iter()
                            .zip(x.iter())
                            .map(|(name, v)| (Symbol::new(name.as_str()), SolvedValue::real(v + 0.0)))
                            .collect(),
                    ),
                    LinearResult::Infinite(family) => {
                        debug!("linear system has a family of solutions of rank {}", family.rank());
                        SolverOutput::Mapping(family_to_values(&family, &reduced.active))
                    }
                    LinearResult::Inconsistent(row) => {
                        debug!("linear system is inconsistent in row {}", row);
                        SolverOutput::Empty
                    }
                });
            }
        }

        // nonlinear system
        let solutions = self.solve_newton(&reduced, jacobian, deadline, begin)?;
        if solutions.len() > 1 {
            debug!("{} distinct real solutions found", solutions.len());
            return Ok(SolverOutput::Positional {
                unknowns: reduced.active.iter().map(|n| Symbol::new(n.as_str())).collect(),
                tuples: solutions
                    .iter()
                    .map(|x| x.iter().map(|v| SolvedValue::real(*v)).collect())
                    .collect(),
            });
        }
        let x = &solutions[0];
        if single_unknown {
            return Ok(SolverOutput::Single(SolvedValue::real(x[0])));
        }
        Ok(SolverOutput::Mapping(
            reduced
                .active
                .iter()
                .zip(x.iter())
                .map(|(name, v)| (Symbol::new(name.as_str()), SolvedValue::real(*v)))
                .collect(),
        ))
    }
}
