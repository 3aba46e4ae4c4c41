//! Newton-Raphson solver for systems of nonlinear equations built on a symbolic Jacobian.
//!
//!  Example#1
//! ```
//!  use EqTaskGen::numerical::NR::NR;
//!  use EqTaskGen::symbolic::symbolic_engine::Expr;
//!  let mut NR_instanse = NR::new();
//!  let vec_of_expr = Expr::parse_vector_expression(vec!["x^2+y^2-10", "x-y-4"]).unwrap();
//!  let values = vec!["x".to_string(), "y".to_string()];
//!  NR_instanse
//!      .set_equation_system(vec_of_expr, Some(values), vec![1.0, 1.0], 1e-10, 100)
//!      .unwrap();
//!  let solution = NR_instanse.solve().unwrap();
//!  assert!((solution[0] - 3.0).abs() < 1e-8 && (solution[1] + 1.0).abs() < 1e-8);
//!  ```
//! Example#2
//!  ```
//!  // the Jacobian is generated once and reused for several starting points
//!  use EqTaskGen::numerical::NR::NR;
//!  use EqTaskGen::symbolic::symbolic_engine::Expr;
//!  let mut NR_instanse = NR::new();
//!  let vec_of_expr = Expr::parse_vector_expression(vec!["x^2-4"]).unwrap();
//!  NR_instanse
//!      .set_equation_system(vec_of_expr, None, vec![1.0], 1e-10, 100)
//!      .unwrap();
//!  NR_instanse.eq_generate();
//!  let positive = NR_instanse.main_loop().unwrap();
//!  NR_instanse.set_initial_guess(vec![-1.0]).unwrap();
//!  let negative = NR_instanse.main_loop().unwrap();
//!  assert!((positive[0] - 2.0).abs() < 1e-8 && (negative[0] + 2.0).abs() < 1e-8);
//!  ```

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_functions::Jacobian;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NRError {
    #[error("invalid setup of the Newton solver: {0}")]
    Setup(String),
    #[error("maximum number of iterations ({0}) reached")]
    NotConverged(usize),
    #[error("linear step failed at iteration {0}: {1}")]
    LinearStep(usize, String),
    #[error("residual is not finite at iteration {0}")]
    NonFinite(usize),
    #[error("deadline exceeded after {0} iterations")]
    Timeout(usize),
}

pub struct NR {
    pub jacobian: Jacobian,    // instance of Jacobian struct, contains jacobian matrix function and equation functions
    pub eq_system: Vec<Expr>,  // vector of equations (residuals, = 0)
    pub values: Vec<String>,   // vector of variables
    pub initial_guess: Vec<f64>,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub damping_factor: f64,
    pub deadline: Option<Instant>, // wall-clock limit checked between iterations
    pub i: usize,              // iteration counter
    pub result: Option<DVector<f64>>,
    max_error: f64,
    calc_statistics: HashMap<String, usize>,
}

impl Default for NR {
    fn default() -> Self {
        Self::new()
    }
}

impl NR {
    pub fn new() -> NR {
        NR {
            jacobian: Jacobian::new(),
            eq_system: Vec::new(),
            values: Vec::new(),
            initial_guess: Vec::new(),
            tolerance: 1e-10,
            max_iterations: 100,
            damping_factor: 1.0,
            deadline: None,
            i: 0,
            result: None,
            max_error: 0.0,
            calc_statistics: HashMap::new(),
        }
    }
    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    /// Basic method to set the equation system. When `unknowns` is `None` all variables of the
    /// system are unknowns (sorted by name).
    pub fn set_equation_system(
        &mut self,
        eq_system: Vec<Expr>,
        unknowns: Option<Vec<String>>,
        initial_guess: Vec<f64>,
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<(), NRError> {
        let values = match unknowns {
            Some(values) => values,
            None => {
                let mut args: Vec<String> = eq_system
                    .iter()
                    .flat_map(|x| x.all_arguments_are_variables())
                    .collect();
                args.sort();
                args.dedup();
                args
            }
        };
        if values.is_empty() || eq_system.is_empty() {
            return Err(NRError::Setup("no equations or no unknowns".to_string()));
        }
        if tolerance <= 0.0 || max_iterations == 0 {
            return Err(NRError::Setup(
                "tolerance and max_iterations should be positive".to_string(),
            ));
        }
        self.eq_system = eq_system;
        self.values = values;
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
        self.set_initial_guess(initial_guess)
    }

    pub fn set_initial_guess(&mut self, initial_guess: Vec<f64>) -> Result<(), NRError> {
        if initial_guess.len() != self.values.len() {
            return Err(NRError::Setup(format!(
                "initial guess has {} entries for {} unknowns",
                initial_guess.len(),
                self.values.len()
            )));
        }
        self.initial_guess = initial_guess;
        self.i = 0;
        self.max_error = 0.0;
        Ok(())
    }

    pub fn set_solver_params(
        &mut self,
        damping_factor: Option<f64>,
        deadline: Option<Instant>,
    ) -> Result<(), NRError> {
        if let Some(damping_factor) = damping_factor {
            if !(damping_factor > 0.0 && damping_factor <= 1.0) {
                return Err(NRError::Setup(
                    "damping factor should be in (0.0, 1.0]".to_string(),
                ));
            }
            self.damping_factor = damping_factor;
        }
        self.deadline = deadline;
        Ok(())
    }

    ///Set system of equations with vector of symbolic expressions
    pub fn eq_generate(&mut self) {
        self.jacobian = Jacobian::from_vectors(self.eq_system.clone(), &self.values);
    }
    /////////////////////////////////////////////////////////////////////////////////////////////
    //                ITERATIONS
    /////////////////////////////////////////////////////////////////////////////////////////////
    /// realize iteration of Newton-Raphson - calculate new iteration vector by using Jacobian matrix
    pub fn iteration(&self, x: &DVector<f64>) -> Result<DVector<f64>, NRError> {
        let new_j = self.jacobian.evaluate_func_jacobian_DMatrix(x.as_slice());
        let new_f = self.jacobian.evaluate_funvector_lambdified_DVector(x.as_slice());
        if new_f.iter().chain(new_j.iter()).any(|v| !v.is_finite()) {
            return Err(NRError::NonFinite(self.i));
        }
        let delta =
            Self::solve_linear_system(&new_j, &new_f).map_err(|e| NRError::LinearStep(self.i, e))?;
        Ok(x - self.damping_factor * delta)
    }

    /// euclidean norm of the residual vector at `x`
    pub fn residual_norm(&self, x: &DVector<f64>) -> f64 {
        self.jacobian
            .evaluate_funvector_lambdified_DVector(x.as_slice())
            .norm()
    }

    /// main function to solve the system of equations; `eq_generate` must have been called
    pub fn main_loop(&mut self) -> Result<DVector<f64>, NRError> {
        let mut x = DVector::from_vec(self.initial_guess.clone());
        self.i = 0;
        let residual_tolerance = self.tolerance.sqrt().max(self.tolerance);
        while self.i < self.max_iterations {
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                warn!("Newton iterations stopped by deadline");
                return Err(NRError::Timeout(self.i));
            }
            let new_x = self.iteration(&x)?;
            let error = (&new_x - &x).norm();
            if error > self.max_error && self.i > 0 {
                debug!("Error is increasing");
            }
            self.max_error = error;
            let residual = self.residual_norm(&new_x);
            if !residual.is_finite() {
                return Err(NRError::NonFinite(self.i));
            }
            self.i += 1;
            if residual <= self.tolerance
                || (error <= self.tolerance * (1.0 + new_x.norm()) && residual <= residual_tolerance)
            {
                debug!("converged after {} iterations, residual = {}", self.i, residual);
                self.result = Some(new_x.clone());
                return Ok(new_x);
            }
            x = new_x;
        }
        debug!("Maximum number of iterations reached. No solution found.");
        Err(NRError::NotConverged(self.max_iterations))
    }
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    //                                       main function to start the solver and caclulate statistics
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    pub fn solve(&mut self) -> Result<DVector<f64>, NRError> {
        let begin = Instant::now();
        self.eq_generate();
        let res = self.main_loop();
        let end = begin.elapsed();
        self.calc_statistics
            .insert("time elapsed, ms".to_string(), end.as_millis() as usize);
        self.calc_statistics();
        res
    }

    pub fn get_result(&self) -> Option<DVector<f64>> {
        self.result.clone()
    }

    fn calc_statistics(&self) {
        let mut stats = self.calc_statistics.clone();
        stats.insert(
            "number of jacobian elements".to_string(),
            self.eq_system.len() * self.values.len(),
        );
        stats.insert("length of y vector".to_string(), self.values.len());
        stats.insert("number of iterations".to_string(), self.i);
        let mut table = Builder::from(stats).build();
        table.with(Style::modern_rounded());
        info!("\n \n CALC STATISTICS \n \n {}", table.to_string());
    }
    //////////////////////////////////////////////////////////////////////////////////////////////
    //                  LINEAR SYSTEM SOLVERS
    //////////////////////////////////////////////////////////////////////////////////////////////
    /// Newton step `J delta = F`: LU for square nonsingular systems, SVD least squares otherwise
    pub fn solve_linear_system(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, String> {
        if A.is_square() {
            if let Some(x) = A.clone().lu().solve(b) {
                if x.iter().all(|v| v.is_finite()) {
                    return Ok(x);
                }
            }
        }
        A.clone()
            .svd(true, true)
            .solve(b, 1e-12)
            .map_err(|e| e.to_string())
    }
}
