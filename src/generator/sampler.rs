//! Drawing of free values and solving of the augmented system, one instance after another.
use crate::generator::classifier::VariableClassification;
use crate::generator::equation::Equation;
use crate::generator::errors::{Result, SolverFailure};
use crate::generator::input::check_range;
use crate::generator::solver::{Solver, SolverOutput};
use crate::generator::variables::Symbol;
use crate::global::{DEFAULT_COUNT, DEFAULT_PRECISION, DEFAULT_RANGE};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

/// Sampling parameters of free variables. Variables without an entry get the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// inclusive [low, high] per variable
    pub ranges: BTreeMap<Symbol, (f64, f64)>,
    /// decimal digits per variable
    pub precisions: BTreeMap<Symbol, u32>,
    pub count: usize,
    /// `None` seeds from the operating system
    pub seed: Option<u64>,
    /// solve instances on the rayon thread pool
    pub parallel: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            ranges: BTreeMap::new(),
            precisions: BTreeMap::new(),
            count: DEFAULT_COUNT,
            seed: None,
            parallel: false,
        }
    }
}

impl SamplingConfig {
    pub fn range_of(&self, symbol: &Symbol) -> (f64, f64) {
        self.ranges.get(symbol).copied().unwrap_or(DEFAULT_RANGE)
    }

    pub fn precision_of(&self, symbol: &Symbol) -> u32 {
        self.precisions.get(symbol).copied().unwrap_or(DEFAULT_PRECISION)
    }

    pub fn validate(&self) -> Result<()> {
        for (symbol, (low, high)) in &self.ranges {
            check_range(symbol.name(), *low, *high)?;
        }
        Ok(())
    }
}

/// One generated instance before normalization: drawn free values and what the solver said.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInstance {
    pub drawn: BTreeMap<Symbol, f64>,
    pub result: std::result::Result<SolverOutput, SolverFailure>,
}

/// rounds half away from zero to `digits` decimals
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// A value of `[low, high]`, rounded and kept inside the range.
pub fn draw_value<R: Rng>(rng: &mut R, (low, high): (f64, f64), digits: u32) -> f64 {
    let value = if low < high {
        rng.random_range(low..=high)
    } else {
        low
    };
    round_to(value, digits).clamp(low, high)
}

/// Draws the free values of `count` instances from one generator, in order.
pub fn draw_free_values(free: &[Symbol], config: &SamplingConfig) -> Vec<BTreeMap<Symbol, f64>> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    (0..config.count)
        .map(|_| {
            free.iter()
                .map(|symbol| {
                    let value = draw_value(&mut rng, config.range_of(symbol), config.precision_of(symbol));
                    (symbol.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// base equations followed by the known and then the drawn fixings
pub fn augment(
    equations: &[Equation],
    classification: &VariableClassification,
    drawn: &BTreeMap<Symbol, f64>,
) -> Vec<Equation> {
    let mut system = equations.to_vec();
    system.extend(classification.known.iter().map(|(s, v)| Equation::fixing(s, *v)));
    system.extend(drawn.iter().map(|(s, v)| Equation::fixing(s, *v)));
    system
}

fn solve_instance<S: Solver + ?Sized>(
    solver: &S,
    equations: &[Equation],
    classification: &VariableClassification,
    drawn: BTreeMap<Symbol, f64>,
) -> RawInstance {
    let system = augment(equations, classification, &drawn);
    let result = solver.solve(&system, &classification.target);
    if let Err(failure) = &result {
        warn!("instance {:?} has no solution: {}", drawn, failure);
    }
    RawInstance { drawn, result }
}

/// Generates `config.count` instances. A solver failure is kept inside its instance and
/// never stops the batch.
///
/// Example#
/// ```
/// use EqTaskGen::generator::classifier::{classify, TargetConflictPolicy};
/// use EqTaskGen::generator::equation::parse_equations;
/// use EqTaskGen::generator::normalizer::TokenizationPolicy;
/// use EqTaskGen::generator::sampler::{sample_instances, SamplingConfig};
/// use EqTaskGen::generator::solver::NumericSolver;
/// use EqTaskGen::generator::variables::Symbol;
/// use std::collections::BTreeMap;
/// let equations = parse_equations(&["v = s/t"], TokenizationPolicy::MultiLetter).unwrap();
/// let all = vec![Symbol::from("s"), Symbol::from("t"), Symbol::from("v")];
/// let classification = classify(&all, &BTreeMap::new(), &[Symbol::from("v")], TargetConflictPolicy::Reject).unwrap();
/// let config = SamplingConfig { count: 3, seed: Some(7), ..SamplingConfig::default() };
/// let instances = sample_instances(&equations, &classification, &config, &NumericSolver::default()).unwrap();
/// assert_eq!(instances.len(), 3);
/// assert!(instances.iter().all(|i| i.result.is_ok()));
/// ```
pub fn sample_instances<S: Solver + ?Sized>(
    equations: &[Equation],
    classification: &VariableClassification,
    config: &SamplingConfig,
    solver: &S,
) -> Result<Vec<RawInstance>> {
    config.validate()?;
    let begin = Instant::now();
    let draws = draw_free_values(&classification.free, config);
    debug!("{} draws of {} free variables", draws.len(), classification.free.len());
    let instances: Vec<RawInstance> = if config.parallel {
        draws
            .into_par_iter()
            .map(|drawn| solve_instance(solver, equations, classification, drawn))
            .collect()
    } else {
        draws
            .into_iter()
            .map(|drawn| solve_instance(solver, equations, classification, drawn))
            .collect()
    };
    info!(
        "{} instances generated in {} ms",
        instances.len(),
        begin.elapsed().as_millis()
    );
    Ok(instances)
}
