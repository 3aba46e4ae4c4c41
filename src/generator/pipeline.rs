//! The generation run as a chain of stages
//! `CollectEquations -> ClassifyVariables -> ConfigureSampling -> GenerateInstances -> RenderTasks`.
//! Every stage owns the results of the previous ones and is consumed by the transition to the
//! next, so a run can only move forward and no state is shared between runs.
//!
//! Example#
//! ```
//! use EqTaskGen::generator::classifier::TargetConflictPolicy;
//! use EqTaskGen::generator::normalizer::TokenizationPolicy;
//! use EqTaskGen::generator::pipeline::CollectEquations;
//! use EqTaskGen::generator::sampler::SamplingConfig;
//! use EqTaskGen::generator::solver::NumericSolver;
//! use EqTaskGen::generator::variables::Symbol;
//! use std::collections::BTreeMap;
//! let done = CollectEquations::new(TokenizationPolicy::MultiLetter)
//!     .collect(&["x+y=10", "x-y=2"])
//!     .unwrap()
//!     .classify(&BTreeMap::new(), &[Symbol::from("x"), Symbol::from("y")], TargetConflictPolicy::Reject)
//!     .unwrap()
//!     .configure(SamplingConfig { count: 1, seed: Some(1), ..SamplingConfig::default() })
//!     .unwrap()
//!     .generate(&NumericSolver::default())
//!     .unwrap();
//! assert_eq!(done.records()[1], vec!["6.0000", "4.0000"]);
//! ```
use crate::Utils::logger::{save_table_csv, save_text};
use crate::generator::classifier::{TargetConflictPolicy, VariableClassification, classify};
use crate::generator::config::{OutputConfig, TaskConfig};
use crate::generator::equation::{Equation, parse_equations};
use crate::generator::errors::{Result, TaskGenError};
use crate::generator::input::parse_known_value;
use crate::generator::normalizer::TokenizationPolicy;
use crate::generator::sampler::{SamplingConfig, sample_instances};
use crate::generator::solution::{SolvedInstance, normalize_instances};
use crate::generator::solver::{NumericSolver, Solver};
use crate::generator::table::{BatchStatistics, render_table, table_records};
use crate::generator::templater::render_tasks;
use crate::generator::variables::{Symbol, extract_from_lines};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;

/// First stage: nothing collected yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectEquations {
    policy: TokenizationPolicy,
}

impl CollectEquations {
    pub fn new(policy: TokenizationPolicy) -> Self {
        CollectEquations { policy }
    }

    /// Parses the equation lines (blank ones skipped) and extracts the variable set.
    /// A malformed line rejects the whole input, so the caller may fix it and call again.
    pub fn collect<S: AsRef<str>>(self, lines: &[S]) -> Result<ClassifyVariables> {
        let equations = parse_equations(lines, self.policy)?;
        let variables = extract_from_lines(lines, self.policy);
        info!(
            "{} equations in variables {:?}",
            equations.len(),
            variables.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Ok(ClassifyVariables {
            equations,
            variables,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassifyVariables {
    equations: Vec<Equation>,
    variables: Vec<Symbol>,
}

impl ClassifyVariables {
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// all variables, sorted by name
    pub fn variables(&self) -> &[Symbol] {
        &self.variables
    }

    pub fn classify(
        self,
        known: &BTreeMap<Symbol, f64>,
        targets: &[Symbol],
        policy: TargetConflictPolicy,
    ) -> Result<ConfigureSampling> {
        let classification = classify(&self.variables, known, targets, policy)?;
        Ok(ConfigureSampling {
            equations: self.equations,
            variables: self.variables,
            classification,
        })
    }

    /// Same as `classify`, with known values given as typed text; empty text means unknown.
    pub fn classify_from_text(
        self,
        known: &[(&str, &str)],
        targets: &[&str],
        policy: TargetConflictPolicy,
    ) -> Result<ConfigureSampling> {
        let mut known_values = BTreeMap::new();
        for (name, text) in known {
            if let Some(value) = parse_known_value(name, text)? {
                known_values.insert(Symbol::new(*name), value);
            }
        }
        let targets: Vec<Symbol> = targets.iter().map(|t| Symbol::new(*t)).collect();
        self.classify(&known_values, &targets, policy)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigureSampling {
    equations: Vec<Equation>,
    variables: Vec<Symbol>,
    classification: VariableClassification,
}

impl ConfigureSampling {
    pub fn classification(&self) -> &VariableClassification {
        &self.classification
    }

    /// Ranges and precisions may only name variables of the system; entries for variables
    /// that are not free are ignored.
    pub fn configure(self, mut sampling: SamplingConfig) -> Result<GenerateInstances> {
        sampling.validate()?;
        let names = sampling.ranges.keys().chain(sampling.precisions.keys());
        if let Some(stranger) = names.clone().find(|s| !self.variables.contains(*s)) {
            return Err(TaskGenError::UnknownVariable(stranger.to_string()));
        }
        let ignored: Vec<Symbol> = names
            .filter(|s| !self.classification.is_free(*s))
            .cloned()
            .collect();
        for symbol in &ignored {
            warn!("'{}' is not a free variable, its sampling settings are ignored", symbol);
            sampling.ranges.remove(symbol);
            sampling.precisions.remove(symbol);
        }
        Ok(GenerateInstances {
            equations: self.equations,
            variables: self.variables,
            classification: self.classification,
            sampling,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GenerateInstances {
    equations: Vec<Equation>,
    variables: Vec<Symbol>,
    classification: VariableClassification,
    sampling: SamplingConfig,
}

impl GenerateInstances {
    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Draws and solves all instances; always yields `count` rows.
    pub fn generate<S: Solver + ?Sized>(self, solver: &S) -> Result<RenderTasks> {
        let begin = Instant::now();
        let raws = sample_instances(&self.equations, &self.classification, &self.sampling, solver)?;
        let instances = normalize_instances(&raws, &self.variables, &self.classification);
        let statistics = BatchStatistics::from_instances(&instances, begin.elapsed());
        statistics.log();
        Ok(RenderTasks {
            variables: self.variables,
            instances,
            statistics,
        })
    }
}

/// Last stage: the generated rows, ready to be rendered.
#[derive(Debug, Clone)]
pub struct RenderTasks {
    variables: Vec<Symbol>,
    instances: Vec<SolvedInstance>,
    statistics: BatchStatistics,
}

impl RenderTasks {
    pub fn variables(&self) -> &[Symbol] {
        &self.variables
    }

    pub fn instances(&self) -> &[SolvedInstance] {
        &self.instances
    }

    pub fn statistics(&self) -> &BatchStatistics {
        &self.statistics
    }

    pub fn records(&self) -> Vec<Vec<String>> {
        table_records(&self.variables, &self.instances)
    }

    pub fn table(&self) -> String {
        render_table(&self.variables, &self.instances)
    }

    pub fn render(&self, template: &str) -> String {
        render_tasks(template, &self.instances)
    }

    /// Writes every output the configuration asks for. Rendered tasks need a template file.
    pub fn save(&self, output: &OutputConfig) -> Result<()> {
        if let Some(path) = &output.table_file {
            save_text(&self.table(), path)?;
            info!("table saved to {}", path);
        }
        if let Some(path) = &output.csv_file {
            save_table_csv(&self.records(), path)?;
            info!("csv table saved to {}", path);
        }
        match (&output.template_file, &output.tasks_file) {
            (Some(template_file), Some(path)) => {
                let template = fs::read_to_string(template_file)?;
                save_text(&self.render(&template), path)?;
                info!("tasks saved to {}", path);
            }
            (None, Some(_)) => {
                return Err(TaskGenError::Config(
                    "tasks_file needs a template_file".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Runs all stages for a task document with the bundled numeric solver.
pub fn run_task(config: &TaskConfig) -> Result<RenderTasks> {
    let solver = NumericSolver::new(config.solver.clone());
    CollectEquations::new(config.tokenization)
        .collect(&config.equations)?
        .classify(&config.known, &config.targets, config.conflict)?
        .configure(config.sampling.clone())?
        .generate(&solver)
}
