//! Task documents: everything needed for one generation run, read from a sectioned text file.
//!
//! ```text
//! equations
//!     eq: a*x = b
//! known
//!     b: 10
//! targets
//!     vars: x
//! ranges
//!     a: 1, 5
//! rounding
//!     a: 0
//! generation
//!     count: 5
//!     seed: 42
//!     tokenization: multi_letter
//!     parallel: false
//!     conflict: reject
//! solver
//!     tolerance: 1e-10
//!     max_iterations: 100
//!     starts: 8
//!     timeout_ms: 2000
//! output
//!     template_file: task.txt
//!     table_file: answers.txt
//!     csv_file: answers.csv
//!     tasks_file: tasks.txt
//! logging
//!     level: info
//!     log_file: run.log
//! ```
//! Only `equations` is required. Known values and ranges go through the same validation as
//! values typed by hand.
use crate::Utils::task_parser::parse_document_as_strings;
use crate::generator::classifier::TargetConflictPolicy;
use crate::generator::errors::{Result, TaskGenError};
use crate::generator::input::{parse_known_value, parse_precision, parse_range};
use crate::generator::normalizer::TokenizationPolicy;
use crate::generator::sampler::SamplingConfig;
use crate::generator::solver::SolverConfig;
use crate::generator::variables::Symbol;
use log::info;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::str::FromStr;
use std::time::Duration;

type Section = HashMap<String, Option<Vec<String>>>;

const SECTIONS: [&str; 9] = [
    "equations", "known", "targets", "ranges", "rounding", "generation", "solver", "output",
    "logging",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputConfig {
    pub template_file: Option<String>,
    pub table_file: Option<String>,
    pub csv_file: Option<String>,
    pub tasks_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    /// `Some("")` asks for a log file named after the current time
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskConfig {
    pub equations: Vec<String>,
    pub known: BTreeMap<Symbol, f64>,
    pub targets: Vec<Symbol>,
    pub tokenization: TokenizationPolicy,
    pub conflict: TargetConflictPolicy,
    pub sampling: SamplingConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

fn config_error(section: &str, key: &str, reason: &str) -> TaskGenError {
    TaskGenError::Config(format!("[{}] {}: {}", section, key, reason))
}

/// the one value of `key`, `None` if the key is absent or empty
fn single<'a>(section_name: &str, section: &'a Section, key: &str) -> Result<Option<&'a str>> {
    match section.get(key).and_then(|v| v.as_ref()) {
        None => Ok(None),
        Some(values) => match values.as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(value.as_str())),
            _ => Err(config_error(section_name, key, "expected a single value")),
        },
    }
}

fn parse_option<T: FromStr>(section_name: &str, section: &Section, key: &str) -> Result<Option<T>> {
    match single(section_name, section, key)? {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| config_error(section_name, key, &format!("cannot read '{}'", text))),
    }
}

fn check_keys(section_name: &str, section: &Section, allowed: &[&str]) -> Result<()> {
    match section.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(config_error(section_name, key, "unknown key")),
        None => Ok(()),
    }
}

/// values of a key joined back with commas, the way a user would type them
fn joined(values: &Option<Vec<String>>) -> String {
    values.as_ref().map(|v| v.join(",")).unwrap_or_default()
}

impl TaskConfig {
    /// Reads and validates a task document.
    pub fn from_document(text: &str) -> Result<TaskConfig> {
        let document = parse_document_as_strings(text, None).map_err(TaskGenError::Config)?;
        if let Some(unknown) = document.keys().find(|t| !SECTIONS.contains(&t.as_str())) {
            return Err(TaskGenError::Config(format!("unknown section '{}'", unknown)));
        }
        let empty = Section::new();
        let section = |name: &str| document.get(name).unwrap_or(&empty);
        let mut config = TaskConfig::default();

        let equations = section("equations");
        check_keys("equations", equations, &["eq"])?;
        config.equations = equations
            .get("eq")
            .cloned()
            .flatten()
            .unwrap_or_default();
        if config.equations.is_empty() {
            return Err(TaskGenError::EmptySystem);
        }

        for (name, values) in section("known") {
            if let Some(value) = parse_known_value(name, &joined(values))? {
                config.known.insert(Symbol::new(name.as_str()), value);
            }
        }

        let targets = section("targets");
        check_keys("targets", targets, &["vars"])?;
        config.targets = targets
            .get("vars")
            .cloned()
            .flatten()
            .unwrap_or_default()
            .into_iter()
            .map(Symbol::new)
            .collect();

        for (name, values) in section("ranges") {
            let range = parse_range(name, &joined(values))?;
            config.sampling.ranges.insert(Symbol::new(name.as_str()), range);
        }
        for (name, values) in section("rounding") {
            let digits = parse_precision(name, &joined(values))?;
            config.sampling.precisions.insert(Symbol::new(name.as_str()), digits);
        }

        let generation = section("generation");
        check_keys(
            "generation",
            generation,
            &["count", "seed", "tokenization", "parallel", "conflict"],
        )?;
        if let Some(count) = parse_option("generation", generation, "count")? {
            config.sampling.count = count;
        }
        config.sampling.seed = parse_option("generation", generation, "seed")?;
        if let Some(parallel) = parse_option("generation", generation, "parallel")? {
            config.sampling.parallel = parallel;
        }
        if let Some(policy) = parse_option("generation", generation, "tokenization")? {
            config.tokenization = policy;
        }
        if let Some(policy) = parse_option("generation", generation, "conflict")? {
            config.conflict = policy;
        }

        let solver = section("solver");
        check_keys(
            "solver",
            solver,
            &["tolerance", "max_iterations", "starts", "timeout_ms"],
        )?;
        if let Some(tolerance) = parse_option::<f64>("solver", solver, "tolerance")? {
            if !(tolerance > 0.0 && tolerance.is_finite()) {
                return Err(config_error("solver", "tolerance", "must be positive"));
            }
            config.solver.tolerance = tolerance;
        }
        if let Some(max_iterations) = parse_option::<usize>("solver", solver, "max_iterations")? {
            if max_iterations == 0 {
                return Err(config_error("solver", "max_iterations", "must be positive"));
            }
            config.solver.max_iterations = max_iterations;
        }
        if let Some(starts) = parse_option::<usize>("solver", solver, "starts")? {
            config.solver.starts = starts.max(1);
        }
        if let Some(ms) = parse_option::<u64>("solver", solver, "timeout_ms")? {
            config.solver.timeout = Duration::from_millis(ms);
        }

        let output = section("output");
        check_keys(
            "output",
            output,
            &["template_file", "table_file", "csv_file", "tasks_file"],
        )?;
        config.output = OutputConfig {
            template_file: single("output", output, "template_file")?.map(String::from),
            table_file: single("output", output, "table_file")?.map(String::from),
            csv_file: single("output", output, "csv_file")?.map(String::from),
            tasks_file: single("output", output, "tasks_file")?.map(String::from),
        };

        let logging = section("logging");
        check_keys("logging", logging, &["level", "log_file"])?;
        if let Some(level) = single("logging", logging, "level")? {
            config.logging.level = level.to_string();
        }
        if logging.contains_key("log_file") {
            config.logging.log_file =
                Some(single("logging", logging, "log_file")?.unwrap_or_default().to_string());
        }

        info!(
            "task with {} equations, {} known values, {} targets, {} instances",
            config.equations.len(),
            config.known.len(),
            config.targets.len(),
            config.sampling.count
        );
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<TaskConfig> {
        let text = fs::read_to_string(path)?;
        Self::from_document(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: &str = r#"
// lever
equations
    eq: F1*l1 = F2*l2
known
    l1: 2
    l2:
targets
    vars: F2
ranges
    F1: 10, 50
    l2: 1, 4
rounding
    l2: 1
generation
    count: 4
    seed: 7
    tokenization: multi_letter
    conflict: prefer_known
solver
    timeout_ms: 500
output
    table_file: answers.txt
logging
    level: debug
    log_file:
"#;

    #[test]
    fn test_full_document() {
        let config = TaskConfig::from_document(TASK).unwrap();
        assert_eq!(config.equations, vec!["F1*l1 = F2*l2"]);
        assert_eq!(config.known, BTreeMap::from([(Symbol::from("l1"), 2.0)]));
        assert_eq!(config.targets, vec![Symbol::from("F2")]);
        assert_eq!(config.sampling.ranges[&Symbol::from("F1")], (10.0, 50.0));
        assert_eq!(config.sampling.precisions[&Symbol::from("l2")], 1);
        assert_eq!(config.sampling.count, 4);
        assert_eq!(config.sampling.seed, Some(7));
        assert!(!config.sampling.parallel);
        assert_eq!(config.conflict, TargetConflictPolicy::PreferKnown);
        assert_eq!(config.solver.timeout, Duration::from_millis(500));
        assert_eq!(config.output.table_file.as_deref(), Some("answers.txt"));
        assert_eq!(config.output.tasks_file, None);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_file.as_deref(), Some(""));
    }

    #[test]
    fn test_defaults() {
        let config = TaskConfig::from_document("equations\n eq: x = 2*y").unwrap();
        assert_eq!(config.tokenization, TokenizationPolicy::MultiLetter);
        assert_eq!(config.conflict, TargetConflictPolicy::Reject);
        assert_eq!(config.sampling, SamplingConfig::default());
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            TaskConfig::from_document("targets\n vars: x"),
            Err(TaskGenError::EmptySystem)
        );
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\nknown\n b: ten"),
            Err(TaskGenError::InvalidNumericInput { .. })
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\nranges\n b: 5, 1"),
            Err(TaskGenError::InvalidRange { .. })
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\nranges\n b: 5"),
            Err(TaskGenError::InvalidRange { .. })
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\ngeneration\n count: many"),
            Err(TaskGenError::Config(_))
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\ngeneration\n tokenization: words"),
            Err(TaskGenError::Config(_))
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\nsettings\n count: 1"),
            Err(TaskGenError::Config(_))
        ));
        assert!(matches!(
            TaskConfig::from_document("equations\n eq: x = b\nsolver\n tolerance: -1"),
            Err(TaskGenError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TaskConfig::from_file("/definitely/not/here/task.txt"),
            Err(TaskGenError::Io(_))
        ));
    }
}
