#![allow(non_snake_case)]

use crate::generator::classifier::TargetConflictPolicy;
use crate::generator::config::TaskConfig;
use crate::generator::errors::Result;
use crate::generator::normalizer::TokenizationPolicy;
use crate::generator::pipeline::{CollectEquations, RenderTasks, run_task};
use crate::generator::sampler::SamplingConfig;
use crate::generator::solver::{NumericSolver, SolverConfig};
use crate::generator::variables::Symbol;
use std::collections::BTreeMap;
use std::time::Duration;

fn symbols(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|n| Symbol::from(*n)).collect()
}

fn ranges(pairs: &[(&str, (f64, f64))]) -> BTreeMap<Symbol, (f64, f64)> {
    pairs.iter().map(|(n, r)| (Symbol::from(*n), *r)).collect()
}

fn show(result: Result<RenderTasks>, template: Option<&str>) {
    match result {
        Ok(done) => {
            println!("{}", done.table());
            if let Some(template) = template {
                println!("{}", done.render(template));
            }
        }
        Err(e) => println!("generation failed: {}", e),
    }
}

pub fn generator_examples(example: usize) {
    match example {
        0 => {
            // linear system: nothing to draw, one instance is enough
            let result = CollectEquations::new(TokenizationPolicy::MultiLetter)
                .collect(&["x + y = 10", "x - y = 2"])
                .and_then(|stage| stage.classify(&BTreeMap::new(), &symbols(&["x", "y"]), TargetConflictPolicy::Reject))
                .and_then(|stage| {
                    stage.configure(SamplingConfig {
                        count: 1,
                        ..SamplingConfig::default()
                    })
                })
                .and_then(|stage| stage.generate(&NumericSolver::default()));
            show(result, None);
        }
        1 => {
            // lever: one arm is known, force and the other arm are drawn
            let known = BTreeMap::from([(Symbol::from("l1"), 2.0)]);
            let sampling = SamplingConfig {
                ranges: ranges(&[("F1", (10.0, 50.0)), ("l2", (1.0, 4.0))]),
                precisions: BTreeMap::from([(Symbol::from("F1"), 0), (Symbol::from("l2"), 1)]),
                count: 5,
                seed: Some(42),
                parallel: false,
            };
            let result = CollectEquations::new(TokenizationPolicy::MultiLetter)
                .collect(&["F1*l1 = F2*l2"])
                .and_then(|stage| stage.classify(&known, &symbols(&["F2"]), TargetConflictPolicy::Reject))
                .and_then(|stage| stage.configure(sampling))
                .and_then(|stage| stage.generate(&NumericSolver::default()));
            show(
                result,
                Some("A force of {F1} N acts on an arm of {l1} m. What force on an arm of {l2} m keeps the lever in balance? ({F2} N)"),
            );
        }
        2 => {
            // quadratics with real and complex roots, all roots in one cell
            let sampling = SamplingConfig {
                ranges: ranges(&[("p", (-6.0, 6.0)), ("q", (-6.0, 6.0))]),
                precisions: BTreeMap::from([(Symbol::from("p"), 0), (Symbol::from("q"), 0)]),
                count: 8,
                seed: Some(7),
                parallel: true,
            };
            let result = CollectEquations::new(TokenizationPolicy::MultiLetter)
                .collect(&["x^2 + p*x + q = 0"])
                .and_then(|stage| stage.classify(&BTreeMap::new(), &symbols(&["x"]), TargetConflictPolicy::Reject))
                .and_then(|stage| stage.configure(sampling))
                .and_then(|stage| stage.generate(&NumericSolver::default()));
            show(result, Some("Solve x^2 + {p}x + {q} = 0. Answer: x = {x}"));
        }
        3 => {
            // circle and line: several solution tuples
            let solver = NumericSolver::new(SolverConfig {
                starts: 12,
                timeout: Duration::from_millis(500),
                ..SolverConfig::default()
            });
            let sampling = SamplingConfig {
                ranges: ranges(&[("d", (-2.0, 2.0))]),
                precisions: BTreeMap::from([(Symbol::from("d"), 0)]),
                count: 4,
                seed: Some(3),
                parallel: false,
            };
            let result = CollectEquations::new(TokenizationPolicy::MultiLetter)
                .collect(&["x^2 + y^2 = 25", "y = x + d"])
                .and_then(|stage| stage.classify(&BTreeMap::new(), &symbols(&["x", "y"]), TargetConflictPolicy::Reject))
                .and_then(|stage| stage.configure(sampling))
                .and_then(|stage| stage.generate(&solver));
            show(result, None);
        }
        4 => {
            // the same run as a task document
            let document = r#"
            // uniform motion
            equations
                eq: s = v*t
            known
                v: 12
            targets
                vars: s
            ranges
                t: 1, 10
            rounding
                t: 0
            generation
                count: 4
                seed: 1
            "#;
            match TaskConfig::from_document(document) {
                Ok(config) => show(run_task(&config), Some("A car drives {t} h at {v} km/h. How far does it go? ({s} km)")),
                Err(e) => println!("bad task document: {}", e),
            }
        }
        5 => {
            // single letters: `2xy` is 2*x*y
            let result = CollectEquations::new(TokenizationPolicy::SingleLetter)
                .collect(&["z = 2xy"])
                .and_then(|stage| stage.classify_from_text(&[("x", "3")], &["z"], TargetConflictPolicy::Reject))
                .and_then(|stage| {
                    stage.configure(SamplingConfig {
                        count: 3,
                        seed: Some(11),
                        ..SamplingConfig::default()
                    })
                })
                .and_then(|stage| stage.generate(&NumericSolver::default()));
            show(result, None);
        }
        _ => {
            println!("example not found");
        }
    }
}
