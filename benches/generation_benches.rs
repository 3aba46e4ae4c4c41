use EqTaskGen::generator::classifier::{TargetConflictPolicy, classify};
use EqTaskGen::generator::equation::parse_equations;
use EqTaskGen::generator::normalizer::TokenizationPolicy;
use EqTaskGen::generator::sampler::{SamplingConfig, sample_instances};
use EqTaskGen::generator::solver::NumericSolver;
use EqTaskGen::generator::variables::{Symbol, extract_from_lines};
use criterion::{Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

fn bench_sampling(c: &mut Criterion, name: &str, lines: &[&str], targets: &[&str], parallel: bool) {
    let equations = parse_equations(lines, TokenizationPolicy::MultiLetter).unwrap();
    let all = extract_from_lines(lines, TokenizationPolicy::MultiLetter);
    let targets: Vec<Symbol> = targets.iter().map(|t| Symbol::from(*t)).collect();
    let classification = classify(&all, &BTreeMap::new(), &targets, TargetConflictPolicy::Reject).unwrap();
    let config = SamplingConfig {
        count: 100,
        seed: Some(1),
        parallel,
        ..SamplingConfig::default()
    };
    let solver = NumericSolver::default();
    c.bench_function(name, |b| {
        b.iter(|| sample_instances(black_box(&equations), &classification, &config, &solver).unwrap())
    });
}

fn bench_linear(c: &mut Criterion) {
    bench_sampling(c, "100 linear instances", &["a*x + b*y = c", "x - y = d"], &["x", "y"], false);
}

fn bench_quadratic(c: &mut Criterion) {
    bench_sampling(c, "100 quadratic instances", &["x^2 + p*x = q"], &["x"], false);
}

fn bench_nonlinear_parallel(c: &mut Criterion) {
    bench_sampling(
        c,
        "100 nonlinear instances, parallel",
        &["x^2 + y^2 = r", "y = exp(x) - s"],
        &["x", "y"],
        true,
    );
}

criterion_group!(benches, bench_linear, bench_quadratic, bench_nonlinear_parallel);
criterion_main!(benches);
