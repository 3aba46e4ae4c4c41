//! examples of usage of EqTaskGen
/// generation runs: linear and nonlinear systems, roots, templates, task documents
pub mod generator_examples;
