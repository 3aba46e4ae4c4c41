//! Partition of the variable set into known, target and free variables.
use crate::generator::errors::{Result, TaskGenError};
use crate::generator::variables::Symbol;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use strum_macros::{Display, EnumIter, EnumString};

/// What to do with a variable that is declared known and also requested as target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetConflictPolicy {
    /// fail with `ConflictingClassification`
    #[default]
    Reject,
    /// keep the variable as known and drop it from the targets
    PreferKnown,
}

/// Every variable of the system is in exactly one of the three parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableClassification {
    pub known: BTreeMap<Symbol, f64>,
    pub target: Vec<Symbol>,
    pub free: Vec<Symbol>,
}

impl VariableClassification {
    pub fn is_known(&self, symbol: &Symbol) -> bool {
        self.known.contains_key(symbol)
    }

    pub fn is_target(&self, symbol: &Symbol) -> bool {
        self.target.contains(symbol)
    }

    pub fn is_free(&self, symbol: &Symbol) -> bool {
        self.free.contains(symbol)
    }

    /// all variables, sorted
    pub fn all(&self) -> Vec<Symbol> {
        let mut all: Vec<Symbol> = self
            .known
            .keys()
            .chain(&self.target)
            .chain(&self.free)
            .cloned()
            .collect();
        all.sort();
        all
    }
}

/// Classifies `all` given the user's known values and target selection.
///
/// Known values and targets naming a variable that is not in `all` are rejected with
/// `UnknownVariable`. Order of `target` and `free` follows `all`.
pub fn classify(
    all: &[Symbol],
    known: &BTreeMap<Symbol, f64>,
    targets: &[Symbol],
    policy: TargetConflictPolicy,
) -> Result<VariableClassification> {
    let universe: BTreeSet<&Symbol> = all.iter().collect();
    if let Some(stranger) = known.keys().chain(targets).find(|s| !universe.contains(s)) {
        return Err(TaskGenError::UnknownVariable(stranger.to_string()));
    }
    if let Some(both) = targets.iter().find(|s| known.contains_key(*s)) {
        match policy {
            TargetConflictPolicy::Reject => {
                return Err(TaskGenError::ConflictingClassification(both.to_string()));
            }
            TargetConflictPolicy::PreferKnown => {
                warn!("variable '{}' is known and target, treated as known", both)
            }
        }
    }
    let mut classification = VariableClassification {
        known: known.clone(),
        ..Default::default()
    };
    let mut seen = BTreeSet::new();
    for symbol in all {
        if !seen.insert(symbol) || known.contains_key(symbol) {
            continue;
        }
        if targets.contains(symbol) {
            classification.target.push(symbol.clone());
        } else {
            classification.free.push(symbol.clone());
        }
    }
    info!(
        "variables classified: known {:?}, target {:?}, free {:?}",
        classification.known.keys().map(|s| s.name()).collect::<Vec<_>>(),
        classification.target.iter().map(|s| s.name()).collect::<Vec<_>>(),
        classification.free.iter().map(|s| s.name()).collect::<Vec<_>>()
    );
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::from(*n)).collect()
    }

    fn check_partition(all: &[Symbol], c: &VariableClassification) {
        for symbol in all {
            let places = [c.is_known(symbol), c.is_target(symbol), c.is_free(symbol)]
                .iter()
                .filter(|p| **p)
                .count();
            assert_eq!(places, 1, "{} is in {} parts", symbol, places);
        }
        let mut expected = all.to_vec();
        expected.sort();
        expected.dedup();
        assert_eq!(c.all(), expected);
    }

    #[test]
    fn test_basic_partition() {
        let all = symbols(&["a", "b", "x"]);
        let known = BTreeMap::from([(Symbol::from("b"), 10.0)]);
        let c = classify(&all, &known, &symbols(&["x"]), TargetConflictPolicy::Reject).unwrap();
        assert_eq!(c.target, symbols(&["x"]));
        assert_eq!(c.free, symbols(&["a"]));
        assert_eq!(c.known.get("b"), Some(&10.0));
        check_partition(&all, &c);
    }

    #[test]
    fn test_partition_invariant_for_all_selections() {
        let all = symbols(&["a", "b", "c", "d"]);
        // every way to mark each variable as known, target or free
        for mask in 0..81u32 {
            let mut known = BTreeMap::new();
            let mut targets = Vec::new();
            let mut m = mask;
            for (i, symbol) in all.iter().enumerate() {
                match m % 3 {
                    0 => {
                        known.insert(symbol.clone(), i as f64);
                    }
                    1 => targets.push(symbol.clone()),
                    _ => {}
                }
                m /= 3;
            }
            let c = classify(&all, &known, &targets, TargetConflictPolicy::Reject).unwrap();
            check_partition(&all, &c);
        }
    }

    #[test]
    fn test_conflict_policies() {
        let all = symbols(&["x", "y"]);
        let known = BTreeMap::from([(Symbol::from("x"), 1.0)]);
        let targets = symbols(&["x", "y"]);
        assert_eq!(
            classify(&all, &known, &targets, TargetConflictPolicy::Reject),
            Err(TaskGenError::ConflictingClassification("x".to_string()))
        );
        let c = classify(&all, &known, &targets, TargetConflictPolicy::PreferKnown).unwrap();
        assert!(c.is_known(&Symbol::from("x")));
        assert_eq!(c.target, symbols(&["y"]));
        check_partition(&all, &c);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let all = symbols(&["x"]);
        let known = BTreeMap::from([(Symbol::from("q"), 1.0)]);
        assert_eq!(
            classify(&all, &known, &[], TargetConflictPolicy::Reject),
            Err(TaskGenError::UnknownVariable("q".to_string()))
        );
        assert_eq!(
            classify(&all, &BTreeMap::new(), &symbols(&["z"]), TargetConflictPolicy::Reject),
            Err(TaskGenError::UnknownVariable("z".to_string()))
        );
    }
}
