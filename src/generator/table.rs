//! Answer table of a batch and the batch statistics.
use crate::generator::solution::{InstanceStatus, SolvedInstance};
use crate::generator::variables::Symbol;
use log::info;
use std::collections::HashMap;
use std::time::Duration;
use tabled::{builder::Builder, settings::Style};

/// header row followed by one row per instance
pub fn table_records(variables: &[Symbol], instances: &[SolvedInstance]) -> Vec<Vec<String>> {
    let mut records = Vec::with_capacity(instances.len() + 1);
    records.push(variables.iter().map(|s| s.to_string()).collect());
    records.extend(instances.iter().map(|instance| instance.row()));
    records
}

/// Pretty grid of the answers, one row per instance in generation order.
pub fn render_table(variables: &[Symbol], instances: &[SolvedInstance]) -> String {
    let mut builder = Builder::default();
    for record in table_records(variables, instances) {
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchStatistics {
    pub instances: usize,
    pub solved: usize,
    pub partial: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchStatistics {
    pub fn from_instances(instances: &[SolvedInstance], elapsed: Duration) -> Self {
        let count = |status: InstanceStatus| instances.iter().filter(|i| i.status == status).count();
        BatchStatistics {
            instances: instances.len(),
            solved: count(InstanceStatus::Solved),
            partial: count(InstanceStatus::Partial),
            failed: count(InstanceStatus::Failed),
            elapsed,
        }
    }

    /// logs the statistics as a table at info level
    pub fn log(&self) {
        let mut stats: HashMap<String, usize> = HashMap::new();
        stats.insert("instances".to_string(), self.instances);
        stats.insert(format!("{} instances", InstanceStatus::Solved), self.solved);
        stats.insert(format!("{} instances", InstanceStatus::Partial), self.partial);
        stats.insert(format!("{} instances", InstanceStatus::Failed), self.failed);
        stats.insert("time elapsed, ms".to_string(), self.elapsed.as_millis() as usize);
        let mut table = Builder::from(stats).build();
        table.with(Style::modern_rounded());
        info!("\n \n GENERATION STATISTICS \n \n {}", table.to_string());
    }
}
