//! Load and run options.

use mf_graph::MergeRule;
use serde::{Deserialize, Serialize};

use crate::catalog::{AlgorithmId, EdgeKind, PrecisionMode};

/// What a load does with the graph it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistPolicy {
    /// Hand the graph back for one run; nothing is registered.
    #[default]
    DiscardAfterUse,
    /// Register the graph and return only its handle.
    SaveOnly,
    /// Register the graph and also hand it back for immediate use.
    SaveAndUse,
}

impl PersistPolicy {
    pub fn saves(&self) -> bool {
        !matches!(self, PersistPolicy::DiscardAfterUse)
    }

    pub fn uses(&self) -> bool {
        !matches!(self, PersistPolicy::SaveOnly)
    }
}

/// Options for building a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub persist: PersistPolicy,
    /// How repeated sparse entries between the same vertices combine.
    pub merge: MergeRule,
    /// Edge layout to build; runs convert on the fly when an algorithm needs the
    /// other one.
    pub edges: EdgeKind,
}

impl LoadOptions {
    /// Defaults with the edge layout `algorithm` runs on.
    pub fn for_algorithm(algorithm: AlgorithmId) -> Self {
        Self {
            edges: algorithm.edge_kind(),
            ..Self::default()
        }
    }

    pub fn with_persist(mut self, persist: PersistPolicy) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_merge(mut self, merge: MergeRule) -> Self {
        self.merge = merge;
        self
    }
}

/// Options for one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Worker threads for parallel algorithms; must be at least 1.
    pub threads: usize,
    /// Expected precision of the graph. `None` accepts whatever was loaded.
    pub precision: Option<PrecisionMode>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            precision: None,
        }
    }
}

impl RunOptions {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_precision(mut self, precision: PrecisionMode) -> Self {
        self.precision = Some(precision);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let load = LoadOptions::default();
        assert_eq!(load.persist, PersistPolicy::DiscardAfterUse);
        assert_eq!(load.merge, MergeRule::OppositeOnly);
        assert_eq!(RunOptions::default().threads, 1);
        assert_eq!(
            LoadOptions::for_algorithm(AlgorithmId::AhujaOrlin).edges,
            EdgeKind::Cached
        );
    }

    #[test]
    fn persist_policy_flags() {
        assert!(!PersistPolicy::DiscardAfterUse.saves());
        assert!(PersistPolicy::SaveOnly.saves() && !PersistPolicy::SaveOnly.uses());
        assert!(PersistPolicy::SaveAndUse.saves() && PersistPolicy::SaveAndUse.uses());
    }

    #[test]
    fn run_options_round_trip_through_json() {
        let opts = RunOptions::default()
            .with_threads(4)
            .with_precision(PrecisionMode::U64U64);
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"u64-u64\""));
        let back: RunOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}
