//! Stateful load-then-solve facade.
//!
//! A [`Session`] holds at most one graph, loaded for a specific algorithm. Solving
//! requires the same algorithm, and consumes the graph: a second solve needs a
//! new load. Loading again replaces the current graph, and dropping the session
//! releases it.

use mf_core::{Capacity, VertexIndex};
use mf_graph::MergeRule;
use tracing::debug;

use crate::catalog::AlgorithmId;
use crate::dispatch::{self, validate_request};
use crate::error::{AppError, AppResult};
use crate::options::{LoadOptions, PersistPolicy, RunOptions};
use crate::registry::{GraphHandle, SharedRegistry};

#[derive(Debug, Clone, Copy)]
struct Current {
    algorithm: AlgorithmId,
    handle: GraphHandle,
    vertex_count: usize,
}

#[derive(Debug)]
pub struct Session {
    registry: SharedRegistry,
    current: Option<Current>,
}

impl Session {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Algorithm the loaded graph was prepared for, if any.
    pub fn loaded_algorithm(&self) -> Option<AlgorithmId> {
        self.current.map(|c| c.algorithm)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn vertex_count(&self) -> Option<usize> {
        self.current.map(|c| c.vertex_count)
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Load a dense `n × n` network for `algorithm`.
    pub fn load_dense<V: VertexIndex, C: Capacity>(
        &mut self,
        algorithm: AlgorithmId,
        data: &[C],
        n: usize,
    ) -> AppResult<()> {
        check_size(n)?;
        let options = LoadOptions::for_algorithm(algorithm).with_persist(PersistPolicy::SaveOnly);
        let loaded = {
            let mut registry = self.registry.lock();
            dispatch::load_dense::<V, C>(&mut registry, data, n, &options)?
        };
        self.replace(algorithm, loaded.handle, n)
    }

    /// Load a sparse network for `algorithm`.
    pub fn load_sparse<V: VertexIndex, C: Capacity>(
        &mut self,
        algorithm: AlgorithmId,
        rows: &[V],
        cols: &[V],
        capacities: &[C],
        n: usize,
        merge: MergeRule,
    ) -> AppResult<()> {
        check_size(n)?;
        let options = LoadOptions::for_algorithm(algorithm)
            .with_persist(PersistPolicy::SaveOnly)
            .with_merge(merge);
        let loaded = {
            let mut registry = self.registry.lock();
            dispatch::load_sparse(&mut registry, rows, cols, capacities, n, rows.len(), &options)?
        };
        self.replace(algorithm, loaded.handle, n)
    }

    fn replace(
        &mut self,
        algorithm: AlgorithmId,
        handle: Option<GraphHandle>,
        vertex_count: usize,
    ) -> AppResult<()> {
        let handle = handle
            .ok_or_else(|| AppError::SolverFailure("save-only load returned no handle".into()))?;
        self.release();
        debug!(%algorithm, %handle, "session graph loaded");
        self.current = Some(Current {
            algorithm,
            handle,
            vertex_count,
        });
        Ok(())
    }

    /// Solve the loaded graph with `algorithm`, then release it.
    ///
    /// Fails with `InvalidInput` when nothing is loaded or the graph was loaded for
    /// another algorithm. A rejected or failed solve keeps the graph loaded.
    pub fn solve(
        &mut self,
        algorithm: AlgorithmId,
        source: usize,
        sink: usize,
        threads: usize,
    ) -> AppResult<u64> {
        let current = match self.current {
            Some(current) if current.algorithm == algorithm => current,
            _ => {
                return Err(AppError::invalid(format!(
                    "no graph is loaded for {algorithm}; load one first"
                )));
            }
        };
        validate_request(current.vertex_count, source, sink, threads)?;

        let graph = self.registry.get(current.handle)?;
        let options = RunOptions::default().with_threads(threads);
        let flow = dispatch::run_stored(algorithm, &graph, source, sink, &options)?;
        self.release();
        Ok(flow)
    }

    /// Drop the loaded graph, if any.
    pub fn release(&mut self) {
        if let Some(current) = self.current.take() {
            self.registry.destroy(current.handle);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

fn check_size(n: usize) -> AppResult<()> {
    if n < 2 {
        return Err(AppError::invalid(format!(
            "a network needs more than one vertex, got {n}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const DIAMOND: [u32; 16] = [
        0, 10, 10, 0,
        0, 0,  0,  10,
        0, 0,  0,  10,
        0, 0,  0,  0,
    ];

    #[test]
    fn solve_consumes_the_loaded_graph() {
        let registry = SharedRegistry::new();
        let mut session = Session::new(registry.clone());
        session
            .load_dense::<u32, u32>(AlgorithmId::PushRelabelFifo, &DIAMOND, 4)
            .unwrap();
        assert_eq!(registry.len(), 1);

        assert_eq!(session.solve(AlgorithmId::PushRelabelFifo, 0, 3, 1).unwrap(), 20);
        assert!(!session.is_loaded());
        assert!(registry.is_empty());
        assert!(session.solve(AlgorithmId::PushRelabelFifo, 0, 3, 1).is_err());
    }

    #[test]
    fn solve_requires_the_loaded_algorithm() {
        let mut session = Session::new(SharedRegistry::new());
        session
            .load_dense::<u32, u32>(AlgorithmId::Dinic, &DIAMOND, 4)
            .unwrap();
        let err = session.solve(AlgorithmId::AhujaOrlin, 0, 3, 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        // Still loaded for the right algorithm.
        assert_eq!(session.loaded_algorithm(), Some(AlgorithmId::Dinic));
        assert!(session.solve(AlgorithmId::Dinic, 3, 3, 1).is_err());
        assert_eq!(session.solve(AlgorithmId::Dinic, 0, 3, 1).unwrap(), 20);
    }

    #[test]
    fn reload_replaces_and_drop_releases() {
        let registry = SharedRegistry::new();
        {
            let mut session = Session::new(registry.clone());
            session
                .load_sparse::<u64, u32>(
                    AlgorithmId::EdmondsKarp,
                    &[0, 1],
                    &[1, 2],
                    &[5, 3],
                    3,
                    MergeRule::OppositeOnly,
                )
                .unwrap();
            session
                .load_dense::<u32, u32>(AlgorithmId::ParallelPushRelabel, &DIAMOND, 4)
                .unwrap();
            assert_eq!(registry.len(), 1);
            assert_eq!(session.vertex_count(), Some(4));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn failed_load_keeps_previous_graph() {
        let registry = SharedRegistry::new();
        let mut session = Session::new(registry.clone());
        session
            .load_dense::<u32, u32>(AlgorithmId::Dinic, &DIAMOND, 4)
            .unwrap();
        assert!(session
            .load_dense::<u32, u32>(AlgorithmId::Dinic, &DIAMOND[..3], 4)
            .is_err());
        assert!(session
            .load_dense::<u32, u32>(AlgorithmId::Dinic, &[0], 1)
            .is_err());
        assert_eq!(registry.len(), 1);
        assert_eq!(session.solve(AlgorithmId::Dinic, 0, 3, 1).unwrap(), 20);
    }
}
