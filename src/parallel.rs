//! Parallel processing configuration and management
//!
//! This module provides abstractions for configuring Rayon's global thread pool
//! and for running normalization work inside a dedicated pool.

use crate::errors::{NormError, Result};
use rayon::ThreadPoolBuilder;
use tracing::info;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Set up the global Rayon thread pool with the specified configuration
    ///
    /// The global pool can only be built once per process; a second call
    /// with an explicit thread count fails with [`NormError::ThreadPoolError`].
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    NormError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {num_threads} threads: {e}"
                    ))
                })?;

            info!(num_threads, "configured global thread pool");
        } else {
            info!("using default thread pool configuration");
        }

        Ok(())
    }

    /// Run `op` inside a pool sized by this configuration.
    ///
    /// Without an explicit thread count `op` runs on the current pool.
    pub fn install<R, F>(&self, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self.num_threads {
            Some(num_threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| {
                        NormError::ThreadPoolError(format!(
                            "Failed to build thread pool with {num_threads} threads: {e}"
                        ))
                    })?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }

    /// Get the current number of threads being used
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }
}

/// Get information about the current parallel configuration
pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        current_threads: rayon::current_num_threads(),
        available_cores: num_cpus::get(),
        available_parallelism: std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
    pub available_parallelism: usize,
}

impl ParallelInfo {
    /// Log parallel processing information
    pub fn log_info(&self) {
        info!(
            current_threads = self.current_threads,
            available_cores = self.available_cores,
            available_parallelism = self.available_parallelism,
            "parallel processing information"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_runs_inside_sized_pool() {
        let config = ParallelConfig::with_threads(2);
        let threads = config.install(rayon::current_num_threads).unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn install_without_threads_runs_inline() {
        let config = ParallelConfig::default();
        assert_eq!(config.install(|| 7).unwrap(), 7);
    }
}
