//! Parallel job distribution
//!
//! This module owns the only shared mutable state in a run: the claim cursor
//! that hands each job index to exactly one worker.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Claiming**: [`ClaimCounter`] issues indices `0..N` exactly once across all threads
//! - **Worker Management**: [`WorkerPool`] spawns scoped worker threads and joins them
//! - **Cancellation**: [`CancellationToken`] lets workers stop claiming cooperatively
//! - **Resource Calculation**: [`calculate_optimal_workers`] sizes the pool from CPU cores
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: it does not know what a job is; callers pass a closure
//! - **Result Collection**: jobs persist their own output, nothing flows back
//! - **Retries**: a claimed index is never handed out again
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   WorkerPool    │    │   ClaimCounter   │    │   Job closure   │
//! │                 │───▶│                  │───▶│                 │
//! │ • worker-0..N   │    │ • next_index()   │    │ • compose       │
//! │ • join all      │    │ • exhaustion     │    │ • spawn + wait  │
//! │ • cancellation  │    │                  │    │ • write output  │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use tidyrun::parallel::{CancellationToken, ClaimCounter, WorkerPool};
//!
//! let counter = ClaimCounter::new(10);
//! WorkerPool::new(4)
//!     .run(&counter, &CancellationToken::new(), |index, worker_id| {
//!         println!("worker-{worker_id} took job {index}");
//!     })
//!     .unwrap();
//! assert!(counter.is_exhausted());
//! ```

pub mod claim;
pub mod pool;

pub use claim::{CancellationToken, ClaimCounter};
pub use pool::WorkerPool;

/// Calculate the worker count from available cores and configuration limits.
///
/// ```text
/// 1. Detect available CPU cores: num_cpus::get()
/// 2. Apply percentage: cores * thread_percentage / 100
/// 3. Apply config limit: min(max_threads, result) if max_threads > 0
/// 4. Ensure minimum: max(1, result)
/// ```
pub fn calculate_optimal_workers(max_threads: usize, thread_percentage: u8) -> usize {
    workers_for_cores(num_cpus::get(), max_threads, thread_percentage)
}

fn workers_for_cores(cores: usize, max_threads: usize, thread_percentage: u8) -> usize {
    let by_percentage = std::cmp::max(1, (cores * thread_percentage as usize) / 100);

    if max_threads > 0 {
        std::cmp::min(max_threads, by_percentage)
    } else {
        by_percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_for_cores() {
        assert_eq!(workers_for_cores(8, 0, 75), 6);
        assert_eq!(workers_for_cores(8, 4, 75), 4);
        assert_eq!(workers_for_cores(8, 0, 100), 8);
        assert_eq!(workers_for_cores(1, 0, 10), 1);
    }

    #[test]
    fn test_optimal_workers_at_least_one() {
        assert!(calculate_optimal_workers(0, 1) >= 1);
        assert!(calculate_optimal_workers(2, 75) <= 2);
    }
}
