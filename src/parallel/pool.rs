use anyhow::Result;

use super::claim::{CancellationToken, ClaimCounter};

/// Fixed-size pool of worker threads draining a [`ClaimCounter`].
///
/// Every worker runs the same loop: claim an index, run the job closure for
/// it, claim again. A worker is done once a claim comes back empty or the
/// cancellation token is set. [`WorkerPool::run`] returns only after every
/// worker has finished.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job(index, worker_id)` for every index the counter hands out.
    ///
    /// Workers are spawned even when the counter is already empty; they observe
    /// exhaustion on their first claim and exit.
    pub fn run<F>(&self, counter: &ClaimCounter, cancel: &CancellationToken, job: F) -> Result<()>
    where
        F: Fn(usize, usize) + Sync,
    {
        let job = &job;

        crossbeam::thread::scope(|s| {
            for worker_id in 0..self.workers {
                s.spawn(move |_| worker_loop(worker_id, counter, cancel, job));
            }
        })
        .map_err(|_| anyhow::anyhow!("Worker thread panicked during parallel execution"))
    }
}

fn worker_loop<F>(worker_id: usize, counter: &ClaimCounter, cancel: &CancellationToken, job: &F)
where
    F: Fn(usize, usize),
{
    let mut completed = 0usize;

    loop {
        if cancel.is_cancelled() {
            tracing::debug!("worker-{worker_id}: cancelled after {completed} jobs");
            return;
        }

        let Some(index) = counter.next_index() else {
            break;
        };

        job(index, worker_id);
        completed += 1;
    }

    tracing::debug!("worker-{worker_id}: done after {completed} jobs");
}
