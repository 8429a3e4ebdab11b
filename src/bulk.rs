//! Bounded-concurrency execution of many independent operations.
//!
//! All jobs are seeded into a shared FIFO queue up front and pulled by a
//! fixed number of cooperative workers, so slow calls never stall more than
//! their own worker. Outcomes land at the index of the job that produced
//! them, regardless of completion order.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use futures::future::join_all;

use crate::Result;

/// Runs every operation to completion with at most `max_workers` in flight,
/// returning one outcome per operation in input order.
///
/// A failed operation is stored as `Err` at its own index and never aborts
/// the others; failures are terminal per job, and retries happen inside the
/// request executor, not here. `max_workers` is clamped to at least 1, and
/// effective concurrency never exceeds the number of jobs.
///
/// # Example
///
/// ```no_run
/// use enrich_http::{run_bulk, EnrichClient, PersonProfileParams, DEFAULT_MAX_WORKERS};
///
/// # async fn example(client: EnrichClient, urls: Vec<String>) {
/// let ops = urls
///     .into_iter()
///     .map(|url| client.person_profile(PersonProfileParams::new(url)));
/// let outcomes = run_bulk(ops, DEFAULT_MAX_WORKERS).await;
/// # }
/// ```
pub async fn run_bulk<T, Fut>(
    ops: impl IntoIterator<Item = Fut>,
    max_workers: usize,
) -> Vec<Result<T>>
where
    Fut: Future<Output = Result<T>>,
{
    let jobs: VecDeque<(usize, Fut)> = ops.into_iter().enumerate().collect();
    let total = jobs.len();
    if total == 0 {
        return Vec::new();
    }

    let queue = Mutex::new(jobs);
    let slots: Mutex<Vec<Option<Result<T>>>> = Mutex::new((0..total).map(|_| None).collect());

    let workers = max_workers.max(1).min(total);
    tracing::debug!(total, workers, "running bulk operations");

    join_all((0..workers).map(|_| worker(&queue, &slots))).await;

    let slots = slots
        .into_inner()
        .expect("result store lock must not be poisoned");
    slots
        .into_iter()
        .map(|slot| slot.expect("every job stores exactly one outcome"))
        .collect()
}

/// Pulls jobs until the queue is empty. The claim is atomic under the queue
/// lock, which is released before the operation is awaited.
async fn worker<T, Fut>(
    queue: &Mutex<VecDeque<(usize, Fut)>>,
    slots: &Mutex<Vec<Option<Result<T>>>>,
) where
    Fut: Future<Output = Result<T>>,
{
    loop {
        let claimed = {
            let mut queue = queue.lock().expect("job queue lock must not be poisoned");
            queue.pop_front()
        };
        let Some((index, op)) = claimed else {
            break;
        };

        let outcome = op.await;
        if let Err(err) = &outcome {
            tracing::debug!(index, error = %err, "bulk operation failed");
        }

        let mut slots = slots.lock().expect("result store lock must not be poisoned");
        slots[index] = Some(outcome);
    }
}
