//! Shared work queue with drain tracking.
//!
//! Every [`WorkQueue::put`] must eventually be matched by exactly one
//! [`WorkQueue::task_done`], and [`WorkQueue::join`] resolves once the
//! outstanding count reaches zero. Stop jobs travel through the same
//! queue but are excluded from drain accounting, which is what allows
//! the dispatcher to await `join` *before* enqueueing them.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::{watch, Semaphore};

/// A unit of work pulled off the queue by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Visit a profile page.
    Visit(String),
    /// Terminate the receiving worker.
    Stop,
}

/// FIFO queue safe for concurrent producers and consumers.
///
/// The semaphore holds one permit per queued job, so [`WorkQueue::get`]
/// suspends without spinning when the queue is empty. The drain count is
/// a watch channel so [`WorkQueue::join`] can wait for it to hit zero
/// without missing a wakeup.
pub struct WorkQueue {
    jobs: Mutex<VecDeque<Job>>,
    slots: Semaphore,
    unfinished: watch::Sender<usize>,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            jobs: Mutex::new(VecDeque::new()),
            slots: Semaphore::new(0),
            unfinished,
        }
    }

    /// Append a profile link. Never blocks; increments the drain count.
    pub fn put(&self, link: impl Into<String>) {
        self.unfinished.send_modify(|n| *n += 1);
        self.jobs
            .lock()
            .expect("queue mutex poisoned")
            .push_back(Job::Visit(link.into()));
        self.slots.add_permits(1);
    }

    /// Append a stop job. Stop jobs bypass drain accounting entirely:
    /// they are neither counted by `put` nor acknowledged by `task_done`.
    pub fn put_stop(&self) {
        self.jobs
            .lock()
            .expect("queue mutex poisoned")
            .push_back(Job::Stop);
        self.slots.add_permits(1);
    }

    /// Remove and return the oldest job, suspending while the queue is empty.
    pub async fn get(&self) -> Job {
        let permit = self.slots.acquire().await.expect("queue semaphore closed");
        permit.forget();
        self.jobs
            .lock()
            .expect("queue mutex poisoned")
            .pop_front()
            .expect("queue permit issued without a queued job")
    }

    /// Acknowledge one previously-gotten `Visit` job.
    ///
    /// # Panics
    ///
    /// Panics if called more times than jobs were taken; that is a
    /// pipeline bug and silently underflowing would hide it.
    pub fn task_done(&self) {
        self.unfinished.send_modify(|n| {
            assert!(*n > 0, "task_done() called without a matching get()");
            *n -= 1;
        });
    }

    /// Wait until every `put` job has been acknowledged via `task_done`.
    pub async fn join(&self) {
        let mut rx = self.unfinished.subscribe();
        // The sender lives in self, so the channel cannot close mid-wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Number of jobs currently queued (not yet gotten).
    pub fn pending(&self) -> usize {
        self.jobs.lock().expect("queue mutex poisoned").len()
    }

    /// Number of `put` jobs not yet acknowledged via `task_done`.
    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_get_returns_jobs_in_fifo_order() {
        let queue = WorkQueue::new();
        queue.put("https://example.com/a");
        queue.put("https://example.com/b");

        assert_eq!(queue.get().await, Job::Visit("https://example.com/a".into()));
        assert_eq!(queue.get().await, Job::Visit("https://example.com/b".into()));
    }

    #[tokio::test]
    async fn test_get_waits_for_put() {
        let queue = Arc::new(WorkQueue::new());

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.get().await })
        };

        tokio::task::yield_now().await;
        assert!(!consumer.is_finished());

        queue.put("https://example.com/a");
        assert_eq!(
            consumer.await.unwrap(),
            Job::Visit("https://example.com/a".into())
        );
    }

    #[tokio::test]
    async fn test_join_resolves_immediately_when_nothing_queued() {
        let queue = WorkQueue::new();
        queue.join().await;
    }

    #[tokio::test]
    async fn test_join_waits_for_every_task_done() {
        let queue = WorkQueue::new();
        queue.put("https://example.com/a");
        queue.put("https://example.com/b");

        let _ = queue.get().await;
        let _ = queue.get().await;

        let mut join = tokio_test::task::spawn(queue.join());
        assert!(join.poll().is_pending());

        queue.task_done();
        assert!(join.poll().is_pending());

        queue.task_done();
        assert!(join.poll().is_ready());
    }

    #[tokio::test]
    async fn test_stop_jobs_bypass_drain_accounting() {
        let queue = WorkQueue::new();
        queue.put_stop();
        queue.put_stop();

        // Unacknowledged stop jobs must not hold up the drain.
        queue.join().await;
        assert_eq!(queue.unfinished(), 0);

        assert_eq!(queue.get().await, Job::Stop);
        assert_eq!(queue.get().await, Job::Stop);
    }

    #[tokio::test]
    #[should_panic(expected = "task_done() called without a matching get()")]
    async fn test_task_done_underflow_panics() {
        let queue = WorkQueue::new();
        queue.task_done();
    }

    #[tokio::test]
    async fn test_concurrent_consumers_see_each_job_exactly_once() {
        let queue = Arc::new(WorkQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let links: Vec<String> = (0..40).map(|i| format!("https://example.com/{i}")).collect();
        for link in &links {
            queue.put(link.clone());
        }

        let mut consumers = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            let seen = seen.clone();
            consumers.push(tokio::spawn(async move {
                loop {
                    match queue.get().await {
                        Job::Visit(link) => {
                            seen.lock().unwrap().push(link);
                            queue.task_done();
                        }
                        Job::Stop => break,
                    }
                }
            }));
        }

        queue.join().await;
        for _ in 0..4 {
            queue.put_stop();
        }
        for consumer in consumers {
            consumer.await.unwrap();
        }

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        let mut expected = links;
        expected.sort();
        assert_eq!(seen, expected);
    }
}
