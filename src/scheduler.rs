//! Periodic task scheduler
//!
//! Single-threaded and cooperative: the scheduler awaits one job to completion
//! before looking at the next due task, so a slow job delays everything due
//! after it.
//!
//! ## Firing rules
//!
//! ```text
//! start          → every task is due at the start time
//! after a firing → next due = now + (interval - now mod interval)
//! same due time  → lower priority value first, then registration order
//! job fails      → logged, task rescheduled anyway
//! ```
//!
//! Aligning firings on multiples of the interval (measured from the clock's
//! epoch) keeps tasks with commensurate intervals in sync.

use std::any::Any;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, ensure};
use async_trait::async_trait;
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

/// Executes the jobs handed out by a [`Scheduler`]
#[async_trait]
pub trait Dispatch<J>: Send {
    async fn dispatch(&mut self, job: &J) -> Result<()>;
}

/// Time source measuring durations since an epoch
///
/// The clock is driven by tokio's [`Instant`], so it follows paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
    offset: Duration,
}

impl Clock {
    /// Clock measuring time since the UNIX epoch
    pub fn wall() -> Self {
        let offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::starting_at(offset)
    }

    /// Clock that reads `offset` right now
    pub fn starting_at(offset: Duration) -> Self {
        Self {
            origin: Instant::now(),
            offset,
        }
    }

    pub fn now(&self) -> Duration {
        self.offset + self.origin.elapsed()
    }

    fn instant_at(&self, time: Duration) -> Instant {
        self.origin + time.saturating_sub(self.offset)
    }
}

/// Delay until the next multiple of `interval`, never zero
pub fn next_delay(now: Duration, interval: Duration) -> Duration {
    let interval_nanos = interval.as_nanos().max(1);
    let remainder = now.as_nanos() % interval_nanos;
    Duration::from_nanos((interval_nanos - remainder) as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

#[derive(Debug, Clone)]
pub struct PeriodicTask<J> {
    pub interval: Duration,
    pub priority: u32,
    pub job: J,
}

/// Outcome of one firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub task: TaskId,
    /// Clock reading when the job started
    pub at: Duration,
    pub succeeded: bool,
}

// Field order defines the firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    priority: u32,
    task: usize,
}

pub struct Scheduler<J> {
    clock: Clock,
    start: Duration,
    tasks: Vec<PeriodicTask<J>>,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl<J> Scheduler<J>
where
    J: std::fmt::Debug,
{
    /// Scheduler aligned on wall clock time
    pub fn new() -> Self {
        Self::with_clock(Clock::wall())
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            start: clock.now(),
            clock,
            tasks: Vec::new(),
            queue: BinaryHeap::new(),
        }
    }

    /// Register a job firing every `interval`
    pub fn every(&mut self, interval: Duration, priority: u32, job: J) -> Result<TaskId> {
        ensure!(!interval.is_zero(), "interval of {job:?} must not be zero");

        let task = self.tasks.len();
        trace!("scheduling {job:?} every {interval:?} (priority {priority})");
        self.tasks.push(PeriodicTask {
            interval,
            priority,
            job,
        });
        self.queue.push(Reverse(Entry {
            due: self.start,
            priority,
            task,
        }));

        Ok(TaskId(task))
    }

    pub fn task(&self, id: TaskId) -> &PeriodicTask<J> {
        &self.tasks[id.0]
    }

    /// Fire tasks until none is left, i.e. forever once anything is scheduled
    pub async fn run<D: Dispatch<J>>(&mut self, dispatcher: &mut D) {
        info!("starting scheduler with {} tasks", self.tasks.len());

        while self.step(dispatcher).await.is_some() {}

        warn!("no task scheduled, scheduler stopped");
    }

    /// Wait for the next due task, fire it and reschedule it
    #[instrument(skip_all)]
    pub async fn step<D: Dispatch<J>>(&mut self, dispatcher: &mut D) -> Option<Firing> {
        let Reverse(entry) = self.queue.pop()?;
        tokio::time::sleep_until(self.clock.instant_at(entry.due)).await;

        let task = &self.tasks[entry.task];
        let at = self.clock.now();
        trace!("firing {:?} at {at:?}", task.job);

        let succeeded = match AssertUnwindSafe(dispatcher.dispatch(&task.job))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("{:?} failed: {e:#}", task.job);
                false
            }
            Err(panic) => {
                error!("{:?} panicked: {}", task.job, panic_message(&*panic));
                false
            }
        };

        let now = self.clock.now();
        let due = now + next_delay(now, task.interval);
        debug!("{:?} rescheduled at {due:?}", task.job);
        self.queue.push(Reverse(Entry { due, ..entry }));

        Some(Firing {
            task: TaskId(entry.task),
            at,
            succeeded,
        })
    }
}

impl<J: std::fmt::Debug> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
