//! Retry-bounded executor.
//!
//! The executor runs an ordered list of [`TaskInvocation`]s, one record at a
//! time, one attempt per tick. Each record moves through
//! `Pending → Retrying → Resolved`:
//!
//! 1. A record whose key is not registered when it reaches the front of the
//!    queue resolves as [`RecordOutcome::Skipped`] with zero invocations and
//!    without consuming a tick. The lookup happens at step time, so keys
//!    registered after [`run`](Executor::run) are honoured.
//! 2. Otherwise, every [`step`](Executor::step) adds the tick delta to the
//!    record's `waited` time and invokes the task once.
//!    - [`TaskPoll::Done`] resolves it as [`RecordOutcome::Succeeded`]; the
//!      next record gets its first attempt on the following tick.
//!    - [`TaskPoll::Pending`] keeps retrying until `waited` exceeds the retry
//!      ceiling, then resolves it as [`RecordOutcome::TimedOut`].
//!    - [`TaskPoll::Running`] means the task's own traversal is under way.
//!      Those ticks are bounded by the task itself, so the retry window is
//!      re-armed (`waited = 0`) instead of counting towards the ceiling.
//!
//! There is no cancellation and no aggregate result; [`run`](Executor::run)
//! is fire-and-forget. Per-record outcomes are kept in
//! [`outcomes`](Executor::outcomes) for observation only.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::ExecutorConfig;
use crate::registry::TaskRegistry;
use crate::task::{TaskInvocation, TaskKey, TaskPoll};
use crate::tick::{Tick, TickSource};

/// How a record was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The task reported [`TaskPoll::Done`].
    Succeeded,
    /// The retry ceiling elapsed without completion.
    TimedOut,
    /// No task was registered under the key.
    Skipped,
}

/// Resolution of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport<K> {
    /// The record's task key.
    pub key: K,
    /// How the record ended.
    pub outcome: RecordOutcome,
    /// Number of times the callback was invoked.
    pub attempts: u32,
    /// Tick time accumulated in the final retry window.
    pub waited: f32,
}

/// Whether the executor still has work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorStatus {
    /// Nothing queued or in flight.
    Idle,
    /// A record is in flight or queued.
    Busy,
}

/// The record currently in its retry loop.
#[derive(Debug)]
struct ActiveRecord<K> {
    invocation: TaskInvocation<K>,
    waited: f32,
    attempts: u32,
}

/// Executes task lists against a host context `C`, one tick at a time.
pub struct Executor<K, C: ?Sized> {
    /// Sequence identifier, recorded on every log line.
    id: Uuid,
    /// Retry ceiling and friends.
    config: ExecutorConfig,
    /// The tasks this sequence may invoke.
    registry: TaskRegistry<K, C>,
    /// Records not yet started, in order.
    queue: VecDeque<TaskInvocation<K>>,
    /// The record in flight, if any.
    active: Option<ActiveRecord<K>>,
    /// Resolved records, in resolution order.
    outcomes: Vec<RecordReport<K>>,
}

impl<K: TaskKey, C: ?Sized> Executor<K, C> {
    /// Create an executor over `registry` with the default configuration.
    #[must_use]
    pub fn new(registry: TaskRegistry<K, C>) -> Self {
        Self::with_config(registry, ExecutorConfig::default())
    }

    /// Create an executor over `registry` with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: TaskRegistry<K, C>, config: ExecutorConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            registry,
            queue: VecDeque::new(),
            active: None,
            outcomes: Vec::new(),
        }
    }

    /// Returns the sequence identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns a reference to the task registry.
    #[must_use]
    pub fn registry(&self) -> &TaskRegistry<K, C> {
        &self.registry
    }

    /// Returns a mutable reference to the task registry.
    pub fn registry_mut(&mut self) -> &mut TaskRegistry<K, C> {
        &mut self.registry
    }

    /// Queue `records` for execution after anything already queued.
    ///
    /// Nothing runs until the next [`step`](Self::step).
    pub fn run(&mut self, records: impl IntoIterator<Item = TaskInvocation<K>>) {
        let before = self.queue.len();
        self.queue.extend(records);
        info!(
            sequence = %self.id,
            queued = self.queue.len() - before,
            "task list queued"
        );
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> ExecutorStatus {
        if self.active.is_some() || !self.queue.is_empty() {
            ExecutorStatus::Busy
        } else {
            ExecutorStatus::Idle
        }
    }

    /// Returns `true` if there is no queued or in-flight work.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.status() == ExecutorStatus::Idle
    }

    /// Returns the key of the record in flight, if any.
    #[must_use]
    pub fn current(&self) -> Option<K> {
        self.active.as_ref().map(|r| r.invocation.key)
    }

    /// Returns every record resolved so far, in resolution order.
    #[must_use]
    pub fn outcomes(&self) -> &[RecordReport<K>] {
        &self.outcomes
    }

    /// Drain the resolved records.
    pub fn take_outcomes(&mut self) -> Vec<RecordReport<K>> {
        std::mem::take(&mut self.outcomes)
    }

    /// Advance by one tick: make at most one attempt on the current record.
    pub fn step(&mut self, ctx: &mut C, tick: Tick) -> ExecutorStatus {
        self.skip_unregistered();
        let Some(mut record) = self.active.take().or_else(|| self.start_next()) else {
            return ExecutorStatus::Idle;
        };

        record.waited += tick.dt();
        record.attempts += 1;
        let key = record.invocation.key;
        let poll = self
            .registry
            .invoke(key, ctx, tick, &record.invocation.args);
        trace!(
            sequence = %self.id,
            task = ?key,
            tick = tick.index(),
            waited = record.waited,
            ?poll,
            "attempt"
        );

        match poll {
            // Removed from the registry while in flight.
            None => self.resolve(record, RecordOutcome::Skipped),
            Some(TaskPoll::Done) => self.resolve(record, RecordOutcome::Succeeded),
            Some(TaskPoll::Running) => {
                record.waited = 0.0;
                self.active = Some(record);
            }
            Some(TaskPoll::Pending) if record.waited > self.config.retry_ceiling => {
                warn!(
                    sequence = %self.id,
                    task = ?key,
                    waited = record.waited,
                    attempts = record.attempts,
                    "task abandoned after retry ceiling"
                );
                self.resolve(record, RecordOutcome::TimedOut);
            }
            Some(TaskPoll::Pending) => self.active = Some(record),
        }

        self.skip_unregistered();
        self.status()
    }

    /// Step with ticks from `source` until idle or the source runs dry.
    ///
    /// Returns the number of ticks consumed.
    pub fn drive<S: TickSource + ?Sized>(&mut self, ctx: &mut C, source: &mut S) -> u64 {
        let mut ticks = 0;
        loop {
            // Unknown keys resolve without spending a tick.
            self.skip_unregistered();
            if self.is_idle() {
                break;
            }
            let Some(tick) = source.next_tick() else {
                debug!(sequence = %self.id, ticks, "tick source exhausted");
                break;
            };
            ticks += 1;
            self.step(ctx, tick);
        }
        ticks
    }

    fn start_next(&mut self) -> Option<ActiveRecord<K>> {
        let invocation = self.queue.pop_front()?;
        debug!(sequence = %self.id, task = ?invocation.key, "record started");
        Some(ActiveRecord {
            invocation,
            waited: 0.0,
            attempts: 0,
        })
    }

    /// Resolve queued records at the front that have no registered task.
    fn skip_unregistered(&mut self) {
        if self.active.is_some() {
            return;
        }
        while let Some(front) = self.queue.front() {
            if self.registry.contains(front.key) {
                break;
            }
            if let Some(invocation) = self.queue.pop_front() {
                let record = ActiveRecord {
                    invocation,
                    waited: 0.0,
                    attempts: 0,
                };
                self.resolve(record, RecordOutcome::Skipped);
            }
        }
    }

    fn resolve(&mut self, record: ActiveRecord<K>, outcome: RecordOutcome) {
        debug!(
            sequence = %self.id,
            task = ?record.invocation.key,
            ?outcome,
            attempts = record.attempts,
            waited = record.waited,
            "record resolved"
        );
        self.outcomes.push(RecordReport {
            key: record.invocation.key,
            outcome,
            attempts: record.attempts,
            waited: record.waited,
        });
        if self.active.is_none() && self.queue.is_empty() {
            info!(sequence = %self.id, records = self.outcomes.len(), "task list finished");
        }
    }
}

impl<K: TaskKey, C: ?Sized> std::fmt::Debug for Executor<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("queued", &self.queue.len())
            .field("current", &self.current())
            .field("outcomes", &self.outcomes)
            .finish()
    }
}
