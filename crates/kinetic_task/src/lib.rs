//! # kinetic_task
//!
//! Named task registry and retry-bounded executor for tick-driven action
//! sequences.
//!
//! A caller builds a [`TaskRegistry`] for one triggered sequence, hands it to
//! an [`Executor`], queues an ordered list of [`TaskInvocation`]s with
//! [`Executor::run`], and then calls [`Executor::step`] once per simulation
//! tick. Each record is retried once per tick until its task reports
//! [`TaskPoll::Done`] or the retry ceiling elapses.
//!
//! ## Usage
//!
//! ```rust
//! use kinetic_task::{Executor, FixedTicks, TaskArgs, TaskInvocation, TaskPoll, TaskRegistry};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Action {
//!     Wave,
//! }
//!
//! let mut registry: TaskRegistry<Action, u32> = TaskRegistry::new();
//! registry.add(Action::Wave, |waves, _tick, _args| {
//!     *waves += 1;
//!     TaskPoll::Done
//! });
//!
//! let mut executor = Executor::new(registry);
//! executor.run([TaskInvocation::new(Action::Wave, TaskArgs::new())]);
//!
//! let mut waves = 0;
//! let mut ticks = FixedTicks::unbounded(1.0 / 60.0).unwrap();
//! executor.drive(&mut waves, &mut ticks);
//! assert_eq!(waves, 1);
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod registry;
pub mod task;
pub mod tick;

pub use config::{DEFAULT_RETRY_CEILING, ExecutorConfig};
pub use error::{ArgError, ConfigError, TickError};
pub use executor::{Executor, ExecutorStatus, RecordOutcome, RecordReport};
pub use registry::TaskRegistry;
pub use task::{TaskArg, TaskArgs, TaskFn, TaskInvocation, TaskKey, TaskPoll};
pub use tick::{FixedTicks, ScriptedTicks, Tick, TickSource};
