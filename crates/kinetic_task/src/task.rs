//! Task vocabulary: keys, positional arguments, and poll results.

use std::fmt::Debug;
use std::hash::Hash;

use kinetic_math::Vec3;
use kinetic_world::Entity;

use crate::error::ArgError;
use crate::tick::Tick;

/// Identifies a task in a [`TaskRegistry`](crate::TaskRegistry).
///
/// Implemented for any small copyable key; in practice an enum listing every
/// task an application knows about, so the valid names are enumerable at
/// compile time.
pub trait TaskKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> TaskKey for T {}

/// What a task reports after one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPoll {
    /// The task completed. Reported on exactly one tick.
    Done,
    /// Not done yet; invoke again next tick while the retry window lasts.
    Pending,
    /// A self-bounded traversal is in progress. The retry ceiling does not
    /// apply to ticks that report `Running`.
    Running,
}

impl TaskPoll {
    /// Returns `true` for [`TaskPoll::Done`].
    #[must_use]
    pub fn is_done(self) -> bool {
        self == TaskPoll::Done
    }
}

impl From<bool> for TaskPoll {
    fn from(done: bool) -> Self {
        if done { TaskPoll::Done } else { TaskPoll::Pending }
    }
}

/// A task callback.
///
/// Receives the host context, the current tick, and the record's arguments.
/// Arguments are identical on every attempt, so progress must be kept in the
/// closure's captured state.
pub type TaskFn<C> = Box<dyn FnMut(&mut C, Tick, &TaskArgs) -> TaskPoll>;

/// One positional task argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskArg {
    /// An entity handle.
    Entity(Entity),
    /// A world-space point or direction.
    Point(Vec3),
    /// A scalar value.
    Scalar(f32),
    /// A boolean value.
    Flag(bool),
}

impl TaskArg {
    fn kind(&self) -> &'static str {
        match self {
            TaskArg::Entity(_) => "entity",
            TaskArg::Point(_) => "point",
            TaskArg::Scalar(_) => "scalar",
            TaskArg::Flag(_) => "flag",
        }
    }
}

impl From<Entity> for TaskArg {
    fn from(entity: Entity) -> Self {
        TaskArg::Entity(entity)
    }
}

impl From<Vec3> for TaskArg {
    fn from(point: Vec3) -> Self {
        TaskArg::Point(point)
    }
}

impl From<f32> for TaskArg {
    fn from(value: f32) -> Self {
        TaskArg::Scalar(value)
    }
}

impl From<bool> for TaskArg {
    fn from(value: bool) -> Self {
        TaskArg::Flag(value)
    }
}

/// Ordered, immutable argument list of a task invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskArgs(Vec<TaskArg>);

impl TaskArgs {
    /// An empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an argument.
    #[must_use]
    pub fn with(mut self, arg: impl Into<TaskArg>) -> Self {
        self.0.push(arg.into());
        self
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TaskArg> {
        self.0.get(index)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read an entity argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the argument is missing or not an entity.
    pub fn entity(&self, index: usize) -> Result<Entity, ArgError> {
        match self.require(index)? {
            TaskArg::Entity(entity) => Ok(*entity),
            other => Err(mismatch(index, "entity", other)),
        }
    }

    /// Read a point argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the argument is missing or not a point.
    pub fn point(&self, index: usize) -> Result<Vec3, ArgError> {
        match self.require(index)? {
            TaskArg::Point(point) => Ok(*point),
            other => Err(mismatch(index, "point", other)),
        }
    }

    /// Read a scalar argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the argument is missing or not a scalar.
    pub fn scalar(&self, index: usize) -> Result<f32, ArgError> {
        match self.require(index)? {
            TaskArg::Scalar(value) => Ok(*value),
            other => Err(mismatch(index, "scalar", other)),
        }
    }

    /// Read a boolean argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the argument is missing or not a flag.
    pub fn flag(&self, index: usize) -> Result<bool, ArgError> {
        match self.require(index)? {
            TaskArg::Flag(value) => Ok(*value),
            other => Err(mismatch(index, "flag", other)),
        }
    }

    fn require(&self, index: usize) -> Result<&TaskArg, ArgError> {
        self.0.get(index).ok_or(ArgError::Missing { index })
    }
}

fn mismatch(index: usize, expected: &'static str, found: &TaskArg) -> ArgError {
    ArgError::Mismatch {
        index,
        expected,
        found: found.kind(),
    }
}

impl From<Vec<TaskArg>> for TaskArgs {
    fn from(args: Vec<TaskArg>) -> Self {
        Self(args)
    }
}

impl FromIterator<TaskArg> for TaskArgs {
    fn from_iter<I: IntoIterator<Item = TaskArg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One element of a run request: which task, with which arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInvocation<K> {
    /// The task to invoke.
    pub key: K,
    /// Arguments passed verbatim on every attempt.
    pub args: TaskArgs,
}

impl<K: TaskKey> TaskInvocation<K> {
    /// Create an invocation record.
    #[must_use]
    pub fn new(key: K, args: impl Into<TaskArgs>) -> Self {
        Self {
            key,
            args: args.into(),
        }
    }
}
