//! Task registry: the single source of truth for which actions exist.
//!
//! A registry maps task keys to callbacks. It is request-scoped: each
//! triggered action sequence builds its own registry, so callbacks can close
//! over per-sequence state without any cross-request bookkeeping.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::task::{TaskArgs, TaskFn, TaskKey, TaskPoll};
use crate::tick::Tick;

/// Registry of task callbacks keyed by `K`, operating on a host context `C`.
pub struct TaskRegistry<K, C: ?Sized> {
    /// Callbacks keyed by task.
    tasks: HashMap<K, TaskFn<C>>,
}

impl<K: TaskKey, C: ?Sized> TaskRegistry<K, C> {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Store `callback` under `key`, replacing any previous callback.
    ///
    /// Returns `true` if an existing entry was overwritten.
    pub fn register<F>(&mut self, key: K, callback: F) -> bool
    where
        F: FnMut(&mut C, Tick, &TaskArgs) -> TaskPoll + 'static,
    {
        let replaced = self.tasks.insert(key, Box::new(callback)).is_some();
        debug!(task = ?key, replaced, "registered task");
        replaced
    }

    /// Alias of [`register`](Self::register).
    pub fn add<F>(&mut self, key: K, callback: F) -> bool
    where
        F: FnMut(&mut C, Tick, &TaskArgs) -> TaskPoll + 'static,
    {
        self.register(key, callback)
    }

    /// Remove the callback under `key`.
    ///
    /// Returns `true` if an entry was removed; removing an absent key is not
    /// an error.
    pub fn remove(&mut self, key: K) -> bool {
        let removed = self.tasks.remove(&key).is_some();
        debug!(task = ?key, removed, "removed task");
        removed
    }

    /// Returns `true` if a callback is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.tasks.contains_key(&key)
    }

    /// Returns the number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns an iterator over all registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.tasks.keys().copied()
    }

    /// Call the task under `key` once.
    ///
    /// Returns `None` without doing anything if the key is unknown.
    pub fn invoke(&mut self, key: K, ctx: &mut C, tick: Tick, args: &TaskArgs) -> Option<TaskPoll> {
        let Some(callback) = self.tasks.get_mut(&key) else {
            trace!(task = ?key, "invoke of unknown task ignored");
            return None;
        };
        Some(callback(ctx, tick, args))
    }
}

impl<K: TaskKey, C: ?Sized> Default for TaskRegistry<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TaskKey, C: ?Sized> std::fmt::Debug for TaskRegistry<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Count,
        Echo,
    }

    fn tick() -> Tick {
        Tick::new(1, 0.1).unwrap()
    }

    #[test]
    fn test_register_and_invoke() {
        let mut registry: TaskRegistry<Key, u32> = TaskRegistry::new();
        assert!(!registry.register(Key::Count, |calls, _, _| {
            *calls += 1;
            TaskPoll::Done
        }));

        let mut calls = 0;
        let poll = registry.invoke(Key::Count, &mut calls, tick(), &TaskArgs::new());
        assert_eq!(poll, Some(TaskPoll::Done));
        assert_eq!(calls, 1);
        assert!(registry.contains(Key::Count));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregister_overwrites() {
        let mut registry: TaskRegistry<Key, u32> = TaskRegistry::new();
        registry.add(Key::Count, |_, _, _| TaskPoll::Pending);
        assert!(registry.add(Key::Count, |_, _, _| TaskPoll::Done));
        assert_eq!(registry.len(), 1);

        let mut ctx = 0;
        let poll = registry.invoke(Key::Count, &mut ctx, tick(), &TaskArgs::new());
        assert_eq!(poll, Some(TaskPoll::Done));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry: TaskRegistry<Key, u32> = TaskRegistry::new();
        assert!(!registry.remove(Key::Echo));
        registry.add(Key::Echo, |_, _, _| TaskPoll::Done);
        assert!(registry.remove(Key::Echo));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invoke_unknown_returns_none() {
        let mut registry: TaskRegistry<Key, u32> = TaskRegistry::new();
        let mut ctx = 0;
        assert_eq!(registry.invoke(Key::Echo, &mut ctx, tick(), &TaskArgs::new()), None);
        assert_eq!(ctx, 0);
    }

    #[test]
    fn test_arguments_reach_callback() {
        let mut registry: TaskRegistry<Key, Vec<bool>> = TaskRegistry::new();
        registry.add(Key::Echo, |seen, _, args| {
            seen.push(args.flag(0).unwrap_or(false));
            TaskPoll::Done
        });
        let mut seen = Vec::new();
        registry.invoke(Key::Echo, &mut seen, tick(), &TaskArgs::new().with(true));
        assert_eq!(seen, vec![true]);
    }

    #[test]
    fn test_keys_lists_registered_tasks() {
        let mut registry: TaskRegistry<Key, u32> = TaskRegistry::new();
        registry.add(Key::Count, |_, _, _| TaskPoll::Done);
        registry.add(Key::Echo, |_, _, _| TaskPoll::Done);
        let mut keys: Vec<Key> = registry.keys().collect();
        keys.sort_by_key(|k| *k as u8);
        assert_eq!(keys, vec![Key::Count, Key::Echo]);
    }
}
