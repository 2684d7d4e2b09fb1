//! Delayed-task scheduling keyed by (light, timer kind).
//!
//! Each [`TimerKey`] has at most one pending task. Scheduling a key that is
//! already pending replaces the earlier deadline instead of queueing behind
//! it. Tasks always run with no scheduler lock held, so a task may schedule
//! or cancel other timers.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::light::LightId;

/// What a pending deadline is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Revert a pulsed light to steady state.
    PulseRevert,
    /// Turn the button backlight off after a one-shot.
    ButtonTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub light: LightId,
    pub kind: TimerKind,
}

impl TimerKey {
    pub fn new(light: LightId, kind: TimerKind) -> Self {
        TimerKey { light, kind }
    }
}

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` after `delay`, replacing any task pending for `key`.
    fn schedule(&self, key: TimerKey, delay: Duration, task: Task);
    /// Drop the task pending for `key`, if any.
    fn cancel(&self, key: TimerKey);
    fn is_pending(&self, key: TimerKey) -> bool;
    fn pending_count(&self) -> usize;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Thread-backed scheduler ──

struct Entry {
    deadline: Instant,
    task: Task,
}

#[derive(Default)]
struct Queue {
    entries: HashMap<TimerKey, Entry>,
    running: bool,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    cond: Condvar,
}

/// Scheduler with a single worker thread.
///
/// The worker sleeps until the earliest deadline, then runs that task.
/// Dropping the scheduler discards pending tasks and joins the worker.
pub struct ThreadScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn new() -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("hwsvc-timer".into())
            .spawn(move || worker_loop(&worker_shared))?;
        Ok(ThreadScheduler {
            shared,
            worker: Some(worker),
        })
    }

    /// Block until no task is pending or running, or `timeout` elapses.
    ///
    /// Returns `true` if the scheduler went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut q = lock(&self.shared.queue);
        loop {
            if q.entries.is_empty() && !q.running {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            q = self
                .shared
                .cond
                .wait_timeout(q, deadline - now)
                .map(|(g, _)| g)
                .unwrap_or_else(|e| e.into_inner().0);
        }
    }
}

fn worker_loop(shared: &Shared) {
    let mut q = lock(&shared.queue);
    loop {
        if q.shutdown {
            return;
        }
        let next = q
            .entries
            .iter()
            .min_by_key(|(_, e)| e.deadline)
            .map(|(k, e)| (*k, e.deadline));
        match next {
            None => {
                q = shared.cond.wait(q).unwrap_or_else(|e| e.into_inner());
            }
            Some((key, deadline)) => {
                let now = Instant::now();
                if deadline > now {
                    q = shared
                        .cond
                        .wait_timeout(q, deadline - now)
                        .map(|(g, _)| g)
                        .unwrap_or_else(|e| e.into_inner().0);
                    continue;
                }
                let Some(entry) = q.entries.remove(&key) else {
                    continue;
                };
                q.running = true;
                drop(q);
                log::debug!("[timer] firing {key:?}");
                (entry.task)();
                q = lock(&shared.queue);
                q.running = false;
                shared.cond.notify_all();
            }
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, key: TimerKey, delay: Duration, task: Task) {
        let mut q = lock(&self.shared.queue);
        let replaced = q
            .entries
            .insert(
                key,
                Entry {
                    deadline: Instant::now() + delay,
                    task,
                },
            )
            .is_some();
        if replaced {
            log::debug!("[timer] rescheduled {key:?} in {}ms", delay.as_millis());
        }
        self.shared.cond.notify_all();
    }

    fn cancel(&self, key: TimerKey) {
        let mut q = lock(&self.shared.queue);
        if q.entries.remove(&key).is_some() {
            self.shared.cond.notify_all();
        }
    }

    fn is_pending(&self, key: TimerKey) -> bool {
        lock(&self.shared.queue).entries.contains_key(&key)
    }

    fn pending_count(&self) -> usize {
        lock(&self.shared.queue).entries.len()
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        {
            let mut q = lock(&self.shared.queue);
            q.shutdown = true;
            q.entries.clear();
        }
        self.shared.cond.notify_all();
        // The last handle can be released by a task on the worker itself.
        if let Some(worker) = self.worker.take()
            && worker.thread().id() != std::thread::current().id()
        {
            let _ = worker.join();
        }
    }
}

// ── Manual scheduler (tests) ──

pub mod mock {
    use super::*;

    struct ManualEntry {
        deadline: Duration,
        seq: u64,
        task: Task,
    }

    #[derive(Default)]
    struct ManualQueue {
        now: Duration,
        seq: u64,
        entries: HashMap<TimerKey, ManualEntry>,
        /// Every schedule call in order: (key, delay).
        history: Vec<(TimerKey, Duration)>,
    }

    /// Virtual-time scheduler. Nothing runs until [`advance`](Self::advance)
    /// or [`fire`](Self::fire) is called.
    #[derive(Default)]
    pub struct ManualScheduler {
        queue: Mutex<ManualQueue>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        /// Move virtual time forward, running due tasks in deadline order.
        ///
        /// Tasks scheduled by a running task also fire if they fall due
        /// within the advanced window.
        pub fn advance(&self, by: Duration) {
            let target = lock(&self.queue).now + by;
            loop {
                let task = {
                    let mut q = lock(&self.queue);
                    let due = q
                        .entries
                        .iter()
                        .filter(|(_, e)| e.deadline <= target)
                        .min_by_key(|(_, e)| (e.deadline, e.seq))
                        .map(|(k, _)| *k);
                    match due.and_then(|k| q.entries.remove(&k)) {
                        Some(entry) => {
                            q.now = entry.deadline;
                            entry.task
                        }
                        None => {
                            q.now = target;
                            return;
                        }
                    }
                };
                task();
            }
        }

        /// Run the task pending for `key` immediately. Returns whether one ran.
        pub fn fire(&self, key: TimerKey) -> bool {
            let entry = lock(&self.queue).entries.remove(&key);
            match entry {
                Some(entry) => {
                    (entry.task)();
                    true
                }
                None => false,
            }
        }

        /// Remaining delay for `key`, relative to virtual now.
        pub fn remaining(&self, key: TimerKey) -> Option<Duration> {
            let q = lock(&self.queue);
            q.entries.get(&key).map(|e| e.deadline - q.now)
        }

        /// Number of times `key` has been scheduled.
        pub fn schedule_count(&self, key: TimerKey) -> usize {
            lock(&self.queue)
                .history
                .iter()
                .filter(|(k, _)| *k == key)
                .count()
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, key: TimerKey, delay: Duration, task: Task) {
            let mut q = lock(&self.queue);
            q.seq += 1;
            let entry = ManualEntry {
                deadline: q.now + delay,
                seq: q.seq,
                task,
            };
            q.entries.insert(key, entry);
            q.history.push((key, delay));
        }

        fn cancel(&self, key: TimerKey) {
            lock(&self.queue).entries.remove(&key);
        }

        fn is_pending(&self, key: TimerKey) -> bool {
            lock(&self.queue).entries.contains_key(&key)
        }

        fn pending_count(&self) -> usize {
            lock(&self.queue).entries.len()
        }
    }
}
