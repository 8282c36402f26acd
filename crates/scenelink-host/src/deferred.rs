//! Single-shot deferred tasks run on the host thread.
//!
//! Other threads push closures with [`DeferredQueue::defer`]; the host loop
//! drains them at the start of each tick with [`DeferredQueue::run_pending`].
//! A task queued while the host is draining lands in the *next* pass, never
//! the current one, so no task ever runs re-entrantly inside another.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

/// A boxed single-shot task over host state `T`.
pub type Task<T> = Box<dyn FnOnce(&mut T) + Send>;

struct State<T> {
    tasks: Vec<Task<T>>,
    closed: bool,
}

/// Multi-producer, host-consumed queue of deferred tasks.
pub struct DeferredQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for DeferredQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("DeferredQueue")
            .field("pending", &state.tasks.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T> DeferredQueue<T> {
    /// Empty, open queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                tasks: Vec::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Queue `task` for the next host pass. Returns `false` once closed.
    pub fn defer(&self, task: impl FnOnce(&mut T) + Send + 'static) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            trace!("deferred task dropped, queue closed");
            return false;
        }
        state.tasks.push(Box::new(task));
        drop(state);
        let _ = self.ready.notify_one();
        true
    }

    /// Run every task queued before this call. Returns how many ran.
    pub fn run_pending(&self, host: &mut T) -> usize {
        let tasks = std::mem::take(&mut self.state.lock().tasks);
        let count = tasks.len();
        for task in tasks {
            task(host);
        }
        count
    }

    /// Block until a task is queued, the queue closes, or `timeout` passes.
    pub fn wait(&self, timeout: Duration) {
        let mut state = self.state.lock();
        if state.tasks.is_empty() && !state.closed {
            let _ = self.ready.wait_for(&mut state, timeout);
        }
    }

    /// Stop accepting tasks and wake the host loop.
    pub fn close(&self) {
        self.state.lock().closed = true;
        let _ = self.ready.notify_all();
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Tasks waiting for the next pass.
    pub fn pending(&self) -> usize {
        self.state.lock().tasks.len()
    }
}

/// Drive `host` until the queue closes, draining once per tick.
///
/// Tasks still queued when the queue closes get one final pass.
pub fn run_host_loop<T>(queue: &DeferredQueue<T>, host: &mut T, tick: Duration) {
    debug!(tick_ms = tick.as_millis(), "host loop started");
    loop {
        queue.wait(tick);
        let _ = queue.run_pending(host);
        if queue.is_closed() {
            let _ = queue.run_pending(host);
            break;
        }
    }
    debug!("host loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn tasks_run_in_order_on_drain() {
        let queue = DeferredQueue::<Vec<u32>>::new();
        assert!(queue.defer(|v| v.push(1)));
        assert!(queue.defer(|v| v.push(2)));
        let mut host = Vec::new();
        assert_eq!(queue.run_pending(&mut host), 2);
        assert_eq!(host, vec![1, 2]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn task_deferred_during_drain_waits_for_next_pass() {
        struct Host {
            queue: Arc<DeferredQueue<Host>>,
            log: Vec<&'static str>,
        }
        let queue = Arc::new(DeferredQueue::<Host>::new());
        let mut host = Host {
            queue: Arc::clone(&queue),
            log: Vec::new(),
        };
        assert!(queue.defer(|h| {
            h.log.push("outer");
            let _ = h.queue.defer(|h| h.log.push("inner"));
        }));

        assert_eq!(queue.run_pending(&mut host), 1);
        assert_eq!(host.log, vec!["outer"]);
        assert_eq!(queue.run_pending(&mut host), 1);
        assert_eq!(host.log, vec!["outer", "inner"]);
    }

    #[test]
    fn closed_queue_rejects() {
        let queue = DeferredQueue::<()>::new();
        queue.close();
        assert!(!queue.defer(|_| {}));
        assert!(queue.is_closed());
    }

    #[test]
    fn host_loop_runs_tasks_from_other_threads() {
        let queue = Arc::new(DeferredQueue::<Vec<u32>>::new());
        let producer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                for i in 0..10 {
                    let _ = queue.defer(move |v| v.push(i));
                }
                queue.close();
            })
        };
        let mut host = Vec::new();
        run_host_loop(&queue, &mut host, Duration::from_millis(5));
        producer.join().unwrap();
        assert_eq!(host, (0..10).collect::<Vec<_>>());
    }
}
