//! Tick-based task scheduling behind a trait seam.

use futures::executor::block_on;
use futures::future::BoxFuture;
use parking_lot::Mutex;

/// Milliseconds per game tick.
pub const TICK_MS: u64 = 50;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Scheduling seam between the library and its host.
///
/// Implementations decide what "now" and "a tick" mean; the library only
/// asks for immediate execution, delayed execution measured in ticks, and
/// driving a future to completion.
pub trait TaskScheduler: Send + Sync {
    /// Runs `task` as soon as the host allows.
    fn run_now(&self, task: Task);

    /// Runs `task` after `delay_ticks` full ticks have elapsed.
    fn run_after(&self, delay_ticks: u32, task: Task);

    /// Drives `future` to completion off the main loop.
    fn run_future(&self, future: BoxFuture<'static, ()>);
}

struct QueueState {
    now: u64,
    queue: Vec<(u64, Task)>,
}

/// A manually-ticked scheduler.
///
/// `run_now` executes inline; delayed tasks wait until [`QueueScheduler::tick`]
/// advances the clock past their due tick. Intended for tests and
/// single-threaded hosts.
pub struct QueueScheduler {
    inner: Mutex<QueueState>,
}

impl Default for QueueScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueState {
                now: 0,
                queue: Vec::new(),
            }),
        }
    }

    /// Advances the clock one tick and runs every task that came due.
    pub fn tick(&self) {
        let due: Vec<Task> = {
            let mut state = self.inner.lock();
            state.now += 1;
            let now = state.now;
            let mut ready = Vec::new();
            let mut index = 0;
            while index < state.queue.len() {
                if state.queue[index].0 <= now {
                    ready.push(state.queue.swap_remove(index).1);
                } else {
                    index += 1;
                }
            }
            ready
        };
        for task in due {
            task();
        }
    }

    /// Advances the clock `ticks` times.
    pub fn tick_many(&self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Number of tasks still waiting for their tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().queue.len()
    }
}

impl TaskScheduler for QueueScheduler {
    fn run_now(&self, task: Task) {
        task();
    }

    fn run_after(&self, delay_ticks: u32, task: Task) {
        let mut state = self.inner.lock();
        let due = state.now + u64::from(delay_ticks);
        state.queue.push((due, task));
    }

    fn run_future(&self, future: BoxFuture<'static, ()>) {
        block_on(future);
    }
}
