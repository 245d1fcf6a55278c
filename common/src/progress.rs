use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use parking_lot::{Condvar, Mutex};

/// Shared counter used to follow a long running operation from another
/// thread.
#[derive(Clone)]
pub struct Progress(Arc<ProgressInner>);

struct ProgressInner {
    complete: AtomicU64,
    total: AtomicU64,
    finished: AtomicBool,

    notify: Condvar,
    lock: Mutex<()>,
}

impl Progress {
    pub fn new() -> Self {
        Self(Arc::new(ProgressInner {
            complete: AtomicU64::new(0),
            total: AtomicU64::new(0),
            finished: AtomicBool::new(false),

            notify: Condvar::new(),
            lock: Mutex::new(()),
        }))
    }

    pub fn progress(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        self.completed() as f32 / total as f32
    }

    pub fn completed(&self) -> u64 {
        self.0.complete.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.0.total.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.0.finished.load(Ordering::Acquire)
    }

    pub fn set_total(&self, total: u64) {
        self.0.total.store(total, Ordering::Relaxed);
    }

    pub fn add_complete(&self, count: u64) {
        self.0.complete.fetch_add(count, Ordering::Relaxed);
        self.notify();
    }

    pub fn set_finished(&self) {
        let total = self.total();
        self.0.complete.store(total, Ordering::Relaxed);
        self.0.finished.store(true, Ordering::Release);
        self.notify();
    }

    /// Blocks until more than `seen` items are complete or the operation
    /// finishes, returning the current count of completed items.
    pub fn wait(&self, seen: u64) -> u64 {
        let mut guard = self.0.lock.lock();
        while self.completed() <= seen && !self.is_finished() {
            self.0.notify.wait(&mut guard);
        }

        self.completed()
    }

    fn notify(&self) {
        // Taken so a waiter can't miss a wakeup between its check and its wait.
        let _guard = self.0.lock.lock();
        self.0.notify.notify_all();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn wait_sees_every_update() {
        let progress = Progress::new();
        progress.set_total(100);

        let worker = thread::spawn({
            let progress = progress.clone();
            move || {
                for _ in 0..100 {
                    progress.add_complete(1);
                }
                progress.set_finished();
            }
        });

        let mut seen = 0;
        while !progress.is_finished() {
            seen = progress.wait(seen);
        }

        worker.join().unwrap();
        assert_eq!(progress.completed(), 100);
        assert_eq!(progress.progress(), 1.0);
    }

    #[test]
    fn finishing_with_nothing_to_do() {
        let progress = Progress::new();
        progress.set_finished();
        assert_eq!(progress.wait(0), 0);
        assert_eq!(progress.progress(), 0.0);
    }
}
