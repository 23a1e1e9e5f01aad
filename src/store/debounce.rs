use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct Pending {
    deadline: Option<Instant>,
    shutdown: bool,
}

/// A cancellable scheduled task. Each `schedule` call pushes the deadline
/// out by the full wait; the task runs once the deadline passes with no
/// further calls. Only the latest schedule ever fires.
pub struct Debouncer {
    wait: Duration,
    shared: Arc<(Mutex<Pending>, Condvar)>,
    worker: Option<JoinHandle<()>>,
}

fn lock(mutex: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Debouncer {
    pub fn new<F>(wait: Duration, task: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let shared = Arc::new((
            Mutex::new(Pending {
                deadline: None,
                shutdown: false,
            }),
            Condvar::new(),
        ));
        let worker_shared = Arc::clone(&shared);

        let worker = thread::spawn(move || {
            let (mutex, condvar) = &*worker_shared;
            let mut pending = lock(mutex);
            loop {
                if pending.shutdown {
                    return;
                }
                match pending.deadline {
                    None => {
                        pending = condvar.wait(pending).unwrap_or_else(|e| e.into_inner());
                    }
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            pending.deadline = None;
                            drop(pending);
                            task();
                            pending = lock(mutex);
                        } else {
                            let (guard, _) = condvar
                                .wait_timeout(pending, deadline - now)
                                .unwrap_or_else(|e| e.into_inner());
                            pending = guard;
                        }
                    }
                }
            }
        });

        Self {
            wait,
            shared,
            worker: Some(worker),
        }
    }

    /// Schedule (or reschedule) the task for `wait` from now.
    pub fn schedule(&self) {
        let (mutex, condvar) = &*self.shared;
        lock(mutex).deadline = Some(Instant::now() + self.wait);
        condvar.notify_one();
    }

    /// Drop any pending run without executing it.
    pub fn cancel(&self) {
        let (mutex, condvar) = &*self.shared;
        lock(mutex).deadline = None;
        condvar.notify_one();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let (mutex, condvar) = &*self.shared;
        {
            let mut pending = lock(mutex);
            pending.shutdown = true;
            pending.deadline = None;
        }
        condvar.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn rapid_schedules_collapse_into_one_run() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..5 {
            debouncer.schedule();
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_prevents_the_pending_run() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        debouncer.schedule();
        debouncer.cancel();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drop_does_not_fire_pending_work() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        debouncer.schedule();
        drop(debouncer);
        thread::sleep(Duration::from_millis(60));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
