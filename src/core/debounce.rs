use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Default quiet period before a scheduled job runs
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum DebounceState {
    Idle,
    Pending {
        generation: u64,
        handle: AbortHandle,
    },
}

#[derive(Debug)]
struct Inner {
    generation: u64,
    state: DebounceState,
}

/// Last-write-wins debouncer
///
/// `schedule` moves the machine to `Pending`, replacing any job that was
/// already waiting. A job runs only if no newer `schedule` or `cancel`
/// happened during its quiet period. Jobs run on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                state: DebounceState::Idle,
            })),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Run `job` once the quiet period elapses without another call.
    ///
    /// Returns `false`, leaving any pending job untouched, when called
    /// outside a tokio runtime.
    pub fn schedule<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Cannot schedule debounced job: {}", e);
                return false;
            }
        };

        let mut inner = lock(&self.inner);
        if let DebounceState::Pending { handle, generation } =
            std::mem::replace(&mut inner.state, DebounceState::Idle)
        {
            tracing::trace!("Superseding pending job {}", generation);
            handle.abort();
        }

        inner.generation += 1;
        let generation = inner.generation;
        let shared = Arc::clone(&self.inner);
        let quiet_period = self.quiet_period;

        let task = runtime.spawn(async move {
            tokio::time::sleep(quiet_period).await;

            {
                let mut inner = lock(&shared);
                // A newer schedule or a cancel won the race against abort
                if inner.generation != generation {
                    return;
                }
                inner.state = DebounceState::Idle;
            }

            job();
        });

        inner.state = DebounceState::Pending {
            generation,
            handle: task.abort_handle(),
        };

        true
    }

    /// Drop the pending job, if any. Its callback will never run.
    pub fn cancel(&self) {
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        if let DebounceState::Pending { handle, .. } =
            std::mem::replace(&mut inner.state, DebounceState::Idle)
        {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(lock(&self.inner).state, DebounceState::Pending { .. })
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
