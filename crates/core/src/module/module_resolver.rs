use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::module::domain::module_handle::ModuleHandle;
use crate::module::domain::module_loader::{ModuleLoadError, ModuleLoader};
use crate::module::domain::processor::PROCESSOR_API_VERSION;

type LoadOutcome = Result<ModuleHandle, ModuleLoadError>;
type PendingLoad = Shared<BoxFuture<'static, LoadOutcome>>;

enum LoadState {
    Unloaded,
    Loading { attempt: u64, pending: PendingLoad },
    Loaded(ModuleHandle),
    /// Last attempt failed. The next `resolve` starts a fresh attempt.
    Failed(ModuleLoadError),
}

/// Observable load state, for host diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// Loads the processing module on first use and keeps it for the lifetime
/// of the resolver.
///
/// Concurrent callers that arrive while a load is in flight all await that
/// same load and observe the same outcome. A successful load is cached
/// permanently; a failed one is not, so a later call retries.
///
/// Dropping a `resolve` future does not cancel the load. Whoever calls
/// `resolve` next picks up the pending attempt where it left off.
pub struct ModuleResolver {
    loader: Arc<dyn ModuleLoader>,
    state: Mutex<LoadState>,
    attempts: AtomicU64,
}

impl ModuleResolver {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            state: Mutex::new(LoadState::Unloaded),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn module_id(&self) -> &str {
        self.loader.module_id()
    }

    /// Returns the module handle, loading the module first if needed.
    pub async fn resolve(&self) -> LoadOutcome {
        let (attempt, pending) = {
            let mut state = self.lock_state();
            match &*state {
                LoadState::Loaded(handle) => return Ok(handle.clone()),
                LoadState::Loading { attempt, pending } => (*attempt, pending.clone()),
                LoadState::Unloaded | LoadState::Failed(_) => {
                    let attempt = self.next_attempt();
                    let pending = start_load(Arc::clone(&self.loader), attempt);
                    *state = LoadState::Loading {
                        attempt,
                        pending: pending.clone(),
                    };
                    (attempt, pending)
                }
            }
        };

        let outcome = pending.await;
        self.settle(attempt, &outcome);
        outcome
    }

    /// The cached handle, without triggering a load.
    pub fn loaded(&self) -> Option<ModuleHandle> {
        match &*self.lock_state() {
            LoadState::Loaded(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadStatus {
        match &*self.lock_state() {
            LoadState::Unloaded => LoadStatus::Unloaded,
            LoadState::Loading { .. } => LoadStatus::Loading,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    /// The error from the most recent attempt, if that attempt failed.
    pub fn last_error(&self) -> Option<ModuleLoadError> {
        match &*self.lock_state() {
            LoadState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Number of load attempts started so far.
    pub fn load_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn next_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records the outcome of `attempt`, unless a newer attempt has
    /// already replaced it.
    fn settle(&self, attempt: u64, outcome: &LoadOutcome) {
        let mut state = self.lock_state();
        let current = match &*state {
            LoadState::Loading { attempt: current, .. } => *current,
            _ => return,
        };
        if current != attempt {
            return;
        }
        *state = match outcome {
            Ok(handle) => LoadState::Loaded(handle.clone()),
            Err(err) => LoadState::Failed(err.clone()),
        };
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn start_load(loader: Arc<dyn ModuleLoader>, attempt: u64) -> PendingLoad {
    async move {
        let module_id = loader.module_id().to_string();
        log::info!("Loading processing module `{module_id}` (attempt {attempt})");
        let started = Instant::now();

        // A panicking loader must not poison the shared future.
        let loaded = AssertUnwindSafe(loader.load())
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ModuleLoadError::init(&module_id, "module loader panicked")));

        let processor = match loaded {
            Ok(processor) => processor,
            Err(err) => {
                log::warn!("Loading `{module_id}` failed: {err}");
                return Err(err);
            }
        };

        let found = processor.api_version();
        if found != PROCESSOR_API_VERSION {
            let err = ModuleLoadError::IncompatibleVersion {
                module_id,
                expected: PROCESSOR_API_VERSION,
                found,
            };
            log::warn!("{err}");
            return Err(err);
        }

        log::info!(
            "Loaded processing module `{module_id}` in {:.1}ms",
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(ModuleHandle::new(module_id, processor))
    }
    .boxed()
    .shared()
}
