//! Optimistic, debounced quack counter.
//!
//! Every [`ClickCounter::increment`] is applied to the local state right away.
//! Increments are batched until the counter has been quiet for the debounce
//! period, then the whole batch goes out as a single
//! [`StatsBackend::increment`] call and the reply replaces the local state.
//! At most one request is outstanding; increments that arrive while it is in
//! flight form the next batch, which is sent as soon as the reply lands.
//!
//! A failed batch is reported through [`CounterNotice::SyncFailed`] and is not
//! re-queued, so the local count may stay ahead of the stored one.

use crate::backend::{BackendError, CredentialSource, StatsBackend};
use crate::format::format_time_duration;
use crate::models::QuackStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(500);

pub const GUEST_NOTICE: &str = "Demo mode: Sign in to save your quacks!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub total_count: u64,
    pub last_update_at: Option<DateTime<Utc>>,
}

impl CounterState {
    pub fn new(total_count: u64, last_update_at: Option<DateTime<Utc>>) -> Self {
        Self {
            total_count,
            last_update_at,
        }
    }

    /// Text for the "Time Without Quacks" tile.
    pub fn time_without_quacks(&self, now: DateTime<Utc>) -> String {
        format_time_duration(self.last_update_at, now)
    }
}

impl From<QuackStats> for CounterState {
    fn from(stats: QuackStats) -> Self {
        Self {
            total_count: stats.total_quacks,
            last_update_at: stats.last_quack_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterNotice {
    Guest,
    SyncFailed(String),
}

impl CounterNotice {
    pub fn message(&self) -> &str {
        match self {
            CounterNotice::Guest => GUEST_NOTICE,
            CounterNotice::SyncFailed(message) => message,
        }
    }

    /// Guest mode is shown as information, not as an error with a retry.
    pub fn is_informational(&self) -> bool {
        matches!(self, CounterNotice::Guest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Accumulating,
    Syncing,
    SyncingWithBacklog,
}

/// Everything a host UI renders from the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    pub state: CounterState,
    pub notice: Option<CounterNotice>,
    pub is_guest: bool,
    pub phase: SyncPhase,
    /// Bumped on every change.
    pub revision: u64,
}

struct Core {
    state: CounterState,
    pending: u64,
    syncing: bool,
    notice: Option<CounterNotice>,
    is_guest: bool,
    timer: Option<JoinHandle<()>>,
    timer_generation: u64,
    revision: u64,
    torn_down: bool,
}

impl Core {
    fn phase(&self) -> SyncPhase {
        match (self.syncing, self.pending > 0) {
            (false, false) => SyncPhase::Idle,
            (false, true) => SyncPhase::Accumulating,
            (true, false) => SyncPhase::Syncing,
            (true, true) => SyncPhase::SyncingWithBacklog,
        }
    }

    fn view(&self) -> CounterView {
        CounterView {
            state: self.state.clone(),
            notice: self.notice.clone(),
            is_guest: self.is_guest,
            phase: self.phase(),
            revision: self.revision,
        }
    }

    fn touch(&mut self) -> CounterView {
        self.revision += 1;
        self.view()
    }
}

enum SyncOutcome {
    Guest,
    Synced(CounterState),
    Failed(BackendError),
}

struct Shared {
    core: Mutex<Core>,
    backend: Arc<dyn StatsBackend>,
    credentials: Box<dyn CredentialSource>,
    debounce: Duration,
    runtime: Handle,
    views: watch::Sender<CounterView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Called without the core lock held; older revisions never overwrite newer ones.
    fn publish(&self, view: CounterView) {
        self.views.send_if_modified(|current| {
            if view.revision > current.revision {
                *current = view;
                true
            } else {
                false
            }
        });
    }
}

#[derive(Clone)]
pub struct ClickCounter {
    shared: Arc<Shared>,
}

impl ClickCounter {
    pub fn new(
        initial: CounterState,
        backend: Arc<dyn StatsBackend>,
        credentials: impl CredentialSource + 'static,
    ) -> Self {
        Self::with_debounce(initial, backend, credentials, SYNC_DEBOUNCE)
    }

    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as does [`ClickCounter::new`].
    pub fn with_debounce(
        initial: CounterState,
        backend: Arc<dyn StatsBackend>,
        credentials: impl CredentialSource + 'static,
        debounce: Duration,
    ) -> Self {
        let core = Core {
            state: initial,
            pending: 0,
            syncing: false,
            notice: None,
            is_guest: credentials.credential().is_none(),
            timer: None,
            timer_generation: 0,
            revision: 0,
            torn_down: false,
        };
        let (views, _) = watch::channel(core.view());

        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(core),
                backend,
                credentials: Box::new(credentials),
                debounce,
                runtime: Handle::current(),
                views,
            }),
        }
    }

    /// Records one click. Never blocks and never fails.
    pub fn increment(&self) {
        let view = {
            let mut core = self.shared.lock();
            if core.torn_down {
                return;
            }

            core.state.total_count = core.state.total_count.saturating_add(1);
            core.state.last_update_at = Some(Utc::now());
            core.pending = core.pending.saturating_add(1);
            if matches!(core.notice, Some(CounterNotice::SyncFailed(_))) {
                core.notice = None;
            }

            self.arm_timer(&mut core);
            core.touch()
        };
        self.shared.publish(view);
    }

    /// Sends the pending batch unless one is already in flight, then keeps
    /// draining until no increments are left.
    pub async fn scheduled_sync(&self) {
        while let Some(amount) = self.take_batch() {
            let outcome = match self.shared.credentials.credential() {
                None => SyncOutcome::Guest,
                Some(credential) => {
                    debug!(amount, "syncing quacks");
                    match self.shared.backend.increment(&credential, amount).await {
                        Ok(state) => SyncOutcome::Synced(state),
                        Err(err) => SyncOutcome::Failed(err),
                    }
                }
            };
            self.settle(amount, outcome);
        }
    }

    /// Manual retry from the host UI. Only increments still pending are sent.
    pub async fn retry(&self) {
        self.scheduled_sync().await;
    }

    /// Unmount: cancels the armed timer and ignores any reply still in flight.
    pub fn shutdown(&self) {
        let mut core = self.shared.lock();
        core.torn_down = true;
        if let Some(timer) = core.timer.take() {
            timer.abort();
        }
    }

    pub fn view(&self) -> CounterView {
        self.shared.lock().view()
    }

    pub fn state(&self) -> CounterState {
        self.shared.lock().state.clone()
    }

    /// Do not hold a `borrow()` of the receiver across calls that change the
    /// counter on the same thread; the update waits for the borrow to end.
    pub fn subscribe(&self) -> watch::Receiver<CounterView> {
        self.shared.views.subscribe()
    }

    fn arm_timer(&self, core: &mut Core) {
        if let Some(timer) = core.timer.take() {
            timer.abort();
        }
        core.timer_generation += 1;

        let generation = core.timer_generation;
        let shared = Arc::downgrade(&self.shared);
        let delay = self.shared.debounce;
        core.timer = Some(self.shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let counter = ClickCounter { shared };
            // The sync runs as its own task so a later re-arm cannot abort it.
            if counter.timer_is_current(generation) {
                tokio::spawn(async move { counter.scheduled_sync().await });
            }
        }));
    }

    // An abort can land after the sleep has already completed, so a fired
    // timer only counts if no click re-armed it in the meantime.
    fn timer_is_current(&self, generation: u64) -> bool {
        let core = self.shared.lock();
        !core.torn_down && core.timer_generation == generation
    }

    fn take_batch(&self) -> Option<u64> {
        let (amount, view) = {
            let mut core = self.shared.lock();
            if core.torn_down || core.syncing || core.pending == 0 {
                return None;
            }

            let amount = std::mem::take(&mut core.pending);
            core.syncing = true;
            (amount, core.touch())
        };
        self.shared.publish(view);
        Some(amount)
    }

    fn settle(&self, amount: u64, outcome: SyncOutcome) {
        let view = {
            let mut core = self.shared.lock();
            if core.torn_down {
                return;
            }

            match outcome {
                SyncOutcome::Guest => {
                    debug!(amount, "no credential, quacks kept local");
                    core.is_guest = true;
                    core.notice = Some(CounterNotice::Guest);
                }
                SyncOutcome::Synced(state) => {
                    debug!(amount, total = state.total_count, "quacks synced");
                    core.is_guest = false;
                    core.state = state;
                    core.notice = None;
                }
                SyncOutcome::Failed(err) => {
                    warn!(amount, error = %err, "quack sync failed");
                    core.is_guest = false;
                    core.notice = Some(CounterNotice::SyncFailed(err.to_string()));
                }
            }
            core.syncing = false;
            core.touch()
        };
        self.shared.publish(view);
    }
}
