//! Debounced recalculation timers
//!
//! A recalculation request produces a [`TimerHandle`]. The handle moves
//! from pending to either fired or cancelled exactly once; whichever
//! transition wins the race is final. Expiry is never acted on directly:
//! the scheduler posts a [`TimerEvent`] and the owning instance decides on
//! its own thread whether the area and the handle are still current.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::area::AreaId;
use crate::config::TimerConfig;
use crate::error::{Error, Result};
use crate::traits::RecalcScheduler;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Which recalculation a timer stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecalcKind {
    /// Shortest-path tree over the area's topology LSAs
    Spf,
    /// Intra-area routes derived from the SPF result
    Route,
}

/// Expiry notice for a timer that fired before it was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub id: u64,
    pub area: AreaId,
    pub kind: RecalcKind,
}

/// Cancellable handle for one scheduled recalculation
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    area: AreaId,
    kind: RecalcKind,
    state: Arc<AtomicU8>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    /// Create a pending handle
    pub fn new(id: u64, area: AreaId, kind: RecalcKind) -> Self {
        Self {
            id,
            area,
            kind,
            state: Arc::new(AtomicU8::new(PENDING)),
            abort: None,
        }
    }

    /// Attach the task backing this timer so cancellation can abort it
    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn area(&self) -> AreaId {
        self.area
    }

    pub fn kind(&self) -> RecalcKind {
        self.kind
    }

    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::SeqCst) == PENDING
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == CANCELLED
    }

    /// Move pending -> fired; false if the handle was already settled
    pub fn fire(&self) -> bool {
        self.state
            .compare_exchange(PENDING, FIRED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Move pending -> cancelled and abort the backing task
    ///
    /// Returns false if the timer had already fired or been cancelled.
    pub fn cancel(&self) -> bool {
        let won = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if let Some(abort) = &self.abort {
            abort.abort();
        }
        won
    }

    /// Expiry notice describing this handle
    pub fn event(&self) -> TimerEvent {
        TimerEvent {
            id: self.id,
            area: self.area,
            kind: self.kind,
        }
    }
}

/// Recalculation scheduler backed by tokio sleep tasks
///
/// Expired timers are delivered on the channel returned by
/// [`TokioScheduler::new`]; feed it to `Instance::run_with_shutdown`.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
    spf_delay: Duration,
    route_delay: Duration,
    next_id: AtomicU64,
    expired_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TokioScheduler {
    /// Create a scheduler on the current tokio runtime
    ///
    /// # Returns
    ///
    /// A tuple of (scheduler, receiver) where the receiver yields expired timers
    pub fn new(config: &TimerConfig) -> Result<(Self, mpsc::UnboundedReceiver<TimerEvent>)> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Other(format!("Timer scheduler needs a tokio runtime: {}", e)))?;
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();

        let scheduler = Self {
            runtime,
            spf_delay: Duration::from_millis(config.spf_delay_ms),
            route_delay: Duration::from_millis(config.route_delay_ms),
            next_id: AtomicU64::new(1),
            expired_tx,
        };

        Ok((scheduler, expired_rx))
    }

    fn delay(&self, kind: RecalcKind) -> Duration {
        match kind {
            RecalcKind::Spf => self.spf_delay,
            RecalcKind::Route => self.route_delay,
        }
    }
}

impl RecalcScheduler for TokioScheduler {
    fn schedule(&self, area: AreaId, kind: RecalcKind) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = TimerHandle::new(id, area, kind);
        let timer = handle.clone();
        let expired_tx = self.expired_tx.clone();
        let delay = self.delay(kind);

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if timer.fire() {
                // Receiver gone means the instance has shut down.
                let _ = expired_tx.send(timer.event());
            }
        });

        trace!("Scheduled {:?} timer {} for area {} in {:?}", kind, id, area, delay);
        handle.with_abort(task.abort_handle())
    }

    fn cancel(&self, handle: &TimerHandle) {
        if handle.cancel() {
            trace!("Cancelled {:?} timer {} for area {}", handle.kind(), handle.id(), handle.area());
        }
    }
}
