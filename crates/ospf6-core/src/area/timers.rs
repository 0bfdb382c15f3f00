//! Per-area pending recalculation timers
//!
//! The slot pair is shared between the area and its LSDB dispatcher, which
//! requests SPF runs while the area itself is mutably borrowed by whoever
//! is changing the database.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::area::AreaId;
use crate::scheduler::{RecalcKind, TimerEvent, TimerHandle};
use crate::traits::RecalcScheduler;

/// Pending SPF and route recalculation timers of one area
#[derive(Debug, Default)]
pub struct PendingTimers {
    spf: Option<TimerHandle>,
    route: Option<TimerHandle>,
    closed: bool,
}

/// Timer slots shared between an area and its hooks
pub type SharedTimers = Arc<Mutex<PendingTimers>>;

pub(crate) fn lock(timers: &SharedTimers) -> MutexGuard<'_, PendingTimers> {
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PendingTimers {
    fn slot_mut(&mut self, kind: RecalcKind) -> &mut Option<TimerHandle> {
        match kind {
            RecalcKind::Spf => &mut self.spf,
            RecalcKind::Route => &mut self.route,
        }
    }

    /// Handle for `kind` that has not been claimed yet, if any
    ///
    /// A handle whose timer has fired stays here until the instance claims
    /// its event through [`take_expired`](Self::take_expired).
    pub fn pending(&self, kind: RecalcKind) -> Option<&TimerHandle> {
        let slot = match kind {
            RecalcKind::Spf => &self.spf,
            RecalcKind::Route => &self.route,
        };
        slot.as_ref().filter(|handle| !handle.is_cancelled())
    }

    /// Arm a timer unless one is pending or fired but not yet claimed
    ///
    /// Returns true if a new timer was armed. A change arriving after expiry
    /// but before the run is still covered, as the run reads the LSDB when
    /// it executes.
    pub fn request(
        &mut self,
        scheduler: &dyn RecalcScheduler,
        area: AreaId,
        kind: RecalcKind,
    ) -> bool {
        if self.closed {
            debug!("Area {} is being deleted, ignoring {:?} request", area, kind);
            return false;
        }

        let slot = self.slot_mut(kind);
        if slot.as_ref().is_some_and(|handle| !handle.is_cancelled()) {
            debug!("{:?} calculation already scheduled for area {}", kind, area);
            return false;
        }

        *slot = Some(scheduler.schedule(area, kind));
        true
    }

    /// Claim an expired timer
    ///
    /// Only the handle currently held for the event's kind may run; an
    /// event for anything else is stale and returns false.
    pub fn take_expired(&mut self, event: &TimerEvent) -> bool {
        let slot = self.slot_mut(event.kind);
        if slot.as_ref().is_some_and(|handle| handle.id() == event.id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Cancel both timers and refuse any further request
    pub fn cancel_all(&mut self, scheduler: &dyn RecalcScheduler) {
        self.closed = true;
        for handle in [self.spf.take(), self.route.take()].into_iter().flatten() {
            scheduler.cancel(&handle);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
