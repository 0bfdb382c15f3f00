// # Recalculation Scheduler Trait
//
// Defines the timer primitive behind debounced recalculation.
//
// The area core asks for a recalculation at most once per pending timer;
// whether the scheduler coalesces further is its own business. Expired
// timers must be reported back to the owning instance rather than acted on
// in place, so that expiry is serialized with every other area mutation.

use crate::area::AreaId;
use crate::scheduler::{RecalcKind, TimerHandle};

/// Trait for recalculation timer implementations
pub trait RecalcScheduler: Send + Sync {
    /// Arm a timer for `kind` recalculation of `area`
    fn schedule(&self, area: AreaId, kind: RecalcKind) -> TimerHandle;

    /// Cancel a timer
    ///
    /// Must be idempotent, and once it returns the timer's expiry must
    /// never be reported as current. Cancelling a fired handle is a no-op.
    fn cancel(&self, handle: &TimerHandle);
}
