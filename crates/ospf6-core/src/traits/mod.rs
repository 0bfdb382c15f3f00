//! Collaborator traits for the area core
//!
//! The area core orchestrates; the work itself belongs to other parts of
//! the routing daemon. Each seam is a narrow trait so those parts can be
//! plugged in (or replaced by test doubles) without the core knowing them.
//!
//! - [`RecalcScheduler`]: debounced SPF / route recalculation timers
//! - [`RecalcHandler`]: the SPF and route algorithms the timers trigger
//! - [`IntraPrefixProcessor`]: incremental Intra-Area-Prefix-LSA handling
//! - [`InterAreaOriginator`]: area-border origination of inter-area routes
//! - [`AreaInterface`]: interfaces attached to an area

pub mod scheduler;
pub mod recalc;
pub mod prefix;
pub mod abr;
pub mod interface;

pub use scheduler::RecalcScheduler;
pub use recalc::RecalcHandler;
pub use prefix::IntraPrefixProcessor;
pub use abr::InterAreaOriginator;
pub use interface::AreaInterface;
