// # ospf6-core
//
// Area management core of the OSPFv3 routing daemon.
//
// ## Architecture Overview
//
// - **Area**: per-area aggregate owning its LSDB, route tables, interfaces
//   and pending recalculation timers
// - **AreaRegistry**: the instance's areas, kept in ascending id order
// - **LsdbDispatcher**: turns LSDB changes into debounced SPF requests or
//   incremental prefix processing
// - **RouteSync**: mirrors each area's local routes into the instance table
// - **Instance**: creates, enables, disables and deletes areas, and runs
//   expired recalculation timers and incoming area commands on a single
//   logical thread
//
// ## Design Principles
//
// 1. **Debounced recalculation**: bursts of LSA changes collapse into one run
// 2. **Cancel first**: an area's timers are cancelled before any of its
//    state is released, and expiry is re-validated against the registry
// 3. **Ids, not back-pointers**: LSAs and areas name their owner by id
// 4. **Narrow seams**: SPF, prefix processing, ABR origination and
//    interfaces are plugged in through traits

pub mod area;
pub mod config;
pub mod error;
pub mod instance;
pub mod lsa;
pub mod lsdb;
pub mod registry;
pub mod route;
pub mod scheduler;
pub mod traits;

// Re-export core types for convenience
pub use area::{Area, AreaId, AreaSummary};
pub use config::{AreaConfig, DebugConfig, InstanceConfig, TimerConfig};
pub use error::{Error, Result};
pub use instance::{AreaCommand, Collaborators, Instance};
pub use lsa::{Lsa, LsaHeader, LsaType};
pub use lsdb::Lsdb;
pub use registry::AreaRegistry;
pub use route::{Prefix, Route, RouteTable, RouteType};
pub use scheduler::{RecalcKind, TimerEvent, TimerHandle, TokioScheduler};
pub use traits::{AreaInterface, InterAreaOriginator, IntraPrefixProcessor, RecalcHandler, RecalcScheduler};
