//! OSPFv3 area record
//!
//! An [`Area`] owns its LSDB, its three route tables (summary, SPF result,
//! local routes), its attached interfaces and its pending recalculation
//! timers. It refers to its owning instance only by router ID.
//!
//! Areas are created and destroyed by the [`Instance`](crate::Instance);
//! while alive they are mutated by protocol processing through the
//! accessors here, and observed by the core only through the LSDB and
//! route table hooks installed at creation.
//!
//! ## Teardown order
//!
//! [`Area::destroy`] cancels pending timers before anything else, so no
//! recalculation can ever be scheduled against, or run on, an area whose
//! tables are being released.

pub mod dispatch;
pub mod id;
pub mod sync;
pub mod timers;

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::DebugFlags;
use crate::lsdb::Lsdb;
use crate::route::{Prefix, RouteTable, SharedRouteTable, Vertex};
use crate::scheduler::{RecalcKind, TimerEvent, TimerHandle};
use crate::traits::{AreaInterface, IntraPrefixProcessor, RecalcScheduler};

pub use dispatch::LsdbDispatcher;
pub use id::AreaId;
pub use sync::RouteSync;
pub use timers::{PendingTimers, SharedTimers};

/// IPv6 routing capability (V6)
pub const OPTION_V6: u32 = 0x01;
/// AS-external routing capability (E)
pub const OPTION_E: u32 = 0x02;
/// Router bit (R): this router forwards traffic
pub const OPTION_R: u32 = 0x10;

/// Options every area starts with
pub const DEFAULT_OPTIONS: u32 = OPTION_V6 | OPTION_E | OPTION_R;

/// Instance-level collaborators an area binds its hooks to
#[derive(Clone)]
pub(crate) struct AreaContext {
    pub(crate) router_id: Ipv4Addr,
    pub(crate) scheduler: Arc<dyn RecalcScheduler>,
    pub(crate) prefix: Arc<dyn IntraPrefixProcessor>,
    pub(crate) instance_table: SharedRouteTable,
    pub(crate) debug: Arc<DebugFlags>,
}

/// An OSPFv3 area
pub struct Area {
    id: AreaId,
    name: String,
    options: u32,
    disabled: bool,

    interfaces: Vec<Box<dyn AreaInterface>>,
    lsdb: Lsdb,

    summary_table: RouteTable,
    spf_table: RouteTable,
    route_table: RouteTable,

    timers: SharedTimers,
    scheduler: Arc<dyn RecalcScheduler>,
    last_spf: Option<DateTime<Utc>>,

    /// Router ID of the owning instance
    owner: Ipv4Addr,
}

impl Area {
    /// Allocate an area with its hooks bound
    ///
    /// Does not register the area anywhere; that is the instance's job.
    pub(crate) fn new(id: AreaId, ctx: &AreaContext) -> Self {
        let timers: SharedTimers = Arc::new(Mutex::new(PendingTimers::default()));

        let dispatcher = LsdbDispatcher::new(
            id,
            timers.clone(),
            ctx.scheduler.clone(),
            ctx.prefix.clone(),
            ctx.debug.clone(),
        );
        let sync = RouteSync::new(ctx.instance_table.clone());

        Self {
            id,
            name: id.to_string(),
            options: DEFAULT_OPTIONS,
            disabled: false,
            interfaces: Vec::new(),
            lsdb: Lsdb::with_hook(id, Box::new(dispatcher)),
            summary_table: RouteTable::new(),
            spf_table: RouteTable::new(),
            route_table: RouteTable::with_hook(Box::new(sync)),
            timers,
            scheduler: ctx.scheduler.clone(),
            last_spf: None,
            owner: ctx.router_id,
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Dotted-decimal display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Router ID of the owning instance
    pub fn owner(&self) -> Ipv4Addr {
        self.owner
    }

    pub fn options(&self) -> u32 {
        self.options
    }

    pub fn has_option(&self, bit: u32) -> bool {
        self.options & bit != 0
    }

    pub fn set_option(&mut self, bit: u32) {
        self.options |= bit;
    }

    pub fn clear_option(&mut self, bit: u32) {
        self.options &= !bit;
    }

    /// A stub area does not carry AS-external routing (E bit clear)
    pub fn is_stub(&self) -> bool {
        !self.has_option(OPTION_E)
    }

    /// Make the area stub or transit by toggling the E bit
    pub fn set_stub(&mut self, stub: bool) {
        if stub {
            self.clear_option(OPTION_E);
        } else {
            self.set_option(OPTION_E);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Clear the disabled flag and enable every attached interface
    ///
    /// Safe to repeat; interfaces are told again each time.
    pub fn enable(&mut self) {
        self.disabled = false;
        for iface in &mut self.interfaces {
            iface.enable();
        }
        info!("Area {} enabled ({} interfaces)", self.name, self.interfaces.len());
    }

    /// Set the disabled flag and disable every attached interface
    ///
    /// Pending timers are left alone.
    pub fn disable(&mut self) {
        self.disabled = true;
        for iface in &mut self.interfaces {
            iface.disable();
        }
        info!("Area {} disabled ({} interfaces)", self.name, self.interfaces.len());
    }

    /// Attach an interface; the area now owns it
    pub fn attach_interface(&mut self, iface: Box<dyn AreaInterface>) {
        self.interfaces.push(iface);
    }

    /// Names of attached interfaces, in attach order
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|iface| iface.name())
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn lsdb(&self) -> &Lsdb {
        &self.lsdb
    }

    /// Mutable LSDB; every change is dispatched through the area hook
    pub fn lsdb_mut(&mut self) -> &mut Lsdb {
        &mut self.lsdb
    }

    pub fn summary_table(&self) -> &RouteTable {
        &self.summary_table
    }

    pub fn summary_table_mut(&mut self) -> &mut RouteTable {
        &mut self.summary_table
    }

    pub fn spf_table(&self) -> &RouteTable {
        &self.spf_table
    }

    pub fn spf_table_mut(&mut self) -> &mut RouteTable {
        &mut self.spf_table
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    /// Mutable local route table; changes are mirrored to the instance table
    pub fn route_table_mut(&mut self) -> &mut RouteTable {
        &mut self.route_table
    }

    /// Root vertex of the shortest-path tree computed for `router_id`
    pub fn spf_root(&self, router_id: Ipv4Addr) -> Option<&Vertex> {
        self.spf_table
            .lookup(&Prefix::linkstate(router_id, 0))
            .and_then(|route| route.route_option.as_ref())
    }

    /// Request a debounced SPF run
    ///
    /// Returns true if a new timer was armed, false if one was already
    /// pending or the area is being deleted.
    pub fn schedule_spf(&self) -> bool {
        timers::lock(&self.timers).request(self.scheduler.as_ref(), self.id, RecalcKind::Spf)
    }

    /// Request a debounced intra-area route recalculation
    pub fn schedule_route_calculation(&self) -> bool {
        timers::lock(&self.timers).request(self.scheduler.as_ref(), self.id, RecalcKind::Route)
    }

    /// Timer of `kind` that is armed or expired but not yet run
    pub fn pending_timer(&self, kind: RecalcKind) -> Option<TimerHandle> {
        timers::lock(&self.timers).pending(kind).cloned()
    }

    /// Completion time of the last SPF run
    pub fn last_spf(&self) -> Option<DateTime<Utc>> {
        self.last_spf
    }

    pub(crate) fn take_expired(&self, event: &TimerEvent) -> bool {
        timers::lock(&self.timers).take_expired(event)
    }

    pub(crate) fn record_spf_run(&mut self) {
        self.last_spf = Some(Utc::now());
    }

    /// Read-only snapshot for display
    pub fn summary(&self) -> AreaSummary {
        AreaSummary {
            name: self.name.clone(),
            lsa_count: self.lsdb.count(),
            interfaces: self.interface_names().map(str::to_owned).collect(),
            stub: self.is_stub(),
            disabled: self.disabled,
            last_spf: self.last_spf,
        }
    }

    /// Tear the area down
    ///
    /// The caller has already taken the area out of the registry. Timers go
    /// first, then the summary table, interfaces, LSDB, and the SPF and
    /// local tables. Local routes are withdrawn from the instance
    /// table on the way out; the LSDB is dropped without firing its hook.
    pub(crate) fn destroy(self) {
        let Area {
            name,
            mut interfaces,
            lsdb,
            summary_table,
            spf_table,
            mut route_table,
            timers,
            scheduler,
            ..
        } = self;

        timers::lock(&timers).cancel_all(scheduler.as_ref());

        drop(summary_table);

        let iface_count = interfaces.len();
        for iface in interfaces.drain(..) {
            iface.delete();
        }
        drop(interfaces);

        drop(lsdb);

        drop(spf_table);
        route_table.clear();
        drop(route_table);

        info!("Area {} deleted ({} interfaces destroyed)", name, iface_count);
    }
}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("id", &self.id)
            .field("options", &format_args!("{:#04x}", self.options))
            .field("disabled", &self.disabled)
            .field("interfaces", &self.interfaces.len())
            .field("lsdb", &self.lsdb)
            .field("route_table", &self.route_table)
            .finish()
    }
}

/// Area state as shown by `show ipv6 ospf6`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaSummary {
    pub name: String,
    pub lsa_count: usize,
    pub interfaces: Vec<String>,
    pub stub: bool,
    pub disabled: bool,
    pub last_spf: Option<DateTime<Utc>>,
}

impl fmt::Display for AreaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " Area {}", self.name)?;
        writeln!(f, "     Number of Area scoped LSAs is {}", self.lsa_count)?;
        write!(f, "     Interface attached to this area:")?;
        for name in &self.interfaces {
            write!(f, " {}", name)?;
        }
        writeln!(f)
    }
}
