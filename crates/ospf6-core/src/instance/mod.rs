//! OSPFv3 instance
//!
//! The Instance owns the area registry and the instance-wide routing table,
//! and is the only place areas are created or destroyed. It also runs the
//! single logical thread on which recalculation timers are acted upon.
//!
//! ## Architecture
//!
//! ```text
//!   LSA add/remove ──► Area LSDB ──► LsdbDispatcher ──┬──► RecalcScheduler (debounced SPF)
//!                                                     └──► IntraPrefixProcessor
//!
//!   local route add/remove ──► Area route table ──► RouteSync ──► instance route table
//!
//!   RecalcScheduler ── TimerEvent ──► Instance::handle_timer ──► RecalcHandler
//!
//!   AreaCommand ──► Instance::apply ──► Area LSDB / route table
//! ```
//!
//! While [`Instance::run_with_shutdown`] owns the instance, LSA and route
//! changes arrive as [`AreaCommand`]s on the command channel and are applied
//! between timer expiries.
//!
//! ## Timer flow
//!
//! 1. An LSDB or route change arms a timer through the area's timer slots
//! 2. The scheduler posts a `TimerEvent` when the timer expires
//! 3. The instance resolves the area through the registry; a missing area
//!    or a handle that is no longer the area's current one is ignored
//! 4. The matching recalculation runs against the live area
//! 5. A finished SPF run requests a debounced route recalculation

pub mod command;

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info};

use crate::area::{Area, AreaContext, AreaId, AreaSummary};
use crate::config::{DebugFlags, InstanceConfig};
use crate::error::{Error, Result};
use crate::registry::AreaRegistry;
use crate::route::{self, Route, RouteTable, SharedRouteTable};
use crate::scheduler::{RecalcKind, TimerEvent};
use crate::traits::{InterAreaOriginator, IntraPrefixProcessor, RecalcHandler, RecalcScheduler};

pub use command::AreaCommand;

/// External parts of the routing daemon the instance drives
#[derive(Clone)]
pub struct Collaborators {
    /// Recalculation timer primitive
    pub scheduler: Arc<dyn RecalcScheduler>,
    /// SPF and route algorithms
    pub recalc: Arc<dyn RecalcHandler>,
    /// Incremental Intra-Area-Prefix-LSA processing
    pub prefix: Arc<dyn IntraPrefixProcessor>,
    /// Area-border route origination
    pub originator: Arc<dyn InterAreaOriginator>,
}

/// An OSPFv3 routing protocol instance
pub struct Instance {
    router_id: Ipv4Addr,
    areas: AreaRegistry,
    route_table: SharedRouteTable,
    debug: Arc<DebugFlags>,

    /// Bindings handed to every new area
    ctx: AreaContext,

    recalc: Arc<dyn RecalcHandler>,
    originator: Arc<dyn InterAreaOriginator>,
}

impl Instance {
    /// Create an instance and the areas listed in its configuration
    ///
    /// # Parameters
    ///
    /// - `config`: instance configuration (validated here)
    /// - `collaborators`: scheduler, algorithms and origination hooks
    pub fn new(config: &InstanceConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let route_table = RouteTable::shared();
        let debug = Arc::new(DebugFlags::new(&config.debug));
        let ctx = AreaContext {
            router_id: config.router_id,
            scheduler: collaborators.scheduler,
            prefix: collaborators.prefix,
            instance_table: route_table.clone(),
            debug: debug.clone(),
        };

        let mut instance = Self {
            router_id: config.router_id,
            areas: AreaRegistry::new(),
            route_table,
            debug,
            ctx,
            recalc: collaborators.recalc,
            originator: collaborators.originator,
        };

        for area_config in &config.areas {
            let area = instance.create_area(area_config.id)?;
            if area_config.stub {
                area.set_stub(true);
            }
            if !area_config.enabled {
                area.disable();
            }
        }

        info!(
            "OSPFv3 instance {} initialised with {} areas",
            instance.router_id,
            instance.areas.len()
        );
        Ok(instance)
    }

    pub fn router_id(&self) -> Ipv4Addr {
        self.router_id
    }

    /// Instance-wide routing table
    pub fn route_table(&self) -> &SharedRouteTable {
        &self.route_table
    }

    /// Runtime debug switches
    pub fn debug(&self) -> &DebugFlags {
        &self.debug
    }

    /// Create an area and offer it every route the instance already knows
    ///
    /// Callers are expected to look the id up first; creating an id that is
    /// already registered fails with `Error::DuplicateArea` and leaves the
    /// registry untouched.
    pub fn create_area(&mut self, id: AreaId) -> Result<&mut Area> {
        let area = self.areas.insert(Area::new(id, &self.ctx))?;
        info!("Area {} created", area.name());

        // Snapshot so the originator never runs under the table lock.
        let routes: Vec<Route> = route::lock(&self.route_table).iter().cloned().collect();
        for route in &routes {
            self.originator.originate(route, area);
        }
        debug!("Offered {} instance routes to area {}", routes.len(), area.name());

        Ok(area)
    }

    /// Return the area with this id, creating it if needed
    pub fn ensure_area(&mut self, id: AreaId) -> Result<&mut Area> {
        if self.areas.lookup(id).is_some() {
            return self.areas.lookup_mut(id).ok_or(Error::NoSuchArea(id));
        }
        self.create_area(id)
    }

    pub fn lookup_area(&self, id: AreaId) -> Option<&Area> {
        self.areas.lookup(id)
    }

    pub fn lookup_area_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.areas.lookup_mut(id)
    }

    /// Resolve an operator-supplied area id
    ///
    /// # Returns
    ///
    /// - `Err(Error::MalformedAreaId)`: the text is not an area id
    /// - `Err(Error::NoSuchArea)`: no area with that id exists
    pub fn lookup_area_str(&self, text: &str) -> Result<&Area> {
        let id: AreaId = text.parse()?;
        self.areas.lookup(id).ok_or(Error::NoSuchArea(id))
    }

    /// Areas in ascending id order
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Display snapshots of every area, in id order
    pub fn area_summaries(&self) -> Vec<AreaSummary> {
        self.areas.iter().map(Area::summary).collect()
    }

    fn area_mut(&mut self, id: AreaId) -> Result<&mut Area> {
        self.areas.lookup_mut(id).ok_or(Error::NoSuchArea(id))
    }

    pub fn enable_area(&mut self, id: AreaId) -> Result<()> {
        self.area_mut(id)?.enable();
        Ok(())
    }

    pub fn disable_area(&mut self, id: AreaId) -> Result<()> {
        self.area_mut(id)?.disable();
        Ok(())
    }

    /// Detach an area from the registry and tear it down
    pub fn delete_area(&mut self, id: AreaId) -> Result<()> {
        let area = self.areas.remove(id).ok_or(Error::NoSuchArea(id))?;
        area.destroy();
        Ok(())
    }

    /// Delete every area, lowest id first
    pub fn shutdown(&mut self) {
        for id in self.areas.ids() {
            if let Some(area) = self.areas.remove(id) {
                area.destroy();
            }
        }
        info!("OSPFv3 instance {} shut down", self.router_id);
    }

    /// Apply one protocol change
    ///
    /// LSDB and route table changes go through the area's own tables, so
    /// the dispatcher and route sync hooks see them exactly as they would a
    /// direct change.
    ///
    /// # Returns
    ///
    /// - `Err(Error::NoSuchArea)`: the addressed area does not exist
    /// - `Err(Error::DuplicateArea)`: `Create` for an existing area
    pub fn apply(&mut self, command: AreaCommand) -> Result<()> {
        debug!("Applying {}", command);
        match command {
            AreaCommand::AddLsa { area, lsa } => {
                self.area_mut(area)?.lsdb_mut().add(lsa);
            }
            AreaCommand::RemoveLsa { area, key } => {
                if self.area_mut(area)?.lsdb_mut().remove(&key).is_none() {
                    debug!("LSA {:?} not in area {}'s lsdb", key, area);
                }
            }
            AreaCommand::AddRoute { area, route } => {
                self.area_mut(area)?.route_table_mut().add(route);
            }
            AreaCommand::RemoveRoute { area, route } => {
                if self.area_mut(area)?.route_table_mut().remove(&route).is_none() {
                    debug!("Route {} not in area {}'s route table", route.prefix, area);
                }
            }
            AreaCommand::Create(area) => {
                self.create_area(area)?;
            }
            AreaCommand::Delete(area) => self.delete_area(area)?,
            AreaCommand::Enable(area) => self.enable_area(area)?,
            AreaCommand::Disable(area) => self.disable_area(area)?,
        }
        Ok(())
    }

    /// Act on an expired recalculation timer
    ///
    /// Events for deleted areas, and for handles that have since been
    /// cancelled or replaced, are dropped.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        let Some(area) = self.areas.lookup_mut(event.area) else {
            debug!("{:?} timer {} expired for removed area {}", event.kind, event.id, event.area);
            return;
        };

        if !area.take_expired(&event) {
            debug!("Stale {:?} timer {} for area {}", event.kind, event.id, event.area);
            return;
        }

        match event.kind {
            RecalcKind::Spf => match self.recalc.calculate_spf(area) {
                Ok(()) => {
                    area.record_spf_run();
                    debug!("SPF calculation done for area {}", area.name());
                    area.schedule_route_calculation();
                }
                Err(e) => {
                    error!("SPF calculation failed for area {}: {}", area.name(), e);
                }
            },
            RecalcKind::Route => {
                if let Err(e) = self.recalc.calculate_routes(area) {
                    error!("Route calculation failed for area {}: {}", area.name(), e);
                }
            }
        }
    }

    /// Run the event loop until SIGINT, then delete every area
    pub async fn run(
        &mut self,
        expired_rx: mpsc::UnboundedReceiver<TimerEvent>,
        command_rx: mpsc::UnboundedReceiver<AreaCommand>,
    ) -> Result<()> {
        self.run_internal(expired_rx, command_rx, None).await
    }

    /// Run the event loop until `shutdown_rx` resolves, then delete every area
    pub async fn run_with_shutdown(
        &mut self,
        expired_rx: mpsc::UnboundedReceiver<TimerEvent>,
        command_rx: mpsc::UnboundedReceiver<AreaCommand>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_internal(expired_rx, command_rx, Some(shutdown_rx)).await
    }

    fn apply_logged(&mut self, command: AreaCommand) {
        let description = command.to_string();
        if let Err(e) = self.apply(command) {
            error!("Failed to {}: {}", description, e);
        }
    }

    async fn run_internal(
        &mut self,
        expired_rx: mpsc::UnboundedReceiver<TimerEvent>,
        command_rx: mpsc::UnboundedReceiver<AreaCommand>,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        let mut expired = UnboundedReceiverStream::new(expired_rx);
        let mut commands = UnboundedReceiverStream::new(command_rx);

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    Some(event) = expired.next() => self.handle_timer(event),

                    Some(command) = commands.next() => self.apply_logged(command),

                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    Some(event) = expired.next() => self.handle_timer(event),

                    Some(command) = commands.next() => self.apply_logged(command),

                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        if !self.areas.is_empty() {
            self.shutdown();
        }
    }
}
