// # Route Table
//
// Generic prefix-keyed route table used for every routing table the
// protocol keeps: an area's SPF result, its local (intra-area) routes, its
// summary table, and the instance-wide table that merges all areas.
//
// ## Semantics
//
// - Several routes may share a prefix; they are kept in insertion order.
// - Two routes are *identical* when prefix, type, path, next hops and
//   payload all compare equal. Removal always targets the identical route,
//   never "whatever is stored under this prefix".
// - An optional `RouteTableHook` is told about every route that enters or
//   leaves the table. The table knows nothing about areas.
// - `clear()` withdraws every entry through the hook. Dropping a table
//   without clearing it withdraws nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::area::AreaId;
use crate::error::{Error, Result};
use crate::lsa::LsaKey;

/// Destination key of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prefix {
    /// IPv6 network prefix, host bits cleared
    Ipv6 { addr: Ipv6Addr, len: u8 },
    /// Link-state vertex key used by SPF result tables
    LinkState {
        router_id: Ipv4Addr,
        link_state_id: u32,
    },
}

impl Prefix {
    /// Build an IPv6 prefix, clearing bits beyond `len`
    pub fn ipv6(addr: Ipv6Addr, len: u8) -> Self {
        let len = len.min(128);
        let mask = if len == 0 {
            0
        } else {
            u128::MAX << (128 - u32::from(len))
        };
        Prefix::Ipv6 {
            addr: Ipv6Addr::from(u128::from(addr) & mask),
            len,
        }
    }

    /// Key of a router (or network, with a non-zero link-state id) vertex
    pub fn linkstate(router_id: Ipv4Addr, link_state_id: u32) -> Self {
        Prefix::LinkState {
            router_id,
            link_state_id,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Ipv6 { addr, len } => write!(f, "{}/{}", addr, len),
            Prefix::LinkState {
                router_id,
                link_state_id,
            } => write!(f, "{} {}", router_id, Ipv4Addr::from(*link_state_id)),
        }
    }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| Error::Other(format!("Malformed prefix: {}", s)))?;
        let addr: Ipv6Addr = addr
            .parse()
            .map_err(|_| Error::Other(format!("Malformed prefix: {}", s)))?;
        let len: u8 = len
            .parse()
            .ok()
            .filter(|len| *len <= 128)
            .ok_or_else(|| Error::Other(format!("Malformed prefix: {}", s)))?;
        Ok(Prefix::ipv6(addr, len))
    }
}

/// Path type of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteType {
    IntraArea,
    InterArea,
    External1,
    External2,
}

/// Path attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Area the path was computed in
    pub area_id: AreaId,
    pub cost: u32,
    /// Type-2 external cost, zero otherwise
    pub cost_e2: u32,
    /// LSA the path was derived from
    #[serde(skip)]
    pub origin: Option<LsaKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nexthop {
    pub ifindex: u32,
    pub address: Ipv6Addr,
}

/// Shortest-path tree vertex carried by SPF table entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: Prefix,
    pub cost: u32,
    pub hops: u8,
    pub parent: Option<Prefix>,
}

/// A routing table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub prefix: Prefix,
    pub route_type: RouteType,
    pub path: Path,
    pub nexthops: Vec<Nexthop>,
    /// Opaque per-table payload, e.g. the SPF vertex
    pub route_option: Option<Vertex>,
}

impl Route {
    /// Create a route with no next hops and no payload
    pub fn new(prefix: Prefix, route_type: RouteType, area_id: AreaId, cost: u32) -> Self {
        Self {
            prefix,
            route_type,
            path: Path {
                area_id,
                cost,
                cost_e2: 0,
                origin: None,
            },
            nexthops: Vec::new(),
            route_option: None,
        }
    }

    pub fn with_nexthop(mut self, ifindex: u32, address: Ipv6Addr) -> Self {
        self.nexthops.push(Nexthop { ifindex, address });
        self
    }

    pub fn with_option(mut self, vertex: Vertex) -> Self {
        self.route_option = Some(vertex);
        self
    }
}

/// Observer for route table membership changes
pub trait RouteTableHook: Send + Sync {
    /// A route has entered the table
    fn on_add(&self, route: &Route);

    /// A route has left the table
    fn on_remove(&self, route: &Route);
}

/// Prefix-keyed route table
#[derive(Default)]
pub struct RouteTable {
    routes: BTreeMap<Prefix, Vec<Route>>,
    count: usize,
    hook: Option<Box<dyn RouteTableHook>>,
}

/// Route table shared between an owner and the hooks that feed it
pub type SharedRouteTable = Arc<Mutex<RouteTable>>;

impl RouteTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with its change hook installed
    pub fn with_hook(hook: Box<dyn RouteTableHook>) -> Self {
        Self {
            hook: Some(hook),
            ..Self::default()
        }
    }

    /// Create an empty table wrapped for sharing
    pub fn shared() -> SharedRouteTable {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Add a route
    ///
    /// Adding a route identical to a stored one changes nothing and returns
    /// `false`. Use [`push`](Self::push) where each contribution needs its
    /// own entry.
    pub fn add(&mut self, route: Route) -> bool {
        if self.lookup_identical(&route).is_some() {
            return false;
        }
        self.push(route);
        true
    }

    /// Add a route even if an identical one is stored
    ///
    /// Every call adds one entry and a later [`remove`](Self::remove) takes
    /// back exactly one of them.
    pub fn push(&mut self, route: Route) {
        let bucket = self.routes.entry(route.prefix).or_default();
        bucket.push(route);
        self.count += 1;

        if let Some(hook) = &self.hook {
            if let Some(stored) = bucket.last() {
                hook.on_add(stored);
            }
        }
    }

    /// Remove the route identical to `route`, returning it
    pub fn remove(&mut self, route: &Route) -> Option<Route> {
        let bucket = self.routes.get_mut(&route.prefix)?;
        let index = bucket.iter().position(|r| r == route)?;
        let removed = bucket.remove(index);
        if bucket.is_empty() {
            self.routes.remove(&route.prefix);
        }
        self.count -= 1;

        if let Some(hook) = &self.hook {
            hook.on_remove(&removed);
        }
        Some(removed)
    }

    /// First route stored under `prefix`
    pub fn lookup(&self, prefix: &Prefix) -> Option<&Route> {
        self.routes.get(prefix).and_then(|bucket| bucket.first())
    }

    /// Stored route value-identical to `route`
    pub fn lookup_identical(&self, route: &Route) -> Option<&Route> {
        self.routes
            .get(&route.prefix)
            .and_then(|bucket| bucket.iter().find(|r| *r == route))
    }

    /// Iterate in prefix order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Remove every route, reporting each through the hook
    pub fn clear(&mut self) {
        let routes = std::mem::take(&mut self.routes);
        self.count = 0;
        if let Some(hook) = &self.hook {
            for route in routes.values().flatten() {
                hook.on_remove(route);
            }
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("count", &self.count)
            .field("hooked", &self.hook.is_some())
            .finish()
    }
}

/// Lock a shared table, recovering the guard if a holder panicked
pub fn lock(table: &SharedRouteTable) -> MutexGuard<'_, RouteTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
