//! Route synchronization hook
//!
//! Mirrors an area's local route table into the instance-wide table. The
//! instance table holds its own copy of each route, so area-side removal
//! or mutation never reaches into it. Each contribution is its own entry:
//! when two areas contribute identical routes, withdrawing one leaves the
//! other in place.

use tracing::debug;

use crate::route::{self, Route, RouteTableHook, SharedRouteTable};

/// Local route table hook feeding the instance table
pub struct RouteSync {
    target: SharedRouteTable,
}

impl RouteSync {
    pub fn new(target: SharedRouteTable) -> Self {
        Self { target }
    }
}

impl RouteTableHook for RouteSync {
    fn on_add(&self, route: &Route) {
        route::lock(&self.target).push(route.clone());
    }

    fn on_remove(&self, route: &Route) {
        let mut table = route::lock(&self.target);
        // Same prefix is not enough: another area may contribute a different
        // path to the same destination.
        let Some(copy) = table.lookup_identical(route).cloned() else {
            debug!("Route {} not in instance table, nothing to withdraw", route.prefix);
            return;
        };
        table.remove(&copy);
    }
}
