// # Inter-Area Originator Trait
//
// Area-border behavior: offering a route from the instance table into a
// specific area as an inter-area route. Whether the route is actually
// advertised (same area, stub policy, cost) is the originator's decision.

use crate::area::Area;
use crate::route::Route;

/// Trait for inter-area route origination
pub trait InterAreaOriginator: Send + Sync {
    /// Offer `route` to `area`
    fn originate(&self, route: &Route, area: &mut Area);
}
