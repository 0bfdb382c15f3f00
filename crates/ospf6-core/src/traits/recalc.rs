// # Recalculation Handler Trait
//
// The shortest-path algorithm and intra-area route derivation live outside
// the area core. When a debounced timer expires the instance hands the
// still-live area to these entry points.

use crate::area::Area;
use crate::error::Result;

/// Trait for the SPF and route calculation algorithms
pub trait RecalcHandler: Send + Sync {
    /// Rebuild `area`'s SPF result table from its LSDB
    fn calculate_spf(&self, area: &mut Area) -> Result<()>;

    /// Rebuild `area`'s local route table from the SPF result
    ///
    /// Changes made to the local table propagate to the instance table
    /// through the area's route hooks.
    fn calculate_routes(&self, area: &mut Area) -> Result<()>;
}
