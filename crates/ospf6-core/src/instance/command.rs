//! Protocol input for a running instance
//!
//! While the event loop owns the instance, flooding and route processing
//! reach the areas by sending [`AreaCommand`]s on the loop's command
//! channel. Commands are applied on the same thread as timer expiries, in
//! arrival order.

use std::fmt;

use crate::area::AreaId;
use crate::lsa::{Lsa, LsaKey};
use crate::route::Route;

/// A change addressed to one area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaCommand {
    /// Install or replace an LSA in the area's LSDB
    AddLsa { area: AreaId, lsa: Lsa },

    /// Remove an LSA from the area's LSDB
    RemoveLsa { area: AreaId, key: LsaKey },

    /// Add a route to the area's local route table
    AddRoute { area: AreaId, route: Route },

    /// Remove the identical route from the area's local route table
    RemoveRoute { area: AreaId, route: Route },

    /// Create the area
    Create(AreaId),

    /// Delete the area
    Delete(AreaId),

    Enable(AreaId),

    Disable(AreaId),
}

impl fmt::Display for AreaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaCommand::AddLsa { area, lsa } => write!(f, "add {} to area {}", lsa, area),
            AreaCommand::RemoveLsa { area, key } => {
                write!(f, "remove LSA {:?} from area {}", key, area)
            }
            AreaCommand::AddRoute { area, route } => {
                write!(f, "add route {} to area {}", route.prefix, area)
            }
            AreaCommand::RemoveRoute { area, route } => {
                write!(f, "remove route {} from area {}", route.prefix, area)
            }
            AreaCommand::Create(area) => write!(f, "create area {}", area),
            AreaCommand::Delete(area) => write!(f, "delete area {}", area),
            AreaCommand::Enable(area) => write!(f, "enable area {}", area),
            AreaCommand::Disable(area) => write!(f, "disable area {}", area),
        }
    }
}
