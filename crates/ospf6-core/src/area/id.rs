//! Area identifiers

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 32-bit OSPF area identifier
///
/// Held as a host-order integer, so the derived ordering is the numeric
/// ordering of the dotted-decimal form (`0.0.0.2` < `0.0.1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AreaId(u32);

impl AreaId {
    /// The backbone area, 0.0.0.0
    pub const BACKBONE: AreaId = AreaId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Host-order numeric value
    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn is_backbone(self) -> bool {
        self == Self::BACKBONE
    }
}

impl From<Ipv4Addr> for AreaId {
    fn from(addr: Ipv4Addr) -> Self {
        Self(u32::from(addr))
    }
}

impl From<AreaId> for Ipv4Addr {
    fn from(id: AreaId) -> Self {
        Ipv4Addr::from(id.0)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Ipv4Addr::from(self.0))
    }
}

/// Accepts dotted-decimal ("0.0.0.1") or a plain decimal integer ("1")
impl FromStr for AreaId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(addr) = s.parse::<Ipv4Addr>() {
            return Ok(addr.into());
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = s.parse::<u32>() {
                return Ok(Self(value));
            }
        }
        Err(Error::malformed_area_id(s))
    }
}

impl TryFrom<String> for AreaId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AreaId> for String {
    fn from(id: AreaId) -> Self {
        id.to_string()
    }
}
