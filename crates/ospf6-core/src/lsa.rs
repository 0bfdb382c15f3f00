//! Link-state advertisement header and type classification
//!
//! The area core never decodes LSA bodies. It only needs to know what kind
//! of LSA changed and which area's database it lives in, so the body is
//! carried as opaque bytes.

use crate::area::AreaId;
use std::fmt;
use std::net::Ipv4Addr;

/// Router-LSA function code
pub const LSTYPE_ROUTER: u16 = 0x2001;
/// Network-LSA function code
pub const LSTYPE_NETWORK: u16 = 0x2002;
/// Inter-Area-Prefix-LSA function code
pub const LSTYPE_INTER_PREFIX: u16 = 0x2003;
/// Inter-Area-Router-LSA function code
pub const LSTYPE_INTER_ROUTER: u16 = 0x2004;
/// AS-External-LSA function code
pub const LSTYPE_AS_EXTERNAL: u16 = 0x4005;
/// Link-LSA function code
pub const LSTYPE_LINK: u16 = 0x0008;
/// Intra-Area-Prefix-LSA function code
pub const LSTYPE_INTRA_PREFIX: u16 = 0x2009;

/// LSA type as seen by the area dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LsaType {
    Router,
    Network,
    InterAreaPrefix,
    InterAreaRouter,
    AsExternal,
    Link,
    IntraAreaPrefix,
    /// Any code this implementation does not know
    Unknown(u16),
}

impl LsaType {
    /// Wire type code (host order)
    pub fn code(self) -> u16 {
        match self {
            LsaType::Router => LSTYPE_ROUTER,
            LsaType::Network => LSTYPE_NETWORK,
            LsaType::InterAreaPrefix => LSTYPE_INTER_PREFIX,
            LsaType::InterAreaRouter => LSTYPE_INTER_ROUTER,
            LsaType::AsExternal => LSTYPE_AS_EXTERNAL,
            LsaType::Link => LSTYPE_LINK,
            LsaType::IntraAreaPrefix => LSTYPE_INTRA_PREFIX,
            LsaType::Unknown(code) => code,
        }
    }
}

impl From<u16> for LsaType {
    fn from(code: u16) -> Self {
        match code {
            LSTYPE_ROUTER => LsaType::Router,
            LSTYPE_NETWORK => LsaType::Network,
            LSTYPE_INTER_PREFIX => LsaType::InterAreaPrefix,
            LSTYPE_INTER_ROUTER => LsaType::InterAreaRouter,
            LSTYPE_AS_EXTERNAL => LsaType::AsExternal,
            LSTYPE_LINK => LsaType::Link,
            LSTYPE_INTRA_PREFIX => LsaType::IntraAreaPrefix,
            other => LsaType::Unknown(other),
        }
    }
}

impl fmt::Display for LsaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LsaType::Router => f.write_str("Router"),
            LsaType::Network => f.write_str("Network"),
            LsaType::InterAreaPrefix => f.write_str("Inter-Prefix"),
            LsaType::InterAreaRouter => f.write_str("Inter-Router"),
            LsaType::AsExternal => f.write_str("AS-External"),
            LsaType::Link => f.write_str("Link"),
            LsaType::IntraAreaPrefix => f.write_str("Intra-Prefix"),
            LsaType::Unknown(code) => write!(f, "Unknown(0x{:04x})", code),
        }
    }
}

/// Fixed LSA header fields, host byte order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsaHeader {
    pub age: u16,
    pub ls_type: u16,
    pub link_state_id: u32,
    pub adv_router: Ipv4Addr,
    pub seqnum: u32,
    pub checksum: u16,
    pub length: u16,
}

impl LsaHeader {
    /// Create a header with zero age and the initial sequence number
    pub fn new(ls_type: LsaType, link_state_id: u32, adv_router: Ipv4Addr) -> Self {
        Self {
            age: 0,
            ls_type: ls_type.code(),
            link_state_id,
            adv_router,
            seqnum: 0x8000_0001,
            checksum: 0,
            length: 20,
        }
    }

    /// Database key identifying "the same" LSA across instances
    pub fn key(&self) -> LsaKey {
        LsaKey {
            ls_type: self.ls_type,
            link_state_id: self.link_state_id,
            adv_router: self.adv_router,
        }
    }
}

/// (type, link-state id, advertising router) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LsaKey {
    pub ls_type: u16,
    pub link_state_id: u32,
    pub adv_router: Ipv4Addr,
}

/// A link-state advertisement
///
/// `scope` names the area whose database holds the LSA. It is an
/// identifier, not a reference; resolving it goes through the owning
/// instance's registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lsa {
    pub header: LsaHeader,
    pub scope: AreaId,
    pub body: Vec<u8>,
}

impl Lsa {
    /// Create an LSA; the scope is assigned when it enters an LSDB
    pub fn new(header: LsaHeader, body: Vec<u8>) -> Self {
        Self {
            header,
            scope: AreaId::BACKBONE,
            body,
        }
    }

    /// Classified type of this LSA
    pub fn lsa_type(&self) -> LsaType {
        LsaType::from(self.header.ls_type)
    }

    pub fn key(&self) -> LsaKey {
        self.header.key()
    }
}

impl fmt::Display for Lsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} Id:{} Adv:{}]",
            self.lsa_type(),
            Ipv4Addr::from(self.header.link_state_id),
            self.header.adv_router
        )
    }
}
