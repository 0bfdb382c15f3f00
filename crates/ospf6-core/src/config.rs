//! Configuration types for the area core
//!
//! This module defines the instance configuration and the runtime debug
//! flags derived from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::area::AreaId;
use crate::error::{Error, Result};

/// Main instance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Router ID of this OSPFv3 instance
    pub router_id: Ipv4Addr,

    /// Areas created when the instance starts
    #[serde(default)]
    pub areas: Vec<AreaConfig>,

    /// Recalculation timer settings
    #[serde(default)]
    pub timers: TimerConfig,

    /// Debug switches
    #[serde(default)]
    pub debug: DebugConfig,
}

impl InstanceConfig {
    /// Create a configuration with no areas
    pub fn new(router_id: Ipv4Addr) -> Self {
        Self {
            router_id,
            areas: Vec::new(),
            timers: TimerConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Add an area
    pub fn with_area(mut self, area: AreaConfig) -> Self {
        self.areas.push(area);
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.router_id.is_unspecified() {
            return Err(Error::config("Router ID must not be 0.0.0.0"));
        }

        let mut seen = HashSet::new();
        for area in &self.areas {
            if !seen.insert(area.id) {
                return Err(Error::config(format!("Area {} configured twice", area.id)));
            }
        }

        Ok(())
    }
}

/// Per-area configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    /// Area identifier, dotted-decimal or decimal
    pub id: AreaId,

    /// Stub area (no AS-external routing)
    #[serde(default)]
    pub stub: bool,

    /// Whether the area starts enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl AreaConfig {
    pub fn new(id: AreaId) -> Self {
        Self {
            id,
            stub: false,
            enabled: true,
        }
    }

    pub fn with_stub(mut self, stub: bool) -> Self {
        self.stub = stub;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

fn default_enabled() -> bool {
    true
}

/// Recalculation timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Delay between the first topology change and the SPF run (ms)
    ///
    /// Further changes inside this window collapse into the same run.
    #[serde(default = "default_spf_delay_ms")]
    pub spf_delay_ms: u64,

    /// Delay before intra-area route recalculation (ms)
    #[serde(default)]
    pub route_delay_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            spf_delay_ms: default_spf_delay_ms(),
            route_delay_ms: 0,
        }
    }
}

fn default_spf_delay_ms() -> u64 {
    1000
}

/// Debug switches as configured
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log received LSAs the area dispatcher does not recognise
    #[serde(default)]
    pub lsa_recv: bool,
}

/// Runtime debug flags shared by every area of an instance
///
/// Flags can be flipped while the instance runs, the way `debug ospf6 lsa`
/// commands do.
#[derive(Debug, Default)]
pub struct DebugFlags {
    lsa_recv: AtomicBool,
}

impl DebugFlags {
    pub fn new(config: &DebugConfig) -> Self {
        Self {
            lsa_recv: AtomicBool::new(config.lsa_recv),
        }
    }

    pub fn lsa_recv(&self) -> bool {
        self.lsa_recv.load(Ordering::Relaxed)
    }

    pub fn set_lsa_recv(&self, on: bool) {
        self.lsa_recv.store(on, Ordering::Relaxed);
    }
}
