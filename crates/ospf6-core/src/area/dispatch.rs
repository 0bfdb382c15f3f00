//! LSDB change dispatcher
//!
//! Installed as the hook of every area LSDB. Topology LSAs (Router,
//! Network) request a debounced SPF run; Intra-Area-Prefix-LSAs go to the
//! incremental prefix processor without touching SPF. Inter-area types are
//! accepted silently even though flooding should never place them here.

use std::sync::Arc;

use tracing::info;

use crate::area::AreaId;
use crate::area::timers::{self, SharedTimers};
use crate::config::DebugFlags;
use crate::lsa::{Lsa, LsaType};
use crate::lsdb::LsdbHook;
use crate::scheduler::RecalcKind;
use crate::traits::{IntraPrefixProcessor, RecalcScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Add,
    Remove,
}

/// LSDB hook bound to one area
pub struct LsdbDispatcher {
    area_id: AreaId,
    timers: SharedTimers,
    scheduler: Arc<dyn RecalcScheduler>,
    prefix: Arc<dyn IntraPrefixProcessor>,
    debug: Arc<DebugFlags>,
}

impl LsdbDispatcher {
    pub fn new(
        area_id: AreaId,
        timers: SharedTimers,
        scheduler: Arc<dyn RecalcScheduler>,
        prefix: Arc<dyn IntraPrefixProcessor>,
        debug: Arc<DebugFlags>,
    ) -> Self {
        Self {
            area_id,
            timers,
            scheduler,
            prefix,
            debug,
        }
    }

    fn dispatch(&self, lsa: &Lsa, change: Change) {
        match lsa.lsa_type() {
            LsaType::Router | LsaType::Network => {
                timers::lock(&self.timers).request(
                    self.scheduler.as_ref(),
                    lsa.scope,
                    RecalcKind::Spf,
                );
            }

            LsaType::IntraAreaPrefix => match change {
                Change::Add => self.prefix.add(lsa),
                Change::Remove => self.prefix.remove(lsa),
            },

            LsaType::InterAreaPrefix | LsaType::InterAreaRouter => {}

            _ => {
                if self.debug.lsa_recv() {
                    info!("Unknown LSA in Area {}'s lsdb: {}", self.area_id, lsa);
                }
            }
        }
    }
}

impl LsdbHook for LsdbDispatcher {
    fn on_add(&self, lsa: &Lsa) {
        self.dispatch(lsa, Change::Add);
    }

    fn on_remove(&self, lsa: &Lsa) {
        self.dispatch(lsa, Change::Remove);
    }
}
