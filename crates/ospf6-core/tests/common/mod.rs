//! Test doubles and common utilities for area contract tests
//!
//! Every double records what it was asked to do behind shared counters, so
//! a test can hand one copy to the instance and keep another for asserts.

#![allow(dead_code)]

use ospf6_core::area::{Area, AreaId};
use ospf6_core::config::InstanceConfig;
use ospf6_core::error::{Error, Result};
use ospf6_core::lsa::{Lsa, LsaHeader, LsaKey, LsaType};
use ospf6_core::route::{Prefix, Route, RouteType};
use ospf6_core::scheduler::{RecalcKind, TimerEvent, TimerHandle};
use ospf6_core::traits::{
    AreaInterface, InterAreaOriginator, IntraPrefixProcessor, RecalcHandler, RecalcScheduler,
};
use ospf6_core::{Collaborators, Instance};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scheduler whose timers only expire when the test says so
#[derive(Default)]
pub struct ManualScheduler {
    next_id: AtomicU64,
    handles: Mutex<Vec<TimerHandle>>,
    cancel_calls: AtomicUsize,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of timers ever armed
    pub fn scheduled_count(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    /// Number of timers armed for one area and kind
    pub fn scheduled_for(&self, area: AreaId, kind: RecalcKind) -> usize {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.area() == area && h.kind() == kind)
            .count()
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    /// Timers still waiting to expire
    pub fn pending_count(&self) -> usize {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.is_pending())
            .count()
    }

    pub fn handles(&self) -> Vec<TimerHandle> {
        self.handles.lock().unwrap().clone()
    }

    /// Expire every pending timer, returning the events a real scheduler
    /// would have posted
    pub fn expire_all(&self) -> Vec<TimerEvent> {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.fire())
            .map(TimerHandle::event)
            .collect()
    }
}

impl RecalcScheduler for ManualScheduler {
    fn schedule(&self, area: AreaId, kind: RecalcKind) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = TimerHandle::new(id, area, kind);
        self.handles.lock().unwrap().push(handle.clone());
        handle
    }

    fn cancel(&self, handle: &TimerHandle) {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        handle.cancel();
    }
}

/// Records every call to the incremental prefix processor
#[derive(Default)]
pub struct RecordingPrefixProcessor {
    added: Mutex<Vec<Lsa>>,
    removed: Mutex<Vec<Lsa>>,
}

impl RecordingPrefixProcessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn added(&self) -> Vec<Lsa> {
        self.added.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<Lsa> {
        self.removed.lock().unwrap().clone()
    }
}

impl IntraPrefixProcessor for RecordingPrefixProcessor {
    fn add(&self, lsa: &Lsa) {
        self.added.lock().unwrap().push(lsa.clone());
    }

    fn remove(&self, lsa: &Lsa) {
        self.removed.lock().unwrap().push(lsa.clone());
    }
}

/// Records (route, target area) for every origination offer
#[derive(Default)]
pub struct RecordingOriginator {
    offers: Mutex<Vec<(Route, AreaId)>>,
}

impl RecordingOriginator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn offers(&self) -> Vec<(Route, AreaId)> {
        self.offers.lock().unwrap().clone()
    }
}

impl InterAreaOriginator for RecordingOriginator {
    fn originate(&self, route: &Route, area: &mut Area) {
        self.offers.lock().unwrap().push((route.clone(), area.id()));
    }
}

/// Recalculation handler that records calls and can install routes
#[derive(Default)]
pub struct RecordingRecalc {
    spf_runs: Mutex<Vec<AreaId>>,
    route_runs: Mutex<Vec<AreaId>>,
    routes_to_install: Mutex<Vec<Route>>,
    fail_spf: AtomicBool,
}

impl RecordingRecalc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spf_runs(&self) -> Vec<AreaId> {
        self.spf_runs.lock().unwrap().clone()
    }

    pub fn route_runs(&self) -> Vec<AreaId> {
        self.route_runs.lock().unwrap().clone()
    }

    /// Routes `calculate_routes` will add to the area's local table
    pub fn install_on_route_run(&self, route: Route) {
        self.routes_to_install.lock().unwrap().push(route);
    }

    pub fn fail_spf(&self, fail: bool) {
        self.fail_spf.store(fail, Ordering::SeqCst);
    }
}

impl RecalcHandler for RecordingRecalc {
    fn calculate_spf(&self, area: &mut Area) -> Result<()> {
        // Touch area state the way a real SPF run would.
        let _ = area.lsdb().iter_type(LsaType::Router).count();
        self.spf_runs.lock().unwrap().push(area.id());
        if self.fail_spf.load(Ordering::SeqCst) {
            return Err(Error::recalculation(area.id(), "vertex table exhausted"));
        }
        Ok(())
    }

    fn calculate_routes(&self, area: &mut Area) -> Result<()> {
        self.route_runs.lock().unwrap().push(area.id());
        for route in self.routes_to_install.lock().unwrap().iter() {
            area.route_table_mut().add(route.clone());
        }
        Ok(())
    }
}

/// Shared counters observed by one or more `MockInterface`s
#[derive(Default, Clone)]
pub struct InterfaceProbe {
    pub enabled: Arc<AtomicUsize>,
    pub disabled: Arc<AtomicUsize>,
    pub deleted: Arc<AtomicUsize>,
}

impl InterfaceProbe {
    pub fn enabled(&self) -> usize {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn disabled(&self) -> usize {
        self.disabled.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }
}

/// Interface double that reports into an `InterfaceProbe`
pub struct MockInterface {
    name: String,
    probe: InterfaceProbe,
}

impl MockInterface {
    pub fn boxed(name: &str, probe: &InterfaceProbe) -> Box<dyn AreaInterface> {
        Box::new(Self {
            name: name.to_string(),
            probe: probe.clone(),
        })
    }
}

impl AreaInterface for MockInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn enable(&mut self) {
        self.probe.enabled.fetch_add(1, Ordering::SeqCst);
    }

    fn disable(&mut self) {
        self.probe.disabled.fetch_add(1, Ordering::SeqCst);
    }

    fn delete(self: Box<Self>) {
        self.probe.deleted.fetch_add(1, Ordering::SeqCst);
    }
}

/// An instance wired to recording doubles
pub struct Harness {
    pub instance: Instance,
    pub scheduler: Arc<ManualScheduler>,
    pub prefix: Arc<RecordingPrefixProcessor>,
    pub originator: Arc<RecordingOriginator>,
    pub recalc: Arc<RecordingRecalc>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(InstanceConfig::new(router_id()))
    }

    pub fn with_config(config: InstanceConfig) -> Self {
        let scheduler = ManualScheduler::new();
        let prefix = RecordingPrefixProcessor::new();
        let originator = RecordingOriginator::new();
        let recalc = RecordingRecalc::new();

        let collaborators = Collaborators {
            scheduler: scheduler.clone(),
            recalc: recalc.clone(),
            prefix: prefix.clone(),
            originator: originator.clone(),
        };
        let instance = Instance::new(&config, collaborators).expect("instance construction succeeds");

        Self {
            instance,
            scheduler,
            prefix,
            originator,
            recalc,
        }
    }

    /// Expire every pending timer and deliver it to the instance
    pub fn tick(&mut self) -> usize {
        let events = self.scheduler.expire_all();
        let count = events.len();
        for event in events {
            self.instance.handle_timer(event);
        }
        count
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Log sink that keeps everything written to it
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber scoped to this thread and return its output
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

pub fn router_id() -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, 1)
}

pub fn area_id(text: &str) -> AreaId {
    text.parse().expect("valid area id")
}

pub fn lsa(ls_type: LsaType, link_state_id: u32, adv: [u8; 4]) -> Lsa {
    Lsa::new(
        LsaHeader::new(ls_type, link_state_id, Ipv4Addr::from(adv)),
        Vec::new(),
    )
}

pub fn key(ls_type: LsaType, link_state_id: u32, adv: [u8; 4]) -> LsaKey {
    lsa(ls_type, link_state_id, adv).key()
}

pub fn prefix(text: &str) -> Prefix {
    text.parse().expect("valid prefix")
}

pub fn intra_route(text: &str, area: AreaId, cost: u32) -> Route {
    Route::new(prefix(text), RouteType::IntraArea, area, cost)
        .with_nexthop(2, Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1))
}
