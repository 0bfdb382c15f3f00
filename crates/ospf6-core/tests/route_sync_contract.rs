//! Architectural Contract Test: Route Synchronization
//!
//! Constraints verified:
//! - Local route additions reach the instance table as independent copies
//! - Local route removals withdraw only the value-identical copy
//! - Removals without a match leave the instance table untouched
//! - Identical routes from two areas are separate contributions
//! - Deleting an area withdraws its local routes
//!
//! If this test fails, the instance RIB drifts from the areas feeding it.

mod common;

use common::*;
use ospf6_core::AreaCommand;
use ospf6_core::route::{self, Route};

fn instance_routes(harness: &Harness) -> Vec<Route> {
    route::lock(harness.instance.route_table()).iter().cloned().collect()
}

#[test]
fn local_add_installs_independent_copy() {
    let mut harness = Harness::new();
    let id = area_id("0.0.0.1");
    let local = intra_route("2001:db8:1::/48", id, 10);

    harness
        .instance
        .create_area(id)
        .unwrap()
        .route_table_mut()
        .add(local.clone());

    let area = harness.instance.lookup_area(id).unwrap();
    let table = route::lock(harness.instance.route_table());
    let copy = table.lookup_identical(&local).expect("copy in instance table");
    let original = area.route_table().lookup_identical(&local).unwrap();
    assert_eq!(copy, original);
    assert!(!std::ptr::eq(copy, original), "instance table holds its own copy");
}

#[test]
fn copy_survives_local_mutation() {
    let mut harness = Harness::new();
    let id = area_id("0.0.0.1");
    let mut local = intra_route("2001:db8:1::/48", id, 10);

    let area = harness.instance.create_area(id).unwrap();
    area.route_table_mut().add(local.clone());
    // Local table replaces the route with a cheaper path
    area.route_table_mut().remove(&local);
    local.path.cost = 5;
    area.route_table_mut().add(local.clone());

    let routes = instance_routes(&harness);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].path.cost, 5);
}

#[test]
fn removal_targets_identical_route_only() {
    let mut harness = Harness::new();
    let a1 = area_id("0.0.0.1");
    let a2 = area_id("0.0.0.2");
    let from_a1 = intra_route("2001:db8::/32", a1, 10);
    let from_a2 = intra_route("2001:db8::/32", a2, 20);

    harness
        .instance
        .create_area(a1)
        .unwrap()
        .route_table_mut()
        .add(from_a1.clone());
    harness
        .instance
        .create_area(a2)
        .unwrap()
        .route_table_mut()
        .add(from_a2.clone());
    assert_eq!(instance_routes(&harness).len(), 2);

    harness
        .instance
        .lookup_area_mut(a1)
        .unwrap()
        .route_table_mut()
        .remove(&from_a1);

    let routes = instance_routes(&harness);
    assert_eq!(routes, vec![from_a2]);
}

#[test]
fn unmatched_removal_is_ignored() {
    init_tracing();
    let mut harness = Harness::new();
    let id = area_id("0.0.0.1");
    let local = intra_route("2001:db8:1::/48", id, 10);

    harness.instance.create_area(id).unwrap().route_table_mut().add(local.clone());

    // Something else already replaced the instance entry
    {
        let mut table = route::lock(harness.instance.route_table());
        table.remove(&local);
        table.add(intra_route("2001:db8:1::/48", id, 1));
    }
    let before = instance_routes(&harness);

    harness
        .instance
        .lookup_area_mut(id)
        .unwrap()
        .route_table_mut()
        .remove(&local);

    assert_eq!(instance_routes(&harness), before);
}

#[test]
fn area_deletion_withdraws_local_routes() {
    let mut harness = Harness::new();
    let a1 = area_id("0.0.0.1");
    let a2 = area_id("0.0.0.2");

    harness
        .instance
        .create_area(a1)
        .unwrap()
        .route_table_mut()
        .add(intra_route("2001:db8:1::/48", a1, 10));
    harness
        .instance
        .create_area(a2)
        .unwrap()
        .route_table_mut()
        .add(intra_route("2001:db8:2::/48", a2, 10));

    harness.instance.delete_area(a1).unwrap();

    let routes = instance_routes(&harness);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].path.area_id, a2);
}

#[test]
fn route_recalculation_feeds_instance_table() {
    let mut harness = Harness::new();
    let id = area_id("0.0.0.1");
    let computed = intra_route("2001:db8:9::/48", id, 30);
    harness.recalc.install_on_route_run(computed.clone());

    harness.instance.create_area(id).unwrap().schedule_route_calculation();
    assert_eq!(harness.tick(), 1);

    assert_eq!(harness.recalc.route_runs(), vec![id]);
    assert_eq!(instance_routes(&harness), vec![computed]);
}

#[test]
fn identical_contributions_are_withdrawn_one_at_a_time() {
    let mut harness = Harness::new();
    let a1 = area_id("0.0.0.1");
    let a2 = area_id("0.0.0.2");
    // Same value contributed through both areas
    let shared = intra_route("2001:db8:5::/48", a1, 10);

    for area in [a1, a2] {
        harness.instance.apply(AreaCommand::Create(area)).unwrap();
        harness
            .instance
            .apply(AreaCommand::AddRoute {
                area,
                route: shared.clone(),
            })
            .unwrap();
    }
    assert_eq!(instance_routes(&harness), vec![shared.clone(), shared.clone()]);

    harness
        .instance
        .apply(AreaCommand::RemoveRoute {
            area: a2,
            route: shared.clone(),
        })
        .unwrap();
    assert_eq!(instance_routes(&harness), vec![shared.clone()]);

    harness.instance.delete_area(a1).unwrap();
    assert!(instance_routes(&harness).is_empty());
}
