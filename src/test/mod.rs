// ShipSim: Discrete-Event Package-Shipping Network Simulator
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! End-to-end scenario tests exercising the network, path enumeration, and activity scheduler
//! together.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::activity::fleet_switch::FleetSwitch;
use crate::activity::shipment::{CustomerMetrics, SegmentForwarder, ShipmentGenerator};
use crate::activity::ActivityManager;
use crate::conn::{Conn, Constraint, PathSelector};
use crate::fleet::Fleet;
use crate::network::ShippingNetwork;
use crate::path::Path;
use crate::types::{Dollar, Hour, LocationKind, Mile, MilePerHour, PackageNum, PathMode, TransportMode};

fn bidirectional(net: &mut ShippingNetwork, a: &str, b: &str, length: f64, kind: LocationKind) {
    let loc_a = net.location_new(a, kind);
    let loc_b = net.location_new(b, kind);
    let fwd = net.segment_new(format!("{a}-{b}"), TransportMode::Truck);
    let back = net.segment_new(format!("{b}-{a}"), TransportMode::Truck);
    net.set_source(fwd, Some(loc_a)).unwrap();
    net.set_source(back, Some(loc_b)).unwrap();
    net.set_return_segment(fwd, Some(back)).unwrap();
    net.set_length(fwd, Mile::new(length).unwrap()).unwrap();
    net.set_length(back, Mile::new(length).unwrap()).unwrap();
}

/// S1: path symmetry on a two-node network joined in both directions.
#[test]
fn s1_path_symmetry() {
    let mut net = ShippingNetwork::new();
    bidirectional(&mut net, "l1", "l2", 1.0, LocationKind::Port);
    let l1 = net.location_by_name("l1").unwrap().id();
    let l2 = net.location_by_name("l2").unwrap().id();
    let conn = Conn::new();
    let paths = conn.paths(&net, &PathSelector::connect(l1, l2));
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].elements().len(), 1);
}

/// S2: a zero-length segment contributes zero distance but is still traversed.
#[test]
fn s2_zero_length_segment() {
    let mut net = ShippingNetwork::new();
    bidirectional(&mut net, "l1", "l2", 0.0, LocationKind::Port);
    let l1 = net.location_by_name("l1").unwrap().id();
    let conn = Conn::new();
    let paths = conn.paths(&net, &PathSelector::explore(l1, None));
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].elements().len(), 1);
    assert_eq!(paths[0].distance().value(), 0.0);
}

/// S3: a `Conn` bound to one network yields no paths for a location handle from another.
#[test]
fn s3_cross_network_isolation() {
    let mut net1 = ShippingNetwork::new();
    bidirectional(&mut net1, "l1", "l2", 1.0, LocationKind::Port);
    let mut net2 = ShippingNetwork::new();
    bidirectional(&mut net2, "l1", "l2", 1.0, LocationKind::Port);

    let l1 = net1.location_by_name("l1").unwrap().id();
    let l2_foreign = net2.location_by_name("l2").unwrap().id();
    let conn = Conn::new();
    let paths = conn.paths(&net1, &PathSelector::connect(l1, l2_foreign));
    assert!(paths.is_empty());
}

/// S4: a distance constraint prunes the DFS at the expected depth on a three-node line.
#[test]
fn s4_distance_constraint_prunes() {
    let mut net = ShippingNetwork::new();
    bidirectional(&mut net, "l1", "l2", 100.0, LocationKind::Port);
    bidirectional(&mut net, "l2", "l3", 100.0, LocationKind::Port);
    let l1 = net.location_by_name("l1").unwrap().id();
    let conn = Conn::new();

    let selector = PathSelector::explore(l1, None)
        .with_constraint(Constraint::Distance(Mile::new(100.0).unwrap()));
    assert_eq!(conn.paths(&net, &selector).len(), 1);

    let selector = PathSelector::explore(l1, None)
        .with_constraint(Constraint::Distance(Mile::new(200.0).unwrap()));
    assert_eq!(conn.paths(&net, &selector).len(), 2);
}

/// S5: expedited-mode expansion yields all four mode combinations on a two-hop line.
#[test]
fn s5_expedited_mode_expansion() {
    let mut net = ShippingNetwork::new();
    bidirectional(&mut net, "l1", "l2", 10.0, LocationKind::Port);
    bidirectional(&mut net, "l2", "l3", 10.0, LocationKind::Port);
    for name in ["l1-l2", "l2-l1", "l2-l3", "l3-l2"] {
        let id = net.segment_by_name(name).unwrap().id();
        net.set_expedite_support(id, true).unwrap();
    }
    let l1 = net.location_by_name("l1").unwrap().id();
    let l3 = net.location_by_name("l3").unwrap().id();
    let conn = Conn::new();
    let selector = PathSelector::connect(l1, l3)
        .with_modes(maplit::hashset! { PathMode::Expedited, PathMode::Unexpedited });
    let paths = conn.paths(&net, &selector);
    assert_eq!(paths.len(), 4);

    for path in &paths {
        let expected_cost: f64 = path
            .elements()
            .iter()
            .map(|e| {
                let mult = match e.mode() {
                    PathMode::Expedited => crate::fleet::EXPEDITED_COST_MULTIPLIER,
                    PathMode::Unexpedited => 1.0,
                };
                10.0 * mult // difficulty 1 * length 10 * fleet cost 1 * multiplier
            })
            .sum();
        assert_eq!(path.cost().value(), expected_cost);
    }
}

/// S6: shipment latency and cost accrue correctly as virtual time advances.
#[test]
fn s6_shipment_latency_and_cost() {
    let mut net = ShippingNetwork::new();
    let a = net.location_new("A", LocationKind::Customer);
    let b = net.location_new("B", LocationKind::Customer);
    let fwd = net.segment_new("fwd", TransportMode::Truck);
    let back = net.segment_new("back", TransportMode::Truck);
    net.set_source(fwd, Some(a)).unwrap();
    net.set_source(back, Some(b)).unwrap();
    net.set_return_segment(fwd, Some(back)).unwrap();
    net.set_length(fwd, Mile::new(1.0).unwrap()).unwrap();
    net.set_capacity(fwd, PackageNum::new(10.0).unwrap()).unwrap();
    net.fleet_mut().cost_is(TransportMode::Truck, crate::types::DollarPerMile::new(100.0).unwrap());

    let shared = Rc::new(RefCell::new(net));
    let metrics = Rc::new(RefCell::new(CustomerMetrics::default()));
    let path = Path::seed(&shared.borrow(), fwd, PathMode::Unexpedited).unwrap();

    let mut manager = ActivityManager::new();
    let generator = ShipmentGenerator::new(
        shared.clone(),
        metrics.clone(),
        a,
        b,
        8.0,
        PackageNum::new(10.0).unwrap(),
        path,
        manager.spawner(),
    );
    // First firing is scheduled one interval (24h / transfer_rate = 3h) after simulation start,
    // not at t=0: `fire` emits a shipment on every firing it makes, so an initial firing at t=0
    // would generate an extra shipment before the first one the scenario expects has even
    // arrived.
    manager.schedule(Box::new(generator), Hour::new(3.0).unwrap(), 0);

    manager.time_is(Hour::new(4.0).unwrap());
    assert_eq!(metrics.borrow().shipments_received(), 1);
    assert_eq!(metrics.borrow().average_latency(), 1.0);
    assert_eq!(metrics.borrow().total_cost(), Dollar::new(100.0).unwrap());

    manager.time_is(Hour::new(7.0).unwrap());
    assert_eq!(metrics.borrow().shipments_received(), 2);
}

/// S7: a scheduled fleet switch changes the network's own active fleet, observed by a live
/// `ShippingNetwork` rather than a standalone cell, at the right times.
#[test]
fn s7_scheduled_fleet_switch() {
    let net = ShippingNetwork::new();

    let mut slow = Fleet::new();
    slow.speed_is(TransportMode::Truck, MilePerHour::new(0.5).unwrap());
    net.fleet_mut().speed_is(TransportMode::Truck, MilePerHour::new(0.5).unwrap());

    let mut fast = Fleet::new();
    fast.speed_is(TransportMode::Truck, MilePerHour::new(2.0).unwrap());

    let mut manager = ActivityManager::new();
    manager.schedule(
        Box::new(FleetSwitch::new(net.fleet_handle(), fast, Hour::new(12.0).unwrap())),
        Hour::new(12.0).unwrap(),
        0,
    );
    manager.schedule(
        Box::new(FleetSwitch::new(net.fleet_handle(), slow, Hour::new(24.0).unwrap())),
        Hour::new(24.0).unwrap(),
        0,
    );

    let time_for_two_miles = |speed: f64| 2.0 / speed;

    assert_eq!(time_for_two_miles(net.fleet().speed(TransportMode::Truck).value()), 4.0);

    manager.time_is(Hour::new(12.0).unwrap());
    assert_eq!(time_for_two_miles(net.fleet().speed(TransportMode::Truck).value()), 1.0);

    manager.time_is(Hour::new(24.0).unwrap());
    // The slow fleet's switch (recurring every 24h from its t=24 first firing) reverts the active
    // fleet back to 0.5 mph, matching the `[24, 36)` window of the two-fleet alternation.
    assert_eq!(time_for_two_miles(net.fleet().speed(TransportMode::Truck).value()), 4.0);

    manager.time_is(Hour::new(36.0).unwrap());
    // The fast fleet's switch recurs at t=36, completing one full alternation cycle.
    assert_eq!(time_for_two_miles(net.fleet().speed(TransportMode::Truck).value()), 1.0);
}

/// The `SegmentForwarder` refuses entry once a segment is at capacity, incrementing the refusal
/// counter instead of blocking.
#[test]
fn capacity_refusal_increments_counter() {
    let mut net = ShippingNetwork::new();
    let a = net.location_new("A", LocationKind::Customer);
    let b = net.location_new("B", LocationKind::Customer);
    let fwd = net.segment_new("fwd", TransportMode::Truck);
    let back = net.segment_new("back", TransportMode::Truck);
    net.set_source(fwd, Some(a)).unwrap();
    net.set_source(back, Some(b)).unwrap();
    net.set_return_segment(fwd, Some(back)).unwrap();
    net.set_capacity(fwd, PackageNum::new(0.0).unwrap()).unwrap();

    let shared = Rc::new(RefCell::new(net));
    let metrics = Rc::new(RefCell::new(CustomerMetrics::default()));
    let mut forwarder = SegmentForwarder::new(
        shared.clone(),
        metrics.clone(),
        fwd,
        Vec::new(),
        Hour::new(0.0).unwrap(),
        Dollar::default(),
    );
    assert!(forwarder.fire(Hour::new(0.0).unwrap()).is_none());
    assert_eq!(shared.borrow().segment(fwd).unwrap().shipments_refused(), 1);
}
