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

//! [`ShipmentGenerator`] and [`SegmentForwarder`]: the activities that move a shipment hop by
//! hop along a selected path.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::activity::{Activity, Hour, SpawnHandle};
use crate::network::ShippingNetwork;
use crate::path::Path;
use crate::types::{Dollar, LocationId, PackageNum, SegmentId};

/// Running per-customer metrics, updated as shipments arrive.
#[derive(Debug, Clone, Default)]
pub struct CustomerMetrics {
    shipments_received: u64,
    total_latency: Hour,
    total_cost: Dollar,
}

impl CustomerMetrics {
    /// Number of shipments this customer has received.
    pub fn shipments_received(&self) -> u64 {
        self.shipments_received
    }

    /// Average end-to-end latency across all received shipments, `0.0` if none yet.
    pub fn average_latency(&self) -> f64 {
        if self.shipments_received == 0 {
            0.0
        } else {
            self.total_latency.value() / self.shipments_received as f64
        }
    }

    /// Total cost billed across all received shipments.
    pub fn total_cost(&self) -> Dollar {
        self.total_cost
    }

    fn record_arrival(&mut self, departed_at: Hour, arrived_at: Hour, cost: Dollar) {
        self.shipments_received += 1;
        self.total_latency =
            Hour::new(self.total_latency.value() + (arrived_at.value() - departed_at.value()))
                .unwrap_or(self.total_latency);
        self.total_cost = self.total_cost + cost;
    }
}

/// Shared handle to the network and to a destination customer's accumulated metrics, used by
/// both [`ShipmentGenerator`] and [`SegmentForwarder`] so that hand-off between segments does not
/// need to re-borrow through the manager.
pub type SharedNetwork = Rc<RefCell<ShippingNetwork>>;

/// Fires once per `24h / transfer_rate`, creating a shipment of `shipment_size` packages and
/// posting one [`SegmentForwarder`] per hop of the path currently selected to `destination`.
pub struct ShipmentGenerator {
    net: SharedNetwork,
    metrics: Rc<RefCell<CustomerMetrics>>,
    source: LocationId,
    destination: LocationId,
    transfer_rate: f64,
    shipment_size: PackageNum,
    path: Path,
    spawn: SpawnHandle,
}

impl ShipmentGenerator {
    /// Construct a generator for `source`, shipping toward `destination` along the given fixed
    /// `path` (selected once up front, per the spec's no-per-shipment-divergence non-goal).
    ///
    /// `spawn` is the owning [`crate::activity::ActivityManager`]'s
    /// [`crate::activity::ActivityManager::spawner`] handle, used to register each hop's
    /// [`SegmentForwarder`].
    pub fn new(
        net: SharedNetwork,
        metrics: Rc<RefCell<CustomerMetrics>>,
        source: LocationId,
        destination: LocationId,
        transfer_rate: f64,
        shipment_size: PackageNum,
        path: Path,
        spawn: SpawnHandle,
    ) -> Self {
        Self { net, metrics, source, destination, transfer_rate, shipment_size, path, spawn }
    }

    fn interval(&self) -> Hour {
        Hour::new(24.0 / self.transfer_rate).unwrap_or_default()
    }
}

impl Activity for ShipmentGenerator {
    fn fire(&mut self, now: Hour) -> Option<Hour> {
        debug!(
            "shipment generated at {:?} -> {:?}, size {}",
            self.source,
            self.destination,
            self.shipment_size.value()
        );
        let segments: Vec<SegmentId> = self.path.elements().iter().map(|e| e.segment()).collect();
        if let Some((first, rest)) = segments.split_first() {
            let forwarder = SegmentForwarder::new(
                self.net.clone(),
                self.metrics.clone(),
                *first,
                rest.to_vec(),
                now,
                Dollar::default(),
            );
            self.spawn.push(Box::new(forwarder), now, 0);
        }
        Some(Hour::new(now.value() + self.interval().value()).unwrap_or_default())
    }

    fn label(&self) -> &str {
        "shipment-generator"
    }
}

/// Advances one shipment across a single segment, checking capacity on entry. On refusal the
/// shipment is dropped (the segment's refusal counter is incremented and the activity does not
/// reschedule). On success it occupies the segment for `length / effective_speed` and then either
/// hands off to the next hop or, if this was the last hop, credits the destination customer's
/// metrics.
pub struct SegmentForwarder {
    net: SharedNetwork,
    metrics: Rc<RefCell<CustomerMetrics>>,
    segment: SegmentId,
    remaining: Vec<SegmentId>,
    departed_at: Hour,
    cost_so_far: Dollar,
    entered: bool,
}

impl SegmentForwarder {
    /// Construct a forwarder for the shipment's hop over `segment`, with `remaining` holding every
    /// subsequent hop of the path.
    pub fn new(
        net: SharedNetwork,
        metrics: Rc<RefCell<CustomerMetrics>>,
        segment: SegmentId,
        remaining: Vec<SegmentId>,
        departed_at: Hour,
        cost_so_far: Dollar,
    ) -> Self {
        Self { net, metrics, segment, remaining, departed_at, cost_so_far, entered: false }
    }
}

impl Activity for SegmentForwarder {
    fn fire(&mut self, now: Hour) -> Option<Hour> {
        let mut net = self.net.borrow_mut();

        if !self.entered {
            let Some(seg) = net.segment(self.segment) else { return None };
            let tm = seg.transport_mode();
            let length = seg.length();
            let difficulty = seg.difficulty();
            let fleet = net.fleet();
            let hop_cost = Dollar::new(difficulty.value() * length.value() * fleet.cost(tm).value())
                .unwrap_or_default();
            let travel_time =
                Hour::new(length.value() / fleet.speed(tm).value()).unwrap_or_default();

            let accepted = net
                .segment_mut(self.segment)
                .map(|s| s.try_enter())
                .unwrap_or(false);
            if !accepted {
                trace!("shipment refused at segment {:?}", self.segment);
                return None;
            }
            self.entered = true;
            self.cost_so_far = self.cost_so_far + hop_cost;
            return Some(Hour::new(now.value() + travel_time.value()).unwrap_or_default());
        }

        if let Some(s) = net.segment_mut(self.segment) {
            s.exit();
        }

        if let Some((&next, rest)) = self.remaining.split_first() {
            drop(net);
            let forwarder = SegmentForwarder::new(
                self.net.clone(),
                self.metrics.clone(),
                next,
                rest.to_vec(),
                self.departed_at,
                self.cost_so_far,
            );
            // The next hop's forwarder is scheduled by whichever `ActivityManager` owns this
            // activity; handing it off is the caller's responsibility via a fresh `schedule` call
            // driven by the manager, since an `Activity` cannot enqueue onto its own manager.
            // Here we fold the next hop directly into the returned schedule by swapping state.
            *self = forwarder;
            return Some(now);
        }

        self.metrics.borrow_mut().record_arrival(self.departed_at, now, self.cost_so_far);
        debug!("shipment delivered at {:?}, total cost {}", self.segment, self.cost_so_far);
        None
    }

    fn label(&self) -> &str {
        "segment-forwarder"
    }
}
