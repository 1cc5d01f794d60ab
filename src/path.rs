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

//! [`Path`]: an ordered sequence of segment hops with incrementally accumulated metrics.

use std::collections::HashSet;

use crate::network::ShippingNetwork;
use crate::types::{Dollar, Hour, Mile, PathMode, SegmentId};

/// One hop of a [`Path`]: a segment and the path-level service mode used on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathElement {
    segment: SegmentId,
    mode: PathMode,
}

impl PathElement {
    /// The segment traversed by this hop.
    pub fn segment(&self) -> SegmentId {
        self.segment
    }

    /// The path-level service mode in effect on this hop.
    pub fn mode(&self) -> PathMode {
        self.mode
    }
}

/// An ordered, non-empty sequence of segment hops plus the cumulative cost/time/distance it has
/// accrued and the set of location names it has visited (for loop detection during enumeration).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
    distance: Mile,
    cost: Dollar,
    time: Hour,
    visited: HashSet<String>,
}

impl Path {
    /// Begin a new single-hop path over `segment` with the given mode, seeding the visited set
    /// with both endpoints of the hop.
    ///
    /// Returns `None` if the segment is not routable (no source, no return segment, or the return
    /// segment itself has no source) or does not support `mode`.
    pub fn seed(net: &ShippingNetwork, segment: SegmentId, mode: PathMode) -> Option<Self> {
        let mut path = Path {
            elements: Vec::new(),
            distance: Mile::default(),
            cost: Dollar::default(),
            time: Hour::default(),
            visited: HashSet::new(),
        };
        path.push(net, segment, mode)?;
        Some(path)
    }

    /// Extend this path (consuming it) by one more hop, returning `None` if the segment is not
    /// routable or does not support `mode`.
    pub fn extended(mut self, net: &ShippingNetwork, segment: SegmentId, mode: PathMode) -> Option<Self> {
        self.push(net, segment, mode)?;
        Some(self)
    }

    /// Per-step metric update, applied when appending `segment` with the chosen `mode`:
    /// `distance' = distance + length`, `cost' = cost + difficulty * length * fleet.cost(tm) *
    /// fleet.cost_multiplier(mode)`, `time' = time + length / (fleet.speed(tm) *
    /// fleet.speed_multiplier(mode))`. Both endpoints' location names join the visited set.
    fn push(&mut self, net: &ShippingNetwork, segment_id: SegmentId, mode: PathMode) -> Option<()> {
        let seg = net.segment(segment_id)?;
        if !seg.is_routable() || !seg.modes().contains(&mode) {
            return None;
        }
        let source = net.location(seg.source()?)?;
        let far_segment = net.segment(seg.return_segment()?)?;
        let far_location = net.location(far_segment.source()?)?;

        let fleet = net.fleet();
        let tm = seg.transport_mode();
        let length = seg.length();
        self.distance = self.distance + length;
        self.cost = self.cost
            + Dollar::new(
                seg.difficulty().value() * length.value() * fleet.cost(tm).value()
                    * fleet.cost_multiplier(mode),
            )
            .unwrap_or_default();
        self.time = self.time
            + Hour::new(length.value() / (fleet.speed(tm).value() * fleet.speed_multiplier(mode)))
                .unwrap_or_default();
        self.visited.insert(source.name().to_string());
        self.visited.insert(far_location.name().to_string());
        self.elements.push(PathElement { segment: segment_id, mode });
        Some(())
    }

    /// The hops making up this path, in traversal order.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Cumulative distance.
    pub fn distance(&self) -> Mile {
        self.distance
    }

    /// Cumulative cost.
    pub fn cost(&self) -> Dollar {
        self.cost
    }

    /// Cumulative time.
    pub fn time(&self) -> Hour {
        self.time
    }

    /// The far endpoint of the last hop: `lastElement.segment.returnSegment.source`.
    pub fn last_location(&self, net: &ShippingNetwork) -> Option<crate::types::LocationId> {
        let last = self.elements.last()?;
        let seg = net.segment(last.segment)?;
        let ret = net.segment(seg.return_segment()?)?;
        ret.source()
    }

    /// Whether `location_name` has already been visited by this path (used for loop detection).
    pub fn visits(&self, location_name: &str) -> bool {
        self.visited.contains(location_name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::network::ShippingNetwork;
    use crate::types::{LocationKind, TransportMode};

    fn line(net: &mut ShippingNetwork, length: f64) -> (SegmentId, SegmentId) {
        let a = net.location_new("A", LocationKind::Port);
        let b = net.location_new("B", LocationKind::Port);
        let fwd = net.segment_new("fwd", TransportMode::Truck);
        let back = net.segment_new("back", TransportMode::Truck);
        net.set_source(fwd, Some(a)).unwrap();
        net.set_source(back, Some(b)).unwrap();
        net.set_return_segment(fwd, Some(back)).unwrap();
        net.set_length(fwd, Mile::new(length).unwrap()).unwrap();
        net.set_length(back, Mile::new(length).unwrap()).unwrap();
        (fwd, back)
    }

    #[test]
    fn seed_accumulates_metrics() {
        let mut net = ShippingNetwork::new();
        let (fwd, _) = line(&mut net, 10.0);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        assert_eq!(path.distance().value(), 10.0);
        assert_eq!(path.cost().value(), 10.0);
        assert_eq!(path.time().value(), 10.0);
        assert!(path.visits("A"));
        assert!(path.visits("B"));
    }

    #[test]
    fn seed_rejects_non_routable_segment() {
        let mut net = ShippingNetwork::new();
        let s = net.segment_new("s1", TransportMode::Truck);
        assert!(Path::seed(&net, s, PathMode::Unexpedited).is_none());
    }

    #[test]
    fn zero_length_segment_contributes_nothing() {
        let mut net = ShippingNetwork::new();
        let (fwd, _) = line(&mut net, 0.0);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        assert_eq!(path.distance().value(), 0.0);
        assert_eq!(path.time().value(), 0.0);
    }

    #[test]
    fn last_location_is_far_endpoint() {
        let mut net = ShippingNetwork::new();
        let (fwd, _) = line(&mut net, 5.0);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        let b = net.location_by_name("B").unwrap().id();
        assert_eq!(path.last_location(&net), Some(b));
    }
}
