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

//! [`Segment`]: a directed transport link between two locations.

use std::collections::HashSet;

use crate::types::{Difficulty, LocationId, Mile, PackageNum, PathMode, SegmentId, TransportMode};

/// A directed transport link. Attached to a source [`crate::location::Location`] and, once
/// symmetrically paired, a return segment running the opposite direction.
///
/// `source` and `return_segment` are maintained by the network's segment reactor (see
/// [`crate::reactor`]); use [`crate::network::ShippingNetwork::set_source`] and
/// [`crate::network::ShippingNetwork::set_return_segment`] to mutate them so that the back-link
/// and symmetry invariants stay intact.
#[derive(Debug, Clone)]
pub struct Segment {
    id: SegmentId,
    name: String,
    transport_mode: TransportMode,
    source: Option<LocationId>,
    return_segment: Option<SegmentId>,
    length: Mile,
    difficulty: Difficulty,
    modes: HashSet<PathMode>,
    capacity: PackageNum,
    in_transit: usize,
    shipments_received: u64,
    shipments_refused: u64,
}

impl Segment {
    pub(crate) fn new(id: SegmentId, name: String, transport_mode: TransportMode) -> Self {
        Self {
            id,
            name,
            transport_mode,
            source: None,
            return_segment: None,
            length: Mile::new(1.0).unwrap(),
            difficulty: Difficulty::default(),
            modes: HashSet::from([PathMode::Unexpedited]),
            capacity: PackageNum::new(10.0).unwrap(),
            in_transit: 0,
            shipments_received: 0,
            shipments_refused: 0,
        }
    }

    /// The segment's stable id.
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// The segment's unique name within its network.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed transport mode, set at creation.
    pub fn transport_mode(&self) -> TransportMode {
        self.transport_mode
    }

    /// Current source location, if attached.
    pub fn source(&self) -> Option<LocationId> {
        self.source
    }

    /// Current return segment, if paired.
    pub fn return_segment(&self) -> Option<SegmentId> {
        self.return_segment
    }

    /// Length, in miles.
    pub fn length(&self) -> Mile {
        self.length
    }

    /// Difficulty multiplier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The set of path modes this segment supports.
    pub fn modes(&self) -> &HashSet<PathMode> {
        &self.modes
    }

    /// Capacity: the maximum number of shipments in transit simultaneously.
    pub fn capacity(&self) -> PackageNum {
        self.capacity
    }

    /// Shipments currently in transit on this segment.
    pub fn in_transit(&self) -> usize {
        self.in_transit
    }

    /// Total shipments accepted onto this segment over the simulation.
    pub fn shipments_received(&self) -> u64 {
        self.shipments_received
    }

    /// Total shipments refused for lack of capacity.
    pub fn shipments_refused(&self) -> u64 {
        self.shipments_refused
    }

    /// A segment is routable iff it has a source, a return segment, and that return segment in
    /// turn has a source — i.e. both directions of the pairing are anchored.
    ///
    /// Checking only this segment's own fields cannot tell whether the return segment has a
    /// source, so callers that need the full definition go through
    /// [`crate::network::ShippingNetwork`] (see `Path::push`, which resolves the return segment
    /// and checks its source directly).
    pub fn is_routable(&self) -> bool {
        self.source.is_some() && self.return_segment.is_some()
    }

    pub(crate) fn set_source_raw(&mut self, source: Option<LocationId>) {
        self.source = source;
    }

    pub(crate) fn set_return_segment_raw(&mut self, peer: Option<SegmentId>) {
        self.return_segment = peer;
    }

    pub(crate) fn length_is(&mut self, length: Mile) {
        self.length = length;
    }

    pub(crate) fn difficulty_is(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub(crate) fn capacity_is(&mut self, capacity: PackageNum) {
        self.capacity = capacity;
    }

    pub(crate) fn expedite_support_is(&mut self, enabled: bool) {
        if enabled {
            self.modes.insert(PathMode::Expedited);
        } else {
            self.modes.remove(&PathMode::Expedited);
        }
    }

    /// Attempt to enter one shipment onto this segment. Returns `false` and records a refusal if
    /// the segment is already at capacity.
    pub(crate) fn try_enter(&mut self) -> bool {
        if (self.in_transit as f64) < self.capacity.value() {
            self.in_transit += 1;
            self.shipments_received += 1;
            true
        } else {
            self.shipments_refused += 1;
            false
        }
    }

    pub(crate) fn exit(&mut self) {
        self.in_transit = self.in_transit.saturating_sub(1);
    }
}
