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

//! [`Location`]: a node in the shipping network.

use crate::types::{LocationId, LocationKind, SegmentId};

/// A node in the shipping network: a customer, port, or mode-specific terminal.
///
/// A location's `segments` list holds every segment currently attached with this location as its
/// source, in insertion order. It is maintained exclusively by the network's segment reactor
/// (see [`crate::reactor`]) — nothing outside this crate mutates it directly.
#[derive(Debug, Clone)]
pub struct Location {
    id: LocationId,
    name: String,
    kind: LocationKind,
    segments: Vec<SegmentId>,
}

impl Location {
    pub(crate) fn new(id: LocationId, name: String, kind: LocationKind) -> Self {
        Self {
            id,
            name,
            kind,
            segments: Vec::new(),
        }
    }

    /// The location's stable id.
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// The location's unique name within its network.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The location's kind.
    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    /// Segments currently sourced at this location, in insertion order.
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    /// The `n`th attached segment (1-indexed), matching the external attribute facade's
    /// `segmentN` convention.
    pub fn nth_segment(&self, n: usize) -> Option<SegmentId> {
        n.checked_sub(1).and_then(|i| self.segments.get(i).copied())
    }

    pub(crate) fn attach_segment(&mut self, seg: SegmentId) {
        if !self.segments.contains(&seg) {
            self.segments.push(seg);
        }
    }

    pub(crate) fn detach_segment(&mut self, seg: SegmentId) {
        self.segments.retain(|s| *s != seg);
    }
}
