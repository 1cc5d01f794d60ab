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

//! [`Conn`]: constrained depth-first path enumeration.

use std::collections::HashSet;

use log::trace;

use crate::network::ShippingNetwork;
use crate::path::Path;
use crate::types::{Dollar, Hour, LocationId, Mile, PathMode};

/// A constraint applied to every candidate path's cumulative metrics during enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Cumulative distance must not exceed the given bound.
    Distance(Mile),
    /// Cumulative cost must not exceed the given bound.
    Cost(Dollar),
    /// Cumulative time must not exceed the given bound.
    Time(Hour),
}

impl Constraint {
    fn satisfied_by(&self, path: &Path) -> bool {
        match self {
            Constraint::Distance(max) => path.distance().value() <= max.value(),
            Constraint::Cost(max) => path.cost().value() <= max.value(),
            Constraint::Time(max) => path.time().value() <= max.value(),
        }
    }
}

/// Whether a query requires reaching a sink (`Connect`) or emits every valid prefix (`Explore`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Enumerate only paths that terminate at the selector's sink.
    Connect,
    /// Enumerate every path satisfying the constraints, optionally stopping early at a sink.
    Explore,
}

/// Bundles the source, optional sink, allowed path modes, and constraints for one enumeration.
#[derive(Debug, Clone)]
pub struct PathSelector {
    query: QueryMode,
    source: LocationId,
    sink: Option<LocationId>,
    modes: HashSet<PathMode>,
    constraints: Vec<Constraint>,
}

impl PathSelector {
    /// A `connect` query: enumerate loop-free paths from `source` to `sink`.
    pub fn connect(source: LocationId, sink: LocationId) -> Self {
        Self {
            query: QueryMode::Connect,
            source,
            sink: Some(sink),
            modes: HashSet::from([PathMode::Unexpedited]),
            constraints: Vec::new(),
        }
    }

    /// An `explore` query: enumerate loop-free paths from `source`, optionally bounded by `sink`.
    pub fn explore(source: LocationId, sink: Option<LocationId>) -> Self {
        Self {
            query: QueryMode::Explore,
            source,
            sink,
            modes: HashSet::from([PathMode::Unexpedited]),
            constraints: Vec::new(),
        }
    }

    /// Replace the allowed path-mode set.
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = PathMode>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }

    /// Append a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// The path-enumeration engine: given a network and a [`PathSelector`], produces every loop-free
/// path satisfying the selector via an explicit-stack depth-first traversal.
#[derive(Debug, Default, Clone, Copy)]
pub struct Conn;

impl Conn {
    /// Construct a `Conn`. Stateless: all enumeration work takes the network and selector as
    /// parameters, so a single `Conn` instance is shared for the whole network's lifetime.
    pub fn new() -> Self {
        Self
    }

    /// Enumerate every path matching `selector`, in DFS discovery order.
    ///
    /// A `Connect` selector without a sink is a caller error (use [`PathSelector::explore`]
    /// instead): returns an empty result set in that case rather than panicking, since the same
    /// check belongs to an external facade's validation, not to this engine.
    pub fn paths(&self, net: &ShippingNetwork, selector: &PathSelector) -> Vec<Path> {
        let Some(source) = net.location(selector.source) else {
            return Vec::new();
        };
        if selector.query == QueryMode::Connect && selector.sink.is_none() {
            return Vec::new();
        }

        let mut results = Vec::new();
        let mut stack: Vec<Path> = Vec::new();

        // Seed: one candidate per (routable outgoing segment, allowed mode it supports).
        for &seg_id in source.segments() {
            for &mode in &selector.modes {
                if let Some(path) = Path::seed(net, seg_id, mode) {
                    stack.push(path);
                }
            }
        }

        while let Some(path) = stack.pop() {
            if !selector.constraints.iter().all(|c| c.satisfied_by(&path)) {
                continue;
            }
            let at_sink = match selector.sink {
                Some(sink) => path.last_location(net) == Some(sink),
                None => false,
            };
            if selector.sink.is_none() || at_sink {
                trace!("path emitted: {} hops", path.elements().len());
                results.push(path.clone());
            }
            if at_sink {
                // Optimization: do not extend past the sink once reached.
                continue;
            }
            self.extend(net, selector, &path, &mut stack);
        }

        results
    }

    fn extend(
        &self,
        net: &ShippingNetwork,
        selector: &PathSelector,
        path: &Path,
        stack: &mut Vec<Path>,
    ) {
        let Some(last) = path.last_location(net) else { return };
        let Some(loc) = net.location(last) else { return };
        for &seg_id in loc.segments() {
            let Some(seg) = net.segment(seg_id) else { continue };
            let Some(far_seg_id) = seg.return_segment() else { continue };
            let Some(far_seg) = net.segment(far_seg_id) else { continue };
            let Some(far_loc_id) = far_seg.source() else { continue };
            let Some(far_loc) = net.location(far_loc_id) else { continue };
            if path.visits(far_loc.name()) {
                continue;
            }
            for &mode in &selector.modes {
                if let Some(extended) = path.clone().extended(net, seg_id, mode) {
                    stack.push(extended);
                }
            }
        }
    }

    /// The minimum-`metric` path's first segment from `source` to `sink`, or `None` if no path
    /// exists. Ties are broken by DFS discovery order (first found wins).
    pub fn next_hop(
        &self,
        net: &ShippingNetwork,
        source: LocationId,
        sink: LocationId,
        metric: RoutingMetric,
    ) -> Option<crate::types::SegmentId> {
        let selector = PathSelector::connect(source, sink)
            .with_modes([PathMode::Unexpedited, PathMode::Expedited]);
        let paths = self.paths(net, &selector);
        let best = paths.into_iter().min_by(|a, b| {
            let key = |p: &Path| match metric {
                RoutingMetric::MinHops => p.elements().len() as f64,
                RoutingMetric::MinDistance => p.distance().value(),
                RoutingMetric::MinTime => p.time().value(),
            };
            key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal)
        })?;
        best.elements().first().map(|e| e.segment())
    }
}

/// The metric used by [`Conn::next_hop`] to select among candidate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMetric {
    /// Fewest segment hops.
    MinHops,
    /// Least cumulative distance.
    MinDistance,
    /// Least cumulative time.
    MinTime,
}
