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

//! [`Stats`]: passive counters updated only through [`crate::reactor`].

use std::collections::HashMap;

use crate::types::{LocationKind, PathMode, TransportMode};

/// Aggregated, read-only network statistics.
///
/// Every counter here is mutated exclusively by the reactors in [`crate::reactor`] in response to
/// registry mutations — nothing calls these setters directly from outside the crate.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    location_count: HashMap<LocationKind, u64>,
    segment_count: HashMap<TransportMode, u64>,
    path_mode_count: HashMap<PathMode, u64>,
    total_segment_count: u64,
}

impl Stats {
    /// Number of locations of the given kind currently registered.
    pub fn location_count(&self, kind: LocationKind) -> u64 {
        self.location_count.get(&kind).copied().unwrap_or(0)
    }

    /// Number of segments of the given transport mode currently registered.
    pub fn segment_count(&self, mode: TransportMode) -> u64 {
        self.segment_count.get(&mode).copied().unwrap_or(0)
    }

    /// Number of segments currently supporting the given path mode.
    pub fn path_mode_count(&self, mode: PathMode) -> u64 {
        self.path_mode_count.get(&mode).copied().unwrap_or(0)
    }

    /// Total number of segments currently registered, across all transport modes.
    pub fn total_segment_count(&self) -> u64 {
        self.total_segment_count
    }

    /// Percentage of segments that support expedited service, `0.0` when there are none.
    pub fn expedite_percentage(&self) -> f64 {
        if self.total_segment_count == 0 {
            0.0
        } else {
            100.0 * self.path_mode_count(PathMode::Expedited) as f64
                / self.total_segment_count as f64
        }
    }

    pub(crate) fn location_count_incr(&mut self, kind: LocationKind) {
        *self.location_count.entry(kind).or_insert(0) += 1;
    }

    pub(crate) fn location_count_decr(&mut self, kind: LocationKind) {
        decr(self.location_count.entry(kind).or_insert(0));
    }

    pub(crate) fn segment_count_incr(&mut self, mode: TransportMode) {
        *self.segment_count.entry(mode).or_insert(0) += 1;
    }

    pub(crate) fn segment_count_decr(&mut self, mode: TransportMode) {
        decr(self.segment_count.entry(mode).or_insert(0));
    }

    pub(crate) fn path_mode_count_incr(&mut self, mode: PathMode) {
        *self.path_mode_count.entry(mode).or_insert(0) += 1;
    }

    pub(crate) fn path_mode_count_decr(&mut self, mode: PathMode) {
        decr(self.path_mode_count.entry(mode).or_insert(0));
    }

    pub(crate) fn total_segment_count_incr(&mut self) {
        self.total_segment_count += 1;
    }

    pub(crate) fn total_segment_count_decr(&mut self) {
        decr(&mut self.total_segment_count);
    }
}

/// Clamp decrement at zero; should never trigger under correct reactor discipline, but the
/// original engine guards against it and so do we.
fn decr(counter: &mut u64) {
    *counter = counter.saturating_sub(1);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamped_decrement() {
        let mut s = Stats::default();
        s.location_count_decr(LocationKind::Port);
        assert_eq!(s.location_count(LocationKind::Port), 0);
    }

    #[test]
    fn expedite_percentage_zero_when_empty() {
        let s = Stats::default();
        assert_eq!(s.expedite_percentage(), 0.0);
    }

    #[test]
    fn expedite_percentage_computed() {
        let mut s = Stats::default();
        s.total_segment_count_incr();
        s.total_segment_count_incr();
        s.path_mode_count_incr(PathMode::Expedited);
        assert_eq!(s.expedite_percentage(), 50.0);
    }
}
