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

//! Internal event protocol that maintains the network's derived invariants.
//!
//! Every mutation that changes observable state on a [`crate::location::Location`] or
//! [`crate::segment::Segment`] fires one of these events *after* the field update, and
//! [`crate::network::ShippingNetwork`] dispatches it to the fixed set of reactors below. This
//! stands in for a virtual-notifiee callback hierarchy with a statically typed enum, so that
//! back-link maintenance, return-segment symmetry, and statistics bookkeeping never depend on
//! dynamic dispatch or on subscribers retaining a strong reference to their notifier.
//!
//! Cascading deletion (clearing a segment's source/return pointers when it is removed, or
//! detaching every segment sourced at a deleted location) is performed by
//! [`crate::network::ShippingNetwork`] itself immediately before the entity leaves the registry,
//! since by the time a `*Del` event fires the entity id is no longer resolvable. The reactors
//! below only ever see entities that still exist.

use log::debug;

use crate::types::{LocationId, LocationKind, PathMode, SegmentId, TransportMode};

/// A state-changing event raised by the network registry.
#[derive(Debug, Clone)]
pub(crate) enum NetworkEvent {
    /// A new location was registered.
    LocationNew(LocationId, LocationKind),
    /// A location was removed.
    LocationDel(LocationId, LocationKind),
    /// A new segment was registered.
    SegmentNew(SegmentId, TransportMode),
    /// A segment was removed. Carries the mode and whether it supported expedited service.
    SegmentDel(SegmentId, TransportMode, bool),
    /// A segment's source changed from `old` to `new`.
    SegmentSourceChanged {
        segment: SegmentId,
        old: Option<LocationId>,
        new: Option<LocationId>,
    },
    /// A segment's return-segment pairing changed from `old` to `new`.
    SegmentReturnChanged {
        segment: SegmentId,
        old: Option<SegmentId>,
        new: Option<SegmentId>,
    },
    /// A segment's expedited-mode support toggled.
    SegmentModeChanged { mode: PathMode, enabled: bool },
}

/// Dispatches a [`NetworkEvent`] to the network's own state, applying the segment reactor and
/// stats reactor in sequence.
pub(crate) fn dispatch(net: &mut crate::network::ShippingNetwork, event: NetworkEvent) {
    debug!("dispatch {:?}", event);
    segment_reactor(net, &event);
    stats_reactor(net, &event);
}

/// Maintains location <-> segment back-links and return-segment symmetry.
fn segment_reactor(net: &mut crate::network::ShippingNetwork, event: &NetworkEvent) {
    match *event {
        NetworkEvent::SegmentSourceChanged { segment, old, new } => {
            if let Some(old) = old {
                if let Some(l) = net.locations.get_mut(&old) {
                    l.detach_segment(segment);
                }
            }
            if let Some(new) = new {
                if let Some(l) = net.locations.get_mut(&new) {
                    l.attach_segment(segment);
                }
            }
        }
        NetworkEvent::SegmentReturnChanged { segment, old, new } => {
            // If the previous peer still names `segment` as its own return segment, clear it
            // first. This runs before the new pairing is established so at most one re-entrant
            // call per side is issued.
            if let Some(old) = old {
                if net.segments.get(&old).and_then(|s| s.return_segment()) == Some(segment) {
                    net.set_return_segment_raw(old, None);
                }
            }
            if let Some(new) = new {
                if net.segments.get(&new).and_then(|s| s.return_segment()) != Some(segment) {
                    net.set_return_segment_raw(new, Some(segment));
                }
            }
        }
        _ => {}
    }
}

/// Updates [`crate::stats::Stats`] counters.
fn stats_reactor(net: &mut crate::network::ShippingNetwork, event: &NetworkEvent) {
    match *event {
        NetworkEvent::LocationNew(_, kind) => net.stats.location_count_incr(kind),
        NetworkEvent::LocationDel(_, kind) => net.stats.location_count_decr(kind),
        NetworkEvent::SegmentNew(_, mode) => {
            net.stats.segment_count_incr(mode);
            net.stats.total_segment_count_incr();
            // Every segment is born with `{unexpedited}` in its mode set (see
            // `Segment::new`), and the facade never offers a way to remove it.
            net.stats.path_mode_count_incr(PathMode::Unexpedited);
        }
        NetworkEvent::SegmentDel(_, mode, had_expedited) => {
            net.stats.segment_count_decr(mode);
            net.stats.total_segment_count_decr();
            net.stats.path_mode_count_decr(PathMode::Unexpedited);
            if had_expedited {
                net.stats.path_mode_count_decr(PathMode::Expedited);
            }
        }
        NetworkEvent::SegmentModeChanged { mode, enabled } => {
            if enabled {
                net.stats.path_mode_count_incr(mode);
            } else {
                net.stats.path_mode_count_decr(mode);
            }
        }
        _ => {}
    }
}
