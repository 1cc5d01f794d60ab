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

//! [`ShippingNetwork`]: the registry of locations and segments, and their mutation surface.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::fleet::Fleet;
use crate::location::Location;
use crate::reactor::{self, NetworkEvent};
use crate::segment::Segment;
use crate::stats::Stats;
use crate::types::{
    Difficulty, InvalidArgument, LocationId, LocationKind, Mile, NetworkError, NetworkId,
    PackageNum, SegmentId, TransportMode,
};

/// The shipping network: a registry of locations and segments plus the shared fleet and
/// statistics objects.
///
/// Locations and segments are stored by value in internal maps and referenced everywhere else by
/// [`LocationId`]/[`SegmentId`], so that the symmetric `source`/`return_segment` links between
/// entities never need a cyclic reference. All mutation goes through methods on this type, which
/// update the registry and then dispatch a [`NetworkEvent`] to maintain the derived invariants
/// (back-links, return-segment symmetry, statistics) described in [`crate::reactor`].
#[derive(Debug)]
pub struct ShippingNetwork {
    id: NetworkId,
    pub(crate) locations: HashMap<LocationId, Location>,
    pub(crate) segments: HashMap<SegmentId, Segment>,
    location_names: HashMap<String, LocationId>,
    segment_names: HashMap<String, SegmentId>,
    next_location_id: usize,
    next_segment_id: usize,
    pub(crate) stats: Stats,
    fleet: Rc<RefCell<Fleet>>,
}

impl Default for ShippingNetwork {
    fn default() -> Self {
        Self {
            id: NetworkId::next(),
            locations: HashMap::new(),
            segments: HashMap::new(),
            location_names: HashMap::new(),
            segment_names: HashMap::new(),
            next_location_id: 0,
            next_segment_id: 0,
            stats: Stats::default(),
            fleet: Rc::new(RefCell::new(Fleet::default())),
        }
    }
}

impl ShippingNetwork {
    /// Construct an empty network with a single default [`Fleet`].
    ///
    /// Each network is minted a fresh [`NetworkId`], embedded in every [`LocationId`]/
    /// [`SegmentId`] it hands out; a handle from one network is never found in another's
    /// registry, even if the two were built with identical names in identical order.
    pub fn new() -> Self {
        Self::default()
    }

    // -- location lookup -----------------------------------------------------------------

    /// Look up a location by id.
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// Look up a location by name.
    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.location_names.get(name).and_then(|id| self.locations.get(id))
    }

    /// Iterate over every location in the network.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    // -- segment lookup -------------------------------------------------------------------

    /// Look up a segment by id.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    /// Look up a segment by id, mutably. Exposed for the activity layer's in-transit bookkeeping
    /// ([`crate::segment::Segment::try_enter`]/[`crate::segment::Segment::exit`]); those mutators
    /// are crate-private and carry no reactor-visible state, so this does not bypass the
    /// invariants enforced by [`crate::reactor`].
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(&id)
    }

    /// Look up a segment by name.
    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.segment_names.get(name).and_then(|id| self.segments.get(id))
    }

    /// Iterate over every segment in the network.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// The network's currently active fleet.
    ///
    /// Borrowed out of a shared cell rather than returned by plain reference, so that a
    /// [`crate::activity::fleet_switch::FleetSwitch`] built from [`ShippingNetwork::fleet_handle`]
    /// can install a new active fleet that every subsequent cost/time query observes immediately.
    pub fn fleet(&self) -> Ref<'_, Fleet> {
        self.fleet.borrow()
    }

    /// The network's currently active fleet, mutably.
    pub fn fleet_mut(&self) -> RefMut<'_, Fleet> {
        self.fleet.borrow_mut()
    }

    /// A shared handle to the network's active-fleet cell, for wiring a
    /// [`crate::activity::fleet_switch::FleetSwitch`] that swaps fleets in on this network's
    /// behalf as virtual time advances.
    pub fn fleet_handle(&self) -> Rc<RefCell<Fleet>> {
        self.fleet.clone()
    }

    /// The network's accumulated statistics.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    // -- creation / deletion --------------------------------------------------------------

    /// Register a new location, or return the id of the existing location of this name.
    ///
    /// Matches the registry's idempotent-create-or-return-existing convention: calling this
    /// twice with the same name is not an error, and does not re-fire `onLocationNew`.
    pub fn location_new(&mut self, name: impl Into<String>, kind: LocationKind) -> LocationId {
        let name = name.into();
        if let Some(id) = self.location_names.get(&name) {
            return *id;
        }
        let id = LocationId { network: self.id, index: self.next_location_id };
        self.next_location_id += 1;
        self.locations.insert(id, Location::new(id, name.clone(), kind));
        self.location_names.insert(name, id);
        reactor::dispatch(self, NetworkEvent::LocationNew(id, kind));
        id
    }

    /// Remove a location by name, cascading the deletion to every segment sourced there. A no-op
    /// returning `None` if the name is not registered.
    pub fn location_del(&mut self, name: &str) -> Option<Location> {
        let id = *self.location_names.get(name)?;
        let segments: Vec<SegmentId> = self.locations.get(&id)?.segments().to_vec();
        for seg in segments {
            // Detach each segment's source; this drives the segment reactor's back-link cleanup
            // even though the location it points at is about to disappear.
            let _ = self.set_source(seg, None);
        }
        self.location_names.remove(name);
        let loc = self.locations.remove(&id)?;
        debug!("location removed: {} ({})", loc.name(), id);
        reactor::dispatch(self, NetworkEvent::LocationDel(id, loc.kind()));
        Some(loc)
    }

    /// Register a new segment, or return the id of the existing segment of this name.
    pub fn segment_new(&mut self, name: impl Into<String>, mode: TransportMode) -> SegmentId {
        let name = name.into();
        if let Some(id) = self.segment_names.get(&name) {
            return *id;
        }
        let id = SegmentId { network: self.id, index: self.next_segment_id };
        self.next_segment_id += 1;
        self.segments.insert(id, Segment::new(id, name.clone(), mode));
        self.segment_names.insert(name, id);
        reactor::dispatch(self, NetworkEvent::SegmentNew(id, mode));
        id
    }

    /// Remove a segment by name, clearing its source and return-segment links first so the
    /// cascade is visible to the segment reactor. A no-op returning `None` if the name is not
    /// registered.
    pub fn segment_del(&mut self, name: &str) -> Option<Segment> {
        let id = *self.segment_names.get(name)?;
        let _ = self.set_source(id, None);
        let _ = self.set_return_segment(id, None);
        self.segment_names.remove(name);
        let seg = self.segments.remove(&id)?;
        debug!("segment removed: {} ({})", seg.name(), id);
        let had_expedited = seg.modes().contains(&crate::types::PathMode::Expedited);
        reactor::dispatch(
            self,
            NetworkEvent::SegmentDel(id, seg.transport_mode(), had_expedited),
        );
        Some(seg)
    }

    // -- segment mutators -----------------------------------------------------------------

    /// Set (or clear) a segment's source location.
    ///
    /// Idempotent: setting the current value is a no-op. Rejects attaching a segment whose
    /// transport mode the target location's kind does not accept.
    pub fn set_source(
        &mut self,
        segment: SegmentId,
        source: Option<LocationId>,
    ) -> Result<(), NetworkError> {
        let seg = self.segments.get(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        let old = seg.source();
        if old == source {
            return Ok(());
        }
        if let Some(loc_id) = source {
            let loc = self.locations.get(&loc_id).ok_or(NetworkError::UnknownLocation(loc_id))?;
            if !loc.kind().accepts(seg.transport_mode()) {
                return Err(NetworkError::IncompatibleMode {
                    mode: seg.transport_mode(),
                    kind: loc.kind(),
                });
            }
        }
        self.set_source_raw(segment, source);
        reactor::dispatch(self, NetworkEvent::SegmentSourceChanged { segment, old, new: source });
        Ok(())
    }

    pub(crate) fn set_source_raw(&mut self, segment: SegmentId, source: Option<LocationId>) {
        if let Some(s) = self.segments.get_mut(&segment) {
            s.set_source_raw(source);
        }
    }

    /// Set (or clear) a segment's return-segment pairing. Symmetry is restored automatically:
    /// the peer's own return-segment pointer is updated to match (see [`crate::reactor`]).
    pub fn set_return_segment(
        &mut self,
        segment: SegmentId,
        peer: Option<SegmentId>,
    ) -> Result<(), NetworkError> {
        let seg = self.segments.get(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        let old = seg.return_segment();
        if old == peer {
            return Ok(());
        }
        if let Some(peer_id) = peer {
            if !self.segments.contains_key(&peer_id) {
                return Err(NetworkError::UnknownSegment(peer_id));
            }
        }
        self.set_return_segment_raw(segment, peer);
        reactor::dispatch(self, NetworkEvent::SegmentReturnChanged { segment, old, new: peer });
        Ok(())
    }

    pub(crate) fn set_return_segment_raw(&mut self, segment: SegmentId, peer: Option<SegmentId>) {
        if let Some(s) = self.segments.get_mut(&segment) {
            s.set_return_segment_raw(peer);
        }
    }

    /// Set a segment's length. Idempotent.
    pub fn set_length(&mut self, segment: SegmentId, length: Mile) -> Result<(), NetworkError> {
        let seg = self.segments.get_mut(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        seg.length_is(length);
        Ok(())
    }

    /// Set a segment's difficulty. Idempotent.
    pub fn set_difficulty(
        &mut self,
        segment: SegmentId,
        difficulty: Difficulty,
    ) -> Result<(), NetworkError> {
        let seg = self.segments.get_mut(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        seg.difficulty_is(difficulty);
        Ok(())
    }

    /// Set a segment's capacity. Idempotent.
    pub fn set_capacity(
        &mut self,
        segment: SegmentId,
        capacity: PackageNum,
    ) -> Result<(), NetworkError> {
        let seg = self.segments.get_mut(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        seg.capacity_is(capacity);
        Ok(())
    }

    /// Enable or disable expedited service on a segment.
    pub fn set_expedite_support(
        &mut self,
        segment: SegmentId,
        enabled: bool,
    ) -> Result<(), NetworkError> {
        let seg = self.segments.get_mut(&segment).ok_or(NetworkError::UnknownSegment(segment))?;
        let was_enabled = seg.modes().contains(&crate::types::PathMode::Expedited);
        if was_enabled == enabled {
            return Ok(());
        }
        seg.expedite_support_is(enabled);
        reactor::dispatch(
            self,
            NetworkEvent::SegmentModeChanged { mode: crate::types::PathMode::Expedited, enabled },
        );
        Ok(())
    }
}

/// Error produced at value-type construction time, re-exported for convenience.
pub type ValueError = InvalidArgument;

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::PathMode;

    fn truck_segment(net: &mut ShippingNetwork, name: &str) -> SegmentId {
        net.segment_new(name, TransportMode::Truck)
    }

    #[test]
    fn location_new_is_idempotent() {
        let mut net = ShippingNetwork::new();
        let a1 = net.location_new("A", LocationKind::Port);
        let a2 = net.location_new("A", LocationKind::Port);
        assert_eq!(a1, a2);
        assert_eq!(net.stats().location_count(LocationKind::Port), 1);
    }

    #[test]
    fn source_back_link_invariant() {
        let mut net = ShippingNetwork::new();
        let a = net.location_new("A", LocationKind::Port);
        let b = net.location_new("B", LocationKind::Port);
        let s = truck_segment(&mut net, "s1");
        net.set_source(s, Some(a)).unwrap();
        assert_eq!(net.location(a).unwrap().segments(), &[s]);
        net.set_source(s, Some(b)).unwrap();
        assert!(net.location(a).unwrap().segments().is_empty());
        assert_eq!(net.location(b).unwrap().segments(), &[s]);
    }

    #[test]
    fn return_segment_symmetry() {
        let mut net = ShippingNetwork::new();
        let s1 = truck_segment(&mut net, "s1");
        let s2 = truck_segment(&mut net, "s2");
        net.set_return_segment(s1, Some(s2)).unwrap();
        assert_eq!(net.segment(s1).unwrap().return_segment(), Some(s2));
        assert_eq!(net.segment(s2).unwrap().return_segment(), Some(s1));

        // Repointing s1's return segment should clear s2's back pointer.
        let s3 = truck_segment(&mut net, "s3");
        net.set_return_segment(s1, Some(s3)).unwrap();
        assert_eq!(net.segment(s2).unwrap().return_segment(), None);
        assert_eq!(net.segment(s3).unwrap().return_segment(), Some(s1));
    }

    #[test]
    fn type_incompatible_attachment_rejected() {
        let mut net = ShippingNetwork::new();
        let term = net.location_new("T", LocationKind::TruckTerminal);
        let boat = net.segment_new("b1", TransportMode::Boat);
        let err = net.set_source(boat, Some(term)).unwrap_err();
        assert!(matches!(err, NetworkError::IncompatibleMode { .. }));
    }

    #[test]
    fn segment_del_cascades() {
        let mut net = ShippingNetwork::new();
        let a = net.location_new("A", LocationKind::Port);
        let b = net.location_new("B", LocationKind::Port);
        let s1 = truck_segment(&mut net, "s1");
        let s2 = truck_segment(&mut net, "s2");
        net.set_source(s1, Some(a)).unwrap();
        net.set_source(s2, Some(b)).unwrap();
        net.set_return_segment(s1, Some(s2)).unwrap();

        net.segment_del("s1");
        assert!(net.segment_by_name("s1").is_none());
        assert_eq!(net.segment(s2).unwrap().return_segment(), None);
        assert!(net.location(a).unwrap().segments().is_empty());
    }

    #[test]
    fn location_del_detaches_sourced_segments() {
        let mut net = ShippingNetwork::new();
        let a = net.location_new("A", LocationKind::Port);
        let s1 = truck_segment(&mut net, "s1");
        net.set_source(s1, Some(a)).unwrap();
        net.location_del("A");
        assert_eq!(net.segment(s1).unwrap().source(), None);
    }

    #[test]
    fn delete_of_undefined_name_is_noop() {
        let mut net = ShippingNetwork::new();
        assert!(net.location_del("nope").is_none());
        assert!(net.segment_del("nope").is_none());
    }

    #[test]
    fn expedite_support_updates_stats() {
        let mut net = ShippingNetwork::new();
        let s1 = truck_segment(&mut net, "s1");
        net.set_expedite_support(s1, true).unwrap();
        assert_eq!(net.stats().path_mode_count(PathMode::Expedited), 1);
        net.set_expedite_support(s1, false).unwrap();
        assert_eq!(net.stats().path_mode_count(PathMode::Expedited), 0);
    }
}
