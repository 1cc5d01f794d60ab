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

#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ShipSim
//!
//! A library for simulating a package-shipping network: customers, ports, and mode-specific
//! terminals joined by directed road/water/air segments, with a discrete-event scheduler driving
//! shipment generation, in-transit capacity, and time-of-day fleet changes.
//!
//! ## Main concepts
//!
//! The [`network::ShippingNetwork`] is the main datastructure to operate on. It owns every
//! [`location::Location`] and [`segment::Segment`] in a registry keyed by opaque
//! [`types::LocationId`]/[`types::SegmentId`] handles, and exposes a typed mutation surface that
//! maintains the network's invariants (symmetric return segments, location/segment back-links,
//! [`stats::Stats`] counters) through the internal reactor protocol described in [`reactor`].
//!
//! [`conn::Conn`] enumerates loop-free paths through the network under a [`conn::PathSelector`]
//! (mode mask, optional sink, and [`conn::Constraint`]s on distance/cost/time), producing
//! [`path::Path`] values with incrementally accumulated metrics.
//!
//! [`activity::ActivityManager`] is the discrete-event scheduler: register
//! [`activity::shipment::ShipmentGenerator`], [`activity::shipment::SegmentForwarder`], and
//! [`activity::fleet_switch::FleetSwitch`] activities, then call
//! [`activity::ActivityManager::time_is`] to advance virtual time and dispatch whatever is due.
//!
//! ## Optional features
//!
//! - `serde`: adds serialize/deserialize support to the value types and entity ids in this crate.
//!
//! ## Example usage
//!
//! ```
//! use shipsim::prelude::*;
//!
//! let mut net = ShippingNetwork::new();
//! let origin = net.location_new("Springfield", LocationKind::Port);
//! let dest = net.location_new("Shelbyville", LocationKind::Port);
//! let out = net.segment_new("out", TransportMode::Truck);
//! let back = net.segment_new("back", TransportMode::Truck);
//! net.set_source(out, Some(origin)).unwrap();
//! net.set_source(back, Some(dest)).unwrap();
//! net.set_return_segment(out, Some(back)).unwrap();
//!
//! let conn = Conn::new();
//! let selector = PathSelector::connect(origin, dest);
//! let paths = conn.paths(&net, &selector);
//! assert_eq!(paths.len(), 1);
//! ```

pub mod activity;
pub mod conn;
pub mod fleet;
pub mod formatter;
pub mod location;
pub mod network;
pub mod path;
pub mod prelude;
pub(crate) mod reactor;
pub mod segment;
pub mod stats;
pub mod types;

#[cfg(test)]
mod test;
