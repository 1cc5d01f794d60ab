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

//! Value types, entity ids, and error types shared across the crate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque per-network identity tag embedded in every [`LocationId`]/[`SegmentId`].
///
/// Handles are looked up by `(network, index)` in the owning [`crate::network::ShippingNetwork`]'s
/// registry maps, so a handle minted by one network can never resolve inside another: the lookup
/// key simply will not match. This is the "reference-identity comparison against the network's
/// registry" that cross-network queries (e.g. [`crate::conn::Conn`]) rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkId(u64);

impl NetworkId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique, stable handle to a [`crate::location::Location`] stored in a [`crate::network::ShippingNetwork`].
///
/// Locations are looked up through the network's registry rather than referenced directly, so
/// that segment/location cross-references never form a reference cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationId {
    pub(crate) network: NetworkId,
    pub(crate) index: usize,
}

impl LocationId {
    #[cfg(test)]
    pub(crate) fn test(index: usize) -> Self {
        Self { network: NetworkId(0), index }
    }
}

/// Unique, stable handle to a [`crate::segment::Segment`] stored in a [`crate::network::ShippingNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentId {
    pub(crate) network: NetworkId,
    pub(crate) index: usize,
}

impl SegmentId {
    #[cfg(test)]
    pub(crate) fn test(index: usize) -> Self {
        Self { network: NetworkId(0), index }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc#{}", self.index)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg#{}", self.index)
    }
}

/// The kind of a [`crate::location::Location`], fixed at creation.
///
/// `Customer` and `Port` accept segments of any transport mode; the three terminal kinds each
/// accept only the matching mode (see [`LocationKind::accepts`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    /// Origin and destination of shipments.
    Customer,
    /// Mode-agnostic transfer point.
    Port,
    /// Accepts only truck segments.
    TruckTerminal,
    /// Accepts only boat segments.
    BoatTerminal,
    /// Accepts only plane segments.
    PlaneTerminal,
}

impl LocationKind {
    /// Whether a segment of the given transport mode may be attached as a source on a location
    /// of this kind.
    pub fn accepts(&self, mode: TransportMode) -> bool {
        match self {
            LocationKind::Customer | LocationKind::Port => true,
            LocationKind::TruckTerminal => mode == TransportMode::Truck,
            LocationKind::BoatTerminal => mode == TransportMode::Boat,
            LocationKind::PlaneTerminal => mode == TransportMode::Plane,
        }
    }
}

/// The physical transport mode of a [`crate::segment::Segment`], fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportMode {
    /// Road transport.
    Truck,
    /// Water transport.
    Boat,
    /// Air transport.
    Plane,
}

/// A path-level service mode. A segment may support either, both, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathMode {
    /// Standard service.
    Unexpedited,
    /// Premium service: faster and more expensive, per [`crate::fleet::Fleet`] multipliers.
    Expedited,
}

/// Error raised when constructing a validated scalar value type out of its allowed range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidArgument {
    /// An ordinal value (`Mile`, `Dollar`, `Hour`, `PackageNum`) was constructed with a negative
    /// magnitude.
    #[error("value must be non-negative, got {0}")]
    Negative(f64),
    /// A `Difficulty` was constructed outside of `[1.0, 5.0]`.
    #[error("difficulty must be within [1.0, 5.0], got {0}")]
    DifficultyOutOfRange(f64),
    /// An `Hour` used as a fleet start time was constructed outside of `[0.0, 24.0)`.
    #[error("start time must be within [0.0, 24.0), got {0}")]
    StartTimeOutOfRange(f64),
}

/// Error raised by a fallible mutation on the shipping network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// No location exists under this id.
    #[error("unknown location: {0}")]
    UnknownLocation(LocationId),
    /// No segment exists under this id.
    #[error("unknown segment: {0}")]
    UnknownSegment(SegmentId),
    /// A location name is already registered.
    #[error("location name already in use: {0}")]
    DuplicateLocationName(String),
    /// A segment name is already registered.
    #[error("segment name already in use: {0}")]
    DuplicateSegmentName(String),
    /// A segment's transport mode is incompatible with the terminal kind of the location it was
    /// attached to.
    #[error("segment of mode {mode:?} cannot attach to location of kind {kind:?}")]
    IncompatibleMode {
        /// Transport mode of the segment.
        mode: TransportMode,
        /// Kind of the location the segment was attached to.
        kind: LocationKind,
    },
    /// A location or segment handle was passed that belongs to a different network.
    #[error("handle belongs to a different network")]
    ForeignHandle,
    /// A `connect` query was issued without a sink.
    #[error("connect query requires a sink location")]
    MissingSink,
    /// A value-range violation was surfaced while mutating the network.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

macro_rules! ordinal {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(f64);

        impl $name {
            /// Construct a new value, rejecting negative magnitudes.
            pub fn new(value: f64) -> Result<Self, InvalidArgument> {
                if value < 0.0 {
                    Err(InvalidArgument::Negative(value))
                } else {
                    Ok(Self(value))
                }
            }

            /// The underlying numeric value.
            pub fn value(&self) -> f64 {
                self.0
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |a, b| a + b)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(0.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}", self.0)
            }
        }
    };
}

ordinal!(Mile, "Distance, in miles. Ordinal: non-negative, totally ordered.");
ordinal!(Dollar, "Monetary cost, in dollars. Ordinal: non-negative, totally ordered.");
ordinal!(Hour, "A duration or time-of-day, in hours. Ordinal: non-negative, totally ordered.");
ordinal!(PackageNum, "A count of packages. Ordinal: non-negative, totally ordered.");

macro_rules! nominal {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(f64);

        impl $name {
            /// Construct a new value, rejecting negative magnitudes.
            pub fn new(value: f64) -> Result<Self, InvalidArgument> {
                if value < 0.0 {
                    Err(InvalidArgument::Negative(value))
                } else {
                    Ok(Self(value))
                }
            }

            /// The underlying numeric value.
            pub fn value(&self) -> f64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}", self.0)
            }
        }
    };
}

nominal!(MilePerHour, "Speed, in miles per hour. Nominal: equality only.");
nominal!(DollarPerMile, "Cost rate, in dollars per mile. Nominal: equality only.");

/// Difficulty multiplier applied to a segment's cost contribution. Bounded to `[1.0, 5.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulty(f64);

impl Difficulty {
    /// Construct a new difficulty, rejecting values outside of `[1.0, 5.0]`.
    pub fn new(value: f64) -> Result<Self, InvalidArgument> {
        if !(1.0..=5.0).contains(&value) {
            Err(InvalidArgument::DifficultyOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// The underlying numeric value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
