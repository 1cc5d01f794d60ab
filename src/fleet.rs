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

//! [`Fleet`]: per-transport-mode speed/cost/capacity, and path-mode multipliers.

use std::collections::HashMap;

use crate::types::{DollarPerMile, Hour, MilePerHour, PackageNum, PathMode, TransportMode};

const DEFAULT_SPEED: f64 = 1.0;
const DEFAULT_CAPACITY: f64 = 1.0;
const DEFAULT_COST: f64 = 1.0;

/// Cost multiplier applied to expedited-mode path segments.
pub const EXPEDITED_COST_MULTIPLIER: f64 = 1.5;
/// Speed multiplier applied to expedited-mode path segments.
pub const EXPEDITED_SPEED_MULTIPLIER: f64 = 1.3;

/// Per-transport-mode rates plus path-mode multipliers, optionally scheduled to activate at a
/// fixed time of day.
///
/// Accessors fall back to fixed defaults (speed 1.0, capacity 1, cost 1.0) for any mode that has
/// not been explicitly configured, matching the source engine's behavior of tolerating partially
/// configured fleets.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    speed: HashMap<TransportMode, MilePerHour>,
    capacity: HashMap<TransportMode, PackageNum>,
    cost: HashMap<TransportMode, DollarPerMile>,
    start_time: Option<Hour>,
}

impl Fleet {
    /// Construct a fleet with all-default rates and no schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed for the given transport mode, defaulting to 1.0 mph if unconfigured.
    pub fn speed(&self, mode: TransportMode) -> MilePerHour {
        self.speed.get(&mode).copied().unwrap_or(MilePerHour::new(DEFAULT_SPEED).unwrap())
    }

    /// Set the speed for a transport mode.
    pub fn speed_is(&mut self, mode: TransportMode, speed: MilePerHour) {
        self.speed.insert(mode, speed);
    }

    /// Capacity for the given transport mode, defaulting to 1 package if unconfigured.
    pub fn capacity(&self, mode: TransportMode) -> PackageNum {
        self.capacity.get(&mode).copied().unwrap_or(PackageNum::new(DEFAULT_CAPACITY).unwrap())
    }

    /// Set the capacity for a transport mode.
    pub fn capacity_is(&mut self, mode: TransportMode, capacity: PackageNum) {
        self.capacity.insert(mode, capacity);
    }

    /// Cost rate for the given transport mode, defaulting to $1.00/mile if unconfigured.
    pub fn cost(&self, mode: TransportMode) -> DollarPerMile {
        self.cost.get(&mode).copied().unwrap_or(DollarPerMile::new(DEFAULT_COST).unwrap())
    }

    /// Set the cost rate for a transport mode.
    pub fn cost_is(&mut self, mode: TransportMode, cost: DollarPerMile) {
        self.cost.insert(mode, cost);
    }

    /// Cost multiplier applied for the given path mode.
    pub fn cost_multiplier(&self, mode: PathMode) -> f64 {
        match mode {
            PathMode::Unexpedited => 1.0,
            PathMode::Expedited => EXPEDITED_COST_MULTIPLIER,
        }
    }

    /// Speed multiplier applied for the given path mode.
    pub fn speed_multiplier(&self, mode: PathMode) -> f64 {
        match mode {
            PathMode::Unexpedited => 1.0,
            PathMode::Expedited => EXPEDITED_SPEED_MULTIPLIER,
        }
    }

    /// The time of day (if any) at which this fleet becomes active.
    pub fn start_time(&self) -> Option<Hour> {
        self.start_time
    }

    /// Schedule this fleet to become active at the given time of day, recurring every 24 hours.
    pub fn start_time_is(&mut self, time: Hour) {
        self.start_time = Some(time);
    }
}
