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

//! [`FleetSwitch`]: swaps in a different active fleet at a fixed time of day, recurring daily.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::activity::{Activity, Hour};
use crate::fleet::Fleet;

const DAY: f64 = 24.0;

/// Fires at the fleet's `start_time` every 24-hour cycle and makes it the network's active fleet.
pub struct FleetSwitch {
    active: Rc<RefCell<Fleet>>,
    incoming: Fleet,
    start_time: Hour,
}

impl FleetSwitch {
    /// Construct a switch that installs `incoming` into `active` at each recurrence of
    /// `start_time`.
    pub fn new(active: Rc<RefCell<Fleet>>, incoming: Fleet, start_time: Hour) -> Self {
        Self { active, incoming, start_time }
    }

    /// The configured time of day at which this switch fires, each cycle.
    pub fn start_time(&self) -> Hour {
        self.start_time
    }
}

impl Activity for FleetSwitch {
    fn fire(&mut self, now: Hour) -> Option<Hour> {
        debug!("fleet switch at t={}", now.value());
        *self.active.borrow_mut() = self.incoming.clone();
        Some(Hour::new(now.value() + DAY).unwrap_or(now))
    }

    fn label(&self) -> &str {
        "fleet-switch"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{MilePerHour, TransportMode};

    #[test]
    fn switch_installs_incoming_fleet_and_reschedules_in_24h() {
        let active = Rc::new(RefCell::new(Fleet::new()));
        let mut incoming = Fleet::new();
        incoming.speed_is(TransportMode::Truck, MilePerHour::new(2.0).unwrap());
        let mut switch = FleetSwitch::new(active.clone(), incoming, Hour::new(12.0).unwrap());

        let next = switch.fire(Hour::new(12.0).unwrap());
        assert_eq!(next.unwrap().value(), 36.0);
        assert_eq!(active.borrow().speed(TransportMode::Truck).value(), 2.0);
    }
}
