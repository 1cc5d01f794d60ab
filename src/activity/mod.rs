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

//! Discrete-event scheduling: [`Activity`], [`ActivityStatus`], and the priority-queued
//! [`ActivityManager`] that drives virtual time forward.

pub mod fleet_switch;
pub mod shipment;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use ordered_float::NotNan;
use priority_queue::PriorityQueue;

use log::trace;

/// Execution state of an [`Activity`], mirroring the lifecycle the source engine's activities
/// move through: created idle, scheduled for a future time, executing, then either rescheduled or
/// left idle again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    /// Constructed but never scheduled.
    Uninit,
    /// Idle: not currently queued.
    Free,
    /// Currently being dispatched by the manager.
    Executing,
    /// Queued for a future `nextTime`.
    NextTimeScheduled,
    /// Will not be dispatched even if popped; skipped and discarded.
    Cancelled,
}

/// A unit of work the manager dispatches once virtual time reaches its `next_time`.
pub trait Activity {
    /// Execute one firing of this activity at the given virtual time, returning the next time
    /// (if any) it should be re-scheduled at.
    fn fire(&mut self, now: Hour) -> Option<Hour>;

    /// Relative dispatch priority: higher executes first among activities tied on `next_time`
    /// within the 5e-4 tolerance.
    fn priority(&self) -> u8 {
        0
    }

    /// A short label for logging.
    fn label(&self) -> &str;
}

pub use crate::types::Hour;

/// Absolute time-equality tolerance used to break ties in the scheduling order, carried over
/// unchanged from the activity comparator this design is grounded on.
pub const TIME_EQUALITY_TOLERANCE: f64 = 0.0005;

type PendingSpawn = (Box<dyn Activity>, Hour, u8);

/// A cloneable handle an [`Activity`] can hold to register further activities with the
/// [`ActivityManager`] that is dispatching it, without borrowing the manager itself.
///
/// `Activity::fire` takes `&mut self`, not `&mut ActivityManager`, so an activity that wants to
/// post follow-up work (e.g. [`crate::activity::shipment::ShipmentGenerator`] posting a
/// [`crate::activity::shipment::SegmentForwarder`]) cannot call [`ActivityManager::schedule`]
/// directly. It instead pushes onto this handle's shared queue; the manager drains it immediately
/// after the firing activity returns, before considering the next entry in its own queue, so
/// newly spawned activities are visible to any later tie-break within the same [`ActivityManager::time_is`] call.
#[derive(Clone, Default)]
pub struct SpawnHandle(Rc<RefCell<Vec<PendingSpawn>>>);

impl SpawnHandle {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    /// Enqueue `activity` to be scheduled at `next_time` with `priority`, once the manager drains
    /// this handle.
    pub fn push(&self, activity: Box<dyn Activity>, next_time: Hour, priority: u8) {
        self.0.borrow_mut().push((activity, next_time, priority));
    }

    pub(crate) fn drain(&self) -> Vec<PendingSpawn> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl std::fmt::Debug for SpawnHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnHandle").field("pending", &self.0.borrow().len()).finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduleKey {
    next_time: NotNan<f64>,
    priority: u8,
}

impl PartialEq for ScheduleKey {
    fn eq(&self, other: &Self) -> bool {
        (self.next_time.into_inner() - other.next_time.into_inner()).abs()
            < TIME_EQUALITY_TOLERANCE
            && self.priority == other.priority
    }
}
impl Eq for ScheduleKey {}

impl PartialOrd for ScheduleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduleKey {
    /// `(next_time ascending, priority descending)`: equal-within-tolerance times break ties by
    /// higher priority first. `PriorityQueue` pops the *greatest* key, so the ordering here is
    /// inverted relative to the natural "soonest wins" reading — smaller `next_time` must compare
    /// as greater.
    fn cmp(&self, other: &Self) -> Ordering {
        if (self.next_time.into_inner() - other.next_time.into_inner()).abs()
            >= TIME_EQUALITY_TOLERANCE
        {
            other.next_time.cmp(&self.next_time)
        } else {
            self.priority.cmp(&other.priority)
        }
    }
}

/// Priority-queued scheduler of [`Activity`] trait objects, keyed on `(next_time asc, priority
/// desc)` with the source engine's `|Δt| < 5e-4` time-equality tolerance.
pub struct ActivityManager {
    now: Hour,
    queue: PriorityQueue<u64, ScheduleKey>,
    activities: Vec<Box<dyn Activity>>,
    statuses: Vec<ActivityStatus>,
    next_id: u64,
    spawns: SpawnHandle,
}

impl std::fmt::Debug for ActivityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityManager")
            .field("now", &self.now)
            .field("scheduled", &self.queue.len())
            .finish()
    }
}

impl Default for ActivityManager {
    fn default() -> Self {
        Self {
            now: Hour::default(),
            queue: PriorityQueue::new(),
            activities: Vec::new(),
            statuses: Vec::new(),
            next_id: 0,
            spawns: SpawnHandle::new(),
        }
    }
}

impl ActivityManager {
    /// Construct an empty manager at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Hour {
        self.now
    }

    /// A cloneable handle that activities dispatched by this manager can hold to post follow-up
    /// activities back onto it (see [`SpawnHandle`]).
    pub fn spawner(&self) -> SpawnHandle {
        self.spawns.clone()
    }

    /// Register an activity and schedule its first firing at `next_time`. Returns a handle usable
    /// with [`ActivityManager::cancel`].
    pub fn schedule(&mut self, activity: Box<dyn Activity>, next_time: Hour, priority: u8) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.activities.push(activity);
        self.statuses.push(ActivityStatus::NextTimeScheduled);
        self.queue.push(
            id,
            ScheduleKey { next_time: NotNan::new(next_time.value()).unwrap_or_default(), priority },
        );
        id
    }

    /// Mark a scheduled activity as cancelled. A cancelled activity is skipped (not executed)
    /// when it is popped from the queue.
    pub fn cancel(&mut self, id: u64) {
        if let Some(status) = self.statuses.get_mut(id as usize) {
            *status = ActivityStatus::Cancelled;
        }
    }

    /// The status of a scheduled activity.
    pub fn status(&self, id: u64) -> Option<ActivityStatus> {
        self.statuses.get(id as usize).copied()
    }

    /// Advance virtual time to `t`, executing every activity whose `next_time` is less than or
    /// equal to `t` (within tolerance), in `(next_time asc, priority desc)` order. Activities that
    /// reschedule themselves (by returning `Some` from [`Activity::fire`]) are re-inserted before
    /// the next pop is considered, so a chain of activities scheduled strictly before `t` all run
    /// within this call. Non-monotonic calls (`t < now`) are ignored.
    pub fn time_is(&mut self, t: Hour) {
        if t.value() < self.now.value() {
            return;
        }
        loop {
            let Some((&id, key)) = self.queue.peek() else { break };
            if key.next_time.into_inner() > t.value() + TIME_EQUALITY_TOLERANCE {
                break;
            }
            let (id, key) = self.queue.pop().unwrap();
            if self.statuses[id as usize] == ActivityStatus::Cancelled {
                continue;
            }
            self.statuses[id as usize] = ActivityStatus::Executing;
            let fire_time = Hour::new(key.next_time.into_inner()).unwrap_or_default();
            trace!("firing activity {} at t={}", id, fire_time.value());
            let reschedule = self.activities[id as usize].fire(fire_time);
            match reschedule {
                Some(next) => {
                    self.statuses[id as usize] = ActivityStatus::NextTimeScheduled;
                    self.queue.push(
                        id,
                        ScheduleKey {
                            next_time: NotNan::new(next.value()).unwrap_or_default(),
                            priority: key.priority,
                        },
                    );
                }
                None => self.statuses[id as usize] = ActivityStatus::Free,
            }
            // Drain any activities the one that just fired posted onto its `SpawnHandle`, so they
            // are scheduled (and eligible to fire within this same call) before the next pop.
            for (activity, next_time, priority) in self.spawns.drain() {
                self.schedule(activity, next_time, priority);
            }
        }
        self.now = t;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Counter {
        log: Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        remaining: u32,
        period: f64,
    }

    impl Activity for Counter {
        fn fire(&mut self, _now: Hour) -> Option<Hour> {
            self.log.borrow_mut().push(self.name);
            self.remaining -= 1;
            (self.remaining > 0).then(|| Hour::new(self.period).unwrap())
        }
        fn label(&self) -> &str {
            self.name
        }
    }

    #[test]
    fn tie_break_by_priority_descending() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = ActivityManager::new();
        mgr.schedule(
            Box::new(Counter { log: log.clone(), name: "low", remaining: 1, period: 1.0 }),
            Hour::new(1.0).unwrap(),
            1,
        );
        mgr.schedule(
            Box::new(Counter { log: log.clone(), name: "high", remaining: 1, period: 1.0 }),
            Hour::new(1.0).unwrap(),
            5,
        );
        mgr.time_is(Hour::new(1.0).unwrap());
        assert_eq!(*log.borrow(), vec!["high", "low"]);
    }

    #[test]
    fn reschedule_chain_runs_within_one_time_is_call() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = ActivityManager::new();
        mgr.schedule(
            Box::new(Counter { log: log.clone(), name: "a", remaining: 3, period: 1.0 }),
            Hour::new(1.0).unwrap(),
            0,
        );
        mgr.time_is(Hour::new(3.0).unwrap());
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(mgr.now().value(), 3.0);
    }

    #[test]
    fn cancelled_activity_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = ActivityManager::new();
        let id = mgr.schedule(
            Box::new(Counter { log: log.clone(), name: "a", remaining: 1, period: 1.0 }),
            Hour::new(1.0).unwrap(),
            0,
        );
        mgr.cancel(id);
        mgr.time_is(Hour::new(1.0).unwrap());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn time_within_tolerance_counts_as_equal() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = ActivityManager::new();
        mgr.schedule(
            Box::new(Counter { log: log.clone(), name: "a", remaining: 1, period: 1.0 }),
            Hour::new(1.0001).unwrap(),
            0,
        );
        mgr.time_is(Hour::new(1.0).unwrap());
        assert_eq!(log.borrow().len(), 1);
    }
}
