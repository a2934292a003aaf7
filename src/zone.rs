use crate::tracker::TrackedObject;
use crate::types::Boundary;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Accumulates entered/exited totals for the monitored zone by running a
/// small per-object state machine once per frame.
pub struct ZoneCounter {
    boundary: Boundary,
    total_in: u64,
    total_out: u64,
}

impl ZoneCounter {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            total_in: 0,
            total_out: 0,
        }
    }

    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Updates the totals from the current tracked object set.
    ///
    /// An object still in frame whose direction matches the inbound direction
    /// is counted as entered, exactly once. An object that has left the frame
    /// is counted as exited when its last direction matches the outbound
    /// direction, and is removed in the same step. Objects counted as entered
    /// are kept until they leave the frame, then cleaned up.
    pub fn update(&mut self, objects: &mut BTreeMap<Uuid, TrackedObject>) {
        let inbound = self.boundary.inbound();
        let outbound = self.boundary.outbound();

        objects.retain(|_, object| {
            if object.counted {
                // cleanup after being counted and having left the frame
                return !object.gone;
            }

            if !object.gone {
                if object.direction == inbound {
                    self.total_in += 1;
                    object.counted = true;
                }
                true
            } else if object.direction == outbound {
                self.total_out += 1;
                false
            } else {
                true
            }
        });
    }
}
