use crate::centroid::Centroid;
use crate::types::{Axis, Boundary, Direction, Point};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A centroid identity promoted to a tracked object with a position history
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: Uuid,
    /// Chronological, append-only position history
    pub trajectory: Vec<Point>,
    pub direction: Direction,
    /// Whether the object has been attributed to a counter already
    pub counted: bool,
    /// Whether the object's centroid was absent from the most recent frame
    pub gone: bool,
}

impl TrackedObject {
    fn new(id: Uuid, position: Point) -> Self {
        Self {
            id,
            trajectory: vec![position],
            direction: Direction::Still,
            counted: false,
            gone: false,
        }
    }

    /// Mean of the trajectory along the movement axis; 0 for an empty
    /// trajectory
    fn mean_movement(&self, axis: Axis) -> f64 {
        if self.trajectory.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .trajectory
            .iter()
            .map(|p| match axis {
                Axis::Horizontal => p.x as f64,
                Axis::Vertical => p.y as f64,
            })
            .sum();
        sum / self.trajectory.len() as f64
    }

    /// Infers the direction of movement by comparing the newest position
    /// against the mean of the whole trajectory along the movement axis.
    /// Averaging over the full history smooths out frame-to-frame jitter.
    fn infer_direction(&self, position: Point, axis: Axis) -> Direction {
        let mean = self.mean_movement(axis);
        match axis {
            Axis::Horizontal => {
                let delta = position.x as f64 - mean;
                if delta > 0.0 {
                    Direction::Right
                } else if delta < 0.0 {
                    Direction::Left
                } else {
                    Direction::Still
                }
            }
            Axis::Vertical => {
                let delta = position.y as f64 - mean;
                if delta > 0.0 {
                    Direction::Down
                } else if delta < 0.0 {
                    Direction::Up
                } else {
                    Direction::Still
                }
            }
        }
    }
}

/// Promotes centroid identities into tracked objects with trajectories and
/// inferred movement directions.
pub struct ObjectTracker {
    objects: BTreeMap<Uuid, TrackedObject>,
    boundary: Boundary,
}

impl ObjectTracker {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            objects: BTreeMap::new(),
            boundary,
        }
    }

    pub fn objects(&self) -> &BTreeMap<Uuid, TrackedObject> {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut BTreeMap<Uuid, TrackedObject> {
        &mut self.objects
    }

    /// Updates the tracked objects from the current centroid set.
    ///
    /// Objects whose centroid disappeared are marked gone; an object that was
    /// already gone and never moved is dropped as noise. Present centroids
    /// extend their object's trajectory and refresh its direction.
    pub fn update(&mut self, centroids: &BTreeMap<Uuid, Centroid>) {
        let absent: Vec<Uuid> = self
            .objects
            .keys()
            .filter(|id| !centroids.contains_key(id))
            .copied()
            .collect();
        for id in absent {
            let vanished_without_moving = self
                .objects
                .get(&id)
                .map(|o| o.gone && o.direction == Direction::Still)
                .unwrap_or(false);
            if vanished_without_moving {
                self.objects.remove(&id);
            } else if let Some(object) = self.objects.get_mut(&id) {
                object.gone = true;
            }
        }

        let axis = self.boundary.movement_axis();
        for (id, centroid) in centroids {
            match self.objects.get_mut(id) {
                None => {
                    self.objects
                        .insert(*id, TrackedObject::new(*id, centroid.position));
                }
                Some(object) => {
                    object.trajectory.push(centroid.position);
                    object.direction = object.infer_direction(centroid.position, axis);
                }
            }
        }
    }
}
