use crate::types::{Axis, Boundary, Point};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// An anchor point with stable identity across frames
#[derive(Debug, Clone)]
pub struct Centroid {
    pub id: Uuid,
    pub position: Point,
    frames_unmatched: u32,
}

impl Centroid {
    pub(crate) fn new(id: Uuid, position: Point) -> Self {
        Self {
            id,
            position,
            frames_unmatched: 0,
        }
    }
}

/// Tracks the set of currently visible anchor points as identity-stable
/// centroids, using greedy nearest-point association with axis gating.
pub struct CentroidTracker {
    centroids: BTreeMap<Uuid, Centroid>,
    boundary: Boundary,
    max_dist: f64,
    max_gone: u32,
}

impl CentroidTracker {
    /// Creates an empty tracker for the given boundary and thresholds
    pub fn new(boundary: Boundary, max_dist: f64, max_gone: u32) -> Self {
        Self {
            centroids: BTreeMap::new(),
            boundary,
            max_dist,
            max_gone,
        }
    }

    /// The currently tracked centroids, keyed by id
    pub fn centroids(&self) -> &BTreeMap<Uuid, Centroid> {
        &self.centroids
    }

    /// Updates the tracked centroids with the anchor points of one frame.
    ///
    /// Each point claims its nearest unclaimed centroid within `max_dist`,
    /// first come first served; points that can't claim one spawn a new
    /// centroid. Centroids left unmatched age by one frame and are evicted
    /// once they exceed `max_gone`.
    pub fn update(&mut self, points: &[Point]) {
        if points.is_empty() {
            self.age_unmatched(&BTreeSet::new());
            return;
        }

        if self.centroids.is_empty() {
            for point in points {
                self.insert(*point);
            }
            return;
        }

        let mut claimed: BTreeSet<Uuid> = BTreeSet::new();
        let mut unmatched_points: Vec<Point> = Vec::new();

        for point in points {
            match self.closest(point, &claimed) {
                Some((id, dist)) if dist <= self.max_dist => {
                    if let Some(centroid) = self.centroids.get_mut(&id) {
                        centroid.position = *point;
                        centroid.frames_unmatched = 0;
                    }
                    claimed.insert(id);
                }
                _ => unmatched_points.push(*point),
            }
        }

        self.age_unmatched(&claimed);

        for point in unmatched_points {
            self.insert(point);
        }
    }

    /// Starts tracking a new centroid at the given point
    fn insert(&mut self, position: Point) {
        let id = Uuid::new_v4();
        self.centroids.insert(id, Centroid::new(id, position));
    }

    /// Ages every centroid not claimed this round and evicts the ones that
    /// have been unmatched for more than `max_gone` frames
    fn age_unmatched(&mut self, claimed: &BTreeSet<Uuid>) {
        let max_gone = self.max_gone;
        self.centroids.retain(|id, centroid| {
            if claimed.contains(id) {
                return true;
            }
            centroid.frames_unmatched += 1;
            centroid.frames_unmatched <= max_gone
        });
    }

    /// Finds the closest unclaimed centroid to the point by Euclidean
    /// distance. Candidates whose position deviates more than the gate
    /// tolerance along the axis perpendicular to the movement axis are
    /// disqualified regardless of total distance. Ties go to the lowest id.
    fn closest(&self, point: &Point, claimed: &BTreeSet<Uuid>) -> Option<(Uuid, f64)> {
        let tolerance = self.boundary.gate_tolerance();
        let mut best: Option<(Uuid, f64)> = None;

        for (id, centroid) in &self.centroids {
            if claimed.contains(id) {
                continue;
            }

            let deviation = match self.boundary.movement_axis() {
                Axis::Vertical => (centroid.position.x - point.x).abs(),
                Axis::Horizontal => (centroid.position.y - point.y).abs(),
            };
            if deviation > tolerance {
                continue;
            }

            let dist = centroid.position.distance(point);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((*id, dist)),
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(max_dist: f64, max_gone: u32) -> CentroidTracker {
        CentroidTracker::new(Boundary::Bottom, max_dist, max_gone)
    }

    fn position_of(tracker: &CentroidTracker, id: Uuid) -> Point {
        tracker.centroids()[&id].position
    }

    #[test]
    fn test_first_update_creates_one_centroid_per_point() {
        let mut t = tracker(300.0, 30);
        t.update(&[Point::new(10, 10), Point::new(500, 500)]);
        assert_eq!(t.centroids().len(), 2);
        for centroid in t.centroids().values() {
            assert_eq!(centroid.frames_unmatched, 0);
        }
    }

    #[test]
    fn test_empty_update_only_ages_existing() {
        let mut t = tracker(300.0, 2);
        t.update(&[Point::new(10, 10)]);
        assert_eq!(t.centroids().len(), 1);

        t.update(&[]);
        t.update(&[]);
        assert_eq!(t.centroids().len(), 1, "still within max_gone");

        t.update(&[]);
        assert!(t.centroids().is_empty(), "evicted after max_gone + 1 misses");
    }

    #[test]
    fn test_eviction_after_exactly_max_gone_plus_one() {
        let max_gone = 5;
        let mut t = tracker(300.0, max_gone);
        t.update(&[Point::new(100, 100)]);

        for _ in 0..max_gone {
            t.update(&[]);
            assert_eq!(t.centroids().len(), 1);
        }
        t.update(&[]);
        assert!(t.centroids().is_empty());
    }

    #[test]
    fn test_point_matches_closest_centroid() {
        let mut t = tracker(200.0, 30);
        t.update(&[Point::new(0, 0), Point::new(1000, 1000)]);
        let far_id = t
            .centroids()
            .values()
            .find(|c| c.position == Point::new(1000, 1000))
            .map(|c| c.id)
            .unwrap();

        t.update(&[Point::new(5, 5)]);

        // the near centroid moved to (5,5); the far one aged in place
        assert_eq!(t.centroids().len(), 2);
        assert_eq!(position_of(&t, far_id), Point::new(1000, 1000));
        assert!(
            t.centroids()
                .values()
                .any(|c| c.position == Point::new(5, 5))
        );
    }

    #[test]
    fn test_gating_rejects_large_perpendicular_deviation() {
        // bottom boundary gates on X with +/-50px tolerance
        let mut t = tracker(300.0, 30);
        t.update(&[Point::new(100, 100)]);
        let original_id = t.centroids().keys().next().copied().unwrap();

        // 60px off in X: total distance is only 60 but the gate rejects it,
        // so the point spawns a fresh centroid
        t.update(&[Point::new(160, 100)]);
        assert_eq!(t.centroids().len(), 2);
        assert_eq!(position_of(&t, original_id), Point::new(100, 100));
    }

    #[test]
    fn test_gating_rejects_y_deviation_for_horizontal_boundary() {
        // left boundary gates on Y with +/-70px tolerance
        let mut t = CentroidTracker::new(Boundary::Left, 300.0, 30);
        t.update(&[Point::new(100, 100)]);
        let original_id = t.centroids().keys().next().copied().unwrap();

        // 80px off in Y: total distance is only 80 but the gate rejects it,
        // so the point spawns a fresh centroid
        t.update(&[Point::new(100, 180)]);
        assert_eq!(t.centroids().len(), 2);
        assert_eq!(position_of(&t, original_id), Point::new(100, 100));

        // 70px off in Y is within tolerance and matches
        let mut t = CentroidTracker::new(Boundary::Left, 300.0, 30);
        t.update(&[Point::new(100, 100)]);
        let id = t.centroids().keys().next().copied().unwrap();
        t.update(&[Point::new(150, 170)]);
        assert_eq!(t.centroids().len(), 1);
        assert_eq!(position_of(&t, id), Point::new(150, 170));
    }

    #[test]
    fn test_gating_allows_movement_along_axis() {
        // bottom boundary: large Y displacement is fine as long as X holds
        let mut t = tracker(300.0, 30);
        t.update(&[Point::new(100, 500)]);
        let id = t.centroids().keys().next().copied().unwrap();

        t.update(&[Point::new(110, 300)]);
        assert_eq!(t.centroids().len(), 1);
        assert_eq!(position_of(&t, id), Point::new(110, 300));
    }

    #[test]
    fn test_point_beyond_max_dist_spawns_new_centroid() {
        let mut t = tracker(100.0, 30);
        t.update(&[Point::new(0, 0)]);

        t.update(&[Point::new(10, 150)]);
        assert_eq!(t.centroids().len(), 2);
    }

    #[test]
    fn test_centroid_claimed_at_most_once_per_update() {
        let mut t = tracker(300.0, 0);
        t.update(&[Point::new(100, 100)]);

        // both points gate-pass and are within range of the single centroid;
        // only the first claims it, the second spawns a new one
        t.update(&[Point::new(100, 110), Point::new(100, 200)]);
        assert_eq!(t.centroids().len(), 2);
        assert!(
            t.centroids()
                .values()
                .any(|c| c.position == Point::new(100, 110))
        );
        assert!(
            t.centroids()
                .values()
                .any(|c| c.position == Point::new(100, 200))
        );
    }

    #[test]
    fn test_matched_centroid_resets_age() {
        let mut t = tracker(300.0, 1);
        t.update(&[Point::new(100, 100)]);
        t.update(&[]);
        // one miss so far; a match resets the count
        t.update(&[Point::new(100, 120)]);
        t.update(&[]);
        assert_eq!(t.centroids().len(), 1, "age was reset by the match");
    }
}
