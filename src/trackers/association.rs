use crate::track::ObjectTrack;
use crate::trackers::options::DEFAULT_MAX_DISTANCE;
use crate::utils::bbox::BoundingBox;
use log::trace;
use nalgebra::{distance, Point2};

/// The point of a bounding box used to measure the distance between a track and a blob
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceAnchor {
    /// top-left corner of the box
    #[default]
    TopLeft,
    /// geometric center of the box
    Center,
}

impl DistanceAnchor {
    pub fn point(&self, bbox: &BoundingBox) -> Point2<f32> {
        match self {
            DistanceAnchor::TopLeft => bbox.top_left(),
            DistanceAnchor::Center => bbox.center(),
        }
    }

    /// Euclidean distance between the anchor points of two boxes
    ///
    pub fn distance(&self, l: &BoundingBox, r: &BoundingBox) -> f32 {
        distance(&self.point(l), &self.point(r))
    }
}

/// Greedy blob to track matcher
///
/// Tracks are served in the collection order, so the track created earlier chooses first. Every
/// track takes the nearest blob that is not claimed yet and lays closer than `max_distance`. The
/// assignment is not globally optimal: a later track may get its second-best blob or nothing.
///
#[derive(Clone, Copy, Debug)]
pub struct Associator {
    max_distance: f32,
    anchor: DistanceAnchor,
    history_length: usize,
}

impl Default for Associator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE, DistanceAnchor::default(), 0)
    }
}

impl Associator {
    /// Creates new associator
    ///
    /// # Parameters
    /// * `max_distance` - the blob must be strictly closer than the value
    /// * `anchor` - bbox point the distance is measured between
    /// * `history_length` - kept history points of matched tracks, `0` for unbounded
    ///
    pub fn new(max_distance: f32, anchor: DistanceAnchor, history_length: usize) -> Self {
        assert!(
            max_distance > 0.0,
            "The distance is expected to be a positive float"
        );
        Self {
            max_distance,
            anchor,
            history_length,
        }
    }

    /// Matches the tracks with the blobs, updates matched tracks in place
    ///
    /// Every track gets `updated == false` first, then the matched ones are switched back.
    /// Returns blobs no track claimed, in their original order.
    ///
    pub fn associate(
        &self,
        tracks: &mut [ObjectTrack],
        mut blobs: Vec<BoundingBox>,
    ) -> Vec<BoundingBox> {
        for t in tracks.iter_mut() {
            t.updated = false;
        }

        if tracks.is_empty() || blobs.is_empty() {
            return blobs;
        }

        for t in tracks.iter_mut() {
            if blobs.is_empty() {
                break;
            }

            if let Some(nearest) = self.nearest(&t.rect, &blobs) {
                // `remove` keeps the order of the rest, so ties resolve the same way for every track
                let blob = blobs.remove(nearest);
                trace!("Track {} claims blob {:?}", t.id, &blob);
                t.update(blob, self.history_length);
            }
        }

        blobs
    }

    fn nearest(&self, rect: &BoundingBox, blobs: &[BoundingBox]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, b) in blobs.iter().enumerate() {
            let d = self.anchor.distance(rect, b);
            let limit = best.map_or(self.max_distance, |(_, d)| d);
            if d < limit {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use crate::track::ObjectTrack;
    use crate::trackers::association::{Associator, DistanceAnchor};
    use crate::utils::bbox::BoundingBox;
    use crate::utils::color::Color;
    use crate::EPS;
    use std::collections::HashSet;

    fn track(id: u64, x: i32, y: i32, w: i32, h: i32) -> ObjectTrack {
        ObjectTrack::new(id, BoundingBox::new(x, y, w, h), Color::default())
    }

    #[test]
    fn anchors() {
        let l = BoundingBox::new(0, 0, 10, 10);
        let r = BoundingBox::new(3, 4, 4, 2);
        assert!((DistanceAnchor::TopLeft.distance(&l, &r) - 5.0).abs() < EPS);
        // centers are (5, 5) and (5, 5)
        assert!(DistanceAnchor::Center.distance(&l, &r).abs() < EPS);
    }

    #[test]
    fn empty_inputs() {
        let a = Associator::default();
        let blobs = vec![BoundingBox::new(1, 1, 5, 5), BoundingBox::new(50, 50, 5, 5)];
        let rest = a.associate(&mut [], blobs.clone());
        assert_eq!(rest, blobs);

        let mut tracks = vec![track(0, 1, 1, 5, 5)];
        let rest = a.associate(&mut tracks, vec![]);
        assert!(rest.is_empty());
        assert!(!tracks[0].updated);
        assert_eq!(tracks[0].rect, BoundingBox::new(1, 1, 5, 5));
        assert!(tracks[0].history.is_empty());
    }

    #[test]
    fn match_updates_track() {
        let a = Associator::default();
        let mut tracks = vec![track(0, 10, 10, 20, 20)];
        let rest = a.associate(&mut tracks, vec![BoundingBox::new(12, 11, 20, 20)]);
        assert!(rest.is_empty());

        let t = &tracks[0];
        assert!(t.updated);
        assert_eq!(t.rect, BoundingBox::new(12, 11, 20, 20));
        assert!((t.velocity.x - 2.0).abs() < EPS);
        assert!((t.velocity.y - 1.0).abs() < EPS);
        assert_eq!(t.history.len(), 1);
        assert!((t.history[0].x - 22.0).abs() < EPS);
        assert!((t.history[0].y - 21.0).abs() < EPS);
    }

    #[test]
    fn threshold_is_strict() {
        let a = Associator::new(30.0, DistanceAnchor::TopLeft, 0);
        let mut tracks = vec![track(0, 0, 0, 5, 5)];
        let far = BoundingBox::new(30, 0, 5, 5);
        let rest = a.associate(&mut tracks, vec![far]);
        assert_eq!(rest, vec![far]);
        assert!(!tracks[0].updated);
        assert_eq!(tracks[0].rect, BoundingBox::new(0, 0, 5, 5));

        let near = BoundingBox::new(29, 0, 5, 5);
        let rest = a.associate(&mut tracks, vec![near]);
        assert!(rest.is_empty());
        assert!(tracks[0].updated);
    }

    #[test]
    fn nearest_blob_wins() {
        let a = Associator::default();
        let mut tracks = vec![track(0, 100, 100, 10, 10)];
        let blobs = vec![
            BoundingBox::new(110, 100, 10, 10),
            BoundingBox::new(103, 104, 10, 10),
            BoundingBox::new(90, 90, 10, 10),
        ];
        let rest = a.associate(&mut tracks, blobs);
        assert_eq!(tracks[0].rect, BoundingBox::new(103, 104, 10, 10));
        assert_eq!(
            rest,
            vec![BoundingBox::new(110, 100, 10, 10), BoundingBox::new(90, 90, 10, 10)]
        );
    }

    #[test]
    fn equal_distances_keep_earlier_blob() {
        let a = Associator::default();
        let mut tracks = vec![track(0, 50, 50, 10, 10)];
        let blobs = vec![BoundingBox::new(55, 50, 10, 10), BoundingBox::new(45, 50, 10, 10)];
        let rest = a.associate(&mut tracks, blobs);
        assert_eq!(tracks[0].rect, BoundingBox::new(55, 50, 10, 10));
        assert_eq!(rest, vec![BoundingBox::new(45, 50, 10, 10)]);
    }

    #[test]
    fn earlier_track_has_priority() {
        let a = Associator::default();
        // the blob is closer to the second track, still the first one takes it
        let mut tracks = vec![track(0, 20, 20, 10, 10), track(1, 8, 10, 10, 10)];
        let rest = a.associate(&mut tracks, vec![BoundingBox::new(10, 10, 10, 10)]);
        assert!(rest.is_empty());
        assert!(tracks[0].updated);
        assert!(!tracks[1].updated);
        assert_eq!(tracks[0].rect, BoundingBox::new(10, 10, 10, 10));
        assert_eq!(tracks[1].rect, BoundingBox::new(8, 10, 10, 10));
    }

    #[test]
    fn later_track_gets_second_best() {
        let a = Associator::default();
        let mut tracks = vec![track(0, 0, 0, 10, 10), track(1, 4, 0, 10, 10)];
        let blobs = vec![BoundingBox::new(2, 0, 10, 10), BoundingBox::new(20, 0, 10, 10)];
        let rest = a.associate(&mut tracks, blobs);
        assert!(rest.is_empty());
        assert_eq!(tracks[0].rect, BoundingBox::new(2, 0, 10, 10));
        assert_eq!(tracks[1].rect, BoundingBox::new(20, 0, 10, 10));
    }

    #[test]
    fn center_anchor() {
        let a = Associator::new(10.0, DistanceAnchor::Center, 0);
        // top-left corners are 40 px apart, centers coincide
        let mut tracks = vec![track(0, 100, 100, 20, 20)];
        let rest = a.associate(&mut tracks, vec![BoundingBox::new(80, 80, 60, 60)]);
        assert!(rest.is_empty());
        assert!(tracks[0].updated);

        let mut tracks = vec![track(0, 100, 100, 20, 20)];
        let rest = Associator::new(10.0, DistanceAnchor::TopLeft, 0)
            .associate(&mut tracks, vec![BoundingBox::new(80, 80, 60, 60)]);
        assert_eq!(rest.len(), 1);
        assert!(!tracks[0].updated);
    }

    #[test]
    fn one_to_one() {
        let a = Associator::new(15.0, DistanceAnchor::TopLeft, 0);
        let mut tracks = (0..10)
            .map(|i| track(i, (i * 7) as i32, 0, 5, 5))
            .collect::<Vec<_>>();
        let blobs = (0..8)
            .map(|i| BoundingBox::new(i * 9, 2, 5, 5))
            .collect::<Vec<_>>();
        let rest = a.associate(&mut tracks, blobs.clone());

        let claimed = tracks
            .iter()
            .filter(|t| t.updated)
            .map(|t| t.rect)
            .collect::<Vec<_>>();
        let unique = claimed.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), claimed.len());
        assert_eq!(claimed.len() + rest.len(), blobs.len());
        assert!(tracks.iter().all(|t| t.history.len() <= 1));
    }
}
