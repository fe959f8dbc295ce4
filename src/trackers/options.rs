use crate::blobs::MinBlobSize;
use crate::trackers::association::DistanceAnchor;

/// Default maximal distance between the track and the blob that still allows the match
pub const DEFAULT_MAX_DISTANCE: f32 = 30.0;

/// Class that is used to configure the tracking engine
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub(crate) min_blob_size: MinBlobSize,
    pub(crate) max_distance: f32,
    pub(crate) distance_anchor: DistanceAnchor,
    pub(crate) kept_history_length: usize,
    pub(crate) collect_wasted: bool,
    pub(crate) color_seed: Option<u64>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            min_blob_size: MinBlobSize::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
            distance_anchor: DistanceAnchor::default(),
            kept_history_length: 0,
            collect_wasted: false,
            color_seed: None,
        }
    }
}

impl TrackerOptions {
    /// Blobs with the width or the height strictly less than specified are ignored.
    ///
    pub fn min_blob_size(mut self, width: i32, height: i32) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "Minimal blob size must be non-negative"
        );
        self.min_blob_size = MinBlobSize::new(width, height);
        self
    }

    /// The distance between the track and the blob reference points must be strictly less than
    /// the value to match them.
    ///
    pub fn max_distance(mut self, d: f32) -> Self {
        assert!(d > 0.0, "The distance is expected to be a positive float");
        self.max_distance = d;
        self
    }

    /// Which point of the bounding boxes is compared when the blobs are matched to the tracks.
    ///
    /// The top-left corner is used by default.
    ///
    pub fn distance_anchor(mut self, anchor: DistanceAnchor) -> Self {
        self.distance_anchor = anchor;
        self
    }

    /// The number of last center points kept within the track history.
    ///
    /// `0` means the history is unbounded. A long-running session with long-living tracks should set
    /// the limit to keep memory utilization low.
    ///
    pub fn kept_history_length(mut self, n: usize) -> Self {
        self.kept_history_length = n;
        self
    }

    /// Keep evicted tracks until they are fetched with `wasted()`.
    ///
    pub fn collect_wasted(mut self, collect: bool) -> Self {
        self.collect_wasted = collect;
        self
    }

    /// Makes the display colors of the tracks reproducible.
    ///
    pub fn color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    pub fn get_min_blob_size(&self) -> MinBlobSize {
        self.min_blob_size
    }

    pub fn get_max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn get_distance_anchor(&self) -> DistanceAnchor {
        self.distance_anchor
    }

    pub fn get_kept_history_length(&self) -> usize {
        self.kept_history_length
    }
}
