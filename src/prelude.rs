use crate::track;
use crate::trackers;

pub use crate::blobs::{extract_blobs, BlobExtractor, MinBlobSize, DEFAULT_MIN_BLOB_SIZE};
pub use crate::foreground::{BackgroundSubtractor, ForegroundSubtractor, RunningAverage};
pub use crate::pipeline::Pipeline;
pub use crate::utils::bbox::BoundingBox;
pub use crate::utils::color::Color;
pub use track::notify::{ChangeNotifier, CollectingNotifier, NoopNotifier, TrackEvent};
pub use track::ObjectTrack;
pub use trackers::association::{Associator, DistanceAnchor};
pub use trackers::batch::BatchTracker;
pub use trackers::engine::TrackingEngine;
pub use trackers::lifecycle::TrackLifecycleManager;
pub use trackers::options::{TrackerOptions, DEFAULT_MAX_DISTANCE};
