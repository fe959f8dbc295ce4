use crate::blobs::BlobExtractor;
use crate::track::notify::{ChangeNotifier, NoopNotifier};
use crate::track::ObjectTrack;
use crate::trackers::association::Associator;
use crate::trackers::lifecycle::TrackLifecycleManager;
use crate::trackers::options::TrackerOptions;
use crate::utils::bbox::BoundingBox;
use crate::Errors;
use anyhow::Result;
use image::{GenericImageView, GrayImage};
use log::debug;
use std::mem;

/// Per-frame tracking driver
///
/// One engine is one tracking session: it owns the live tracks and the id counter. Every call of
/// `process_*` runs the whole frame pipeline - blob extraction, association, creation of new tracks
/// and eviction of the unmatched ones - before it returns.
///
#[derive(Debug, Clone)]
pub struct TrackingEngine<N = NoopNotifier>
where
    N: ChangeNotifier,
{
    opts: TrackerOptions,
    extractor: BlobExtractor,
    associator: Associator,
    lifecycle: TrackLifecycleManager,
    notifier: N,
    tracks: Vec<ObjectTrack>,
    wasted: Vec<ObjectTrack>,
    epoch: usize,
}

impl Default for TrackingEngine<NoopNotifier> {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

impl TrackingEngine<NoopNotifier> {
    pub fn new(opts: TrackerOptions) -> Self {
        Self::with_notifier(opts, NoopNotifier)
    }
}

impl<N> TrackingEngine<N>
where
    N: ChangeNotifier,
{
    /// Creates new engine that reports lifecycle events to `notifier`
    ///
    pub fn with_notifier(opts: TrackerOptions, notifier: N) -> Self {
        Self {
            extractor: BlobExtractor::new(opts.min_blob_size),
            associator: Associator::new(
                opts.max_distance,
                opts.distance_anchor,
                opts.kept_history_length,
            ),
            lifecycle: TrackLifecycleManager::new(opts.color_seed),
            notifier,
            tracks: Vec::default(),
            wasted: Vec::default(),
            epoch: 0,
            opts,
        }
    }

    /// Processes the foreground mask of the next frame
    ///
    /// # Parameters
    /// * `mask` - binary mask, non-zero pixels are the foreground
    ///
    pub fn process_mask(&mut self, mask: &GrayImage) -> &[ObjectTrack] {
        let blobs = self.extractor.extract(mask);
        self.process_blobs(blobs)
    }

    /// Processes the mask after checking it covers the whole source frame
    ///
    /// The frame itself is not analyzed.
    ///
    pub fn process_frame<I>(&mut self, mask: &GrayImage, frame: &I) -> Result<&[ObjectTrack]>
    where
        I: GenericImageView,
    {
        if mask.dimensions() != frame.dimensions() {
            return Err(Errors::MaskSizeMismatch {
                mask: mask.dimensions(),
                frame: frame.dimensions(),
            }
            .into());
        }
        Ok(self.process_mask(mask))
    }

    /// Processes blobs found by an external detector for the next frame
    ///
    pub fn process_blobs(&mut self, blobs: Vec<BoundingBox>) -> &[ObjectTrack] {
        self.epoch += 1;
        let blobs_num = blobs.len();

        let unclaimed = self.associator.associate(&mut self.tracks, blobs);
        let matched = self.tracks.iter().filter(|t| t.updated).count();

        let created = self
            .lifecycle
            .create_from_unclaimed(&mut self.tracks, unclaimed, &mut self.notifier);
        let evicted = self
            .lifecycle
            .evict_unmatched(&mut self.tracks, &mut self.notifier);

        debug!(
            "Epoch {}: blobs: {}, matched: {}, created: {}, evicted: {}, alive: {}",
            self.epoch,
            blobs_num,
            matched,
            created.len(),
            evicted.len(),
            self.tracks.len()
        );

        if self.opts.collect_wasted {
            self.wasted.extend(evicted);
        }

        &self.tracks
    }

    /// Live tracks in creation order
    ///
    pub fn tracks(&self) -> &[ObjectTrack] {
        &self.tracks
    }

    /// Fetches the tracks evicted since the previous call
    ///
    /// Always empty unless the engine is configured with `collect_wasted(true)`.
    ///
    pub fn wasted(&mut self) -> Vec<ObjectTrack> {
        mem::take(&mut self.wasted)
    }

    /// The number of frames processed within the session
    ///
    pub fn current_epoch(&self) -> usize {
        self.epoch
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.opts
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Starts a new session: drops every track and restarts ids and epochs
    ///
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.wasted.clear();
        self.epoch = 0;
        self.lifecycle.reset();
    }
}

#[cfg(feature = "python")]
pub mod python {
    use image::GrayImage;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::track::python::PyObjectTrack;
    use crate::trackers::association::DistanceAnchor;
    use crate::trackers::options::{TrackerOptions, DEFAULT_MAX_DISTANCE};

    use super::TrackingEngine;

    #[pyclass]
    #[pyo3(name = "TrackingEngine")]
    pub struct PyTrackingEngine(pub(crate) TrackingEngine);

    #[pymethods]
    impl PyTrackingEngine {
        #[new]
        #[pyo3(signature = (max_distance = DEFAULT_MAX_DISTANCE, min_width = 3, min_height = 3, history_length = 0, center_anchor = false))]
        fn new(
            max_distance: f32,
            min_width: i32,
            min_height: i32,
            history_length: usize,
            center_anchor: bool,
        ) -> PyResult<Self> {
            if max_distance <= 0.0 {
                return Err(PyValueError::new_err(
                    "The distance is expected to be a positive float",
                ));
            }
            if min_width < 0 || min_height < 0 {
                return Err(PyValueError::new_err(
                    "Minimal blob size must be non-negative",
                ));
            }
            let opts = TrackerOptions::default()
                .max_distance(max_distance)
                .min_blob_size(min_width, min_height)
                .kept_history_length(history_length)
                .distance_anchor(if center_anchor {
                    DistanceAnchor::Center
                } else {
                    DistanceAnchor::TopLeft
                });
            Ok(Self(TrackingEngine::new(opts)))
        }

        /// Processes the mask passed as a row-major byte buffer
        ///
        #[pyo3(text_signature = "($self, width, height, data)")]
        fn process_mask(
            &mut self,
            py: Python<'_>,
            width: u32,
            height: u32,
            data: Vec<u8>,
        ) -> PyResult<Vec<PyObjectTrack>> {
            let mask = GrayImage::from_raw(width, height, data)
                .ok_or_else(|| PyValueError::new_err("Mask buffer doesn't match its dimensions"))?;
            let tracks = py.allow_threads(|| self.0.process_mask(&mask).to_vec());
            Ok(tracks.into_iter().map(PyObjectTrack).collect())
        }

        fn tracks(&self) -> Vec<PyObjectTrack> {
            self.0.tracks().iter().cloned().map(PyObjectTrack).collect()
        }

        fn current_epoch(&self) -> usize {
            self.0.current_epoch()
        }

        fn reset(&mut self) {
            self.0.reset()
        }
    }
}
