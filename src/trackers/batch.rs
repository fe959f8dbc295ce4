use crate::track::notify::{ChangeNotifier, NoopNotifier};
use crate::track::ObjectTrack;
use crate::trackers::engine::TrackingEngine;
use crate::trackers::options::TrackerOptions;
use crate::Errors;
use anyhow::Result;
use image::GrayImage;
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashMap;

pub type BatchRecords<T> = HashMap<u64, T>;
pub type SceneTracks = (u64, Vec<ObjectTrack>);

/// Independent tracking sessions, one per scene (camera, stream, region), processed in parallel
///
/// Every scene has its own engine, so ids, epochs and tracks never leak between scenes. A scene
/// that isn't present in a batch is left untouched: its tracks are neither matched nor evicted.
///
pub struct BatchTracker<N = NoopNotifier>
where
    N: ChangeNotifier,
{
    opts: TrackerOptions,
    notifier: N,
    engines: HashMap<u64, TrackingEngine<N>>,
    pool: ThreadPool,
}

impl BatchTracker<NoopNotifier> {
    /// Creates the batch tracker with a thread per cpu core
    ///
    pub fn new(opts: TrackerOptions) -> Result<Self> {
        Self::with_threads(opts, num_cpus::get(), NoopNotifier)
    }
}

impl<N> BatchTracker<N>
where
    N: ChangeNotifier,
{
    /// Creates the batch tracker
    ///
    /// # Parameters
    /// * `opts` - options every scene engine is created with
    /// * `threads` - size of the thread pool
    /// * `notifier` - prototype notifier cloned into every new scene engine
    ///
    pub fn with_threads(opts: TrackerOptions, threads: usize, notifier: N) -> Result<Self> {
        if threads == 0 {
            return Err(Errors::ThreadPoolSize.into());
        }
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self {
            opts,
            notifier,
            engines: HashMap::default(),
            pool,
        })
    }

    /// Processes one mask per scene, returns the live tracks of the processed scenes
    ///
    /// The result is ordered by scene id.
    ///
    pub fn process(&mut self, mut masks: BatchRecords<GrayImage>) -> Vec<SceneTracks> {
        for scene_id in masks.keys() {
            if !self.engines.contains_key(scene_id) {
                debug!("New scene {} is registered", scene_id);
                self.engines.insert(
                    *scene_id,
                    TrackingEngine::with_notifier(self.opts.clone(), self.notifier.clone()),
                );
            }
        }

        let jobs = self
            .engines
            .iter_mut()
            .filter_map(|(scene_id, engine)| {
                masks
                    .remove(scene_id)
                    .map(|mask| (*scene_id, engine, mask))
            })
            .collect::<Vec<_>>();

        let mut res = self.pool.install(|| {
            jobs.into_par_iter()
                .map(|(scene_id, engine, mask)| (scene_id, engine.process_mask(&mask).to_vec()))
                .collect::<Vec<_>>()
        });
        res.sort_by_key(|(scene_id, _)| *scene_id);
        res
    }

    pub fn scene(&self, scene_id: u64) -> Option<&TrackingEngine<N>> {
        self.engines.get(&scene_id)
    }

    pub fn scene_mut(&mut self, scene_id: u64) -> Option<&mut TrackingEngine<N>> {
        self.engines.get_mut(&scene_id)
    }

    /// Drops the scene session, returns its engine
    ///
    pub fn remove_scene(&mut self, scene_id: u64) -> Option<TrackingEngine<N>> {
        self.engines.remove(&scene_id)
    }

    /// Ids of the registered scenes, ascending
    ///
    pub fn scenes(&self) -> Vec<u64> {
        let mut scenes = self.engines.keys().copied().collect::<Vec<_>>();
        scenes.sort_unstable();
        scenes
    }
}

#[cfg(test)]
mod tests {
    use crate::track::notify::{CollectingNotifier, TrackEvent};
    use crate::trackers::batch::{BatchRecords, BatchTracker};
    use crate::trackers::options::TrackerOptions;
    use crate::utils::bbox::BoundingBox;
    use crate::Errors;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn mask_with(rects: &[(i32, i32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(100, 100);
        for (x, y, w, h) in rects {
            draw_filled_rect_mut(&mut mask, Rect::at(*x, *y).of_size(*w, *h), Luma([255u8]));
        }
        mask
    }

    #[test]
    fn scenes_are_isolated() {
        let mut batch = BatchTracker::new(TrackerOptions::default()).unwrap();

        let mut masks = BatchRecords::default();
        masks.insert(1, mask_with(&[(10, 10, 10, 10)]));
        masks.insert(0, mask_with(&[(10, 10, 10, 10), (50, 50, 10, 10)]));
        let res = batch.process(masks);

        assert_eq!(res.len(), 2);
        assert_eq!(res[0].0, 0);
        assert_eq!(res[0].1.len(), 2);
        assert_eq!(res[1].0, 1);
        assert_eq!(res[1].1.len(), 1);
        assert_eq!(res[1].1[0].id, 0);
        assert_eq!(batch.scenes(), vec![0, 1]);

        // scene 1 skips the batch and keeps its track
        let mut masks = BatchRecords::default();
        masks.insert(0, mask_with(&[]));
        let res = batch.process(masks);
        assert_eq!(res.len(), 1);
        assert!(res[0].1.is_empty());

        let scene = batch.scene(1).unwrap();
        assert_eq!(scene.current_epoch(), 1);
        assert_eq!(scene.tracks()[0].rect, BoundingBox::new(10, 10, 10, 10));

        assert!(batch.remove_scene(1).is_some());
        assert_eq!(batch.scenes(), vec![0]);
    }

    #[test]
    fn notifier_per_scene() {
        let mut batch =
            BatchTracker::with_threads(TrackerOptions::default(), 2, CollectingNotifier::default())
                .unwrap();
        let mut masks = BatchRecords::default();
        masks.insert(3, mask_with(&[(10, 10, 10, 10)]));
        masks.insert(4, mask_with(&[(10, 10, 10, 10)]));
        batch.process(masks);

        for scene_id in [3, 4] {
            let events = batch.scene_mut(scene_id).unwrap().notifier_mut().drain();
            assert_eq!(events, vec![TrackEvent::Created(0)]);
        }
    }

    #[test]
    fn zero_threads() {
        let err = BatchTracker::with_threads(
            TrackerOptions::default(),
            0,
            crate::track::notify::NoopNotifier,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<Errors>(),
            Some(Errors::ThreadPoolSize)
        ));
    }
}
