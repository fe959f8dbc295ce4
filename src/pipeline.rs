use crate::foreground::{BackgroundSubtractor, ForegroundSubtractor};
use crate::track::notify::{ChangeNotifier, NoopNotifier};
use crate::track::ObjectTrack;
use crate::trackers::engine::TrackingEngine;
use anyhow::Result;
use image::GrayImage;

/// Frame to tracks: the foreground stage feeding the tracking engine
///
pub struct Pipeline<B, N = NoopNotifier>
where
    B: BackgroundSubtractor,
    N: ChangeNotifier,
{
    foreground: ForegroundSubtractor<B>,
    engine: TrackingEngine<N>,
    last_mask: Option<GrayImage>,
}

impl<B, N> Pipeline<B, N>
where
    B: BackgroundSubtractor,
    N: ChangeNotifier,
{
    pub fn new(foreground: ForegroundSubtractor<B>, engine: TrackingEngine<N>) -> Self {
        Self {
            foreground,
            engine,
            last_mask: None,
        }
    }

    /// Computes the foreground of the frame and tracks its blobs
    ///
    pub fn track(&mut self, frame: &GrayImage) -> Result<&[ObjectTrack]> {
        let mask = self.foreground.foreground(frame)?;
        self.engine.process_frame(&mask, frame)?;
        self.last_mask = Some(mask);
        Ok(self.engine.tracks())
    }

    /// The mask produced for the last frame, for display or debugging
    ///
    pub fn last_mask(&self) -> Option<&GrayImage> {
        self.last_mask.as_ref()
    }

    pub fn engine(&self) -> &TrackingEngine<N> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TrackingEngine<N> {
        &mut self.engine
    }

    /// Starts a new session: forgets the background and every track
    ///
    pub fn reset(&mut self) {
        self.foreground.model_mut().reset();
        self.engine.reset();
        self.last_mask = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::foreground::{ForegroundSubtractor, RunningAverage};
    use crate::pipeline::Pipeline;
    use crate::trackers::engine::TrackingEngine;
    use crate::trackers::options::TrackerOptions;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn frame_with(x: i32, y: i32) -> GrayImage {
        let mut frame = GrayImage::new(120, 90);
        draw_filled_rect_mut(&mut frame, Rect::at(x, y).of_size(12, 12), Luma([200u8]));
        frame
    }

    #[test]
    fn object_keeps_id_across_frames() {
        let mut pipeline = Pipeline::new(
            ForegroundSubtractor::new(RunningAverage::new(0.05, 25.0)),
            TrackingEngine::new(TrackerOptions::default()),
        );

        assert!(pipeline.track(&GrayImage::new(120, 90)).unwrap().is_empty());
        assert!(pipeline.last_mask().is_some());

        let mut ids = Vec::default();
        for i in 0..8 {
            let tracks = pipeline.track(&frame_with(20 + i * 4, 30)).unwrap();
            assert_eq!(tracks.len(), 1);
            ids.push(tracks[0].id);
        }
        assert!(ids.iter().all(|id| *id == ids[0]));

        pipeline.reset();
        assert!(pipeline.last_mask().is_none());
        assert_eq!(pipeline.engine().current_epoch(), 0);
    }
}
