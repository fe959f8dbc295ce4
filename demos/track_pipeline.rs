use anyhow::Result;
use blobtrack::examples::BlobGen;
use blobtrack::prelude::{
    ForegroundSubtractor, Pipeline, RunningAverage, TrackerOptions, TrackingEngine,
};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use log::info;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn main() -> Result<()> {
    env_logger::init();

    // only the left 3/4 of the scene is watched
    let mut region = GrayImage::new(WIDTH, HEIGHT);
    draw_filled_rect_mut(
        &mut region,
        Rect::at(0, 0).of_size(WIDTH * 3 / 4, HEIGHT),
        Luma([255u8]),
    );

    let foreground =
        ForegroundSubtractor::new(RunningAverage::new(0.05, 30.0)).static_mask(region);
    let engine = TrackingEngine::new(TrackerOptions::default().min_blob_size(5, 5));
    let mut pipeline = Pipeline::new(foreground, engine);

    let mut walker =
        BlobGen::new_directional(10.0, 100.0, 16.0, 24.0, (2.0, 3.0), (-0.5, 0.5), 0.0);

    for frame_num in 0..120 {
        // textured static background with one moving object
        let mut frame = GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
            Luma([((x / 16 + y / 16) % 2 * 40) as u8])
        });
        if frame_num > 0 {
            if let Some(r) = walker.next().and_then(|b| b.as_rect()) {
                draw_filled_rect_mut(&mut frame, r, Luma([220u8]));
            }
        }

        let tracks = pipeline.track(&frame)?;
        for t in tracks {
            info!(
                "Frame {:>3}, track {}: {:?}, path length: {}",
                frame_num,
                t.id,
                t.rect,
                t.history.len()
            );
        }
    }
    Ok(())
}
