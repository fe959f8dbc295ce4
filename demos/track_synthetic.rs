use blobtrack::examples::{BlobGen, MaskGen};
use blobtrack::prelude::{CollectingNotifier, TrackEvent, TrackerOptions, TrackingEngine};
use log::info;

fn main() {
    env_logger::init();

    let opts = TrackerOptions::default()
        .min_blob_size(3, 3)
        .max_distance(30.0)
        .kept_history_length(50)
        .collect_wasted(true);
    let mut engine = TrackingEngine::with_notifier(opts, CollectingNotifier::default());

    let masks = MaskGen::new(640, 480)
        .blob(BlobGen::new_directional(
            20.0,
            40.0,
            30.0,
            20.0,
            (2.0, 4.0),
            (0.0, 1.0),
            0.5,
        ))
        .blob(BlobGen::new_directional(
            600.0,
            300.0,
            15.0,
            40.0,
            (-5.0, -3.0),
            (-1.0, 1.0),
            0.5,
        ))
        .blob(BlobGen::new(320.0, 240.0, 10.0, 10.0, 2.0, 0.2));

    for (mask, _) in masks.take(100) {
        for t in engine.process_mask(&mask) {
            info!(
                "Track {:>3}: rect: {:?}, velocity: ({:.0}, {:.0}), length: {}",
                t.id, t.rect, t.velocity.x, t.velocity.y, t.length
            );
        }

        for e in engine.notifier_mut().drain() {
            match e {
                TrackEvent::Created(id) => info!("Track {} appeared", id),
                TrackEvent::Evicted(id) => info!("Track {} is lost", id),
            }
        }
    }

    for t in engine.wasted() {
        info!(
            "Lost track {}: {} frames, path: {:?}",
            t.id,
            t.length,
            t.history
                .iter()
                .map(|p| (p.x, p.y))
                .collect::<Vec<_>>()
        );
    }
}
