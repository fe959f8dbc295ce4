use crate::track::notify::{ChangeNotifier, TrackEvent};
use crate::track::ObjectTrack;
use crate::utils::bbox::BoundingBox;
use crate::utils::color::Color;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates tracks for unclaimed blobs and evicts tracks that were not matched
///
/// Owns the id counter of the session: ids grow monotonically and are never reused.
///
#[derive(Debug, Clone)]
pub struct TrackLifecycleManager {
    next_id: u64,
    rng: StdRng,
}

impl Default for TrackLifecycleManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TrackLifecycleManager {
    /// Creates new manager
    ///
    /// # Parameters
    /// * `color_seed` - seed for display colors, random when not set
    ///
    pub fn new(color_seed: Option<u64>) -> Self {
        Self {
            next_id: 0,
            rng: match color_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    /// The id the next created track receives
    ///
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    fn gen_track_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Appends a new track for every blob, returns ids of the created tracks
    ///
    pub fn create_from_unclaimed<N: ChangeNotifier>(
        &mut self,
        tracks: &mut Vec<ObjectTrack>,
        blobs: Vec<BoundingBox>,
        notifier: &mut N,
    ) -> Vec<u64> {
        if blobs.is_empty() {
            return Vec::default();
        }

        let ids = blobs
            .into_iter()
            .map(|blob| {
                let id = self.gen_track_id();
                let color = Color::random(&mut self.rng);
                tracks.push(ObjectTrack::new(id, blob, color));
                notifier.send(TrackEvent::Created(id));
                id
            })
            .collect::<Vec<_>>();

        debug!("Created tracks: [{}]", ids.iter().join(", "));
        ids
    }

    /// Removes every track that has `updated == false`, returns them in collection order
    ///
    /// Survivors keep their relative order, so creation order stays the matching priority.
    ///
    pub fn evict_unmatched<N: ChangeNotifier>(
        &mut self,
        tracks: &mut Vec<ObjectTrack>,
        notifier: &mut N,
    ) -> Vec<ObjectTrack> {
        if tracks.iter().all(|t| t.updated) {
            return Vec::default();
        }

        let (alive, evicted): (Vec<_>, Vec<_>) = tracks.drain(..).partition(|t| t.updated);
        *tracks = alive;

        for t in &evicted {
            notifier.send(TrackEvent::Evicted(t.id));
        }
        debug!(
            "Evicted tracks: [{}]",
            evicted.iter().map(|t| t.id).join(", ")
        );
        evicted
    }

    /// Restarts the id sequence for a new session
    ///
    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}
