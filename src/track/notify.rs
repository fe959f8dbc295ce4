/// Track lifecycle change
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackEvent {
    Created(u64),
    Evicted(u64),
}

pub trait ChangeNotifier: Default + Clone + Send + Sync {
    fn send(&mut self, event: TrackEvent);
}

#[derive(Default, Clone, Debug)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn send(&mut self, _event: TrackEvent) {}
}

/// Keeps every event in arrival order until drained
///
#[derive(Default, Clone, Debug)]
pub struct CollectingNotifier {
    events: Vec<TrackEvent>,
}

impl CollectingNotifier {
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ChangeNotifier for CollectingNotifier {
    fn send(&mut self, event: TrackEvent) {
        self.events.push(event);
    }
}
