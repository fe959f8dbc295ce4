/// Greedy nearest-blob association
pub mod association;

/// Multi-scene batch processing
pub mod batch;

/// Per-frame tracking driver
pub mod engine;

/// Track creation and eviction
pub mod lifecycle;

/// Tracker configuration
pub mod options;
