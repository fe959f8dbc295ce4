/// Bounding boxes
pub mod bbox;

/// Display colors assigned to tracks
pub mod color;
