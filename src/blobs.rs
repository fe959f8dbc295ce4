use crate::utils::bbox::BoundingBox;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use itertools::Itertools;
use log::trace;

/// Minimal width and height a blob must have to be passed to the tracker
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinBlobSize {
    pub width: i32,
    pub height: i32,
}

/// Default minimal blob size, 3x3 pixels
pub const DEFAULT_MIN_BLOB_SIZE: MinBlobSize = MinBlobSize {
    width: 3,
    height: 3,
};

impl Default for MinBlobSize {
    fn default() -> Self {
        DEFAULT_MIN_BLOB_SIZE
    }
}

impl MinBlobSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The blob is dropped when either of its dimensions is strictly less than the minimum
    ///
    pub fn admits(&self, bbox: &BoundingBox) -> bool {
        bbox.width() >= self.width && bbox.height() >= self.height
    }
}

/// Turns a binary foreground mask into the blobs of the current frame
///
#[derive(Clone, Copy, Debug, Default)]
pub struct BlobExtractor {
    min_size: MinBlobSize,
}

impl BlobExtractor {
    pub fn new(min_size: MinBlobSize) -> Self {
        Self { min_size }
    }

    pub fn min_size(&self) -> MinBlobSize {
        self.min_size
    }

    /// Finds outer contours of the mask and returns their bounding boxes
    ///
    /// Non-zero pixels are the foreground. Contours nested inside other contours are not reported.
    /// The order of the blobs follows the contour scan order and carries no meaning.
    ///
    /// # Parameters
    /// * `mask` - binary single-channel mask
    ///
    pub fn extract(&self, mask: &GrayImage) -> Vec<BoundingBox> {
        if mask.width() == 0 || mask.height() == 0 {
            return Vec::default();
        }

        // contour following starts outer borders only after a background pixel on the left
        let contours = find_contours::<i32>(&padded(mask));
        let candidates = contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(contour_bbox)
            .collect::<Vec<_>>();

        let candidates_num = candidates.len();
        let blobs = candidates
            .into_iter()
            .filter(|b| self.min_size.admits(b))
            .collect::<Vec<_>>();

        trace!(
            "Contours: {}, outer: {}, blobs kept: {}",
            contours.len(),
            candidates_num,
            blobs.len()
        );

        blobs
    }
}

/// Extracts blobs with the specified minimal size
///
pub fn extract_blobs(mask: &GrayImage, min_size: MinBlobSize) -> Vec<BoundingBox> {
    BlobExtractor::new(min_size).extract(mask)
}

/// Copy of the mask framed with one background pixel on every side
///
fn padded(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::from_fn(width + 2, height + 2, |x, y| {
        if x == 0 || y == 0 || x > width || y > height {
            Luma([0])
        } else {
            *mask.get_pixel(x - 1, y - 1)
        }
    })
}

/// Bounding box of the contour traced on the padded mask, in the mask coordinates
///
fn contour_bbox(contour: &Contour<i32>) -> Option<BoundingBox> {
    let (left, right) = contour.points.iter().map(|p| p.x).minmax().into_option()?;
    let (top, bottom) = contour.points.iter().map(|p| p.y).minmax().into_option()?;

    // pixel coordinates are inclusive on both ends
    Some(BoundingBox::new(left - 1, top - 1, right - left + 1, bottom - top + 1))
}
