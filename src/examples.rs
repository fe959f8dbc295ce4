use crate::utils::bbox::BoundingBox;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rectangle moving with a random drift
///
pub struct BlobGen {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    gen: StdRng,
    dist_pos_x: Uniform<f32>,
    dist_pos_y: Uniform<f32>,
    dist_box: Uniform<f32>,
}

impl BlobGen {
    pub fn new(x: f32, y: f32, width: f32, height: f32, pos_drift: f32, box_drift: f32) -> Self {
        Self::new_directional(
            x,
            y,
            width,
            height,
            (-pos_drift, pos_drift),
            (-pos_drift, pos_drift),
            box_drift,
        )
    }

    /// The rectangle moves in one direction, the speed changes randomly within the ranges
    ///
    pub fn new_directional(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        speed_x: (f32, f32),
        speed_y: (f32, f32),
        box_drift: f32,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            gen: StdRng::from_entropy(),
            dist_pos_x: Uniform::new_inclusive(speed_x.0, speed_x.1),
            dist_pos_y: Uniform::new_inclusive(speed_y.0, speed_y.1),
            dist_box: Uniform::new_inclusive(-box_drift, box_drift),
        }
    }

    /// Makes the movement reproducible
    ///
    pub fn seed(mut self, seed: u64) -> Self {
        self.gen = StdRng::seed_from_u64(seed);
        self
    }
}

impl Iterator for BlobGen {
    type Item = BoundingBox;

    fn next(&mut self) -> Option<Self::Item> {
        self.x += self.gen.sample(self.dist_pos_x);
        self.y += self.gen.sample(self.dist_pos_y);

        self.width += self.gen.sample(self.dist_box);
        self.height += self.gen.sample(self.dist_box);

        if self.width < 1.0 {
            self.width = 1.0;
        }
        if self.height < 1.0 {
            self.height = 1.0;
        }

        Some(BoundingBox::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        ))
    }
}

/// Binary masks with the moving rectangles drawn, paired with the drawn rectangles
///
pub struct MaskGen {
    width: u32,
    height: u32,
    blobs: Vec<BlobGen>,
}

impl MaskGen {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blobs: Vec::default(),
        }
    }

    pub fn blob(mut self, blob: BlobGen) -> Self {
        self.blobs.push(blob);
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Iterator for MaskGen {
    type Item = (GrayImage, Vec<BoundingBox>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut mask = GrayImage::new(self.width, self.height);
        let rects = self
            .blobs
            .iter_mut()
            .filter_map(|g| g.next())
            .collect::<Vec<_>>();
        for r in rects.iter().filter_map(|r| r.as_rect()) {
            draw_filled_rect_mut(&mut mask, r, Luma([255u8]));
        }
        Some((mask, rects))
    }
}

#[cfg(test)]
mod tests {
    use crate::blobs::{extract_blobs, MinBlobSize};
    use crate::examples::{BlobGen, MaskGen};

    #[test]
    fn seeded_generators_repeat() {
        let a = BlobGen::new(50.0, 50.0, 10.0, 10.0, 2.0, 0.5).seed(3);
        let b = BlobGen::new(50.0, 50.0, 10.0, 10.0, 2.0, 0.5).seed(3);
        assert_eq!(a.take(10).collect::<Vec<_>>(), b.take(10).collect::<Vec<_>>());
    }

    #[test]
    fn masks_contain_drawn_rects() {
        let left = BlobGen::new_directional(10.0, 10.0, 12.0, 12.0, (1.0, 2.0), (0.0, 0.0), 0.0);
        let right = BlobGen::new_directional(150.0, 60.0, 8.0, 8.0, (-2.0, -1.0), (0.0, 0.0), 0.0);
        let mut masks = MaskGen::new(200, 100)
            .blob(left.seed(1))
            .blob(right.seed(2));
        assert_eq!(masks.dimensions(), (200, 100));

        for _ in 0..10 {
            let (mask, rects) = masks.next().unwrap();
            let mut blobs = extract_blobs(&mask, MinBlobSize::new(1, 1));
            blobs.sort_by_key(|b| b.x());
            assert_eq!(blobs, rects);
        }
    }
}
