use crate::Errors;
use anyhow::Result;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use log::warn;

/// Default learning rate of the running-average background model
pub const DEFAULT_LEARNING_RATE: f32 = 0.05;

/// Default absolute difference from the background that marks the pixel as the foreground
pub const DEFAULT_FOREGROUND_THRESHOLD: f32 = 25.0;

/// Background model: turns a frame into a binary foreground mask
///
/// Any background subtraction algorithm can be plugged into the pipeline through the trait.
///
pub trait BackgroundSubtractor: Send {
    /// Updates the model with the frame and returns the foreground mask of the same size
    ///
    fn apply(&mut self, frame: &GrayImage) -> Result<GrayImage>;

    /// Forgets the learned background
    ///
    fn reset(&mut self);
}

/// Exponential running-average background model
///
/// The first frame seeds the background and yields an empty mask.
///
#[derive(Debug, Clone)]
pub struct RunningAverage {
    background: Vec<f32>,
    dimensions: (u32, u32),
    learning_rate: f32,
    threshold: f32,
}

impl Default for RunningAverage {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_FOREGROUND_THRESHOLD)
    }
}

impl RunningAverage {
    /// Creates new model
    ///
    /// # Parameters
    /// * `learning_rate` - how fast the background absorbs the frame, `(0.0, 1.0]`
    /// * `threshold` - the pixel is the foreground when it differs from the background more than that
    ///
    pub fn new(learning_rate: f32, threshold: f32) -> Self {
        assert!(
            learning_rate > 0.0 && learning_rate <= 1.0,
            "Learning rate must lay within (0.0, 1.0]"
        );
        assert!(threshold >= 0.0, "Threshold must be non-negative");
        Self {
            background: Vec::default(),
            dimensions: (0, 0),
            learning_rate,
            threshold,
        }
    }

    fn seed(&mut self, frame: &GrayImage) {
        self.background = frame.as_raw().iter().map(|v| *v as f32).collect();
        self.dimensions = frame.dimensions();
    }
}

impl BackgroundSubtractor for RunningAverage {
    fn apply(&mut self, frame: &GrayImage) -> Result<GrayImage> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Errors::EmptyFrame.into());
        }

        if self.background.is_empty() || self.dimensions != frame.dimensions() {
            if !self.background.is_empty() {
                warn!(
                    "Frame size changed from {:?} to {:?}, the background is re-learned",
                    self.dimensions,
                    frame.dimensions()
                );
            }
            self.seed(frame);
            return Ok(GrayImage::new(width, height));
        }

        let mut mask = GrayImage::new(width, height);
        for ((bg, px), out) in self
            .background
            .iter_mut()
            .zip(frame.as_raw().iter())
            .zip(mask.iter_mut())
        {
            let value = *px as f32;
            if (value - *bg).abs() > self.threshold {
                *out = 255;
            }
            *bg += self.learning_rate * (value - *bg);
        }
        Ok(mask)
    }

    fn reset(&mut self) {
        self.background.clear();
        self.dimensions = (0, 0);
    }
}

/// Foreground stage: background model, static region mask and morphological clean-up
///
pub struct ForegroundSubtractor<B>
where
    B: BackgroundSubtractor,
{
    model: B,
    static_mask: Option<GrayImage>,
    filtering: bool,
}

impl<B> ForegroundSubtractor<B>
where
    B: BackgroundSubtractor,
{
    pub fn new(model: B) -> Self {
        Self {
            model,
            static_mask: None,
            filtering: true,
        }
    }

    /// Restricts the foreground to non-zero pixels of the mask for the whole session
    ///
    pub fn static_mask(mut self, mask: GrayImage) -> Self {
        self.static_mask = Some(mask);
        self
    }

    /// Enables erode-dilate-dilate clean-up of the mask (enabled by default)
    ///
    pub fn filtering(mut self, enabled: bool) -> Self {
        self.filtering = enabled;
        self
    }

    pub fn model(&self) -> &B {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut B {
        &mut self.model
    }

    /// Computes the foreground mask of the frame
    ///
    pub fn foreground(&mut self, frame: &GrayImage) -> Result<GrayImage> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(Errors::EmptyFrame.into());
        }

        let mut fg = self.model.apply(frame)?;
        if let Some(mask) = &self.static_mask {
            apply_static_mask(&mut fg, mask)?;
        }

        if self.filtering {
            fg = clean_up(&fg);
        }
        Ok(fg)
    }
}

/// Bitwise AND of the foreground with the static mask
///
pub fn apply_static_mask(foreground: &mut GrayImage, mask: &GrayImage) -> Result<()> {
    if foreground.dimensions() != mask.dimensions() {
        return Err(Errors::StaticMaskSizeMismatch {
            mask: mask.dimensions(),
            foreground: foreground.dimensions(),
        }
        .into());
    }

    for (f, m) in foreground.iter_mut().zip(mask.as_raw().iter()) {
        *f &= *m;
    }
    Ok(())
}

/// Removes speckles and closes small gaps: erode once, dilate twice with a 3x3 kernel
///
pub fn clean_up(foreground: &GrayImage) -> GrayImage {
    let eroded = erode(foreground, Norm::LInf, 1);
    let dilated = dilate(&eroded, Norm::LInf, 1);
    dilate(&dilated, Norm::LInf, 1)
}
