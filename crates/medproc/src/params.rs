use crate::error::PipelineError;

/// Smoothing, sharpening or edge detection applied by the filter stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FilterMode {
    /// Leave the buffer unchanged.
    #[default]
    None,
    /// Separable gaussian blur.
    Gaussian,
    /// Median blur.
    Median,
    /// Edge preserving bilateral filter.
    Bilateral,
    /// Fixed 3x3 sharpening kernel.
    Sharpen,
    /// Canny edge map of the luma.
    Edge,
}

/// Binarization applied by the segmentation stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SegmentationMode {
    /// Leave the buffer unchanged.
    #[default]
    None,
    /// Global threshold at the segmentation threshold.
    Threshold,
    /// Threshold against the local mean.
    AdaptiveThreshold,
    /// Global threshold chosen with Otsu's method.
    Otsu,
    /// Marker based watershed, boundaries are painted on the buffer.
    Watershed,
}

/// Morphological operation applied by the morphology stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MorphologyMode {
    /// Leave the buffer unchanged.
    #[default]
    None,
    /// Erosion.
    Erode,
    /// Dilation.
    Dilate,
    /// Erosion followed by dilation.
    Open,
    /// Dilation followed by erosion.
    Close,
}

/// Contrast enhancement applied by the last stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EnhancementMode {
    /// Leave the buffer unchanged.
    #[default]
    None,
    /// Global histogram equalization.
    HistEqualize,
    /// Contrast limited adaptive histogram equalization.
    Clahe,
    /// Per channel linear stretch to the full range.
    ContrastStretch,
    /// Unsharp masking.
    Sharpen,
}

/// The settings of every pipeline stage.
///
/// Numeric fields hold the raw slider values; the derived factors are given by
/// [`PipelineParameters::contrast_scale`] and [`PipelineParameters::gamma_value`].
/// The default value leaves every buffer unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PipelineParameters {
    /// Offset added to every sample, in `[-100, 100]`.
    pub brightness: i32,
    /// Contrast slider in `[-100, 100]`, scale `contrast / 100 + 1`.
    pub contrast: i32,
    /// Gamma slider in `[1, 500]`, gamma `gamma / 100`.
    pub gamma: i32,
    /// The filter stage mode.
    pub filter: FilterMode,
    /// The filter kernel size in `[1, 15]`, even sizes are bumped to the next odd one.
    pub filter_kernel: i32,
    /// The segmentation stage mode.
    pub segmentation: SegmentationMode,
    /// The segmentation threshold in `[0, 255]`.
    pub seg_threshold: i32,
    /// The morphology stage mode.
    pub morphology: MorphologyMode,
    /// The structuring element size in `[1, 15]`, even sizes are bumped to the next odd one.
    pub morph_kernel: i32,
    /// The enhancement stage mode.
    pub enhancement: EnhancementMode,
}

impl Default for PipelineParameters {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
            gamma: 100,
            filter: FilterMode::None,
            filter_kernel: 3,
            segmentation: SegmentationMode::None,
            seg_threshold: 127,
            morphology: MorphologyMode::None,
            morph_kernel: 3,
            enhancement: EnhancementMode::None,
        }
    }
}

fn check_range(name: &'static str, value: i32, min: i32, max: i32) -> Result<(), PipelineError> {
    if value < min || value > max {
        return Err(PipelineError::ParameterOutOfRange {
            name,
            value: value as i64,
            min: min as i64,
            max: max as i64,
        });
    }
    Ok(())
}

impl PipelineParameters {
    /// The parameters of a pipeline that returns its input unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Check every slider value against its range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ParameterOutOfRange`] for the first value outside its range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check_range("brightness", self.brightness, -100, 100)?;
        check_range("contrast", self.contrast, -100, 100)?;
        check_range("gamma", self.gamma, 1, 500)?;
        check_range("filter_kernel", self.filter_kernel, 1, 15)?;
        check_range("seg_threshold", self.seg_threshold, 0, 255)?;
        check_range("morph_kernel", self.morph_kernel, 1, 15)?;
        Ok(())
    }

    /// The contrast scale, in `[0, 2]`.
    pub fn contrast_scale(&self) -> f32 {
        self.contrast as f32 / 100.0 + 1.0
    }

    /// The gamma exponent, in `[0.01, 5]`.
    pub fn gamma_value(&self) -> f32 {
        self.gamma as f32 / 100.0
    }
}
