use medproc_image::PixelBuffer;

use crate::error::PipelineError;
use crate::params::PipelineParameters;
use crate::stages;

/// The fixed sequence of processing stages.
///
/// The stages always run in the order photometric adjustment, spatial filter,
/// segmentation, morphology and enhancement. A stage whose mode is `None`
/// returns its input unchanged.
///
/// # Example
///
/// ```
/// use medproc::{Pipeline, PipelineParameters};
/// use medproc::image::PixelBuffer;
///
/// let buffer = PixelBuffer::new(2, 2, 1, vec![0, 64, 128, 255]).unwrap();
/// let params = PipelineParameters {
///     brightness: 10,
///     ..Default::default()
/// };
///
/// let pipeline = Pipeline::new(params).unwrap();
/// let processed = pipeline.apply(&buffer).unwrap();
/// assert_eq!(processed.as_slice(), &[10, 74, 138, 255]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Pipeline {
    params: PipelineParameters,
}

impl Pipeline {
    /// Create a pipeline from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ParameterOutOfRange`] if a parameter is outside its range.
    pub fn new(params: PipelineParameters) -> Result<Self, PipelineError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters of the pipeline.
    pub fn params(&self) -> &PipelineParameters {
        &self.params
    }

    /// Run every stage on a copy of `original`.
    ///
    /// The output has the size and the channel count of `original`, which is
    /// never modified.
    ///
    /// # Errors
    ///
    /// The first stage error aborts the run.
    pub fn apply(&self, original: &PixelBuffer) -> Result<PixelBuffer, PipelineError> {
        let p = &self.params;
        log::debug!(
            "applying pipeline on {} buffer with {} channels",
            original.size(),
            original.channels()
        );

        let buffer = stages::adjust_photometric(
            original,
            p.brightness,
            p.contrast_scale(),
            p.gamma_value(),
        )?;
        let buffer = stages::apply_filter(&buffer, p.filter, p.filter_kernel as usize)?;
        let buffer = stages::segment(&buffer, p.segmentation, p.seg_threshold as u8)?;
        let buffer = stages::apply_morphology(&buffer, p.morphology, p.morph_kernel as usize)?;
        let buffer = stages::enhance(&buffer, p.enhancement)?;

        Ok(buffer)
    }
}
