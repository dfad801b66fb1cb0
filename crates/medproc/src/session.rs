use medproc_image::{PixelBuffer, Region};

use crate::error::PipelineError;
use crate::features::{select_region, FeatureCalculator, FeatureRequest, FeatureTable};
use crate::params::PipelineParameters;
use crate::pipeline::Pipeline;

/// The state of one loaded image: the original buffer and its processed copy.
///
/// The original is immutable until the next load. The processed buffer starts
/// as a copy of the original and is replaced in full by [`ImageSession::apply`]
/// and [`ImageSession::reset`].
///
/// # Example
///
/// ```
/// use medproc::{ImageSession, PipelineParameters};
/// use medproc::image::{PixelBuffer, Region};
///
/// let buffer = PixelBuffer::new(4, 4, 1, vec![100; 16]).unwrap();
/// let mut session = ImageSession::load(buffer);
///
/// let params = PipelineParameters {
///     brightness: 50,
///     ..Default::default()
/// };
/// session.apply(&params).unwrap();
/// assert_eq!(session.processed().as_slice(), &[150; 16]);
///
/// let region = session.select_region(&Region::new(0, 0, 2, 2)).unwrap();
/// assert_eq!(region.as_slice(), &[150; 4]);
///
/// session.reset();
/// assert_eq!(session.processed(), session.original());
/// ```
#[derive(Clone, Debug)]
pub struct ImageSession {
    original: PixelBuffer,
    processed: PixelBuffer,
    features: FeatureCalculator,
}

impl ImageSession {
    /// Start a session on a freshly loaded buffer.
    pub fn load(buffer: PixelBuffer) -> Self {
        log::debug!(
            "loaded {} buffer with {} channels",
            buffer.size(),
            buffer.channels()
        );
        Self {
            processed: buffer.clone(),
            original: buffer,
            features: FeatureCalculator::new(),
        }
    }

    /// The buffer as it was loaded.
    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// The result of the last processing run, or a copy of the original.
    pub fn processed(&self) -> &PixelBuffer {
        &self.processed
    }

    /// Run the pipeline on the original and store the result.
    ///
    /// On error the processed buffer is left untouched.
    pub fn apply(&mut self, params: &PipelineParameters) -> Result<&PixelBuffer, PipelineError> {
        let pipeline = Pipeline::new(*params)?;
        self.processed = pipeline.apply(&self.original)?;
        Ok(&self.processed)
    }

    /// Discard the processing and restore a copy of the original.
    pub fn reset(&mut self) {
        self.processed = self.original.clone();
    }

    /// Copy a region of the processed buffer.
    pub fn select_region(&self, region: &Region) -> Result<PixelBuffer, PipelineError> {
        Ok(select_region(&self.processed, region)?)
    }

    /// Extract the requested features of a region of the processed buffer.
    pub fn extract_features(
        &self,
        region: &Region,
        request: FeatureRequest,
    ) -> Result<FeatureTable, PipelineError> {
        Ok(self
            .features
            .extract_region(&self.processed, region, request)?)
    }
}
