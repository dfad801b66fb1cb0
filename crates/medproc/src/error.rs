use medproc_image::ImageError;

/// An error type for the pipeline and the feature extraction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Error raised by a pixel operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when a parameter is outside of its accepted range.
    #[error("Parameter {name} = {value} is outside of [{min}, {max}]")]
    ParameterOutOfRange {
        /// The name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: i64,
        /// The smallest accepted value.
        min: i64,
        /// The largest accepted value.
        max: i64,
    },
}
