#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use medproc_image as image;

#[doc(inline)]
pub use medproc_imgproc as imgproc;

/// pipeline error types.
pub mod error;

/// region feature extraction.
pub mod features;

/// pipeline parameters and stage modes.
pub mod params;

/// the processing pipeline.
pub mod pipeline;

/// original and processed buffers of a loaded image.
pub mod session;

/// the five pipeline stages.
pub mod stages;

pub use crate::error::PipelineError;
pub use crate::features::{
    Feature, FeatureCalculator, FeatureRequest, FeatureTable, FeatureValue, GlcmTextureAnalyzer,
    TextureAnalyzer, UnavailableTextureAnalyzer,
};
pub use crate::params::{
    EnhancementMode, FilterMode, MorphologyMode, PipelineParameters, SegmentationMode,
};
pub use crate::pipeline::Pipeline;
pub use crate::session::ImageSession;
