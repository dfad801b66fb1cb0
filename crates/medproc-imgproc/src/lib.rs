#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// brightness, contrast and gamma adjustments.
pub mod adjust;

/// border handling of spatial operations.
pub mod border;

/// contrast limited adaptive histogram equalization.
pub mod clahe;

/// color transformations module.
pub mod color;

/// connected components labelling.
pub mod connected_components;

/// border following of binary regions.
pub mod contours;

/// image cropping module.
pub mod crop;

/// euclidean distance transform.
pub mod distance_transform;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// row iteration utilities.
pub mod iter;

/// morphological operations.
pub mod morphology;

/// gray level co-occurrence texture descriptors.
pub mod texture;

/// operations to threshold images.
pub mod threshold;

/// disjoint set forest.
pub mod union_find;

/// marker based watershed segmentation.
pub mod watershed;
