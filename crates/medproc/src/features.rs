use std::fmt;

use medproc_image::{map_buffer, Image, ImageError, PixelBuffer, Region};
use medproc_imgproc::{
    color::to_luma,
    contours::{arc_length, find_contours},
    crop::crop_region,
    texture::{texture_properties, TextureProperties},
    threshold::threshold_otsu,
};

/// A group of descriptors that can be requested from [`FeatureCalculator::extract`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Number of foreground pixels.
    Area,
    /// Arc length of the primary external contour.
    Perimeter,
    /// Mean luma of the foreground pixels.
    MeanIntensity,
    /// The five co-occurrence texture descriptors.
    Texture,
}

impl Feature {
    const fn bit(self) -> u8 {
        match self {
            Feature::Area => 1,
            Feature::Perimeter => 1 << 1,
            Feature::MeanIntensity => 1 << 2,
            Feature::Texture => 1 << 3,
        }
    }
}

/// A set of requested [`Feature`]s.
///
/// # Example
///
/// ```
/// use medproc::features::{Feature, FeatureRequest};
///
/// let request = FeatureRequest::none().with(Feature::Area);
/// assert!(request.contains(Feature::Area));
/// assert!(!request.contains(Feature::Texture));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeatureRequest(u8);

impl FeatureRequest {
    /// Request nothing.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Request every feature.
    pub const fn all() -> Self {
        Self::none()
            .with(Feature::Area)
            .with(Feature::Perimeter)
            .with(Feature::MeanIntensity)
            .with(Feature::Texture)
    }

    /// Add a feature to the request.
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.bit())
    }

    /// Whether the feature is requested.
    pub const fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }
}

/// Name of the foreground area entry.
pub const AREA: &str = "area";
/// Name of the perimeter entry.
pub const PERIMETER: &str = "perimeter";
/// Name of the mean intensity entry.
pub const MEAN_INTENSITY: &str = "mean_intensity";
/// Name of the texture contrast entry.
pub const CONTRAST: &str = "contrast";
/// Name of the texture dissimilarity entry.
pub const DISSIMILARITY: &str = "dissimilarity";
/// Name of the texture homogeneity entry.
pub const HOMOGENEITY: &str = "homogeneity";
/// Name of the texture energy entry.
pub const ENERGY: &str = "energy";
/// Name of the texture correlation entry.
pub const CORRELATION: &str = "correlation";

const TEXTURE_NAMES: [&str; 5] = [CONTRAST, DISSIMILARITY, HOMOGENEITY, ENERGY, CORRELATION];

/// The value of one feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureValue {
    /// A computed value.
    Value(f64),
    /// The feature was requested but no analyzer could compute it.
    Unavailable,
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Value(v) => write!(f, "{v:.2}"),
            FeatureValue::Unavailable => write!(f, "n/a"),
        }
    }
}

/// The features of a region, in extraction order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTable {
    entries: Vec<(&'static str, FeatureValue)>,
}

impl FeatureTable {
    fn push(&mut self, name: &'static str, value: FeatureValue) {
        self.entries.push((name, value));
    }

    /// The entry of a feature, if it was requested.
    pub fn value(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// The computed value of a feature, `None` if absent or unavailable.
    pub fn get(&self, name: &str) -> Option<f64> {
        match self.value(name)? {
            FeatureValue::Value(v) => Some(*v),
            FeatureValue::Unavailable => None,
        }
    }

    /// Iterate over the `(name, value)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FeatureTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// A provider of texture descriptors.
pub trait TextureAnalyzer {
    /// Whether the analyzer can compute descriptors.
    fn is_available(&self) -> bool {
        true
    }

    /// Compute the texture descriptors of a grayscale image.
    ///
    /// Returns `None` when the analyzer is unavailable.
    fn analyze(&self, src: &Image<u8, 1>) -> Option<TextureProperties>;
}

/// Texture descriptors from gray level co-occurrence matrices, see [`texture_properties`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GlcmTextureAnalyzer;

impl TextureAnalyzer for GlcmTextureAnalyzer {
    fn analyze(&self, src: &Image<u8, 1>) -> Option<TextureProperties> {
        Some(texture_properties(src))
    }
}

/// An analyzer standing for a missing texture capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTextureAnalyzer;

impl TextureAnalyzer for UnavailableTextureAnalyzer {
    fn is_available(&self) -> bool {
        false
    }

    fn analyze(&self, _src: &Image<u8, 1>) -> Option<TextureProperties> {
        None
    }
}

/// Copy a region of a buffer.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRegion`] if the region is empty or leaves the buffer.
pub fn select_region(src: &PixelBuffer, region: &Region) -> Result<PixelBuffer, ImageError> {
    Ok(map_buffer!(src, |img| crop_region(img, region)?))
}

/// Computes geometric, intensity and texture descriptors of a region.
///
/// The region is binarized with Otsu's method on its luma; the foreground is
/// the set of pixels above the threshold.
#[derive(Clone, Debug, Default)]
pub struct FeatureCalculator<A = GlcmTextureAnalyzer> {
    texture: A,
}

impl FeatureCalculator<GlcmTextureAnalyzer> {
    /// Create a calculator with the co-occurrence texture analyzer.
    pub fn new() -> Self {
        Self {
            texture: GlcmTextureAnalyzer,
        }
    }
}

impl<A: TextureAnalyzer> FeatureCalculator<A> {
    /// Create a calculator with a custom texture analyzer.
    pub fn with_texture_analyzer(texture: A) -> Self {
        Self { texture }
    }

    /// Extract the requested features of a buffer.
    ///
    /// Unrequested features are absent from the table. An empty foreground
    /// gives an area, a perimeter and a mean intensity of 0. Texture entries
    /// are [`FeatureValue::Unavailable`] when the analyzer is unavailable.
    ///
    /// # Arguments
    ///
    /// * `src` - The buffer of the region.
    /// * `request` - The features to compute.
    pub fn extract(
        &self,
        src: &PixelBuffer,
        request: FeatureRequest,
    ) -> Result<FeatureTable, ImageError> {
        let luma = to_luma(src)?;
        let mut mask = Image::from_size_val(luma.size(), 0u8)?;
        let threshold = threshold_otsu(&luma, &mut mask, 255)?;
        log::debug!("feature extraction on {} region, otsu threshold {threshold}", luma.size());

        let mut table = FeatureTable::default();

        if request.contains(Feature::Area) {
            let area = mask.as_slice().iter().filter(|&&m| m > 0).count();
            table.push(AREA, FeatureValue::Value(area as f64));
        }

        if request.contains(Feature::Perimeter) {
            // the primary contour is the last outer border in raster order
            let perimeter = find_contours(&mask)
                .iter()
                .rev()
                .find(|c| c.is_external())
                .map_or(0.0, |c| arc_length(&c.points));
            table.push(PERIMETER, FeatureValue::Value(perimeter));
        }

        if request.contains(Feature::MeanIntensity) {
            let (sum, count) = luma
                .as_slice()
                .iter()
                .zip(mask.as_slice())
                .filter(|(_, &m)| m > 0)
                .fold((0u64, 0u64), |(sum, count), (&v, _)| (sum + v as u64, count + 1));
            let mean = if count == 0 {
                0.0
            } else {
                sum as f64 / count as f64
            };
            table.push(MEAN_INTENSITY, FeatureValue::Value(mean));
        }

        if request.contains(Feature::Texture) {
            let props = if self.texture.is_available() {
                self.texture.analyze(&luma)
            } else {
                None
            };

            match props {
                Some(p) => {
                    let values = [
                        p.contrast,
                        p.dissimilarity,
                        p.homogeneity,
                        p.energy,
                        p.correlation,
                    ];
                    for (name, v) in TEXTURE_NAMES.into_iter().zip(values) {
                        table.push(name, FeatureValue::Value(v));
                    }
                }
                None => {
                    log::warn!("texture analysis requested but unavailable");
                    for name in TEXTURE_NAMES {
                        table.push(name, FeatureValue::Unavailable);
                    }
                }
            }
        }

        Ok(table)
    }

    /// Copy a region of `src` and extract its features.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidRegion`] if the region is empty or leaves the buffer.
    pub fn extract_region(
        &self,
        src: &PixelBuffer,
        region: &Region,
        request: FeatureRequest,
    ) -> Result<FeatureTable, ImageError> {
        let selected = select_region(src, region)?;
        self.extract(&selected, request)
    }
}
