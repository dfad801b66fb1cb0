//! Session lifecycle and region feature extraction.

use approx::assert_relative_eq;
use medproc::features::{AREA, CONTRAST, CORRELATION, MEAN_INTENSITY, PERIMETER};
use medproc::image::{PixelBuffer, Region};
use medproc::{
    Feature, FeatureCalculator, FeatureRequest, FeatureValue, FilterMode, ImageSession,
    MorphologyMode, PipelineError, PipelineParameters, UnavailableTextureAnalyzer,
};

/// A 20x20 gray buffer, white on its bottom right quadrant and black elsewhere.
fn quadrant() -> Result<PixelBuffer, PipelineError> {
    let data = (0..400)
        .map(|i| if i % 20 >= 10 && i / 20 >= 10 { 255 } else { 0 })
        .collect();
    Ok(PixelBuffer::new(20, 20, 1, data)?)
}

#[test]
fn reset_restores_the_original() -> Result<(), PipelineError> {
    let data = (0..30 * 20 * 3).map(|i| (i * 13 % 251) as u8).collect();
    let original = PixelBuffer::new(30, 20, 3, data)?;
    let mut session = ImageSession::load(original.clone());
    assert_eq!(session.processed(), &original);

    session.apply(&PipelineParameters {
        contrast: 40,
        filter: FilterMode::Bilateral,
        morphology: MorphologyMode::Open,
        ..Default::default()
    })?;
    assert_ne!(session.processed(), &original);

    session.reset();
    assert_eq!(session.processed().as_slice(), original.as_slice());
    assert_eq!(session.original(), &original);
    Ok(())
}

#[test]
fn apply_always_starts_from_the_original() -> Result<(), PipelineError> {
    let mut session = ImageSession::load(PixelBuffer::new(2, 2, 1, vec![10, 20, 30, 40])?);
    let params = PipelineParameters {
        brightness: 10,
        ..Default::default()
    };
    session.apply(&params)?;
    session.apply(&params)?;
    assert_eq!(session.processed().as_slice(), &[20, 30, 40, 50]);
    Ok(())
}

#[test]
fn area_of_full_and_empty_regions() -> Result<(), PipelineError> {
    let session = ImageSession::load(quadrant()?);

    let full = session.extract_features(&Region::new(10, 10, 10, 10), FeatureRequest::all())?;
    assert_eq!(full.get(AREA), Some(100.0));
    assert_relative_eq!(full.get(PERIMETER).unwrap_or(-1.0), 36.0);
    assert_relative_eq!(full.get(MEAN_INTENSITY).unwrap_or(-1.0), 255.0);
    assert_relative_eq!(full.get(CONTRAST).unwrap_or(-1.0), 0.0);
    assert_relative_eq!(full.get(CORRELATION).unwrap_or(-1.0), 1.0);

    let empty = session.extract_features(&Region::new(0, 0, 10, 10), FeatureRequest::all())?;
    assert_eq!(empty.get(AREA), Some(0.0));
    assert_eq!(empty.get(PERIMETER), Some(0.0));
    assert_eq!(empty.get(MEAN_INTENSITY), Some(0.0));
    Ok(())
}

#[test]
fn region_straddling_the_quadrant() -> Result<(), PipelineError> {
    let session = ImageSession::load(quadrant()?);
    let request = FeatureRequest::none()
        .with(Feature::Area)
        .with(Feature::Perimeter);
    let table = session.extract_features(&Region::new(5, 5, 10, 10), request)?;

    // the white 5x5 corner of the region
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(AREA), Some(25.0));
    assert_relative_eq!(table.get(PERIMETER).unwrap_or(-1.0), 16.0);
    Ok(())
}

#[test]
fn invalid_regions_are_rejected() -> Result<(), PipelineError> {
    let session = ImageSession::load(quadrant()?);
    for region in [
        Region::new(0, 0, 0, 5),
        Region::new(0, 0, 5, -1),
        Region::new(15, 0, 6, 5),
        Region::new(0, -2, 5, 5),
    ] {
        assert!(session.select_region(&region).is_err(), "{region:?}");
        assert!(session
            .extract_features(&region, FeatureRequest::all())
            .is_err());
    }
    Ok(())
}

#[test]
fn texture_without_analyzer() -> Result<(), PipelineError> {
    let calculator = FeatureCalculator::with_texture_analyzer(UnavailableTextureAnalyzer);
    let table = calculator.extract(&quadrant()?, FeatureRequest::all())?;

    assert_eq!(table.len(), 8);
    assert_eq!(table.get(AREA), Some(100.0));
    let unavailable = table
        .iter()
        .filter(|(_, v)| **v == FeatureValue::Unavailable)
        .count();
    assert_eq!(unavailable, 5);
    Ok(())
}

#[test]
fn rgb_regions_use_the_luma() -> Result<(), PipelineError> {
    // pure green has a luma of 150
    let data = [0u8, 255, 0].repeat(16);
    let buffer = PixelBuffer::new(4, 4, 3, data)?;
    let table = FeatureCalculator::new().extract(&buffer, FeatureRequest::all())?;
    assert_eq!(table.get(AREA), Some(16.0));
    assert_relative_eq!(table.get(MEAN_INTENSITY).unwrap_or(-1.0), 150.0);
    Ok(())
}
