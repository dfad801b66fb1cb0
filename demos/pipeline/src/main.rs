use argh::FromArgs;
use std::path::PathBuf;

use medproc::image::{PixelBuffer, Region};
use medproc::imgproc::histogram::channel_histograms;
use medproc::{FeatureRequest, ImageSession, PipelineParameters};

#[derive(FromArgs)]
/// Run the processing pipeline on a synthetic scan and print the region features
struct Args {
    /// path to a json file with the pipeline parameters
    #[argh(option, short = 'p')]
    params_path: Option<PathBuf>,

    /// width of the synthetic image
    #[argh(option, default = "128")]
    width: usize,

    /// height of the synthetic image
    #[argh(option, default = "96")]
    height: usize,

    /// use a three channel image
    #[argh(switch)]
    rgb: bool,
}

/// A dark background with two bright blobs and a smooth intensity ramp.
fn synthetic_scan(
    width: usize,
    height: usize,
    channels: usize,
) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    let blobs = [
        (width as f32 * 0.3, height as f32 * 0.5, height as f32 * 0.2),
        (width as f32 * 0.7, height as f32 * 0.4, height as f32 * 0.15),
    ];

    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            let inside = blobs.iter().any(|&(cx, cy, r)| {
                let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                dx * dx + dy * dy <= r * r
            });
            let base = (x * 40 / width) as u8;
            let value = if inside { 180 + base } else { 20 + base };
            match channels {
                1 => data.push(value),
                _ => data.extend_from_slice(&[value, value.saturating_sub(10), value / 2]),
            }
        }
    }

    Ok(PixelBuffer::new(width, height, channels, data)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // read the parameters, unspecified fields keep their default value
    let params: PipelineParameters = match &args.params_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PipelineParameters::default(),
    };
    log::info!("pipeline parameters: {params:?}");

    let channels = if args.rgb { 3 } else { 1 };
    let mut session = ImageSession::load(synthetic_scan(args.width, args.height, channels)?);

    let processed = session.apply(&params)?;
    for (ch, hist) in channel_histograms(processed)?.iter().enumerate() {
        let (peak, count) = hist
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .unwrap_or((0, &0));
        println!("channel {ch}: histogram peak at {peak} ({count} pixels)");
    }

    // the left half of the image holds the first blob
    let region = Region::new(0, 0, (args.width / 2) as i64, args.height as i64);
    let features = session.extract_features(&region, FeatureRequest::all())?;
    print!("{features}");

    Ok(())
}
