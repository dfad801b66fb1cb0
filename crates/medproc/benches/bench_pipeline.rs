use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use medproc::image::{PixelBuffer, Region};
use medproc::{
    EnhancementMode, FeatureCalculator, FeatureRequest, FilterMode, MorphologyMode, Pipeline,
    PipelineParameters, SegmentationMode,
};

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");

    let presets = [
        ("identity", PipelineParameters::identity()),
        (
            "photometric",
            PipelineParameters {
                brightness: 20,
                contrast: 30,
                gamma: 150,
                ..Default::default()
            },
        ),
        (
            "otsu_close_clahe",
            PipelineParameters {
                filter: FilterMode::Gaussian,
                filter_kernel: 5,
                segmentation: SegmentationMode::Otsu,
                morphology: MorphologyMode::Close,
                enhancement: EnhancementMode::Clahe,
                ..Default::default()
            },
        ),
        (
            "watershed",
            PipelineParameters {
                segmentation: SegmentationMode::Watershed,
                ..Default::default()
            },
        ),
    ];

    for (width, height) in [(256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let data = (0..width * height * 3)
            .map(|i| ((i / 3 % width) ^ (i / 3 / width)) as u8)
            .collect();
        let buffer = PixelBuffer::new(*width, *height, 3, data).unwrap();

        for (name, params) in presets.iter() {
            let pipeline = Pipeline::new(*params).unwrap();
            group.bench_with_input(
                BenchmarkId::new(*name, format!("{}x{}", width, height)),
                &buffer,
                |b, src| b.iter(|| black_box(pipeline.apply(src))),
            );
        }

        let calculator = FeatureCalculator::new();
        let region = Region::new(0, 0, (*width / 2) as i64, (*height / 2) as i64);
        group.bench_with_input(
            BenchmarkId::new("features", format!("{}x{}", width, height)),
            &buffer,
            |b, src| {
                b.iter(|| black_box(calculator.extract_region(src, &region, FeatureRequest::all())))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
