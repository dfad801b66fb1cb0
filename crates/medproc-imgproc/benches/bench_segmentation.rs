use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use medproc_image::Image;
use medproc_imgproc::{
    clahe::clahe, distance_transform::distance_transform, texture::texture_properties,
    threshold::{adaptive_threshold_mean, threshold_otsu},
    watershed::watershed,
};

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Segmentation");

    for (width, height) in [(256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image_data = (0..width * height)
            .map(|i| (((i % width) ^ (i / width)) % 256) as u8)
            .collect();
        let image = Image::<u8, 1>::new(image_size, image_data).unwrap();
        let output = Image::<u8, 1>::from_size_val(image_size, 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("threshold_otsu", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(threshold_otsu(src, &mut dst, 255)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("adaptive_threshold_mean", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(adaptive_threshold_mean(src, &mut dst, 255, 11, 2)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("clahe", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(clahe(src, &mut dst, 2.0, 8, 8)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("distance_transform", &parameter_string),
            &image,
            |b, src| {
                let mut dst = Image::<f32, 1>::from_size_val(image_size, 0.0).unwrap();
                b.iter(|| black_box(distance_transform(src, &mut dst)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("watershed", &parameter_string),
            &image,
            |b, src| {
                let mut seeds = Image::<i32, 1>::from_size_val(image_size, 0).unwrap();
                seeds.set_pixel(width / 4, height / 2, 0, 1).unwrap();
                seeds.set_pixel(3 * width / 4, height / 2, 0, 2).unwrap();
                b.iter(|| {
                    let mut markers = seeds.clone();
                    black_box(watershed(src, &mut markers))
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("texture_properties", &parameter_string),
            &image,
            |b, src| b.iter(|| black_box(texture_properties(src))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation);
criterion_main!(benches);
