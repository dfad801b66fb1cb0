use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use medproc_image::Image;
use medproc_imgproc::filter::{bilateral_filter, gaussian_blur, median_blur, sharpen};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filters");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        let image_size = [*width, *height].into();
        let image_data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        let image = Image::<u8, 3>::new(image_size, image_data).unwrap();
        let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

        for kernel_size in [3, 5, 7, 11].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(gaussian_blur(src, &mut dst, *kernel_size)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("median_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(median_blur(src, &mut dst, *kernel_size)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("bilateral_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(bilateral_filter(src, &mut dst, *kernel_size, 75.0, 75.0)))
                },
            );
        }

        group.bench_with_input(
            BenchmarkId::new("sharpen", format!("{}x{}", width, height)),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(sharpen(src, &mut dst)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
