use cardscan::{CardDetector, ScanParams};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

fn synthetic_table(width: u32, height: u32, cols: u32, rows: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([30, 60, 40]));
    let cell_w = width / cols;
    let cell_h = height / rows;
    let card_w = cell_w * 7 / 10;
    let card_h = cell_h * 7 / 10;
    for r in 0..rows {
        for c in 0..cols {
            let x0 = c * cell_w + (cell_w - card_w) / 2;
            let y0 = r * cell_h + (cell_h - card_h) / 2;
            for y in y0..y0 + card_h {
                for x in x0..x0 + card_w {
                    img.put_pixel(x, y, Rgb([240, 238, 232]));
                }
            }
        }
    }
    img
}

fn bench_scan(c: &mut Criterion) {
    let photo = synthetic_table(720, 960, 3, 4);
    let detector = CardDetector::new(ScanParams {
        blur_radius: 4,
        ..ScanParams::default()
    });

    c.bench_function("cardscan_scan_720x960_12_cards", |b| {
        b.iter(|| {
            let result = detector.scan(black_box(&photo)).expect("scan");
            black_box(result.len());
        });
    });

    let default_detector = CardDetector::default();
    c.bench_function("cardscan_scan_720x960_default_blur", |b| {
        b.iter(|| {
            let result = default_detector.scan(black_box(&photo)).expect("scan");
            black_box(result.len());
        });
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
