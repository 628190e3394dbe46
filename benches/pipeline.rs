//! Benchmarks of the shape pipeline stages.

#![feature(test)]
extern crate test;
use test::Bencher;

use regula::{
    approximate, classify, convex_hull, process, Circle, ClassifyOptions, Ellipse, Point,
    Polyline, ShapeOptions,
};

fn wobbly_circle(n: usize) -> Polyline {
    let pts: Vec<Point> = Circle::new((250.0, 250.0), 120.0)
        .sample(n)
        .into_iter()
        .enumerate()
        .map(|(i, p)| p + regula::Vec2::new((i as f64 * 0.7).sin(), (i as f64 * 1.3).cos()))
        .collect();
    Polyline::closed(pts)
}

#[bench]
fn bench_approximate_circle(b: &mut Bencher) {
    let pl = wobbly_circle(1000);
    b.iter(|| approximate(test::black_box(&pl), 0.02));
}

#[bench]
fn bench_classify_circle(b: &mut Bencher) {
    let pl = wobbly_circle(1000);
    let approx = approximate(&pl, 0.02).unwrap();
    let options = ClassifyOptions::default();
    b.iter(|| classify(test::black_box(&pl), &approx, &options));
}

#[bench]
fn bench_fit_ellipse(b: &mut Bencher) {
    let pts = Ellipse::new((0.0, 0.0), (90.0, 40.0), 0.3).sample(500);
    b.iter(|| Ellipse::fit(test::black_box(&pts)));
}

#[bench]
fn bench_convex_hull(b: &mut Bencher) {
    let pts = wobbly_circle(1000);
    b.iter(|| convex_hull(test::black_box(pts.points())));
}

#[bench]
fn bench_process_circle(b: &mut Bencher) {
    let pl = wobbly_circle(1000);
    let options = ShapeOptions::default();
    b.iter(|| process(test::black_box(&pl), &options));
}
