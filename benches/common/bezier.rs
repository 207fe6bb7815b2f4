use crate::common::samples::CURVES;
use criterion::{black_box, Criterion};
use navpath::bezier::arc_length_between;

pub fn eval(c: &mut Criterion) {
    c.bench_function("eval", |b| {
        for curve in CURVES.iter() {
            b.iter(|| black_box(curve.castlejau_eval(0.5)))
        }
    });
}

pub fn arc_length(c: &mut Criterion) {
    c.bench_function("arc_length", |b| {
        for curve in CURVES.iter() {
            let hodograph = curve.hodograph();
            b.iter(|| black_box(arc_length_between(&hodograph, 0.25, 0.75)))
        }
    });
}

pub fn all(c: &mut Criterion) {
    eval(c);
    arc_length(c);
}
