use crate::common::samples::{PATHS, PATH_DATA};
use criterion::{black_box, Criterion};
use navpath::marker::Frame;
use navpath::presets;
use navpath::Path;
use std::time::Duration;

pub fn parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        for d in PATH_DATA.iter() {
            b.iter(|| black_box(Path::parse(d)))
        }
    });
}

pub fn sample(c: &mut Criterion) {
    c.bench_function("sample", |b| {
        for path in PATHS.iter() {
            let offset = path.total_length() * 0.37;
            b.iter(|| black_box(path.sample(offset)))
        }
    });
}

pub fn tick(c: &mut Criterion) {
    let mut scene = match presets::simulation_scene() {
        Ok(scene) => scene,
        Err(err) => panic!("presets don't parse: {}", err),
    };
    let mut animator = presets::simulation_animator();
    let mut now = Duration::ZERO;
    c.bench_function("tick", |b| {
        b.iter(|| {
            now += Duration::from_millis(16);
            black_box(animator.tick(Frame::at(now), &mut scene))
        })
    });
}

pub fn all(c: &mut Criterion) {
    parse(c);
    sample(c);
    tick(c);
}
