use nalgebra::Vector2;
use navpath::{BezierCurve, Path};
use once_cell::sync::Lazy;

/// Path data of increasing difficulty: polylines, quadratics, cubics and arcs
pub static PATH_DATA: [&str; 5] = [
    "M 50 350 L 200 200 L 300 100 L 450 50 L 550 50",
    "M 50 350 L 100 370 L 200 370 L 350 360 L 450 320 L 500 250 L 520 150 L 540 100 L 550 50",
    "M 50 350 Q 150 330, 220 280 Q 280 240, 340 210 Q 420 170, 480 120 Q 520 90, 550 50",
    "M 50 0 C 200 33 0 66 50 100 S 100 150 150 120 s 40 -60 0 -80 Z",
    "M 10 10 a 40 40 0 1 1 80 0 A 20 60 30 0 0 150 90 h 20 v 20 t 30 30",
];

pub static PATHS: Lazy<Vec<Path>> = Lazy::new(|| {
    PATH_DATA
        .iter()
        .filter_map(|d| Path::parse(d).ok())
        .collect()
});

pub static CURVES: Lazy<Vec<BezierCurve>> = Lazy::new(|| {
    vec![
        BezierCurve::line(Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0)),
        BezierCurve::quadratic(
            Vector2::new(50.0, 350.0),
            Vector2::new(150.0, 330.0),
            Vector2::new(220.0, 280.0),
        ),
        BezierCurve::cubic(
            Vector2::new(50.0, 0.0),
            Vector2::new(200.0, 33.0),
            Vector2::new(0.0, 66.0),
            Vector2::new(50.0, 100.0),
        ),
        BezierCurve::cubic(
            Vector2::new(56.3, 69.643),
            Vector2::new(42.5, 79.69),
            Vector2::new(35.0, 89.8),
            Vector2::new(50.0, 100.0),
        ),
    ]
});
