//! Bezier curves of the degrees used by svg path data.

use crate::bounding_box::BoundingBox;
use nalgebra::Vector2;
use smallvec::{smallvec, SmallVec};
use std::ops::{Deref, DerefMut};

type ControlPoints = SmallVec<[Vector2<f64>; 4]>;

/// Nodes and weights of the 5 point gauss-legendre quadrature on `[-1, 1]`
const GAUSS_LEGENDRE: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

/// Bezier curve stored as its control points.
///
/// Path data only produces lines, quadratic and cubic curves,
/// so up to four control points are stored inline.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve(pub ControlPoints);

impl Deref for BezierCurve {
    type Target = ControlPoints;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for BezierCurve {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl BezierCurve {
    /// Straight line from `from` to `to`
    pub fn line(from: Vector2<f64>, to: Vector2<f64>) -> Self {
        BezierCurve(smallvec![from, to])
    }

    /// Quadratic curve with a single control point
    pub fn quadratic(from: Vector2<f64>, control: Vector2<f64>, to: Vector2<f64>) -> Self {
        BezierCurve(smallvec![from, control, to])
    }

    /// Cubic curve with two control points
    pub fn cubic(
        from: Vector2<f64>,
        control1: Vector2<f64>,
        control2: Vector2<f64>,
        to: Vector2<f64>,
    ) -> Self {
        BezierCurve(smallvec![from, control1, control2, to])
    }

    /// Returns a curve's degree which is one lower then its number of control points
    pub fn degree(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// The point at `t = 0`
    pub fn start(&self) -> Vector2<f64> {
        self[0]
    }

    /// The point at `t = 1`
    pub fn end(&self) -> Vector2<f64> {
        self[self.len() - 1]
    }

    /// Get the point on the curve at position `t`.
    ///
    /// This method uses de castlejau's algorithm.
    pub fn castlejau_eval(&self, t: f64) -> Vector2<f64> {
        let inv_t = 1.0 - t;
        match &self[..] {
            [] => panic!("bezier curve without control points"),
            [a1] => *a1,
            [a2, b2] => a2 * inv_t + b2 * t,
            [a3, b3, c3] => {
                let a2 = a3 * inv_t + b3 * t;
                let b2 = b3 * inv_t + c3 * t;
                a2 * inv_t + b2 * t
            }
            [a4, b4, c4, d4] => {
                let a3 = a4 * inv_t + b4 * t;
                let b3 = b4 * inv_t + c4 * t;
                let c3 = c4 * inv_t + d4 * t;
                let a2 = a3 * inv_t + b3 * t;
                let b2 = b3 * inv_t + c3 * t;
                a2 * inv_t + b2 * t
            }
            _ => {
                let mut old_points = self.0.clone();
                let mut new_points = self.0.clone();
                let mut points = (&mut old_points, &mut new_points);
                while points.0.len() > 1 {
                    BezierCurve::castlejau_step(points.0, points.1, t);
                    points = (points.1, points.0);
                }
                points.0[0]
            }
        }
    }

    /// Performs a single step of de castlejau's algorithm
    ///
    /// i.e. combines `n` points into `n - 1` points by computing `(1 - t) * A + t * B` on
    /// consecutive points `A` and `B`
    fn castlejau_step(input: &ControlPoints, output: &mut ControlPoints, t: f64) {
        output.clear();
        let t_inv = 1.0 - t;
        for (p, q) in input.iter().zip(input.iter().skip(1)) {
            output.push(p * t_inv + q * t);
        }
    }

    /// Computes the curve's hodograph i.e. the curve traced by its derivative.
    ///
    /// Its degree is one lower than `self`'s.
    /// A single point's hodograph is the zero vector.
    pub fn hodograph(&self) -> BezierCurve {
        if self.len() < 2 {
            return BezierCurve(smallvec![Vector2::zeros()]);
        }
        let degree = self.degree() as f64;
        BezierCurve(
            self.iter()
                .zip(self.iter().skip(1))
                .map(|(p, q)| (q - p) * degree)
                .collect(),
        )
    }

    /// Constructs an axis aligned bounding box containing all control points.
    ///
    /// This box will also contain the whole curve, but can overestimate it.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.iter().copied())
    }

    /// Length of the whole curve
    pub fn arc_length(&self) -> f64 {
        match &self[..] {
            [a, b] => (b - a).norm(),
            _ => arc_length_between(&self.hodograph(), 0.0, 1.0),
        }
    }
}

/// Length of the curve between `from` and `to`, given its hodograph.
///
/// Integrates the hodograph's norm using gauss-legendre quadrature.
/// This is exact for lines and precise enough for quadratics and cubics
/// as long as the interval doesn't contain a cusp.
pub fn arc_length_between(hodograph: &BezierCurve, from: f64, to: f64) -> f64 {
    let half = (to - from) / 2.0;
    let middle = (to + from) / 2.0;
    GAUSS_LEGENDRE
        .iter()
        .map(|&(x, w)| w * hodograph.castlejau_eval(middle + half * x).norm())
        .sum::<f64>()
        * half
}
