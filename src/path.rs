//! Immutable paths with an arc length parametrisation.
//!
//! A [`Path`] is built once from svg path data and then only queried:
//! its total length and the point and tangent at any offset along it.
//! Offsets are measured the same way as `SVGGeometryElement.getPointAtLength`,
//! i.e. moves between subpaths don't add to the length.

use crate::bezier::{arc_length_between, BezierCurve};
use crate::bounding_box::BoundingBox;
use crate::error::ParseError;
use crate::path_data::{PathData, PathInstruction};
use nalgebra::{Rotation2, Vector2};
use smallvec::SmallVec;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;
use tracing::debug;

/// Number of intervals a curved segment's arc length table is split into
const TABLE_STEPS: usize = 16;

/// Newton iterations refining the table's estimate of `t` for a given length
const NEWTON_STEPS: usize = 2;

/// Lengths and squared distances below this are treated as zero
const EPSILON: f64 = 1e-9;

/// A point on a path together with the path's direction there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Position
    pub point: Vector2<f64>,
    /// Unit tangent, or the zero vector where the path has no direction
    pub tangent: Vector2<f64>,
}

impl Sample {
    /// Creates a sample normalizing `direction`
    pub fn new(point: Vector2<f64>, direction: Vector2<f64>) -> Sample {
        let tangent = if direction.norm_squared() > EPSILON {
            direction.normalize()
        } else {
            Vector2::zeros()
        };
        Sample { point, tangent }
    }

    /// The tangent's angle to the x-axis in degrees
    pub fn heading(&self) -> f64 {
        heading(&self.tangent)
    }
}

/// Angle between `direction` and the x-axis in degrees.
///
/// The y-axis points down in svg, so positive angles turn clockwise on screen.
pub fn heading(direction: &Vector2<f64>) -> f64 {
    direction.y.atan2(direction.x).to_degrees()
}

/// A single piece of a path with its arc length table.
#[derive(Clone, Debug)]
pub struct Segment {
    curve: BezierCurve,
    hodograph: BezierCurve,
    length: f64,
    /// Cumulative length at `t = i / TABLE_STEPS`, empty for straight lines
    table: SmallVec<[f64; TABLE_STEPS + 1]>,
}

impl Segment {
    fn new(curve: BezierCurve) -> Segment {
        let hodograph = curve.hodograph();
        let mut table = SmallVec::new();
        let length = if curve.degree() < 2 {
            curve.arc_length()
        } else {
            let mut length = 0.0;
            table.push(0.0);
            for i in 0..TABLE_STEPS {
                let from = i as f64 / TABLE_STEPS as f64;
                let to = (i + 1) as f64 / TABLE_STEPS as f64;
                length += arc_length_between(&hodograph, from, to);
                table.push(length);
            }
            length
        };
        Segment {
            curve,
            hodograph,
            length,
            table,
        }
    }

    /// The underlying curve
    pub fn curve(&self) -> &BezierCurve {
        &self.curve
    }

    /// The segment's arc length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Finds the curve parameter `t` at which the arc length from the segment's start is `s`
    pub fn param_at(&self, s: f64) -> f64 {
        if self.length <= EPSILON || s <= EPSILON {
            return 0.0;
        }
        if s >= self.length - EPSILON {
            return 1.0;
        }
        if self.table.is_empty() {
            return s / self.length;
        }

        // Interpolate inside the table's interval ...
        let i = self
            .table
            .partition_point(|&l| l <= s)
            .clamp(1, TABLE_STEPS);
        let (l0, l1) = (self.table[i - 1], self.table[i]);
        let t0 = (i - 1) as f64 / TABLE_STEPS as f64;
        let t1 = i as f64 / TABLE_STEPS as f64;
        let alpha = if l1 - l0 > EPSILON {
            (s - l0) / (l1 - l0)
        } else {
            0.0
        };
        let mut t = t0 + (t1 - t0) * alpha;

        // ... and refine with newton's method
        for _ in 0..NEWTON_STEPS {
            let speed = self.hodograph.castlejau_eval(t).norm();
            if speed <= EPSILON {
                break;
            }
            let error = arc_length_between(&self.hodograph, t0, t) - (s - l0);
            t = num::clamp(t - error / speed, t0, t1);
        }
        t
    }

    /// Point and direction at arc length `s` from the segment's start
    pub fn sample(&self, s: f64) -> Sample {
        let t = self.param_at(s);
        let point = self.curve.castlejau_eval(t);
        let mut direction = self.hodograph.castlejau_eval(t);
        if direction.norm_squared() <= EPSILON {
            // Coinciding control points at the ends leave the derivative at zero
            direction = self.curve.end() - self.curve.start();
        }
        Sample::new(point, direction)
    }
}

/// An immutable path measured by arc length.
#[derive(Clone, Debug)]
pub struct Path {
    segments: Vec<Segment>,
    /// Arc length at each segment's start
    offsets: Vec<f64>,
    total_length: f64,
    /// Last moveto, sampled by paths without any drawn segment
    anchor: Vector2<f64>,
}

impl Path {
    /// Parses svg path data into a path
    pub fn parse(d: &str) -> Result<Path, ParseError> {
        let data: PathData = d.parse()?;
        let path = Path::from(&data);
        debug!(
            segments = path.segments.len(),
            length = path.total_length(),
            "parsed path"
        );
        Ok(path)
    }

    /// Builds a path directly from curves
    ///
    /// Zero length curves are kept but never sampled.
    pub fn from_curves<I: IntoIterator<Item = BezierCurve>>(curves: I) -> Path {
        let mut anchor = None;
        let mut segments = Vec::new();
        for curve in curves {
            if curve.is_empty() {
                continue;
            }
            anchor.get_or_insert(curve.start());
            segments.push(Segment::new(curve));
        }
        Path::from_segments(segments, anchor.unwrap_or_else(Vector2::zeros))
    }

    fn from_segments(segments: Vec<Segment>, anchor: Vector2<f64>) -> Path {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut total_length = 0.0;
        for segment in &segments {
            offsets.push(total_length);
            total_length += segment.length;
        }
        Path {
            segments,
            offsets,
            total_length,
            anchor,
        }
    }

    /// Total arc length
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// The path's pieces in drawing order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Finds the segment containing `offset` and the offset relative to it.
    fn locate(&self, offset: f64) -> Option<(&Segment, f64)> {
        let offset = num::clamp(offset, 0.0, self.total_length);
        let mut i = self
            .offsets
            .partition_point(|&o| o <= offset)
            .checked_sub(1)?;
        // Skip back over trailing zero length segments
        while self.segments[i].length <= EPSILON && i > 0 {
            i -= 1;
        }
        let segment = &self.segments[i];
        if segment.length <= EPSILON {
            return None;
        }
        Some((segment, offset - self.offsets[i]))
    }

    /// Point and direction at an arc length offset.
    ///
    /// Offsets outside `[0, total_length]` are clamped.
    pub fn sample(&self, offset: f64) -> Sample {
        match self.locate(offset) {
            Some((segment, s)) => segment.sample(s),
            None => Sample::new(self.anchor, Vector2::zeros()),
        }
    }

    /// Point at an arc length offset.
    pub fn point_at(&self, offset: f64) -> Vector2<f64> {
        self.sample(offset).point
    }

    /// Heading of the tangent at an arc length offset, in degrees
    pub fn heading_at(&self, offset: f64) -> f64 {
        self.sample(offset).heading()
    }

    /// Approximate distance from `point` to the path, measured to `count + 1` uniform samples
    pub fn distance_to(&self, point: &Vector2<f64>, count: usize) -> f64 {
        self.samples(count)
            .map(|p| (p - point).norm_squared())
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// `count + 1` points evenly spaced by arc length, both ends included.
    pub fn samples(&self, count: usize) -> impl Iterator<Item = Vector2<f64>> + '_ {
        let count = count.max(1);
        (0..=count).map(move |i| self.point_at(self.total_length * i as f64 / count as f64))
    }

    /// Box containing the whole path
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.segments
            .iter()
            .filter_map(|segment| segment.curve.bounding_box())
            .reduce(|a, b| a.union(&b))
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(d: &str) -> Result<Self, Self::Err> {
        Path::parse(d)
    }
}

impl From<&PathData> for Path {
    /// Resolves relative coordinates and shorthands into absolute curves.
    fn from(data: &PathData) -> Self {
        let mut builder = Builder::default();
        for (absolute, instruction) in data.0.iter() {
            builder.push(*absolute, instruction);
        }
        Path::from_segments(builder.segments, builder.current)
    }
}

#[derive(Default)]
struct Builder {
    segments: Vec<Segment>,
    current: Vector2<f64>,
    subpath_start: Vector2<f64>,
    last_cubic_control: Option<Vector2<f64>>,
    last_quadratic_control: Option<Vector2<f64>>,
}

impl Builder {
    fn push(&mut self, absolute: bool, instruction: &PathInstruction) {
        use PathInstruction::*;

        let origin = self.current;
        let resolve = |p: &Vector2<f64>| if absolute { *p } else { origin + p };

        let mut cubic_control = None;
        let mut quadratic_control = None;
        match instruction {
            MoveTo(p) => {
                self.current = resolve(p);
                self.subpath_start = self.current;
            }
            LineTo(p) => self.line_to(resolve(p)),
            Horizontal(x) => {
                let x = if absolute { *x } else { origin.x + x };
                self.line_to(Vector2::new(x, origin.y));
            }
            Vertical(y) => {
                let y = if absolute { *y } else { origin.y + y };
                self.line_to(Vector2::new(origin.x, y));
            }
            Cubic(c1, c2, to) => {
                let (c1, c2, to) = (resolve(c1), resolve(c2), resolve(to));
                self.curve_to(BezierCurve::cubic(origin, c1, c2, to));
                cubic_control = Some(c2);
            }
            SmoothCubic(c2, to) => {
                let c1 = reflect(self.last_cubic_control, origin);
                let (c2, to) = (resolve(c2), resolve(to));
                self.curve_to(BezierCurve::cubic(origin, c1, c2, to));
                cubic_control = Some(c2);
            }
            Quadratic(c, to) => {
                let (c, to) = (resolve(c), resolve(to));
                self.curve_to(BezierCurve::quadratic(origin, c, to));
                quadratic_control = Some(c);
            }
            SmoothQuadratic(to) => {
                let c = reflect(self.last_quadratic_control, origin);
                let to = resolve(to);
                self.curve_to(BezierCurve::quadratic(origin, c, to));
                quadratic_control = Some(c);
            }
            Elliptic {
                radii,
                angle,
                large_arc,
                sweep,
                to,
            } => {
                let to = resolve(to);
                for curve in arc_to_cubics(origin, *radii, *angle, *large_arc, *sweep, to) {
                    self.curve_to(curve);
                }
                self.current = to;
            }
            Close => {
                let start = self.subpath_start;
                if (start - origin).norm_squared() > EPSILON {
                    self.line_to(start);
                }
                self.current = start;
            }
        }
        self.last_cubic_control = cubic_control;
        self.last_quadratic_control = quadratic_control;
    }

    fn line_to(&mut self, to: Vector2<f64>) {
        self.curve_to(BezierCurve::line(self.current, to));
    }

    fn curve_to(&mut self, curve: BezierCurve) {
        self.current = curve.end();
        self.segments.push(Segment::new(curve));
    }
}

/// Reflects the previous control point at the current point
fn reflect(control: Option<Vector2<f64>>, current: Vector2<f64>) -> Vector2<f64> {
    match control {
        Some(control) => current * 2.0 - control,
        None => current,
    }
}

/// Approximates an svg arc with cubic curves spanning at most 90° each.
///
/// Uses the endpoint to center conversion of the svg specification's implementation notes,
/// including its correction of radii too small to reach the end point.
fn arc_to_cubics(
    from: Vector2<f64>,
    radii: Vector2<f64>,
    angle: f64,
    large_arc: bool,
    sweep: bool,
    to: Vector2<f64>,
) -> SmallVec<[BezierCurve; 4]> {
    let mut curves = SmallVec::new();
    if (to - from).norm_squared() <= EPSILON {
        return curves;
    }
    let (mut rx, mut ry) = (radii.x.abs(), radii.y.abs());
    if rx <= EPSILON || ry <= EPSILON {
        curves.push(BezierCurve::line(from, to));
        return curves;
    }

    let rotation = Rotation2::new(angle.to_radians());
    let p = rotation.inverse() * ((from - to) / 2.0);

    let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let numerator = rx * rx * ry * ry - rx * rx * p.y * p.y - ry * ry * p.x * p.x;
    let denominator = rx * rx * p.y * p.y + ry * ry * p.x * p.x;
    let mut coefficient = (numerator / denominator).max(0.0).sqrt();
    if large_arc == sweep {
        coefficient = -coefficient;
    }
    let center_p = Vector2::new(coefficient * rx * p.y / ry, -coefficient * ry * p.x / rx);
    let center = rotation * center_p + (from + to) / 2.0;

    let theta = ((p.y - center_p.y) / ry).atan2((p.x - center_p.x) / rx);
    let end_theta = ((-p.y - center_p.y) / ry).atan2((-p.x - center_p.x) / rx);
    let mut delta = end_theta - theta;
    if sweep && delta < 0.0 {
        delta += TAU;
    } else if !sweep && delta > 0.0 {
        delta -= TAU;
    }

    let pieces = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / pieces as f64;
    let handle = 4.0 / 3.0 * (step / 4.0).tan();
    let map = |u: Vector2<f64>| center + rotation * Vector2::new(rx * u.x, ry * u.y);

    let mut start = from;
    for i in 0..pieces {
        let a0 = theta + step * i as f64;
        let a1 = a0 + step;
        let (sin0, cos0) = a0.sin_cos();
        let (sin1, cos1) = a1.sin_cos();
        let c1 = map(Vector2::new(cos0 - handle * sin0, sin0 + handle * cos0));
        let c2 = map(Vector2::new(cos1 + handle * sin1, sin1 - handle * cos1));
        let end = if i + 1 == pieces {
            to
        } else {
            map(Vector2::new(cos1, sin1))
        };
        curves.push(BezierCurve::cubic(start, c1, c2, end));
        start = end;
    }
    curves
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn polyline_length_and_points() {
        let path = Path::parse("M 0 0 L 30 40 l 0 -40 H 0").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.total_length(), 50.0 + 40.0 + 30.0);
        assert_eq!(path.point_at(0.0), Vector2::new(0.0, 0.0));
        assert_eq!(path.point_at(25.0), Vector2::new(15.0, 20.0));
        assert_eq!(path.point_at(70.0), Vector2::new(30.0, 20.0));
        assert_eq!(path.point_at(120.0), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn offsets_are_clamped() {
        let path = Path::parse("M 0 0 L 10 0").unwrap();
        assert_eq!(path.point_at(-5.0), Vector2::new(0.0, 0.0));
        assert_eq!(path.point_at(15.0), Vector2::new(10.0, 0.0));
    }

    #[test]
    fn moves_add_no_length() {
        let path = Path::parse("M 0 0 h 10 M 100 100 v 10").unwrap();
        assert_eq!(path.total_length(), 20.0);
        assert_eq!(path.point_at(10.0), Vector2::new(100.0, 100.0));
        assert_eq!(path.point_at(15.0), Vector2::new(100.0, 105.0));
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let path = Path::parse("M 0 0 h 10 v 10 z").unwrap();
        assert!(close(path.total_length(), 20.0 + 200f64.sqrt(), 1e-12));
        assert_eq!(path.point_at(path.total_length()), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn move_only_path_samples_its_anchor() {
        let path = Path::parse("M 10 20").unwrap();
        assert_eq!(path.total_length(), 0.0);
        let sample = path.sample(5.0);
        assert_eq!(sample.point, Vector2::new(10.0, 20.0));
        assert_eq!(sample.tangent, Vector2::zeros());
    }

    #[test]
    fn quarter_circle_arc() {
        let path = Path::parse("M 0 0 A 100 100 0 0 1 100 100").unwrap();
        let expected = PI * 100.0 / 2.0;
        assert!((path.total_length() - expected).abs() / expected < 1e-3);
        assert_eq!(path.point_at(path.total_length()), Vector2::new(100.0, 100.0));

        // Halfway along the arc lies on the circle around (100, 0) or (0, 100)
        let middle = path.point_at(path.total_length() / 2.0);
        let r1 = (middle - Vector2::new(100.0, 0.0)).norm();
        let r2 = (middle - Vector2::new(0.0, 100.0)).norm();
        assert!(close(r1, 100.0, 0.1) || close(r2, 100.0, 0.1));
    }

    #[test]
    fn arc_with_small_radii_is_scaled() {
        // Radii of 1 can't reach, the arc becomes a half circle of radius 50
        let path = Path::parse("M 0 0 A 1 1 0 0 0 100 0").unwrap();
        let expected = PI * 50.0;
        assert!((path.total_length() - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn smooth_curves_reflect_controls() {
        let smooth = Path::parse("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0").unwrap();
        let explicit = Path::parse("M 0 0 C 0 10 10 10 10 0 C 10 -10 20 -10 20 0").unwrap();
        assert_eq!(smooth.segments()[1].curve(), explicit.segments()[1].curve());

        let smooth = Path::parse("M 0 0 Q 5 10 10 0 T 20 0").unwrap();
        let explicit = Path::parse("M 0 0 Q 5 10 10 0 Q 15 -10 20 0").unwrap();
        assert_eq!(smooth.segments()[1].curve(), explicit.segments()[1].curve());
    }

    #[test]
    fn arc_length_inversion() {
        let path = Path::parse("M 50 350 Q 150 330, 220 280 Q 280 240, 340 210").unwrap();
        let segment = &path.segments()[0];
        let hodograph = segment.curve().hodograph();
        for i in 0..=10 {
            let s = segment.length() * i as f64 / 10.0;
            let t = segment.param_at(s);
            let measured: f64 = (0..64)
                .map(|j| arc_length_between(&hodograph, t * j as f64 / 64.0, t * (j + 1) as f64 / 64.0))
                .sum();
            assert!(close(measured, s, 1e-6), "{} != {}", measured, s);
        }
    }

    #[test]
    fn tangents_are_unit_vectors() {
        let path = Path::parse("M 50 350 Q 150 330, 220 280 Q 280 240, 340 210").unwrap();
        for i in 0..=20 {
            let sample = path.sample(path.total_length() * i as f64 / 20.0);
            assert!(close(sample.tangent.norm(), 1.0, 1e-12));
        }
        let line = Path::parse("M 0 0 L 0 10").unwrap();
        assert!(close(line.heading_at(5.0), 90.0, 1e-12));
    }

    #[test]
    fn uniform_samples_include_both_ends() {
        let path = Path::parse("M 0 0 L 100 0").unwrap();
        let points: Vec<_> = path.samples(4).collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Vector2::new(0.0, 0.0));
        assert_eq!(points[2], Vector2::new(50.0, 0.0));
        assert_eq!(points[4], Vector2::new(100.0, 0.0));
        assert_eq!(path.distance_to(&Vector2::new(50.0, 30.0), 4), 30.0);
        assert_eq!(path.distance_to(&Vector2::new(-3.0, 4.0), 4), 5.0);
    }

    #[test]
    fn bounding_box_covers_all_segments() {
        let path = Path::parse("M 50 350 L 200 200 L 300 100 L 450 50 L 550 50").unwrap();
        let bb = path.bounding_box().unwrap();
        assert_eq!(bb.min, Vector2::new(50.0, 50.0));
        assert_eq!(bb.max, Vector2::new(550.0, 350.0));
        assert_eq!(bb.size(), Vector2::new(500.0, 300.0));
        assert!(Path::parse("M 1 1").unwrap().bounding_box().is_none());
    }
}
