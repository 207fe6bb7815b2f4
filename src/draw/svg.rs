//! Draw a path in a svg

use crate::draw::DrawPath;
use crate::BezierCurve;
use nalgebra::Vector2;
use std::fmt::Write;
use std::marker::PhantomData;

/// Helper trait implemented by [`Absolute`] and [`Relative`] to choose
/// how the coordinates are interpreted in the svg's path.
///
/// This toggles between lower and upper case letters for the path commands
/// and whether coordinates are written relative to the current point.
pub trait CoordRepr {
    /// Write coordinates relative to the current point
    const RELATIVE: bool;

    /// Character to use for the MoveTo command
    const M: &'static str;

    /// Character to use for the LineTo command
    const L: &'static str;

    /// Character to use for the Quadratic Bezier Curve command
    const Q: &'static str;

    /// Character to use for the Cubic Bezier Curve command
    const C: &'static str;
}

/// Interpret the svg path's coordinates as absolute.
pub struct Absolute;
impl CoordRepr for Absolute {
    const RELATIVE: bool = false;
    const M: &'static str = "M";
    const L: &'static str = "L";
    const Q: &'static str = "Q";
    const C: &'static str = "C";
}

/// Interpret the svg path's coordinates as relative.
pub struct Relative;
impl CoordRepr for Relative {
    const RELATIVE: bool = true;
    const M: &'static str = "m";
    const L: &'static str = "l";
    const Q: &'static str = "q";
    const C: &'static str = "c";
}

/// This type wraps a mutable String reference and implements [`DrawPath`] on it.
/// The [`DrawPath::add_curve`] writes the curve to the string
/// using the path commands used in a svg `<path>`'s d attribute.
///
/// A moveto is only written when a curve doesn't start where the previous one ended.
///
/// ```
/// # use nalgebra::Vector2;
/// use navpath::{BezierCurve, Path};
/// use navpath::draw::DrawPath;
/// use navpath::draw::svg::{SVGAbsolutePath, SVGRelativePath};
///
/// let curve = BezierCurve::line(Vector2::new(0.0, 1.0), Vector2::new(2.0, 3.0));
/// let mut d = String::new();
/// SVGAbsolutePath::from(&mut d).add_curve(&curve);
/// assert_eq!(d, "M 0,1 L 2,3");
///
/// let path = Path::parse("M 10 10 h 5 v 5").unwrap();
/// let mut d = String::new();
/// SVGRelativePath::from(&mut d).add_path(&path);
/// assert_eq!(d, "m 10,10 l 5,0 l 0,5");
/// ```
pub struct SVGPath<'s, R: CoordRepr> {
    d: &'s mut String,
    current: Option<Vector2<f64>>,
    repr: PhantomData<R>,
}

/// Wrapper for writing a path to a svg's path using absolute coordinates
pub type SVGAbsolutePath<'s> = SVGPath<'s, Absolute>;

/// Wrapper for writing a path to a svg's path using relative coordinates
pub type SVGRelativePath<'s> = SVGPath<'s, Relative>;

impl<'s, R: CoordRepr> From<&'s mut String> for SVGPath<'s, R> {
    fn from(d: &'s mut String) -> Self {
        SVGPath {
            d,
            current: None,
            repr: PhantomData,
        }
    }
}

impl<'s, R: CoordRepr> SVGPath<'s, R> {
    /// Writes a command, `points` are absolute
    fn command(&mut self, letter: &str, points: &[Vector2<f64>]) {
        let origin = match self.current {
            Some(current) if R::RELATIVE => current,
            _ => Vector2::zeros(),
        };
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push_str(letter);
        for point in points {
            let p = point - origin;
            let _ = write!(self.d, " {},{}", p.x, p.y);
        }
        if let Some(last) = points.last() {
            self.current = Some(*last);
        }
    }
}

impl<'s, R: CoordRepr> DrawPath for SVGPath<'s, R> {
    fn add_curve(&mut self, curve: &BezierCurve) {
        let start = match curve.first() {
            Some(start) => *start,
            None => return,
        };
        let connected = self
            .current
            .map_or(false, |current| (current - start).norm_squared() < 1e-18);
        if !connected {
            self.command(R::M, &[start]);
        }

        match &curve[..] {
            [_] => {}
            [_, b] => self.command(R::L, &[*b]),
            [_, b, c] => self.command(R::Q, &[*b, *c]),
            [_, b, c, d] => self.command(R::C, &[*b, *c, *d]),
            _ => {
                // Higher degrees are flattened
                const STEPS: usize = 20;
                for i in 1..=STEPS {
                    let point = curve.castlejau_eval(i as f64 / STEPS as f64);
                    self.command(R::L, &[point]);
                }
            }
        }
    }
}
