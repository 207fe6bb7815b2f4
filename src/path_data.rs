//! Parser for the svg path mini language, i.e. the `d` attribute of a `<path>`.
//!
//! ```
//! use navpath::path_data::{PathData, PathInstruction};
//! use nalgebra::Vector2;
//!
//! let data: PathData = "M 10 10 h 5".parse().unwrap();
//! assert_eq!(data.0[0], (true, PathInstruction::MoveTo(Vector2::new(10.0, 10.0))));
//! assert_eq!(data.0[1], (false, PathInstruction::Horizontal(5.0)));
//! ```

use crate::error::ParseError;
use nalgebra::Vector2;
use std::str::FromStr;
use svgtypes::{PathParser, PathSegment};

/// A single drawing instruction.
///
/// Coordinates are stored as written, the accompanying flag in [`PathData`] tells
/// whether they are absolute or relative to the current point.
#[derive(Clone, Debug, PartialEq)]
pub enum PathInstruction {
    /// `M`: start a new subpath
    MoveTo(Vector2<f64>),
    /// `L`: straight line
    LineTo(Vector2<f64>),
    /// `H`: horizontal line
    Horizontal(f64),
    /// `V`: vertical line
    Vertical(f64),
    /// `C`: cubic curve given both control points and the end point
    Cubic(Vector2<f64>, Vector2<f64>, Vector2<f64>),
    /// `S`: cubic curve whose first control point mirrors the previous one
    SmoothCubic(Vector2<f64>, Vector2<f64>),
    /// `Q`: quadratic curve given its control point and the end point
    Quadratic(Vector2<f64>, Vector2<f64>),
    /// `T`: quadratic curve whose control point mirrors the previous one
    SmoothQuadratic(Vector2<f64>),
    /// `A`: elliptical arc
    Elliptic {
        /// The ellipse's radii
        radii: Vector2<f64>,
        /// Rotation of the ellipse's x-axis in degrees
        angle: f64,
        /// Choose the arc spanning more than 180°
        large_arc: bool,
        /// Choose the arc drawn in positive angle direction
        sweep: bool,
        /// End point
        to: Vector2<f64>,
    },
    /// `Z`: straight line back to the subpath's start
    Close,
}

/// Parsed path data: instructions paired with whether their coordinates are absolute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData(pub Vec<(bool, PathInstruction)>);

impl FromStr for PathData {
    type Err = ParseError;

    fn from_str(d: &str) -> Result<Self, Self::Err> {
        parse(d)
    }
}

impl From<svgtypes::Error> for ParseError {
    fn from(err: svgtypes::Error) -> Self {
        ParseError::Syntax {
            message: err.to_string(),
        }
    }
}

/// The instruction a segment describes, paired with whether it is absolute
fn instruction(segment: PathSegment) -> (bool, PathInstruction) {
    let v = |x: f64, y: f64| Vector2::new(x, y);
    match segment {
        PathSegment::MoveTo { abs, x, y } => (abs, PathInstruction::MoveTo(v(x, y))),
        PathSegment::LineTo { abs, x, y } => (abs, PathInstruction::LineTo(v(x, y))),
        PathSegment::HorizontalLineTo { abs, x } => (abs, PathInstruction::Horizontal(x)),
        PathSegment::VerticalLineTo { abs, y } => (abs, PathInstruction::Vertical(y)),
        PathSegment::CurveTo {
            abs,
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => (abs, PathInstruction::Cubic(v(x1, y1), v(x2, y2), v(x, y))),
        PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
            (abs, PathInstruction::SmoothCubic(v(x2, y2), v(x, y)))
        }
        PathSegment::Quadratic { abs, x1, y1, x, y } => {
            (abs, PathInstruction::Quadratic(v(x1, y1), v(x, y)))
        }
        PathSegment::SmoothQuadratic { abs, x, y } => {
            (abs, PathInstruction::SmoothQuadratic(v(x, y)))
        }
        PathSegment::EllipticalArc {
            abs,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => (
            abs,
            PathInstruction::Elliptic {
                radii: v(rx, ry),
                angle: x_axis_rotation,
                large_arc,
                sweep,
                to: v(x, y),
            },
        ),
        PathSegment::ClosePath { abs } => (abs, PathInstruction::Close),
    }
}

/// Parses svg path data.
///
/// Follows the grammar of the svg specification including its shorthands:
/// repeated argument sets without repeating the command, implicit linetos after a moveto
/// and numbers without separators (`10-5`, `.5.5`).
pub fn parse(d: &str) -> Result<PathData, ParseError> {
    let found = match d.trim_start().chars().next() {
        None => return Err(ParseError::Empty),
        Some(found) => found,
    };
    if !matches!(found, 'M' | 'm') {
        return Err(ParseError::MissingMoveTo { found });
    }

    let instructions = PathParser::from(d)
        .map(|segment| segment.map(instruction))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PathData(instructions))
}
