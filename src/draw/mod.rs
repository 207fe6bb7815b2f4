//! Defines and implements the helper method [`DrawPath::add_curve`] on various drawing contexts.
//!
//! A [`Path`] is parsed once and then only sampled,
//! but writing it back out is handy for debugging its arc conversion and for demos.
use crate::{BezierCurve, Path};

/// Draw paths on different "drawing contexts" with ease.
///
/// Use different crate features to implement different contexts:
/// - `draw-svg` to draw paths using svg path data
pub trait DrawPath {
    /// Add a single curve to the drawing context.
    ///
    /// What this actually means depends on the context.
    /// But generally this just prepares the curve to be drawn instead of actually drawing it.
    fn add_curve(&mut self, curve: &BezierCurve);

    /// Add all of a path's segments in order
    fn add_path(&mut self, path: &Path) {
        for segment in path.segments() {
            self.add_curve(segment.curve());
        }
    }
}

#[cfg(feature = "draw-svg")]
pub mod svg;
