//! Small library to render routes and markers as svg.
//!
//! Only used inside demos and benches and not even exposed.

use nalgebra::Vector2;
use navpath::draw::svg::SVGAbsolutePath;
use navpath::draw::DrawPath;
use navpath::surface::Transform;
use std::fmt::{Display, Formatter};

type Rect = (f64, f64, f64, f64);

pub struct SVG {
    pub view_box: Rect,
    pub elements: Vec<Box<dyn Display>>,
}

impl SVG {
    pub fn add_elem<E: Display + 'static>(&mut self, elem: E) {
        self.elements.push(Box::new(elem));
    }
}

impl Display for SVG {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "<svg viewBox=\"{} {} {} {}\" xmlns=\"http://www.w3.org/2000/svg\">",
            self.view_box.0, self.view_box.1, self.view_box.2, self.view_box.3
        )?;
        for elem in self.elements.iter() {
            elem.fmt(f)?;
        }
        writeln!(f, "</svg>")?;
        Ok(())
    }
}

pub struct Line {
    pub from: Vector2<f64>,
    pub to: Vector2<f64>,
    pub width: Option<f64>,
    pub color: &'static str,
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\"",
            self.from[0], self.from[1], self.to[0], self.to[1], self.color
        )?;
        if let Some(width) = self.width {
            write!(f, " stroke-width=\"{}\"", width)?;
        }
        writeln!(f, "/>")
    }
}

pub struct Circle {
    pub center: Vector2<f64>,
    pub radius: f64,
    pub color: &'static str,
}

impl Display for Circle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            self.center[0], self.center[1], self.radius, self.color
        )
    }
}

pub struct Path {
    pub id: Option<String>,
    pub stroke_color: &'static str,
    pub fill_color: &'static str,
    pub width: f64,
    pub opacity: f64,
    pub transform: Option<Transform>,
    pub d: String,
}

impl Default for Path {
    fn default() -> Self {
        Path {
            id: None,
            stroke_color: "black",
            fill_color: "none",
            width: 1.0,
            opacity: 1.0,
            transform: None,
            d: String::new(),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<path")?;
        if let Some(id) = &self.id {
            write!(f, " id=\"{}\"", id)?;
        }
        write!(
            f,
            " stroke=\"{}\" fill=\"{}\" stroke-width=\"{}\"",
            self.stroke_color, self.fill_color, self.width
        )?;
        if self.opacity < 1.0 {
            write!(f, " opacity=\"{}\"", self.opacity)?;
        }
        if let Some(transform) = &self.transform {
            write!(f, " transform=\"{}\"", transform)?;
        }
        writeln!(f, " d=\"{}\"/>", self.d)
    }
}

/* Methods actually processing paths */
impl SVG {
    pub fn add_route(&mut self, id: &str, route: &navpath::Path, color: &'static str) {
        let mut path = Path {
            id: Some(id.to_string()),
            stroke_color: color,
            width: 2.0,
            ..Default::default()
        };
        SVGAbsolutePath::from(&mut path.d).add_path(route);
        self.add_elem(path);
    }

    pub fn debug_route(&mut self, id: &str, route: &navpath::Path, color: &'static str) {
        self.add_route(id, route, color);

        // Draw 21 ticks evenly spaced by arc length
        for i in 0..=20 {
            let sample = route.sample(route.total_length() * i as f64 / 20.0);
            let normal = Vector2::new(-sample.tangent.y, sample.tangent.x) * 4.0;
            self.add_elem(Line {
                from: sample.point - normal,
                to: sample.point + normal,
                width: Some(0.5),
                color,
            });
        }

        // Draw segment joints
        for segment in route.segments() {
            self.add_elem(Circle {
                center: segment.curve().start(),
                radius: 1.5,
                color,
            });
        }

        // Draw bounding box
        if let Some(bb) = route.bounding_box() {
            let size = bb.size();
            self.add_elem(Path {
                stroke_color: color,
                width: 0.25,
                d: format!(
                    "M {},{} h {} v {} h {} Z",
                    bb.min.x, bb.min.y, size.x, size.y, -size.x
                ),
                ..Default::default()
            });
        }
    }

    /// Adds an arrow pointing right, placed by `transform`
    pub fn add_marker(&mut self, transform: Transform, opacity: f64, color: &'static str) {
        self.add_elem(Path {
            stroke_color: "none",
            fill_color: color,
            opacity,
            transform: Some(transform),
            d: "M 8,0 L -6,-6 L -3,0 L -6,6 Z".to_string(),
            ..Default::default()
        });
    }
}
