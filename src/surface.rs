//! The capabilities an animator needs from whatever displays its markers.
//!
//! A [`Surface`] knows paths and display nodes by id.
//! Absence is never an error: queries return `None` and updates return `false`.

use crate::path::{Path, Sample};
use nalgebra::Vector2;
use std::collections::HashMap;
use std::fmt;

/// A translation optionally followed by a rotation in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translate: Vector2<f64>,
    /// Rotation in degrees around the translated origin
    pub rotate: Option<f64>,
}

impl Transform {
    /// Pure translation
    pub fn translate(translate: Vector2<f64>) -> Transform {
        Transform {
            translate,
            rotate: None,
        }
    }

    /// Translation followed by a rotation
    pub fn translate_rotate(translate: Vector2<f64>, degrees: f64) -> Transform {
        Transform {
            translate,
            rotate: Some(degrees),
        }
    }
}

/// Formats the transform as the value of an svg `transform` attribute.
///
/// ```
/// use navpath::surface::Transform;
/// use nalgebra::Vector2;
///
/// let t = Transform::translate_rotate(Vector2::new(10.0, 20.5), 90.0);
/// assert_eq!(t.to_string(), "translate(10, 20.5) rotate(90)");
/// ```
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}, {})", self.translate.x, self.translate.y)?;
        if let Some(degrees) = self.rotate {
            write!(f, " rotate({})", degrees)?;
        }
        Ok(())
    }
}

/// Host display surface.
pub trait Surface {
    /// Total length of the path `path`
    fn total_length(&self, path: &str) -> Option<f64>;

    /// Point and tangent at arc length `offset` along the path `path`
    fn sample(&self, path: &str, offset: f64) -> Option<Sample>;

    /// Whether the display node `node` exists
    fn has_node(&self, node: &str) -> bool;

    /// Applies a transform to the display node `node`.
    ///
    /// Returns whether the node exists.
    fn set_transform(&mut self, node: &str, transform: &Transform) -> bool;

    /// Sets the display node's opacity.
    ///
    /// Returns whether the node exists.
    fn set_opacity(&mut self, node: &str, opacity: f64) -> bool;
}

/// State of a display node in a [`Scene`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Last transform applied
    pub transform: Option<Transform>,
    /// Current opacity
    pub opacity: f64,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            transform: None,
            opacity: 1.0,
        }
    }
}

/// In memory [`Surface`] backed by [`Path`]s.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    paths: HashMap<String, Path>,
    nodes: HashMap<String, Node>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Scene {
        Scene::default()
    }

    /// Adds or replaces a path
    pub fn insert_path(&mut self, id: impl Into<String>, path: Path) -> &mut Self {
        self.paths.insert(id.into(), path);
        self
    }

    /// Adds a display node, keeping an existing one's state
    pub fn insert_node(&mut self, id: impl Into<String>) -> &mut Self {
        self.nodes.entry(id.into()).or_default();
        self
    }

    /// Removes a path returning it
    pub fn remove_path(&mut self, id: &str) -> Option<Path> {
        self.paths.remove(id)
    }

    /// Removes a display node returning its last state
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    /// Looks up a path
    pub fn path(&self, id: &str) -> Option<&Path> {
        self.paths.get(id)
    }

    /// Looks up a display node
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterates over all paths in no particular order
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths.iter().map(|(id, path)| (id.as_str(), path))
    }
}

impl Surface for Scene {
    fn total_length(&self, path: &str) -> Option<f64> {
        self.paths.get(path).map(Path::total_length)
    }

    fn sample(&self, path: &str, offset: f64) -> Option<Sample> {
        self.paths.get(path).map(|path| path.sample(offset))
    }

    fn has_node(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    fn set_transform(&mut self, node: &str, transform: &Transform) -> bool {
        match self.nodes.get_mut(node) {
            Some(node) => {
                node.transform = Some(*transform);
                true
            }
            None => false,
        }
    }

    fn set_opacity(&mut self, node: &str, opacity: f64) -> bool {
        match self.nodes.get_mut(node) {
            Some(node) => {
                node.opacity = opacity;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ids_are_values() {
        let mut scene = Scene::new();
        scene.insert_path("line", Path::parse("M 0 0 L 10 0").unwrap());
        scene.insert_node("robot");

        assert_eq!(scene.total_length("line"), Some(10.0));
        assert_eq!(scene.total_length("missing"), None);
        assert!(scene.sample("missing", 0.0).is_none());
        assert_eq!(
            scene.sample("line", 5.0).map(|s| s.point),
            Some(Vector2::new(5.0, 0.0))
        );

        assert!(scene.has_node("robot"));
        assert!(!scene.has_node("missing"));
        let transform = Transform::translate(Vector2::new(1.0, 2.0));
        assert!(scene.set_transform("robot", &transform));
        assert!(!scene.set_transform("missing", &transform));
        assert!(!scene.set_opacity("missing", 0.0));
        assert_eq!(scene.node("robot").unwrap().transform, Some(transform));
        assert_eq!(transform.to_string(), "translate(1, 2)");

        assert!(scene.remove_node("robot").is_some());
        assert!(!scene.set_opacity("robot", 0.0));
        assert!(!scene.has_node("robot"));
    }
}
