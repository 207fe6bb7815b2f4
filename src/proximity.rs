//! Finding the landmarks close to a route.

use crate::bounding_box::BoundingBox;
use crate::path::Path;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// How densely a route is sampled and what counts as close.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityOptions {
    /// Number of intervals the route is sampled at
    pub samples: usize,
    /// Number of intervals used in compact mode
    pub compact_samples: usize,
    /// Use `compact_samples`, for small screens
    pub compact: bool,
    /// Landmarks closer than this are near
    pub threshold: f64,
}

impl Default for ProximityOptions {
    fn default() -> Self {
        ProximityOptions {
            samples: 180,
            compact_samples: 90,
            compact: false,
            threshold: 95.0,
        }
    }
}

impl ProximityOptions {
    /// Number of intervals to sample given the current mode
    pub fn sample_count(&self) -> usize {
        if self.compact {
            self.compact_samples
        } else {
            self.samples
        }
    }
}

/// A building or other point of interest on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Identifier
    pub id: String,
    /// Position in the map's coordinates
    pub position: Vector2<f64>,
}

impl Landmark {
    /// Creates a landmark at `(x, y)`
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Landmark {
        Landmark {
            id: id.into(),
            position: Vector2::new(x, y),
        }
    }
}

/// Returns the landmarks whose squared distance to any of the route's samples is below
/// the squared threshold, in input order.
pub fn landmarks_near<'l>(
    path: &Path,
    landmarks: &'l [Landmark],
    options: &ProximityOptions,
) -> Vec<&'l Landmark> {
    let threshold_squared = options.threshold * options.threshold;
    let samples: Vec<_> = path.samples(options.sample_count()).collect();
    let reach = BoundingBox::from_points(samples.iter().copied())
        .map(|bb| bb.expand(options.threshold));

    landmarks
        .iter()
        .filter(|landmark| reach.map_or(false, |reach| reach.contains(&landmark.position)))
        .filter(|landmark| {
            samples
                .iter()
                .any(|point| (point - landmark.position).norm_squared() < threshold_squared)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_a_straight_route() {
        let path = Path::parse("M 0 0 L 1000 0").unwrap();
        let landmarks = [
            Landmark::new("above", 500.0, -94.0),
            Landmark::new("on-threshold", 300.0, 95.0),
            Landmark::new("far", 500.0, 300.0),
            Landmark::new("behind", -50.0, 50.0),
            Landmark::new("past-the-end", 1096.0, 0.0),
        ];
        let near: Vec<_> = landmarks_near(&path, &landmarks, &ProximityOptions::default())
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(near, ["above", "behind"]);
    }

    #[test]
    fn compact_sampling_misses_between_samples() {
        // 10 intervals on a 1000 long line are 100 apart
        let path = Path::parse("M 0 0 L 1000 0").unwrap();
        let landmarks = [Landmark::new("between", 50.0, 90.0)];
        let options = ProximityOptions {
            samples: 1000,
            compact_samples: 10,
            compact: true,
            threshold: 95.0,
        };
        assert!(landmarks_near(&path, &landmarks, &options).is_empty());
        let options = ProximityOptions {
            compact: false,
            ..options
        };
        assert_eq!(landmarks_near(&path, &landmarks, &options).len(), 1);
    }
}
