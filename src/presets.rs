//! The routes drawn on the NavX pages.
//!
//! The landing page's simulation animates three robots at once, each along its own route.
//! The dashboard reuses the same three geometries for its selectable routes.

use crate::animator::{Animator, Rate, Track};
use crate::config::AnimatorOptions;
use crate::error::ParseError;
use crate::marker::WrapPolicy;
use crate::path::Path;
use crate::surface::Scene;

/// A route of the landing page's simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackPreset {
    /// Name of the optimisation goal
    pub name: &'static str,
    /// Id of the svg path
    pub path: &'static str,
    /// Id of the robot following it
    pub node: &'static str,
    /// Path data
    pub d: &'static str,
    /// Fraction of the route covered per frame
    pub rate: f64,
}

/// The simulation's routes: direct, cautious and smooth.
pub static SIMULATION: [TrackPreset; 3] = [
    TrackPreset {
        name: "speed",
        path: "path-speed",
        node: "robot-speed",
        d: "M 50 350 L 200 200 L 300 100 L 450 50 L 550 50",
        rate: 0.006,
    },
    TrackPreset {
        name: "safety",
        path: "path-safety",
        node: "robot-safety",
        d: "M 50 350 L 100 370 L 200 370 L 350 360 L 450 320 L 500 250 L 520 150 L 540 100 L 550 50",
        rate: 0.004,
    },
    TrackPreset {
        name: "comfort",
        path: "path-comfort",
        node: "robot-comfort",
        d: "M 50 350 Q 150 330, 220 280 Q 280 240, 340 210 Q 420 170, 480 120 Q 520 90, 550 50",
        rate: 0.005,
    },
];

/// Id of the dashboard's agent
pub const AGENT: &str = "agent";

/// Which simulation geometry draws each dashboard route
const DASHBOARD_GEOMETRY: [(&str, &str); 3] = [
    ("path-fastest", "speed"),
    ("path-scenic", "safety"),
    ("path-comfort", "comfort"),
];

impl TrackPreset {
    /// Looks up a simulation route by name
    pub fn by_name(name: &str) -> Option<&'static TrackPreset> {
        SIMULATION.iter().find(|preset| preset.name == name)
    }

    /// Parses the route's geometry
    pub fn parse(&self) -> Result<Path, ParseError> {
        Path::parse(self.d)
    }

    /// A track following this route
    pub fn track(&self) -> Track {
        Track::new(self.path, self.node, Rate::Fraction(self.rate))
    }
}

/// The simulation's animator: robots are only translated and jump back on arrival.
pub fn simulation_animator() -> Animator {
    let options = AnimatorOptions {
        wrap: WrapPolicy::Reset,
        orient: false,
        ..AnimatorOptions::default()
    };
    SIMULATION
        .iter()
        .fold(Animator::new(options), |animator, preset| {
            animator.with_track(preset.track())
        })
}

/// A scene containing the simulation's paths and robots
pub fn simulation_scene() -> Result<Scene, ParseError> {
    let mut scene = Scene::new();
    for preset in SIMULATION.iter() {
        scene.insert_path(preset.path, preset.parse()?);
        scene.insert_node(preset.node);
    }
    Ok(scene)
}

/// A scene containing the dashboard's agent and the paths of the default routes.
///
/// The fastest route is drawn like the simulation's speed route, the scenic one like its
/// safety route.
pub fn dashboard_scene() -> Result<Scene, ParseError> {
    let mut scene = Scene::new();
    for (path, geometry) in DASHBOARD_GEOMETRY {
        if let Some(preset) = TrackPreset::by_name(geometry) {
            scene.insert_path(path, preset.parse()?);
        }
    }
    scene.insert_node(AGENT);
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Frame;
    use crate::surface::Surface;
    use crate::telemetry::RouteCatalog;
    use std::time::Duration;

    #[test]
    fn presets_parse() {
        for preset in SIMULATION.iter() {
            let path = preset.parse().unwrap();
            assert_eq!(path.point_at(0.0).x, 50.0);
            assert_eq!(path.point_at(path.total_length()).y, 50.0);
        }
        let speed = TrackPreset::by_name("speed").unwrap().parse().unwrap();
        let expected = 150f64.hypot(150.0) + 100f64.hypot(100.0) + 150f64.hypot(50.0) + 100.0;
        assert!((speed.total_length() - expected).abs() < 1e-9);
    }

    #[test]
    fn simulation_robots_drift_apart() {
        let mut scene = simulation_scene().unwrap();
        let mut animator = simulation_animator();
        for i in 0..100 {
            let moved = animator.tick(Frame::at(Duration::from_millis(i * 16)), &mut scene);
            assert_eq!(moved, 3);
        }
        let progress: Vec<f64> = animator
            .tracks()
            .iter()
            .map(|track| {
                let total = scene.total_length(track.path()).unwrap();
                track.marker().progress() / total
            })
            .collect();
        assert!((progress[0] - 0.6).abs() < 1e-9);
        assert!((progress[1] - 0.4).abs() < 1e-9);
        assert!((progress[2] - 0.5).abs() < 1e-9);
        for preset in SIMULATION.iter() {
            let transform = scene.node(preset.node).unwrap().transform.unwrap();
            assert_eq!(transform.rotate, None);
        }
    }

    #[test]
    fn dashboard_scene_has_every_route() {
        let scene = dashboard_scene().unwrap();
        for route in RouteCatalog::default().iter() {
            assert!(scene.path(&route.path).is_some());
        }
        assert!(scene.node(AGENT).is_some());
    }
}
