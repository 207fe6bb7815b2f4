//! Driving markers along paths on a [`Surface`].
//!
//! Two drivers share the same per frame logic:
//! - [`Animator`] moves any number of independent tracks, each with its own path and rate.
//! - [`RouteAnimator`] moves a single agent along whichever route is selected right now.
//!
//! Neither returns errors: a path or node missing from the surface skips that unit for the frame.

use crate::config::{AnimatorOptions, DashboardConfig};
use crate::marker::{Frame, Marker};
use crate::path::heading;
use crate::selection::Selection;
use crate::surface::{Surface, Transform};
use crate::telemetry::{RouteCatalog, RouteProfile, Weather};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Distance a marker moves per frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    /// Length units per frame
    Length(f64),
    /// Fraction of the path's total length per frame
    Fraction(f64),
}

impl Rate {
    /// Length units per frame on a path of length `total`
    pub fn per_tick(&self, total: f64) -> f64 {
        match self {
            Rate::Length(length) => *length,
            Rate::Fraction(fraction) => fraction * total,
        }
    }
}

/// A marker bound to a path and a display node.
#[derive(Clone, Debug)]
pub struct Track {
    path: String,
    node: String,
    rate: Rate,
    marker: Marker,
}

impl Track {
    /// Creates a track whose marker starts at the path's beginning
    pub fn new(path: impl Into<String>, node: impl Into<String>, rate: Rate) -> Track {
        Track {
            path: path.into(),
            node: node.into(),
            rate,
            marker: Marker::new(),
        }
    }

    /// Id of the followed path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Id of the moved display node
    pub fn node(&self) -> &str {
        &self.node
    }

    /// The track's rate
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The track's marker state
    pub fn marker(&self) -> &Marker {
        &self.marker
    }
}

/// Animates several independent tracks.
///
/// ```
/// use navpath::animator::{Animator, Rate, Track};
/// use navpath::config::AnimatorOptions;
/// use navpath::marker::Frame;
/// use navpath::surface::Scene;
/// use navpath::Path;
///
/// let mut scene = Scene::new();
/// scene
///     .insert_path("line", Path::parse("M 0 0 L 100 0").unwrap())
///     .insert_node("robot");
///
/// let mut animator = Animator::new(AnimatorOptions::default())
///     .with_track(Track::new("line", "robot", Rate::Length(4.0)));
/// animator.tick(Frame::default(), &mut scene);
///
/// let transform = scene.node("robot").unwrap().transform.unwrap();
/// assert_eq!(transform.to_string(), "translate(4, 0) rotate(0)");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Animator {
    tracks: Vec<Track>,
    options: AnimatorOptions,
}

impl Animator {
    /// Creates an animator without tracks
    pub fn new(options: AnimatorOptions) -> Animator {
        Animator {
            tracks: Vec::new(),
            options,
        }
    }

    /// Adds a track
    pub fn with_track(mut self, track: Track) -> Animator {
        self.tracks.push(track);
        self
    }

    /// Adds a track
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// The animated tracks in insertion order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The options shared by all tracks
    pub fn options(&self) -> &AnimatorOptions {
        &self.options
    }

    /// Advances every track by one frame and places its node.
    ///
    /// Returns the number of nodes which were moved.
    pub fn tick<S: Surface + ?Sized>(&mut self, frame: Frame, surface: &mut S) -> usize {
        let options = &self.options;
        self.tracks
            .iter_mut()
            .map(|track| {
                drive(
                    surface,
                    &track.path,
                    &track.node,
                    &mut track.marker,
                    track.rate,
                    frame,
                    options,
                )
            })
            .filter(|moved| *moved)
            .count()
    }
}

/// Animates one agent along the selected route.
///
/// The route and its rate are looked up on every frame,
/// so a new selection takes effect on the next [`tick`](RouteAnimator::tick).
/// The marker keeps its progress across route changes.
#[derive(Clone, Debug)]
pub struct RouteAnimator {
    node: String,
    marker: Marker,
    options: AnimatorOptions,
    rate_scale: f64,
    weather_slowdown: f64,
}

impl RouteAnimator {
    /// Creates an animator moving the display node `node`
    pub fn new(node: impl Into<String>, config: &DashboardConfig) -> RouteAnimator {
        RouteAnimator {
            node: node.into(),
            marker: Marker::new(),
            options: config.animator,
            rate_scale: config.rate_scale,
            weather_slowdown: config.weather_slowdown,
        }
    }

    /// Id of the moved display node
    pub fn node(&self) -> &str {
        &self.node
    }

    /// The agent's marker state
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Length per frame on `route` in `weather`
    pub fn rate_for(&self, route: &RouteProfile, weather: Weather) -> f64 {
        let slowdown = match weather {
            Weather::Sun => 1.0,
            _ => self.weather_slowdown,
        };
        route.speed * slowdown * self.rate_scale
    }

    /// Advances the agent by one frame along the selected route.
    ///
    /// Returns whether the node was moved.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        frame: Frame,
        selection: &Selection,
        catalog: &RouteCatalog,
        surface: &mut S,
    ) -> bool {
        let route = match catalog.get(&selection.route) {
            Some(route) => route,
            None => {
                trace!(route = %selection.route, "route not in catalog, skipping frame");
                return false;
            }
        };
        let rate = Rate::Length(self.rate_for(route, selection.weather));
        drive(
            surface,
            &route.path,
            &self.node,
            &mut self.marker,
            rate,
            frame,
            &self.options,
        )
    }
}

/// Advances `marker` on the path `path` and places the node `node` accordingly.
///
/// The marker only moves while both the path and the node exist.
fn drive<S: Surface + ?Sized>(
    surface: &mut S,
    path: &str,
    node: &str,
    marker: &mut Marker,
    rate: Rate,
    frame: Frame,
    options: &AnimatorOptions,
) -> bool {
    let total = match surface.total_length(path) {
        Some(total) => total,
        None => {
            trace!(path, "path not found, skipping frame");
            return false;
        }
    };
    if !surface.has_node(node) {
        trace!(node, "marker node not found, skipping frame");
        return false;
    }

    let advance = marker.advance(frame, rate.per_tick(total), total, options);
    if let Some(opacity) = advance.opacity {
        if !surface.set_opacity(node, opacity) {
            trace!(node, "marker node not found, skipping frame");
            return false;
        }
    }
    let progress = match advance.render {
        Some(progress) => progress,
        None => return false,
    };

    let transform = match placement(&*surface, path, progress, total, options) {
        Some(transform) => transform,
        None => {
            trace!(path, progress, "path can't be sampled, skipping frame");
            return false;
        }
    };
    if !surface.set_transform(node, &transform) {
        trace!(node, "marker node not found, skipping frame");
        return false;
    }
    true
}

/// Computes a marker's transform at `progress`.
///
/// The heading points towards the sample `lookahead` further along the path.
/// Where both samples coincide, i.e. at the path's end, the tangent is used instead.
fn placement<S: Surface + ?Sized>(
    surface: &S,
    path: &str,
    progress: f64,
    total: f64,
    options: &AnimatorOptions,
) -> Option<Transform> {
    let here = surface.sample(path, progress)?;
    if !options.orient {
        return Some(Transform::translate(here.point));
    }
    let ahead = surface.sample(path, (progress + options.lookahead).min(total))?;
    let delta = ahead.point - here.point;
    let direction = if delta.norm_squared() > 1e-12 {
        delta
    } else {
        here.tangent
    };
    Some(Transform::translate_rotate(
        here.point,
        heading(&direction) + options.heading_offset,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Scene;
    use crate::Path;
    use nalgebra::Vector2;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene
            .insert_path("line", Path::parse("M 0 0 L 100 0").unwrap())
            .insert_path("down", Path::parse("M 0 0 L 0 50").unwrap())
            .insert_node("a")
            .insert_node("b");
        scene
    }

    fn frame(i: u64) -> Frame {
        Frame::at(std::time::Duration::from_millis(i * 16))
    }

    #[test]
    fn missing_ids_skip_only_their_track() {
        let mut scene = scene();
        let mut animator = Animator::new(AnimatorOptions::default())
            .with_track(Track::new("missing", "a", Rate::Length(1.0)))
            .with_track(Track::new("line", "missing", Rate::Length(1.0)))
            .with_track(Track::new("line", "b", Rate::Length(1.0)));
        assert_eq!(animator.tick(frame(0), &mut scene), 1);
        assert_eq!(scene.node("a").unwrap().transform, None);
        assert_eq!(
            scene.node("b").unwrap().transform.map(|t| t.translate),
            Some(Vector2::new(1.0, 0.0))
        );
        assert_eq!(animator.tracks()[0].marker().progress(), 0.0);
        assert_eq!(animator.tracks()[1].marker().progress(), 0.0);
        assert_eq!(animator.tracks()[2].marker().progress(), 1.0);
    }

    #[test]
    fn heading_uses_tangent_at_the_end() {
        let mut scene = scene();
        let options = AnimatorOptions {
            heading_offset: 90.0,
            ..AnimatorOptions::default()
        };
        let mut animator =
            Animator::new(options).with_track(Track::new("down", "a", Rate::Length(45.0)));
        animator.tick(frame(0), &mut scene);
        let transform = scene.node("a").unwrap().transform.unwrap();
        assert_eq!(transform.rotate, Some(180.0));

        // 45 + 10 is clamped to 50, the lookahead is only 5 long
        let placed = placement(&scene, "down", 49.999_999_999_999, 50.0, &options).unwrap();
        assert_eq!(placed.rotate, Some(180.0));
        let placed = placement(&scene, "down", 50.0, 50.0, &options).unwrap();
        assert_eq!(placed.rotate, Some(180.0));
    }

    #[test]
    fn translate_only() {
        let mut scene = scene();
        let options = AnimatorOptions {
            orient: false,
            ..AnimatorOptions::default()
        };
        let mut animator =
            Animator::new(options).with_track(Track::new("line", "a", Rate::Fraction(0.25)));
        animator.tick(frame(0), &mut scene);
        let transform = scene.node("a").unwrap().transform.unwrap();
        assert_eq!(transform.to_string(), "translate(25, 0)");
    }

    #[test]
    fn fading_agent_sets_opacity() {
        let mut scene = scene();
        let options = AnimatorOptions {
            wrap: crate::marker::WrapPolicy::fade(),
            ..AnimatorOptions::default()
        };
        let mut animator =
            Animator::new(options).with_track(Track::new("line", "a", Rate::Length(60.0)));
        assert_eq!(animator.tick(frame(0), &mut scene), 1);
        assert_eq!(animator.tick(frame(1), &mut scene), 0);
        assert_eq!(scene.node("a").unwrap().opacity, 0.0);
        // Still placed where it was last rendered
        assert_eq!(
            scene.node("a").unwrap().transform.map(|t| t.translate),
            Some(Vector2::new(60.0, 0.0))
        );
    }

    #[test]
    fn route_rate_follows_selection() {
        let mut scene = Scene::new();
        scene
            .insert_path("path-fastest", Path::parse("M 0 0 L 1000 0").unwrap())
            .insert_path("path-scenic", Path::parse("M 0 0 L 0 1000").unwrap())
            .insert_node("agent");
        let config = DashboardConfig::default();
        let catalog = &config.routes;
        let mut agent = RouteAnimator::new("agent", &config);

        let fastest = Selection::default();
        assert_eq!(agent.rate_for(catalog.route("fastest").unwrap(), Weather::Sun), 2.0);
        assert!(agent.tick(frame(0), &fastest, catalog, &mut scene));
        assert_eq!(agent.marker().progress(), 2.0);

        // Switching takes effect on the next frame and keeps the progress
        let scenic = Selection {
            route: "scenic".to_string(),
            weather: Weather::Rain,
        };
        assert!(agent.tick(frame(1), &scenic, catalog, &mut scene));
        let expected = 2.0 + 45.0 * 0.6 * 0.025;
        assert!((agent.marker().progress() - expected).abs() < 1e-12);
        let transform = scene.node("agent").unwrap().transform.unwrap();
        assert!((transform.translate.y - expected).abs() < 1e-12);
        assert_eq!(transform.rotate, Some(90.0));

        // The comfort route has no path in this scene
        let comfort = Selection {
            route: "comfort".to_string(),
            weather: Weather::Sun,
        };
        assert!(!agent.tick(frame(2), &comfort, catalog, &mut scene));
        let unknown = Selection {
            route: "offroad".to_string(),
            weather: Weather::Sun,
        };
        assert!(!agent.tick(frame(3), &unknown, catalog, &mut scene));
    }
}
