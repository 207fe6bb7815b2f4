//! Routes, weather and the risk and speed figures derived from them.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Simulated weather condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// Clear sky, the reference condition without penalties
    Sun,
    /// Heavy rain
    Rain,
    /// Dense fog
    Fog,
    /// Light snow
    Snow,
}

impl Default for Weather {
    fn default() -> Self {
        Weather::Sun
    }
}

impl Weather {
    /// All conditions in the order the dashboard lists them
    pub const ALL: [Weather; 4] = [Weather::Sun, Weather::Rain, Weather::Fog, Weather::Snow];

    /// The lowercase name used in json and by the page's buttons
    pub fn name(&self) -> &'static str {
        match self {
            Weather::Sun => "sun",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
            Weather::Snow => "snow",
        }
    }

    /// What the weather panel shows for this condition
    pub fn readout(&self) -> WeatherReadout {
        let (temperature, description, overlay_opacity, advisory) = match self {
            Weather::Sun => (
                "27°",
                "CLEAR SKY // BRIGHT",
                0.0,
                "WX: Clear sky. Visibility optimal.",
            ),
            Weather::Rain => (
                "16°",
                "HEAVY RAIN // LOW TRACTION",
                0.38,
                "WX: Heavy precipitation. Reduce speed, increase following distance.",
            ),
            Weather::Fog => (
                "12°",
                "DENSE FOG // VIS LOW",
                1.0,
                "WX: Visibility degraded. Engaging enhanced caution protocols.",
            ),
            Weather::Snow => (
                "-2°",
                "LIGHT SNOW // COOL",
                0.9,
                "WX: Light snowfall. Monitoring surface accumulation.",
            ),
        };
        WeatherReadout {
            temperature,
            description,
            overlay_opacity,
            advisory,
            cautionary: *self != Weather::Sun,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weather {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weather::ALL
            .into_iter()
            .find(|weather| weather.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownWeather(s.to_string()))
    }
}

/// Display data of the weather panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeatherReadout {
    /// Temperature label
    pub temperature: &'static str,
    /// Short uppercase description
    pub description: &'static str,
    /// Opacity of the map's weather overlay
    pub overlay_opacity: f64,
    /// Console message announcing the weather
    pub advisory: &'static str,
    /// Whether the advisory is a warning
    pub cautionary: bool,
}

/// Descriptive texts of a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteConditions {
    /// Shape of the route
    pub base: String,
    /// Surroundings
    pub env: String,
    /// Notable features
    #[serde(default)]
    pub features: Vec<String>,
    /// Driving conditions per weather
    #[serde(default)]
    pub weather: BTreeMap<Weather, String>,
}

impl RouteConditions {
    /// Driving conditions in `weather`, falling back to sunny conditions
    pub fn detail(&self, weather: Weather) -> &str {
        self.weather
            .get(&weather)
            .or_else(|| self.weather.get(&Weather::Sun))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A selectable route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteProfile {
    /// Identifier used to select the route
    pub id: String,
    /// Id of the path the route is drawn as
    pub path: String,
    /// Risk score in clear weather, 0 to 10
    pub base_risk: f64,
    /// Speed in clear weather
    pub speed: f64,
    /// Risk added per weather condition
    #[serde(default)]
    pub weather_penalty: BTreeMap<Weather, f64>,
    /// Descriptive texts
    #[serde(default)]
    pub conditions: Option<RouteConditions>,
}

impl RouteProfile {
    /// Creates a route without any weather penalties
    pub fn new(id: impl Into<String>, path: impl Into<String>, base_risk: f64, speed: f64) -> Self {
        RouteProfile {
            id: id.into(),
            path: path.into(),
            base_risk,
            speed,
            weather_penalty: BTreeMap::new(),
            conditions: None,
        }
    }

    /// Adds a risk penalty for `weather`
    pub fn with_penalty(mut self, weather: Weather, penalty: f64) -> Self {
        self.weather_penalty.insert(weather, penalty);
        self
    }

    /// Attaches descriptive texts
    pub fn with_conditions(mut self, conditions: RouteConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Penalty for `weather`, missing ones count as zero
    pub fn penalty(&self, weather: Weather) -> f64 {
        self.weather_penalty.get(&weather).copied().unwrap_or(0.0)
    }
}

/// The routes a user can choose from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteCatalog(pub Vec<RouteProfile>);

impl RouteCatalog {
    /// Looks up a route by id
    pub fn get(&self, id: &str) -> Option<&RouteProfile> {
        self.0.iter().find(|route| route.id == id)
    }

    /// Looks up a route by id failing with [`Error::UnknownRoute`]
    pub fn route(&self, id: &str) -> Result<&RouteProfile, Error> {
        self.get(id).ok_or_else(|| Error::UnknownRoute(id.to_string()))
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no routes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the routes in order
    pub fn iter(&self) -> impl Iterator<Item = &RouteProfile> {
        self.0.iter()
    }
}

fn conditions(
    base: &str,
    env: &str,
    features: [&str; 2],
    weather: [&str; 4],
) -> RouteConditions {
    RouteConditions {
        base: base.to_string(),
        env: env.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        weather: Weather::ALL
            .into_iter()
            .zip(weather)
            .map(|(w, text)| (w, text.to_string()))
            .collect(),
    }
}

impl Default for RouteCatalog {
    /// The dashboard's three routes
    fn default() -> Self {
        use Weather::*;
        RouteCatalog(vec![
            RouteProfile::new("fastest", "path-fastest", 6.5, 80.0)
                .with_penalty(Rain, 2.5)
                .with_penalty(Fog, 4.0)
                .with_penalty(Snow, 3.2)
                .with_conditions(conditions(
                    "High-speed diagonal trunk route",
                    "Priority transit corridor",
                    ["Wide lanes", "Direct vector"],
                    [
                        "Dry surface / optimal traction",
                        "Wet asphalt / longer braking distance",
                        "Low visibility / adaptive slowdown",
                        "Reduced lane contrast / moderate slip risk",
                    ],
                )),
            RouteProfile::new("scenic", "path-scenic", 1.2, 45.0)
                .with_penalty(Rain, 1.0)
                .with_penalty(Fog, 1.5)
                .with_penalty(Snow, 1.8)
                .with_conditions(conditions(
                    "Lateral then vertical scenic sweep",
                    "Green belt + park corridors",
                    ["Tree canopy", "View nodes"],
                    [
                        "Clear view of landscape corridors",
                        "Puddling risk near mid spans",
                        "Obscured distant markers / moderate caution",
                        "Soft snowfall ambience / watch shaded patches",
                    ],
                )),
            RouteProfile::new("comfort", "path-comfort", 2.5, 55.0)
                .with_penalty(Rain, 1.5)
                .with_penalty(Fog, 2.0)
                .with_penalty(Snow, 2.2)
                .with_conditions(conditions(
                    "Stable L-shaped climb then traverse",
                    "Low-stress buffered zone",
                    ["Soft lighting", "Gentle turns"],
                    [
                        "Even lighting / smooth turns",
                        "Reduced corner speed / gentle acceleration",
                        "Maintain lane discipline / extended headway",
                        "Calm surface / slightly reduced acceleration",
                    ],
                )),
        ])
    }
}

/// Risk score above which the dashboard highlights it
pub const HIGH_RISK: f64 = 7.0;

/// Speed factor in any weather but sun
const WEATHER_SPEED_FACTOR: f64 = 0.7;

/// Derived risk and speed of a route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Telemetry {
    /// Risk score rounded to one decimal, at most 10
    pub risk: f64,
    /// Speed rounded down
    pub speed: u32,
}

impl Telemetry {
    /// Risk formatted with exactly one decimal
    pub fn risk_display(&self) -> String {
        format!("{:.1}", self.risk)
    }

    /// Whether the risk is high enough to be highlighted
    pub fn is_high_risk(&self) -> bool {
        self.risk > HIGH_RISK
    }
}

/// Computes a route's risk and speed in the given weather.
///
/// ```
/// use navpath::telemetry::{compute_telemetry, RouteProfile, Weather};
///
/// let route = RouteProfile::new("fastest", "path-fastest", 6.5, 80.0)
///     .with_penalty(Weather::Rain, 2.5);
/// let telemetry = compute_telemetry(&route, Weather::Rain);
/// assert_eq!(telemetry.risk, 9.0);
/// assert_eq!(telemetry.speed, 56);
/// assert_eq!(telemetry.risk_display(), "9.0");
/// ```
pub fn compute_telemetry(route: &RouteProfile, weather: Weather) -> Telemetry {
    let (penalty, factor) = match weather {
        Weather::Sun => (0.0, 1.0),
        other => (route.penalty(other), WEATHER_SPEED_FACTOR),
    };
    let risk = (route.base_risk + penalty).min(10.0);
    let speed = (route.speed * factor).floor().max(0.0);
    Telemetry {
        risk: round_tenths(risk),
        speed: speed as u32,
    }
}

/// Rounds to one decimal the way javascript's `toFixed(1)` does.
///
/// The exact binary value is rounded, so `1.15` (stored slightly below) becomes `1.1`.
/// Exact ties, i.e. odd multiples of `0.25`, round away from zero.
fn round_tenths(x: f64) -> f64 {
    let quarters = x * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (x * 10.0).round() / 10.0;
    }
    format!("{:.1}", x).parse().unwrap_or(x)
}
