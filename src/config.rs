//! Configuration with defaults reproducing the NavX pages.
//!
//! Everything can be overridden from json, missing fields keep their defaults:
//!
//! ```
//! use navpath::config::DashboardConfig;
//! use navpath::marker::WrapPolicy;
//!
//! let config = DashboardConfig::from_json(r#"{
//!     "rate_scale": 0.05,
//!     "animator": { "heading_offset": 90, "wrap": { "policy": "reset" } }
//! }"#).unwrap();
//! assert_eq!(config.rate_scale, 0.05);
//! assert_eq!(config.weather_slowdown, 0.6);
//! assert_eq!(config.animator.heading_offset, 90.0);
//! assert_eq!(config.animator.lookahead, 10.0);
//! assert_eq!(config.animator.wrap, WrapPolicy::Reset);
//! assert_eq!(config.routes.len(), 3);
//! ```

use crate::error::Error;
use crate::marker::{Stepping, WrapPolicy};
use crate::proximity::ProximityOptions;
use crate::telemetry::RouteCatalog;
use serde::{Deserialize, Serialize};

/// How markers move and are oriented.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorOptions {
    /// Fixed or elapsed time stepping
    pub stepping: Stepping,
    /// What happens at a path's end
    pub wrap: WrapPolicy,
    /// Distance ahead of the marker sampled to compute its heading
    pub lookahead: f64,
    /// Degrees added to the heading, for glyphs which don't point right
    pub heading_offset: f64,
    /// Rotate markers along their path, otherwise they are only translated
    pub orient: bool,
}

impl Default for AnimatorOptions {
    fn default() -> Self {
        AnimatorOptions {
            stepping: Stepping::Fixed,
            wrap: WrapPolicy::Reset,
            lookahead: 10.0,
            heading_offset: 0.0,
            orient: true,
        }
    }
}

/// Everything the dashboard needs besides the map's geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Options for the agent following the active route
    pub animator: AnimatorOptions,
    /// Converts a route's speed into length per frame
    pub rate_scale: f64,
    /// Speed factor of the agent in any weather but sun
    pub weather_slowdown: f64,
    /// Landmark highlighting
    pub proximity: ProximityOptions,
    /// Selectable routes
    pub routes: RouteCatalog,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            animator: AnimatorOptions {
                wrap: WrapPolicy::fade(),
                ..AnimatorOptions::default()
            },
            rate_scale: 0.025,
            weather_slowdown: 0.6,
            proximity: ProximityOptions::default(),
            routes: RouteCatalog::default(),
        }
    }
}

impl DashboardConfig {
    /// Reads a configuration from json
    pub fn from_json(json: &str) -> Result<DashboardConfig, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the configuration as pretty printed json
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
