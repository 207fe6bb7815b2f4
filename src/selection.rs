//! The dashboard's state as an immutable value updated by commands.
//!
//! ```
//! use navpath::selection::{Command, Selection};
//! use navpath::telemetry::{RouteCatalog, Weather};
//!
//! let catalog = RouteCatalog::default();
//! let transition = Selection::default()
//!     .apply(Command::SetWeather(Weather::Rain), &catalog)
//!     .unwrap();
//! assert_eq!(transition.selection.weather, Weather::Rain);
//! assert_eq!(transition.telemetry.risk_display(), "9.0");
//! assert_eq!(transition.telemetry.speed, 56);
//! ```

use crate::error::Error;
use crate::telemetry::{compute_telemetry, RouteCatalog, Telemetry, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Currently selected route and weather.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Id of the active route
    pub route: String,
    /// Current weather
    pub weather: Weather,
}

impl Default for Selection {
    /// The fastest route in sunshine, which the dashboard starts with
    fn default() -> Self {
        Selection {
            route: "fastest".to_string(),
            weather: Weather::Sun,
        }
    }
}

/// A user action changing the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Make another route active
    SelectRoute(String),
    /// Change the simulated weather
    SetWeather(Weather),
}

/// Severity of a console entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// Informational message
    Info,
    /// Warning
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "info",
            Level::Warn => "warn",
        })
    }
}

/// A line for the dashboard's console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleEntry {
    /// Severity
    pub level: Level,
    /// Message text
    pub message: String,
}

impl ConsoleEntry {
    fn new(level: Level, message: impl Into<String>) -> ConsoleEntry {
        let entry = ConsoleEntry {
            level,
            message: message.into(),
        };
        match level {
            Level::Info => info!(target: "navpath::console", "{}", entry.message),
            Level::Warn => warn!(target: "navpath::console", "{}", entry.message),
        }
        entry
    }
}

/// Message logged once the dashboard is ready
pub const STARTUP_MESSAGE: &str = "System Online. Connected to NavX Cloud.";

/// Everything that changes when a command is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// The new selection
    pub selection: Selection,
    /// Telemetry of the new selection
    pub telemetry: Telemetry,
    /// Entries to append to the console
    pub console: Vec<ConsoleEntry>,
    /// Text of the route status panel
    pub status: String,
}

impl Selection {
    /// Applies a command returning the new state.
    ///
    /// Selecting a route which isn't in `catalog` fails with [`Error::UnknownRoute`],
    /// `self` is never modified.
    pub fn apply(&self, command: Command, catalog: &RouteCatalog) -> Result<Transition, Error> {
        let (selection, console) = match command {
            Command::SelectRoute(route) => {
                catalog.route(&route)?;
                let message = format!("Rerouting: {} profile active.", route.to_uppercase());
                let selection = Selection {
                    route,
                    weather: self.weather,
                };
                (selection, vec![ConsoleEntry::new(Level::Info, message)])
            }
            Command::SetWeather(weather) => {
                let readout = weather.readout();
                let level = if readout.cautionary {
                    Level::Warn
                } else {
                    Level::Info
                };
                let selection = Selection {
                    route: self.route.clone(),
                    weather,
                };
                (selection, vec![ConsoleEntry::new(level, readout.advisory)])
            }
        };
        debug!(route = %selection.route, weather = %selection.weather, "selection changed");

        let telemetry = selection.telemetry(catalog)?;
        let status = selection.route_status(catalog);
        Ok(Transition {
            selection,
            telemetry,
            console,
            status,
        })
    }

    /// Telemetry of the selected route in the selected weather
    pub fn telemetry(&self, catalog: &RouteCatalog) -> Result<Telemetry, Error> {
        Ok(compute_telemetry(catalog.route(&self.route)?, self.weather))
    }

    /// Text of the route status panel.
    ///
    /// `"No data"` if the route is unknown or has no descriptive texts.
    pub fn route_status(&self, catalog: &RouteCatalog) -> String {
        let conditions = match catalog.get(&self.route).and_then(|r| r.conditions.as_ref()) {
            Some(conditions) => conditions,
            None => return "No data".to_string(),
        };
        format!(
            "{} // {}\n{}\nWX: {}\nFEAT: {}",
            self.route.to_uppercase(),
            conditions.env,
            conditions.base,
            conditions.detail(self.weather),
            conditions.features.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::RouteProfile;

    #[test]
    fn select_route() {
        let catalog = RouteCatalog::default();
        let start = Selection::default();
        let transition = start
            .apply(Command::SelectRoute("scenic".to_string()), &catalog)
            .unwrap();
        assert_eq!(transition.selection.route, "scenic");
        assert_eq!(transition.selection.weather, Weather::Sun);
        assert_eq!(
            transition.console,
            [ConsoleEntry {
                level: Level::Info,
                message: "Rerouting: SCENIC profile active.".to_string()
            }]
        );
        assert_eq!(transition.telemetry.risk, 1.2);
        assert_eq!(transition.telemetry.speed, 45);
        assert_eq!(start, Selection::default());
    }

    #[test]
    fn set_weather_warns() {
        let catalog = RouteCatalog::default();
        let transition = Selection::default()
            .apply(Command::SetWeather(Weather::Fog), &catalog)
            .unwrap();
        assert_eq!(transition.console[0].level, Level::Warn);
        assert_eq!(
            transition.console[0].message,
            "WX: Visibility degraded. Engaging enhanced caution protocols."
        );
        assert_eq!(transition.telemetry.risk_display(), "10.0");
        assert!(transition.telemetry.is_high_risk());

        let transition = transition
            .selection
            .apply(Command::SetWeather(Weather::Sun), &catalog)
            .unwrap();
        assert_eq!(transition.console[0].level, Level::Info);
        assert_eq!(transition.console[0].message, "WX: Clear sky. Visibility optimal.");
    }

    #[test]
    fn unknown_route_keeps_selection() {
        let catalog = RouteCatalog::default();
        let start = Selection::default();
        let result = start.apply(Command::SelectRoute("offroad".to_string()), &catalog);
        assert!(matches!(result, Err(Error::UnknownRoute(id)) if id == "offroad"));
        assert_eq!(start.route, "fastest");
    }

    #[test]
    fn route_status_text() {
        let catalog = RouteCatalog::default();
        let selection = Selection {
            route: "comfort".to_string(),
            weather: Weather::Snow,
        };
        assert_eq!(
            selection.route_status(&catalog),
            "COMFORT // Low-stress buffered zone\n\
             Stable L-shaped climb then traverse\n\
             WX: Calm surface / slightly reduced acceleration\n\
             FEAT: Soft lighting, Gentle turns"
        );

        let bare = RouteCatalog(vec![RouteProfile::new("bare", "path-bare", 1.0, 10.0)]);
        let selection = Selection {
            route: "bare".to_string(),
            weather: Weather::Sun,
        };
        assert_eq!(selection.route_status(&bare), "No data");
        assert_eq!(Level::Warn.to_string(), "warn");
    }
}
