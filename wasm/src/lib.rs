use nalgebra::Vector2;
use navpath::animator::{Animator, RouteAnimator};
use navpath::config::DashboardConfig;
use navpath::marker::Frame;
use navpath::path::Sample;
use navpath::presets::{self, SIMULATION};
use navpath::proximity::{landmarks_near, Landmark};
use navpath::selection::{
    Command, ConsoleEntry, Level, Selection, Transition, STARTUP_MESSAGE,
};
use navpath::surface::{Surface, Transform};
use navpath::telemetry::{Telemetry, Weather};
use navpath::Path;
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, SvgGeometryElement};

/// Distance between the two points used to estimate a tangent
const TANGENT_DELTA: f64 = 0.5;

/// Widest window still considered a small screen
const COMPACT_WIDTH: f64 = 768.0;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

#[derive(Deserialize)]
pub struct Building {
    pub id: String,
    pub x: f64,
    pub y: f64,
}
impl From<Building> for Landmark {
    fn from(b: Building) -> Self {
        Landmark::new(b.id, b.x, b.y)
    }
}

/// [`Surface`] over the page's svg elements, looked up by id on every call.
struct DomSurface {
    document: Document,
}

impl DomSurface {
    fn geometry(&self, id: &str) -> Option<SvgGeometryElement> {
        self.document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn point(geometry: &SvgGeometryElement, offset: f64) -> Option<Vector2<f64>> {
        let point = geometry.get_point_at_length(offset as f32).ok()?;
        Some(Vector2::new(point.x() as f64, point.y() as f64))
    }

    fn set_attribute(&self, node: &str, name: &str, value: &str) -> bool {
        match self.document.get_element_by_id(node) {
            Some(element) => element.set_attribute(name, value).is_ok(),
            None => false,
        }
    }
}

impl Surface for DomSurface {
    fn total_length(&self, path: &str) -> Option<f64> {
        Some(self.geometry(path)?.get_total_length() as f64)
    }

    fn sample(&self, path: &str, offset: f64) -> Option<Sample> {
        let geometry = self.geometry(path)?;
        let total = geometry.get_total_length() as f64;
        let point = Self::point(&geometry, offset)?;

        // The browser has no tangent query, difference two close points instead
        let (from, to) = if offset + TANGENT_DELTA <= total {
            (offset, offset + TANGENT_DELTA)
        } else {
            ((offset - TANGENT_DELTA).max(0.0), offset)
        };
        let direction = Self::point(&geometry, to)? - Self::point(&geometry, from)?;
        Some(Sample::new(point, direction))
    }

    fn has_node(&self, node: &str) -> bool {
        self.document.get_element_by_id(node).is_some()
    }

    fn set_transform(&mut self, node: &str, transform: &Transform) -> bool {
        self.set_attribute(node, "transform", &transform.to_string())
    }

    fn set_opacity(&mut self, node: &str, opacity: f64) -> bool {
        self.set_attribute(node, "opacity", &opacity.to_string())
    }
}

/// Calls `on_frame` with every `requestAnimationFrame` timestamp until the returned flag is cleared.
fn animation_loop<F: FnMut(f64) + 'static>(mut on_frame: F) -> Result<Rc<Cell<bool>>, JsValue> {
    let running = Rc::new(Cell::new(true));
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

    let flag = running.clone();
    let next = callback.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        if !flag.get() {
            // Drops this closure, nothing references it anymore
            let _ = next.borrow_mut().take();
            return;
        }
        on_frame(timestamp);
        if let Some(closure) = next.borrow().as_ref() {
            if let Err(err) = request_animation_frame(closure) {
                warn!(?err, "animation loop stopped");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(closure) = callback.borrow().as_ref() {
        request_animation_frame(closure)?;
    }
    Ok(running)
}

fn request_animation_frame(closure: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}

/// The dashboard's selection and everything derived from it.
struct Controls {
    config: DashboardConfig,
    selection: Selection,
    telemetry: Telemetry,
    status: String,
    console: Vec<ConsoleEntry>,
}

impl Controls {
    fn new(config: DashboardConfig) -> Result<Controls, navpath::Error> {
        let selection = Selection::default();
        let telemetry = selection.telemetry(&config.routes)?;
        let status = selection.route_status(&config.routes);
        info!("{}", STARTUP_MESSAGE);
        Ok(Controls {
            config,
            selection,
            telemetry,
            status,
            console: vec![ConsoleEntry {
                level: Level::Info,
                message: STARTUP_MESSAGE.to_string(),
            }],
        })
    }

    fn apply(&mut self, command: Command) -> Result<(), navpath::Error> {
        let Transition {
            selection,
            telemetry,
            console,
            status,
        } = self.selection.apply(command, &self.config.routes)?;
        self.selection = selection;
        self.telemetry = telemetry;
        self.status = status;
        self.console.extend(console);
        Ok(())
    }

    /// Console entries written since the last call
    fn drain_console(&mut self) -> Vec<ConsoleEntry> {
        std::mem::take(&mut self.console)
    }
}

struct DashboardState {
    controls: Controls,
    agent: RouteAnimator,
    surface: DomSurface,
    landmarks: Vec<Landmark>,
}

/// The dashboard's agent, telemetry and route status.
#[wasm_bindgen]
pub struct Dashboard {
    state: Rc<RefCell<DashboardState>>,
    running: Option<Rc<Cell<bool>>>,
}

#[wasm_bindgen]
impl Dashboard {
    /// Creates a dashboard moving the svg element `agent`.
    ///
    /// `config` is an optional json configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(agent: &str, config: Option<String>) -> Result<Dashboard, JsValue> {
        let mut config = match config {
            Some(json) => DashboardConfig::from_json(&json).map_err(to_js)?,
            None => DashboardConfig::default(),
        };
        if let Some(width) = web_sys::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|width| width.as_f64())
        {
            config.proximity.compact = width <= COMPACT_WIDTH;
        }

        let state = DashboardState {
            agent: RouteAnimator::new(agent, &config),
            surface: DomSurface {
                document: document()?,
            },
            controls: Controls::new(config).map_err(to_js)?,
            landmarks: Vec::new(),
        };
        Ok(Dashboard {
            state: Rc::new(RefCell::new(state)),
            running: None,
        })
    }

    #[wasm_bindgen(js_name = setRoute)]
    pub fn set_route(&self, id: &str) -> Result<(), JsValue> {
        self.state
            .borrow_mut()
            .controls
            .apply(Command::SelectRoute(id.to_string()))
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = setWeather)]
    pub fn set_weather(&self, weather: &str) -> Result<(), JsValue> {
        let weather: Weather = weather.parse().map_err(to_js)?;
        self.state
            .borrow_mut()
            .controls
            .apply(Command::SetWeather(weather))
            .map_err(to_js)
    }

    /// Console lines written since the last call, an array of `{ level, message }`
    #[wasm_bindgen(js_name = drainConsole)]
    pub fn drain_console(&self) -> Result<js_sys::Array, JsValue> {
        let lines = js_sys::Array::new();
        for entry in self.state.borrow_mut().controls.drain_console() {
            let line = js_sys::Object::new();
            js_sys::Reflect::set(&line, &"level".into(), &entry.level.to_string().into())?;
            js_sys::Reflect::set(&line, &"message".into(), &entry.message.into())?;
            lines.push(&line);
        }
        Ok(lines)
    }

    #[wasm_bindgen(getter)]
    pub fn route(&self) -> String {
        self.state.borrow().controls.selection.route.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn weather(&self) -> String {
        self.state.borrow().controls.selection.weather.to_string()
    }

    #[wasm_bindgen(js_name = riskDisplay)]
    pub fn risk_display(&self) -> String {
        self.state.borrow().controls.telemetry.risk_display()
    }

    #[wasm_bindgen(js_name = isHighRisk)]
    pub fn is_high_risk(&self) -> bool {
        self.state.borrow().controls.telemetry.is_high_risk()
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> u32 {
        self.state.borrow().controls.telemetry.speed
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.state.borrow().controls.status.clone()
    }

    #[wasm_bindgen(js_name = temperature)]
    pub fn temperature(&self) -> String {
        self.state.borrow().controls.selection.weather.readout().temperature.to_string()
    }

    #[wasm_bindgen(js_name = weatherDescription)]
    pub fn weather_description(&self) -> String {
        self.state.borrow().controls.selection.weather.readout().description.to_string()
    }

    #[wasm_bindgen(js_name = overlayOpacity)]
    pub fn overlay_opacity(&self) -> f64 {
        self.state.borrow().controls.selection.weather.readout().overlay_opacity
    }

    /// Sets the buildings, an array of `{ id, x, y }`
    #[wasm_bindgen(js_name = setLandmarks)]
    pub fn set_landmarks(&self, buildings: &JsValue) -> Result<(), JsValue> {
        let json: String = js_sys::JSON::stringify(buildings)?.into();
        let buildings: Vec<Building> = serde_json::from_str(&json).map_err(to_js)?;
        self.state.borrow_mut().landmarks = buildings.into_iter().map(Landmark::from).collect();
        Ok(())
    }

    /// Ids of the buildings near the active route
    #[wasm_bindgen(js_name = nearLandmarks)]
    pub fn near_landmarks(&self) -> js_sys::Array {
        let state = self.state.borrow();
        let ids = js_sys::Array::new();
        let controls = &state.controls;
        let route = match controls.config.routes.get(&controls.selection.route) {
            Some(route) => route,
            None => return ids,
        };
        let path = match state
            .surface
            .geometry(&route.path)
            .and_then(|geometry| geometry.get_attribute("d"))
            .and_then(|d| Path::parse(&d).ok())
        {
            Some(path) => path,
            None => return ids,
        };
        for landmark in landmarks_near(&path, &state.landmarks, &controls.config.proximity) {
            ids.push(&JsValue::from_str(&landmark.id));
        }
        ids
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.running.as_ref().map_or(false, |running| running.get()) {
            return Ok(());
        }
        let state = self.state.clone();
        self.running = Some(animation_loop(move |timestamp| {
            let mut state = state.borrow_mut();
            let DashboardState {
                controls,
                agent,
                surface,
                ..
            } = &mut *state;
            agent.tick(
                Frame::from_millis(timestamp),
                &controls.selection,
                &controls.config.routes,
                surface,
            );
        })?);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.set(false);
        }
    }
}

/// The landing page's three robots.
#[wasm_bindgen]
pub struct Simulation {
    animator: Rc<RefCell<Animator>>,
    running: Option<Rc<Cell<bool>>>,
}

#[wasm_bindgen]
impl Simulation {
    /// Draws the routes into the page's `path-*` elements
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Simulation, JsValue> {
        let document = document()?;
        for preset in SIMULATION.iter() {
            if let Some(path) = document.get_element_by_id(preset.path) {
                path.set_attribute("d", preset.d)?;
            }
        }
        Ok(Simulation {
            animator: Rc::new(RefCell::new(presets::simulation_animator())),
            running: None,
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.running.as_ref().map_or(false, |running| running.get()) {
            return Ok(());
        }
        let animator = self.animator.clone();
        let mut surface = DomSurface {
            document: document()?,
        };
        self.running = Some(animation_loop(move |timestamp| {
            animator
                .borrow_mut()
                .tick(Frame::from_millis(timestamp), &mut surface);
        })?);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.set(false);
        }
    }
}
