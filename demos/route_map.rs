//! Renders the dashboard's route map after a few seconds of animation.
//!
//! `cargo run --example route_map --features draw-svg > map.svg`,
//! set `RUST_LOG=navpath=trace` to see every skipped frame.

use nalgebra::Vector2;
use navpath::animator::RouteAnimator;
use navpath::config::DashboardConfig;
use navpath::marker::Frame;
use navpath::presets::{self, AGENT, SIMULATION};
use navpath::proximity::{landmarks_near, Landmark};
use navpath::selection::{Command, Selection, STARTUP_MESSAGE};
use navpath::surface::Scene;
use navpath::telemetry::Weather;
use std::error::Error;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[path = "../src/svg.rs"]
mod svg;
use svg::{Circle, SVG};

const FRAME: Duration = Duration::from_millis(16);

fn frames(count: u32) -> impl Iterator<Item = Frame> {
    (0..count).map(|i| Frame::at(FRAME * i))
}

fn draw_scene(svg: &mut SVG, scene: &Scene, colors: &[(&str, &'static str)]) {
    for (id, color) in colors {
        if let Some(route) = scene.path(id) {
            svg.debug_route(id, route, color);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("navpath=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Dashboard: one agent on the selected route
    let config = DashboardConfig::default();
    let mut scene = presets::dashboard_scene()?;
    let mut agent = RouteAnimator::new(AGENT, &config);
    info!("{}", STARTUP_MESSAGE);

    let mut selection = Selection::default();
    for command in [
        Command::SelectRoute("scenic".to_string()),
        Command::SetWeather(Weather::Rain),
    ] {
        let transition = selection.apply(command, &config.routes)?;
        info!(
            risk = %transition.telemetry.risk_display(),
            speed = transition.telemetry.speed,
            "telemetry"
        );
        eprintln!("{}", transition.status);
        selection = transition.selection;
    }
    for frame in frames(240) {
        agent.tick(frame, &selection, &config.routes, &mut scene);
    }

    let buildings = [
        Landmark::new("depot", 120.0, 300.0),
        Landmark::new("tower", 380.0, 300.0),
        Landmark::new("plaza", 250.0, 80.0),
        Landmark::new("harbor", 560.0, 200.0),
    ];
    let route = config.routes.route(&selection.route)?;
    let near = match scene.path(&route.path) {
        Some(path) => landmarks_near(path, &buildings, &config.proximity),
        None => Vec::new(),
    };

    let mut svg = SVG {
        view_box: (0.0, 0.0, 600.0, 400.0),
        elements: Vec::new(),
    };
    draw_scene(
        &mut svg,
        &scene,
        &[
            ("path-fastest", "#d33"),
            ("path-scenic", "#3a3"),
            ("path-comfort", "#33d"),
        ],
    );
    for building in buildings.iter() {
        let highlighted = near.iter().any(|b| b.id == building.id);
        svg.add_elem(Circle {
            center: building.position,
            radius: 6.0,
            color: if highlighted { "orange" } else { "gray" },
        });
    }
    if let Some(node) = scene.node(AGENT) {
        if let Some(transform) = node.transform {
            svg.add_marker(transform, node.opacity, "black");
        }
    }

    // Landing page: three robots racing, drawn below the dashboard
    let mut simulation = presets::simulation_scene()?;
    let mut animator = presets::simulation_animator();
    for frame in frames(90) {
        animator.tick(frame, &mut simulation);
    }
    let offset = Vector2::new(0.0, 400.0);
    svg.view_box.3 += 400.0;
    for preset in SIMULATION.iter() {
        if let (Some(route), Some(robot)) = (simulation.path(preset.path), simulation.node(preset.node)) {
            let shifted = navpath::Path::from_curves(route.segments().iter().map(|segment| {
                let mut curve = segment.curve().clone();
                curve.iter_mut().for_each(|p| *p += offset);
                curve
            }));
            svg.add_route(preset.path, &shifted, "gray");
            if let Some(mut transform) = robot.transform {
                transform.translate += offset;
                svg.add_marker(transform, robot.opacity, "teal");
            }
            info!(route = preset.name, d = preset.d, "simulated");
        }
    }

    println!("{}", svg);
    Ok(())
}
