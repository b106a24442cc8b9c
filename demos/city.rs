use chrono::TimeZone;
use chrono_tz::America::Chicago;

use solar_panel_sim::render::RenderSink;
use solar_panel_sim::scene::{compass_markers, BoxScene};
use solar_panel_sim::types::{FrameTime, PanelId, Rgb, SimulationConfig, Sky};
use solar_panel_sim::{DQuat, DVec3, Simulation};

struct Console;

impl RenderSink for Console {
    fn set_sky(&mut self, sky: &Sky) {
        println!(
            "Sky: altitude {:.2}°, azimuth {:.2}° (0°=N, 90°=E, 180°=S)",
            sky.angles.altitude_deg(),
            sky.angles.azimuth_deg()
        );
        println!(
            "     sun at ({:.1}, {:.1}, {:.1}), ambient {:.3}, sun {}, background {}",
            sky.direction.x,
            sky.direction.y,
            sky.direction.z,
            sky.appearance.ambient_intensity,
            sky.appearance.sun_color.to_hex(),
            sky.appearance.background_color.to_hex()
        );
    }

    fn set_panel_transform(&mut self, id: PanelId, position: DVec3, orientation: DQuat) {
        let up = orientation * DVec3::Y;
        println!(
            "Panel {}: at ({:.1}, {:.1}, {:.1}), facing ({:.3}, {:.3}, {:.3})",
            id, position.x, position.y, position.z, up.x, up.y, up.z
        );
    }

    fn set_panel_material(&mut self, id: PanelId, color: Rgb, efficiency: f64) {
        println!(
            "Panel {}: Efficiency: {:.2}% ({})",
            id,
            efficiency * 100.0,
            color.to_hex()
        );
    }
}

fn main() {
    let scene = BoxScene::toy_city();
    let mut sim = Simulation::from_inputs(SimulationConfig::default(), "2026-03-21", "12:00").unwrap();

    // Springfield, IL at local noon
    sim.set_location(39.8, -89.6).unwrap();
    sim.set_instant(&Chicago.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap())
        .unwrap();

    println!("=== Toy City Solar Panels ===");
    for (compass, at) in compass_markers(6.0, 0.0) {
        println!("Marker {} at ({:.0}, {:.0})", compass.label(), at.x, at.z);
    }
    println!();

    // One on the tallest roof, one in its shadow, one in the open
    for (x, z) in [(2.0, 2.0), (2.0, 3.5), (-4.0, 4.0)] {
        if let Some(point) = scene.pick(x, z) {
            sim.place_panel(point).unwrap();
        }
    }

    let dt = 1.0 / 60.0;
    for step in [1, 10, 60, 240] {
        while sim.frame_count() < step {
            let elapsed = sim.frame_count() as f64 * dt;
            sim.frame(FrameTime::new(dt, elapsed), &scene);
        }
        println!("--- After {} frames ---", step);
        sim.present(&mut Console);
        println!();
    }

    // Midnight in Springfield; the simulation clock runs in UTC
    sim.set_time("05:00").unwrap();
    sim.frame(FrameTime::new(dt, 240.0 * dt), &scene);
    println!("--- Night ---");
    sim.present(&mut Console);
}
