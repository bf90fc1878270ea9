use nalgebra::Vector3;

use hover_sim::control::{HoverControlSystem, PilotInput};
use hover_sim::dynamics::state::SimConfig;
use hover_sim::sim::{simulate_with, FlightPlan};
use hover_sim::vehicle::presets;
use hover_sim::world::Environment;

/// Terrain-follow flight from a shoreline out over open water. Past the
/// shore the altimeter ray stops hitting solid ground and the height hold
/// runs on the sea-level fallback instead.
fn main() {
    let craft = presets::skimmer();
    let env = Environment::coastline();
    let config = SimConfig { dt: 0.02, max_time: 90.0 };

    let hover = PilotInput { hover: true, ..Default::default() };
    let cruise = PilotInput { accel: 1.0, hover: true, ..Default::default() };
    // The shore stands 10 m above the datum at x = -200.
    let plan = FlightPlan::new(Vector3::new(-200.0, 0.0, 14.0))
        .until(10.0, hover)
        .until(f64::MAX, cruise);

    let mut system = HoverControlSystem::new(&craft);
    system.set_target_height(8.0);
    let (trajectory, logs) = simulate_with(&craft, &env, &plan, &config, &mut system);

    println!("Crossing the shoreline (terrain-follow mode):");
    println!("{:>8}  {:>9}  {:>8}  {:>8}  {:>9}", "t (s)", "east (m)", "alt (m)", "AGL (m)", "surface");
    let sample = (trajectory.len() / 25).max(1);
    for (i, (s, log)) in trajectory.iter().zip(&logs).enumerate() {
        if i % sample != 0 && i != trajectory.len() - 1 {
            continue;
        }
        let solid = env.terrain.surface_height(s.pos.x, s.pos.y);
        let surface = if solid > 0.0 { "land" } else { "water" };
        println!(
            "{:>8.1}  {:>9.1}  {:>8.2}  {:>8.2}  {:>9}",
            s.time, s.pos.x, s.pos.z, log.agl, surface
        );
    }

    let last = trajectory.last().unwrap();
    let end_agl = logs.last().unwrap().agl;
    println!();
    println!(
        "Ended at x = {:.0} m after {:.0} s, {:.1} m above the {}",
        last.pos.x,
        last.time,
        end_agl,
        if env.terrain.surface_height(last.pos.x, last.pos.y) > 0.0 { "ground" } else { "water" }
    );
}
