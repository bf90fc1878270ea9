use nalgebra::Vector3;

use hover_sim::control::{HoverControlSystem, PilotInput};
use hover_sim::dynamics::state::SimConfig;
use hover_sim::io::FlightSummary;
use hover_sim::sim::event::{EventDetector, SettleDetector, TouchdownDetector};
use hover_sim::sim::{simulate_with, FlightPlan};
use hover_sim::vehicle::presets;
use hover_sim::world::Environment;

fn main() {
    // -----------------------------------------------------------------------
    // Craft: "Dunefly" four-engine skimmer over rolling dunes
    // -----------------------------------------------------------------------
    let craft = presets::skimmer();
    let env = Environment::temperate_dunes();
    let config = SimConfig {
        dt: 0.02,
        max_time: 60.0,
    };

    const TARGET: f64 = 6.0;

    let hover = PilotInput { hover: true, ..Default::default() };
    let cruise = PilotInput { accel: 1.0, hover: true, ..Default::default() };
    let brake = PilotInput { brake: true, hover: true, ..Default::default() };
    let turn = PilotInput { steer: 1.0, hover: true, ..Default::default() };

    // Climb to the hover band, cruise over the dunes, brake, pirouette, hold.
    let plan = FlightPlan::new(Vector3::new(0.0, 0.0, 2.0))
        .until(12.0, hover)
        .until(30.0, cruise)
        .until(38.0, brake)
        .until(46.0, turn)
        .until(f64::MAX, hover);

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut system = HoverControlSystem::new(&craft);
    system.set_target_height(TARGET);
    let (trajectory, logs) = simulate_with(&craft, &env, &plan, &config, &mut system);
    let summary = FlightSummary::from_run(&trajectory, &logs);

    // -----------------------------------------------------------------------
    // Scan for events
    // -----------------------------------------------------------------------
    let mut detectors: Vec<(&str, Box<dyn EventDetector>)> = vec![
        ("SETTLED", Box::new(SettleDetector::new(TARGET, 0.6, 2.0))),
        ("TOUCHDOWN", Box::new(TouchdownDetector::new())),
    ];
    let mut events = Vec::new();
    for pair in trajectory.windows(2) {
        for (label, det) in detectors.iter_mut() {
            if det.check(&pair[0], &pair[1], &env).is_some() {
                events.push((pair[1].time, *label));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  HOVER FLIGHT SIMULATION — {}", craft.name);
    println!("====================================================================");
    println!();
    println!("  Craft Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Engines:      {:>8}",
        craft.mass,
        craft.engines.len()
    );
    println!(
        "  Total thrust:  {:>8.0} N     TWR:          {:>8.2}",
        craft.total_thrust(),
        craft.twr(env.body.gravity)
    );
    println!(
        "  Hover throttle:{:>8.3}       Target AGL:   {:>8.1} m",
        craft.hover_throttle(env.body.gravity),
        TARGET
    );
    println!(
        "  Body:          {:>8}       Gravity:      {:>8.2} m/s^2",
        env.body.name, env.body.gravity
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for (time, label) in &events {
        println!("  {:<10} t={:>6.1}s", label, time);
    }
    if events.is_empty() {
        println!("  (none)");
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    match summary.settle_time {
        Some(t) => println!("  Settled at:    {:>8.1} s", t),
        None => println!("  Settled at:        never"),
    }
    println!("  Height error:  {:>8.2} m  (mean abs, after settle)", summary.mean_abs_error);
    println!("  Max tilt:      {:>8.1} deg", summary.max_tilt_deg);
    println!("  Peak throttle: {:>8.3}", summary.peak_throttle);
    println!("  Top speed:     {:>8.1} m/s", summary.max_ground_speed);
    println!("  Flight time:   {:>8.1} s", summary.flight_time);
    println!();

    // -----------------------------------------------------------------------
    // Telemetry table (sampled)
    // -----------------------------------------------------------------------
    println!("  Telemetry");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>7}  {:>7}",
        "t (s)", "alt (m)", "AGL (m)", "tgt (m)", "throttle", "v (m/s)", "phase"
    );
    println!("  {}", "─".repeat(64));

    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, (s, log)) in trajectory.iter().zip(&logs).enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        let phase = match s.time {
            t if t < 12.0 => "CLIMB",
            t if t < 30.0 => "CRUISE",
            t if t < 38.0 => "BRAKE",
            t if t < 46.0 => "TURN",
            _ => "HOLD",
        };
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.3}  {:>7.1}  {:>7}",
            s.time,
            s.pos.z,
            log.agl,
            log.target.unwrap_or(f64::NAN),
            log.mean_throttle(),
            s.ground_speed(),
            phase
        );
    }

    println!();
    println!("  Simulation: {} steps, dt={} s", trajectory.len(), config.dt);
    println!("====================================================================");
    println!();
}
