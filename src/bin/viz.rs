use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use nalgebra::Vector3;

use hover_sim::control::{HoverControlSystem, PilotInput};
use hover_sim::dynamics::state::{SimConfig, State};
use hover_sim::sim::runner::TickLog;
use hover_sim::sim::{simulate_with, FlightPlan};
use hover_sim::vehicle::{presets, HoverCraft};
use hover_sim::world::Environment;

fn main() -> eframe::Result {
    let craft = presets::skimmer();
    let env = Environment::temperate_dunes();
    let config = SimConfig { dt: 0.02, max_time: 60.0 };

    let hover = PilotInput { hover: true, ..Default::default() };
    let cruise = PilotInput { accel: 1.0, hover: true, ..Default::default() };
    let brake = PilotInput { brake: true, hover: true, ..Default::default() };
    let plan = FlightPlan::new(Vector3::new(0.0, 0.0, 2.0))
        .until(12.0, hover)
        .until(34.0, cruise)
        .until(f64::MAX, brake);

    let mut system = HoverControlSystem::new(&craft);
    system.set_target_height(6.0);
    let (trajectory, logs) = simulate_with(&craft, &env, &plan, &config, &mut system);

    let app = HoverViz { trajectory, logs, craft, env };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Hover Flight Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct HoverViz {
    trajectory: Vec<State>,
    logs: Vec<TickLog>,
    craft: HoverCraft,
    env: Environment,
}

impl eframe::App for HoverViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.len() / 2000).max(1);
        let sampled: Vec<(&State, &TickLog)> = self
            .trajectory
            .iter()
            .zip(&self.logs)
            .step_by(step)
            .collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Craft: {}", self.craft.name));
            let max_v = self.trajectory.iter().map(|s| s.ground_speed()).fold(0.0_f64, f64::max);
            let max_tilt = self.trajectory.iter().map(|s| s.tilt().to_degrees()).fold(0.0_f64, f64::max);
            ui.label(format!(
                "Body: {}  |  Top speed: {:.1} m/s  |  Max tilt: {:.1} deg  |  Flight: {:.0} s",
                self.env.body.name,
                max_v,
                max_tilt,
                self.trajectory.last().map_or(0.0, |s| s.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Height above ground vs Time
                ui.vertical(|ui| {
                    ui.label("Height AGL (m)");
                    let agl: PlotPoints = sampled.iter()
                        .map(|(s, l)| [s.time, l.agl])
                        .collect();
                    let target: PlotPoints = sampled.iter()
                        .filter_map(|(s, l)| l.target.map(|t| [s.time, t]))
                        .collect();
                    Plot::new("agl")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("AGL", agl));
                            plot_ui.line(Line::new("Target", target));
                        });
                });

                // Throttle vs Time
                ui.vertical(|ui| {
                    ui.label("Mean Throttle");
                    let points: PlotPoints = sampled.iter()
                        .map(|(s, l)| [s.time, l.mean_throttle()])
                        .collect();
                    Plot::new("throttle")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Throttle", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Ground speed vs Time
                ui.vertical(|ui| {
                    ui.label("Ground Speed (m/s)");
                    let points: PlotPoints = sampled.iter()
                        .map(|(s, _)| [s.time, s.ground_speed()])
                        .collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });

                // Terrain profile along the track
                ui.vertical(|ui| {
                    ui.label("Track Profile (m)");
                    let craft_line: PlotPoints = sampled.iter()
                        .map(|(s, _)| [s.pos.x, s.pos.z])
                        .collect();
                    let ground_line: PlotPoints = sampled.iter()
                        .map(|(s, _)| {
                            [s.pos.x, self.env.terrain.contact_height(
                                s.pos.x,
                                s.pos.y,
                                self.env.body.has_ocean,
                            )]
                        })
                        .collect();
                    Plot::new("profile")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("East (m)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Craft", craft_line));
                            plot_ui.line(Line::new("Ground", ground_line));
                        });
                });
            });
        });
    }
}
