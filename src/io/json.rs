use std::io::{self, Write};

use crate::dynamics::state::State;
use crate::sim::runner::TickLog;
use crate::vehicle::HoverCraft;

/// Summary statistics computed from a hover flight.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    /// First time the craft stayed within 10% of its target for 2 s.
    pub settle_time: Option<f64>,
    /// Mean absolute height error after settling, m.
    pub mean_abs_error: f64,
    pub max_tilt_deg: f64,
    pub peak_throttle: f64,
    pub max_ground_speed: f64,
    pub final_agl: f64,
    pub flight_time: f64,
}

impl FlightSummary {
    /// Compute summary from trajectory and control log.
    pub fn from_run(trajectory: &[State], logs: &[TickLog]) -> Self {
        let settle_time = find_settle_time(trajectory, logs);

        let settled_from = settle_time.unwrap_or(0.0);
        let mut error_sum = 0.0;
        let mut error_count = 0;
        for (s, log) in trajectory.iter().zip(logs) {
            if s.time < settled_from {
                continue;
            }
            if let Some(target) = log.target {
                error_sum += (log.agl - target).abs();
                error_count += 1;
            }
        }

        let max_tilt_deg = trajectory
            .iter()
            .map(|s| s.tilt().to_degrees())
            .fold(0.0_f64, f64::max);
        let peak_throttle = logs
            .iter()
            .flat_map(|l| l.commands.iter().map(|c| c.throttle))
            .fold(0.0_f64, f64::max);
        let max_ground_speed = trajectory
            .iter()
            .map(|s| s.ground_speed())
            .fold(0.0_f64, f64::max);

        FlightSummary {
            settle_time,
            mean_abs_error: if error_count > 0 {
                error_sum / error_count as f64
            } else {
                f64::NAN
            },
            max_tilt_deg,
            peak_throttle,
            max_ground_speed,
            final_agl: logs.last().map_or(0.0, |l| l.agl),
            flight_time: trajectory.last().map_or(0.0, |s| s.time),
        }
    }
}

/// Settling: within 10% of target (at least 0.5 m of slack) held for 2 s.
fn find_settle_time(trajectory: &[State], logs: &[TickLog]) -> Option<f64> {
    let mut held_since: Option<f64> = None;
    for (s, log) in trajectory.iter().zip(logs) {
        let target = match log.target {
            Some(t) => t,
            None => {
                held_since = None;
                continue;
            }
        };
        let band = (target * 0.1).max(0.5);
        if (log.agl - target).abs() <= band {
            let since = *held_since.get_or_insert(s.time);
            if s.time - since >= 2.0 {
                return Some(since);
            }
        } else {
            held_since = None;
        }
    }
    None
}

/// Write flight summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    craft: &HoverCraft,
    summary: &FlightSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"craft\": {{")?;
    writeln!(writer, "    \"name\": \"{}\",", craft.name)?;
    writeln!(writer, "    \"engines\": {}", craft.engines.len())?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"flight\": {{")?;
    match summary.settle_time {
        Some(t) => writeln!(writer, "    \"settle_time_s\": {:.2},", t)?,
        None => writeln!(writer, "    \"settle_time_s\": null,")?,
    }
    writeln!(writer, "    \"mean_abs_error_m\": {:.3},", summary.mean_abs_error)?;
    writeln!(writer, "    \"max_tilt_deg\": {:.2},", summary.max_tilt_deg)?;
    writeln!(writer, "    \"peak_throttle\": {:.3},", summary.peak_throttle)?;
    writeln!(writer, "    \"max_ground_speed_ms\": {:.2},", summary.max_ground_speed)?;
    writeln!(writer, "    \"final_agl_m\": {:.2},", summary.final_agl)?;
    writeln!(writer, "    \"flight_time_s\": {:.2}", summary.flight_time)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    craft: &HoverCraft,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, craft, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::EngineCommand;
    use crate::vehicle::presets;
    use nalgebra::Vector3;

    fn run_at(agl_values: &[f64], target: f64) -> (Vec<State>, Vec<TickLog>) {
        let mut trajectory = Vec::new();
        let mut logs = Vec::new();
        for (i, agl) in agl_values.iter().enumerate() {
            let mut s = State::at_rest(Vector3::new(0.0, 0.0, *agl));
            s.time = i as f64 * 0.1;
            trajectory.push(s);
            logs.push(TickLog {
                commands: vec![EngineCommand { throttle: 0.4, ..Default::default() }],
                agl: *agl,
                target: Some(target),
            });
        }
        (trajectory, logs)
    }

    #[test]
    fn settle_time_found_after_convergence() {
        // 3 s away from target, then 3 s inside the band.
        let mut agl = vec![2.0; 30];
        agl.extend(vec![8.1; 30]);
        let (trajectory, logs) = run_at(&agl, 8.0);
        let summary = FlightSummary::from_run(&trajectory, &logs);
        let settle = summary.settle_time.expect("should settle");
        assert!((settle - 3.0).abs() < 0.2, "Settle near t=3, got {}", settle);
        assert!(summary.mean_abs_error < 0.2);
    }

    #[test]
    fn no_settle_when_never_in_band() {
        let agl = vec![2.0; 50];
        let (trajectory, logs) = run_at(&agl, 8.0);
        let summary = FlightSummary::from_run(&trajectory, &logs);
        assert!(summary.settle_time.is_none());
    }

    #[test]
    fn json_output_is_wellformed() {
        let agl = vec![8.0; 40];
        let (trajectory, logs) = run_at(&agl, 8.0);
        let summary = FlightSummary::from_run(&trajectory, &logs);
        let craft = presets::skimmer();

        let mut buf = Vec::new();
        write_summary(&mut buf, &craft, &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"craft\""));
        assert!(json.contains("\"Dunefly\""));
        assert!(json.contains("\"settle_time_s\""));
        assert!(json.contains("\"flight_time_s\""));
    }
}
