use std::io::{self, Write};

use crate::dynamics::state::State;
use crate::sim::runner::TickLog;

/// Write flight telemetry to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          quat_w, quat_x, quat_y, quat_z, omega_x, omega_y, omega_z,
///          agl, target, throttle, tilt_deg
pub fn write_telemetry<W: Write>(
    writer: &mut W,
    trajectory: &[State],
    logs: &[TickLog],
) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         quat_w,quat_x,quat_y,quat_z,omega_x,omega_y,omega_z,\
         agl,target,throttle,tilt_deg"
    )?;

    for (s, log) in trajectory.iter().zip(logs) {
        let q = s.quat.quaternion();
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.4},{:.4},{:.4},{:.2}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            q.w, q.i, q.j, q.k,
            s.omega.x, s.omega.y, s.omega.z,
            log.agl,
            log.target.unwrap_or(f64::NAN),
            log.mean_throttle(),
            s.tilt().to_degrees(),
        )?;
    }

    Ok(())
}

/// Write flight telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: &str, trajectory: &[State], logs: &[TickLog]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_telemetry(&mut file, trajectory, logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::EngineCommand;
    use nalgebra::Vector3;

    #[test]
    fn csv_output_has_header_and_rows() {
        let trajectory = vec![
            State::at_rest(Vector3::new(0.0, 0.0, 2.0)),
            {
                let mut s = State::at_rest(Vector3::new(0.0, 0.0, 2.5));
                s.time = 0.02;
                s
            },
        ];
        let logs = vec![
            TickLog {
                commands: vec![EngineCommand::default(); 4],
                agl: 2.0,
                target: None,
            },
            TickLog {
                commands: vec![EngineCommand { throttle: 0.5, ..Default::default() }; 4],
                agl: 2.5,
                target: Some(8.0),
            },
        ];

        let mut buf = Vec::new();
        write_telemetry(&mut buf, &trajectory, &logs).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines[2].contains("8.0000"), "Target column missing: {}", lines[2]);
    }
}
